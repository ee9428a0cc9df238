//! Terminal front-end: key handling and the frame loop.

pub mod river_scene;
pub mod river_view;
pub mod throbber;

use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use futures_util::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::core::constants::REALTIME_FRAME_MS;
use crate::fishing::logic::FishingGame;
use crate::fishing::types::Difficulty;
pub use river_view::{RiverState, RiverView};

/// Something the player asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Select(Difficulty),
    Start,
    Restart,
    Quit,
}

/// Maps a key press to an action.
pub fn action_for_key(key: KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char('1') => Some(Action::Select(Difficulty::Easy)),
        KeyCode::Char('2') => Some(Action::Select(Difficulty::Medium)),
        KeyCode::Char('3') => Some(Action::Select(Difficulty::Hard)),
        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('s') => Some(Action::Start),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Action::Restart),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Action::Quit),
        _ => None,
    }
}

/// Applies an action to the game. Rounds run as their own task.
pub fn dispatch(game: &FishingGame<RiverView>, action: Action) {
    match action {
        Action::Select(difficulty) => {
            if let Err(e) = game.select_difficulty(difficulty) {
                tracing::warn!(error = %e, "difficulty selection failed");
            }
        }
        Action::Start => {
            let game = game.clone();
            tokio::spawn(async move {
                // Failures are logged inside the round.
                let _ = game.start_round().await;
            });
        }
        Action::Restart => {
            if let Err(e) = game.restart() {
                tracing::warn!(error = %e, "restart failed");
            }
        }
        Action::Quit => {}
    }
}

/// Runs the terminal game until the player quits.
pub async fn run_tui(game: FishingGame<RiverView>) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &game).await;

    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    game: &FishingGame<RiverView>,
) -> io::Result<()> {
    let mut events = EventStream::new();
    let mut frames = tokio::time::interval(Duration::from_millis(REALTIME_FRAME_MS));

    loop {
        tokio::select! {
            _ = frames.tick() => {
                let now = Instant::now();
                let state = game.sink().frame_state(now);
                let playing = game.is_playing();
                terminal.draw(|f| {
                    river_scene::render_river_scene(f, f.size(), &state, playing, now);
                })?;
            }
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) => match action_for_key(key) {
                    Some(Action::Quit) => return Ok(()),
                    Some(action) => dispatch(game, action),
                    None => {}
                },
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e),
                None => return Ok(()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_number_keys_select_difficulty() {
        assert_eq!(
            action_for_key(press(KeyCode::Char('1'))),
            Some(Action::Select(Difficulty::Easy))
        );
        assert_eq!(
            action_for_key(press(KeyCode::Char('3'))),
            Some(Action::Select(Difficulty::Hard))
        );
    }

    #[test]
    fn test_control_keys() {
        assert_eq!(action_for_key(press(KeyCode::Enter)), Some(Action::Start));
        assert_eq!(action_for_key(press(KeyCode::Char('r'))), Some(Action::Restart));
        assert_eq!(action_for_key(press(KeyCode::Esc)), Some(Action::Quit));
        assert_eq!(action_for_key(press(KeyCode::Char('x'))), None);
    }

    #[test]
    fn test_key_release_is_ignored() {
        let mut key = press(KeyCode::Enter);
        key.kind = KeyEventKind::Release;
        assert_eq!(action_for_key(key), None);
    }
}
