//! River scene rendering.
//!
//! # Layout
//! ```text
//! +---------------------------------------+
//! |  RIVER BEAR   [1] Easy [2] Medium ... |
//! +---------------------------------------+
//! |   ʕ•ᴥ•ʔ                               |
//! |  ~ ~ ~ ~ ><> ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~    |
//! |  ~ ~ ~ ~ ~ ~ ~ ~ ~ <*> ~ ~ ~ ~ ~ ~    |
//! |  ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ><> ~ ~    |
//! +---------------------------------------+
//! |  Caught: 2   Escaped: 1   Remaining: 2|
//! +---------------------------------------+
//! |  [12:00:01] Caught a pike!            |
//! |  [12:00:02] The carp swam away...     |
//! +---------------------------------------+
//! |  [Enter] Start  [1-3] Difficulty ...  |
//! +---------------------------------------+
//! ```

use std::time::Instant;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::river_view::{RiverFish, RiverState, RIVER_LANES};
use super::throbber::{bobber, waiting_message};
use crate::fishing::types::{Difficulty, Fate, RoundResult};
use crate::presentation::LogCategory;

const BEAR_IDLE: &str = "ʕ•ᴥ•ʔ";
const BEAR_CATCHING: &str = "ʕ>ᴥ<ʔ  *SPLASH*";
const FISH_SWIMMING: &str = "><>";
const FISH_CAUGHT: &str = "<*>";
const FISH_ESCAPED: &str = "~~>";
const BANK_MARGIN: usize = 2;

/// Renders the whole river scene.
pub fn render_river_scene(
    frame: &mut Frame,
    area: Rect,
    state: &RiverState,
    playing: bool,
    now: Instant,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),                      // Header + difficulty
            Constraint::Length(RIVER_LANES as u16 + 3), // Bear and river
            Constraint::Length(3),                      // Counters
            Constraint::Min(4),                         // Event log
            Constraint::Length(3),                      // Controls
        ])
        .split(area);

    draw_header(frame, chunks[0], state.difficulty);
    draw_river(frame, chunks[1], state, now);
    draw_counters(frame, chunks[2], state);
    draw_log(frame, chunks[3], state);
    draw_controls(frame, chunks[4], state, playing);

    if let Some(result) = &state.summary {
        draw_summary(frame, area, result);
    }
}

fn draw_header(frame: &mut Frame, area: Rect, selected: Difficulty) {
    let mut spans = vec![Span::styled(
        "RIVER BEAR   ",
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )];
    for (i, difficulty) in Difficulty::ALL.iter().enumerate() {
        let style = if *difficulty == selected {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(
            format!("[{}] {} ({} fish)  ", i + 1, difficulty, difficulty.fish_count()),
            style,
        ));
    }

    let header = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);
    frame.render_widget(header, area);
}

/// Builds one lane of water with the fish swimming in it.
fn lane_line(fish: &[RiverFish], lane: u8, width: usize) -> Line<'static> {
    let mut cells: Vec<(char, Style)> = (0..width)
        .map(|x| {
            let c = if x % 2 == lane as usize % 2 { '~' } else { ' ' };
            (c, Style::default().fg(Color::Blue))
        })
        .collect();

    let glyph_width = FISH_SWIMMING.chars().count();
    let span = width.saturating_sub(glyph_width + BANK_MARGIN * 2);
    for f in fish.iter().filter(|f| f.lane == lane) {
        let (glyph, style) = match f.leaving {
            None => (FISH_SWIMMING, Style::default().fg(Color::LightCyan)),
            Some((Fate::Caught, _)) => (
                FISH_CAUGHT,
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Some((Fate::Escaped, _)) => (FISH_ESCAPED, Style::default().fg(Color::Red)),
        };
        let start = BANK_MARGIN + (f.column.clamp(0.0, 1.0) * span as f32) as usize;
        for (offset, c) in glyph.chars().enumerate() {
            if let Some(cell) = cells.get_mut(start + offset) {
                *cell = (c, style);
            }
        }
    }

    Line::from(
        cells
            .into_iter()
            .map(|(c, style)| Span::styled(c.to_string(), style))
            .collect::<Vec<_>>(),
    )
}

fn draw_river(frame: &mut Frame, area: Rect, state: &RiverState, now: Instant) {
    let block = Block::default().borders(Borders::ALL).title(" River ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let (bear, bear_style) = if state.bear_catching(now) {
        (
            BEAR_CATCHING,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        (BEAR_IDLE, Style::default().fg(Color::Rgb(160, 100, 50)))
    };

    let width = inner.width as usize;
    let mut lines = vec![Line::from(vec![
        Span::raw(" ".repeat(BANK_MARGIN)),
        Span::styled(bear, bear_style),
    ])];
    for lane in 0..RIVER_LANES {
        lines.push(lane_line(&state.fish, lane, width));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn draw_counters(frame: &mut Frame, area: Rect, state: &RiverState) {
    let tally = &state.tally;
    let line = Line::from(vec![
        Span::styled("Caught: ", Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(tally.caught.to_string(), Style::default().fg(Color::Green)),
        Span::raw("   "),
        Span::styled("Escaped: ", Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(tally.escaped.to_string(), Style::default().fg(Color::Red)),
        Span::raw("   "),
        Span::styled("Remaining: ", Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(
            tally.remaining().to_string(),
            Style::default().fg(Color::Yellow),
        ),
    ]);

    let counters = Paragraph::new(line)
        .block(Block::default().borders(Borders::ALL).title(" Stats "))
        .alignment(Alignment::Center);
    frame.render_widget(counters, area);
}

fn draw_log(frame: &mut Frame, area: Rect, state: &RiverState) {
    let visible = area.height.saturating_sub(2) as usize;
    let skip = state.log.len().saturating_sub(visible);

    let lines: Vec<Line> = state
        .log
        .iter()
        .skip(skip)
        .map(|entry| {
            let color = match entry.category {
                LogCategory::Info => Color::Cyan,
                LogCategory::Caught => Color::Green,
                LogCategory::Escaped => Color::Red,
            };
            Line::from(Span::styled(entry.render(), Style::default().fg(color)))
        })
        .collect();

    let log = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Events "))
        .wrap(Wrap { trim: false });
    frame.render_widget(log, area);
}

fn draw_controls(frame: &mut Frame, area: Rect, state: &RiverState, playing: bool) {
    let line = if playing {
        Line::from(Span::styled(
            format!(
                "{} {}",
                bobber(),
                waiting_message(state.tally.settled() as u64)
            ),
            Style::default().fg(Color::Cyan),
        ))
    } else {
        let start_style = if state.start_enabled {
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        Line::from(vec![
            Span::styled("[Enter] Start fishing", start_style),
            Span::raw("   [1-3] Difficulty   [R] Restart   [Q] Quit"),
        ])
    };

    let controls = Paragraph::new(line)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);
    frame.render_widget(controls, area);
}

fn draw_summary(frame: &mut Frame, area: Rect, result: &RoundResult) {
    let popup = centered_rect(50, 7, area);
    let lines = vec![
        Line::from(format!("Fish caught: {}", result.caught_count)),
        Line::from(format!("Fish escaped: {}", result.escaped_count)),
        Line::from(""),
        Line::from(Span::styled(
            result.verdict().summary(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
    ];

    frame.render_widget(Clear, popup);
    let summary = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(" Results "),
        )
        .alignment(Alignment::Center);
    frame.render_widget(summary, popup);
}

/// A rect `percent_x` wide and `height` tall, centered in `area`.
fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let width = area.width * percent_x / 100;
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
