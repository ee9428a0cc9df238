//! Render model for the terminal river scene.
//!
//! [`RiverView`] receives sink calls from the round and keeps just enough
//! state for the frame loop to draw: fish markers, the event log, counters,
//! the selected difficulty and short-lived animations.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use rand::Rng;

use crate::core::constants::{BEAR_CATCH_ANIMATION_MS, EVENT_LOG_CAPACITY, FISH_FADE_MS};
use crate::core::error::SinkError;
use crate::fishing::types::{Difficulty, Fate, FishId, RoundResult, Tally};
use crate::presentation::{LogEntry, Placeholder, PresentationSink};

/// Number of swimming lanes in the river.
pub const RIVER_LANES: u8 = 3;

/// A fish marker in the river.
#[derive(Debug, Clone, PartialEq)]
pub struct RiverFish {
    pub id: FishId,
    pub label: String,
    pub lane: u8,
    /// Horizontal position, 0.0 (bear's bank) to 1.0 (far bank)
    pub column: f32,
    /// Set once the fish is settled; the marker fades out afterwards
    pub leaving: Option<(Fate, Instant)>,
}

#[derive(Debug, Clone)]
pub struct RiverState {
    pub fish: Vec<RiverFish>,
    pub log: VecDeque<LogEntry>,
    pub tally: Tally,
    pub summary: Option<RoundResult>,
    pub difficulty: Difficulty,
    pub start_enabled: bool,
    pub bear_catching_until: Option<Instant>,
}

impl Default for RiverState {
    fn default() -> Self {
        Self {
            fish: Vec::new(),
            log: VecDeque::with_capacity(EVENT_LOG_CAPACITY),
            tally: Tally::default(),
            summary: None,
            difficulty: Difficulty::default(),
            start_enabled: true,
            bear_catching_until: None,
        }
    }
}

impl RiverState {
    pub fn bear_catching(&self, now: Instant) -> bool {
        self.bear_catching_until.is_some_and(|until| now < until)
    }

    /// Drops fish whose fade-out finished before `now`.
    fn prune(&mut self, now: Instant) {
        let fade = Duration::from_millis(FISH_FADE_MS);
        self.fish.retain(|f| match f.leaving {
            Some((_, since)) => now.duration_since(since) < fade,
            None => true,
        });
    }
}

#[derive(Debug, Default)]
pub struct RiverView {
    state: Mutex<RiverState>,
}

impl RiverView {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, RiverState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// State to draw at `now`, with finished animations removed.
    pub fn frame_state(&self, now: Instant) -> RiverState {
        let mut state = self.state();
        state.prune(now);
        state.clone()
    }
}

impl PresentationSink for RiverView {
    fn clear(&self) -> Result<(), SinkError> {
        let mut state = self.state();
        state.fish.clear();
        state.log.clear();
        Ok(())
    }

    fn log_event(&self, entry: &LogEntry) -> Result<(), SinkError> {
        let mut state = self.state();
        if state.log.len() == EVENT_LOG_CAPACITY {
            state.log.pop_front();
        }
        state.log.push_back(entry.clone());
        Ok(())
    }

    fn show_fish(&self, placeholder: &Placeholder) -> Result<(), SinkError> {
        let mut rng = rand::thread_rng();
        let fish = RiverFish {
            id: placeholder.id.clone(),
            label: placeholder.label.clone(),
            lane: rng.gen_range(0..RIVER_LANES),
            column: rng.gen_range(0.15..1.0),
            leaving: None,
        };
        self.state().fish.push(fish);
        Ok(())
    }

    fn remove_fish(&self, id: &FishId, fate: Fate) -> Result<(), SinkError> {
        let mut state = self.state();
        match state
            .fish
            .iter_mut()
            .find(|f| &f.id == id && f.leaving.is_none())
        {
            Some(fish) => {
                fish.leaving = Some((fate, Instant::now()));
                Ok(())
            }
            None => Err(SinkError::MissingPlaceholder(id.clone())),
        }
    }

    fn bear_catch(&self) -> Result<(), SinkError> {
        self.state().bear_catching_until =
            Some(Instant::now() + Duration::from_millis(BEAR_CATCH_ANIMATION_MS));
        Ok(())
    }

    fn update_counters(&self, tally: &Tally) -> Result<(), SinkError> {
        self.state().tally = *tally;
        Ok(())
    }

    fn show_summary(&self, result: &RoundResult) -> Result<(), SinkError> {
        self.state().summary = Some(*result);
        Ok(())
    }

    fn hide_summary(&self) -> Result<(), SinkError> {
        self.state().summary = None;
        Ok(())
    }

    fn show_difficulty(&self, difficulty: Difficulty) -> Result<(), SinkError> {
        self.state().difficulty = difficulty;
        Ok(())
    }

    fn set_start_enabled(&self, enabled: bool) -> Result<(), SinkError> {
        self.state().start_enabled = enabled;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::LogCategory;

    #[test]
    fn test_show_fish_places_marker_in_a_lane() {
        let view = RiverView::new();
        view.show_fish(&Placeholder::for_fish(FishId::new(0, 1)))
            .unwrap();
        let state = view.frame_state(Instant::now());
        assert_eq!(state.fish.len(), 1);
        assert!(state.fish[0].lane < RIVER_LANES);
        assert!((0.0..=1.0).contains(&state.fish[0].column));
        assert_eq!(state.fish[0].label, "Fish 1");
    }

    #[test]
    fn test_removed_fish_fades_then_disappears() {
        let view = RiverView::new();
        let id = FishId::new(0, 1);
        view.show_fish(&Placeholder::for_fish(id.clone())).unwrap();
        view.remove_fish(&id, Fate::Caught).unwrap();

        let now = Instant::now();
        assert_eq!(view.frame_state(now).fish.len(), 1);
        let later = now + Duration::from_millis(FISH_FADE_MS + 1);
        assert!(view.frame_state(later).fish.is_empty());
    }

    #[test]
    fn test_removing_twice_reports_missing() {
        let view = RiverView::new();
        let id = FishId::new(2, 1);
        view.show_fish(&Placeholder::for_fish(id.clone())).unwrap();
        view.remove_fish(&id, Fate::Escaped).unwrap();
        assert!(matches!(
            view.remove_fish(&id, Fate::Escaped),
            Err(SinkError::MissingPlaceholder(_))
        ));
    }

    #[test]
    fn test_log_is_bounded() {
        let view = RiverView::new();
        for i in 0..EVENT_LOG_CAPACITY + 5 {
            view.log_event(&LogEntry::now(format!("line {}", i), LogCategory::Info))
                .unwrap();
        }
        let state = view.frame_state(Instant::now());
        assert_eq!(state.log.len(), EVENT_LOG_CAPACITY);
        assert_eq!(state.log.front().unwrap().message, "line 5");
    }

    #[test]
    fn test_bear_catch_animation_expires() {
        let view = RiverView::new();
        view.bear_catch().unwrap();
        let state = view.frame_state(Instant::now());
        assert!(state.bear_catching(Instant::now()));
        let later = Instant::now() + Duration::from_millis(BEAR_CATCH_ANIMATION_MS + 1);
        assert!(!state.bear_catching(later));
    }

    #[test]
    fn test_clear_drops_log_and_fish_but_keeps_difficulty() {
        let view = RiverView::new();
        view.show_difficulty(Difficulty::Hard).unwrap();
        view.show_fish(&Placeholder::for_fish(FishId::new(0, 1)))
            .unwrap();
        view.log_event(&LogEntry::now("hello", LogCategory::Info))
            .unwrap();
        view.clear().unwrap();

        let state = view.frame_state(Instant::now());
        assert!(state.fish.is_empty());
        assert!(state.log.is_empty());
        assert_eq!(state.difficulty, Difficulty::Hard);
    }
}
