//! Presentation sink: everything a round shows to the player.
//!
//! The simulation core only talks to [`PresentationSink`]. Front-ends
//! (terminal scene, console, browser stream) implement it; none of them
//! feed state back into the round.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::core::error::SinkError;
use crate::fishing::types::{Difficulty, Fate, FishId, RoundResult, Tally, Verdict};

pub mod console;
pub mod recorder;

pub use console::{ConsoleSink, JsonLinesSink};
pub use recorder::RecordingSink;

pub const WELCOME_MESSAGE: &str = "Ready to fish! Pick a difficulty and start the round.";
pub const ROUND_START_MESSAGE: &str = "The fishing has begun! Waiting for a bite...";

/// Category of an event log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogCategory {
    Info,
    Caught,
    Escaped,
}

impl From<Fate> for LogCategory {
    fn from(fate: Fate) -> Self {
        match fate {
            Fate::Caught => LogCategory::Caught,
            Fate::Escaped => LogCategory::Escaped,
        }
    }
}

/// One line of the event log.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub message: String,
    pub category: LogCategory,
}

impl LogEntry {
    pub fn now(message: impl Into<String>, category: LogCategory) -> Self {
        Self {
            timestamp: Local::now(),
            message: message.into(),
            category,
        }
    }

    pub fn time_label(&self) -> String {
        self.timestamp.format("%H:%M:%S").to_string()
    }

    /// `[HH:MM:SS] message`
    pub fn render(&self) -> String {
        format!("[{}] {}", self.time_label(), self.message)
    }
}

/// A fish marker shown in the river before its outcome is known.
///
/// Labelled by spawn position only; species and fate stay hidden.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub id: FishId,
    pub label: String,
}

impl Placeholder {
    pub fn for_fish(id: FishId) -> Self {
        let label = format!("Fish {}", id.index + 1);
        Self { id, label }
    }
}

/// Rendering surface for a round.
///
/// Methods take `&self`; implementors keep their own interior state.
pub trait PresentationSink: Send + Sync + 'static {
    /// Drops the event log and every fish placeholder.
    fn clear(&self) -> Result<(), SinkError>;

    fn log_event(&self, entry: &LogEntry) -> Result<(), SinkError>;

    fn show_fish(&self, placeholder: &Placeholder) -> Result<(), SinkError>;

    /// Plays the caught/escaped animation and removes the placeholder.
    fn remove_fish(&self, id: &FishId, fate: Fate) -> Result<(), SinkError>;

    fn bear_catch(&self) -> Result<(), SinkError> {
        Ok(())
    }

    /// Publishes caught, escaped and remaining counts.
    fn update_counters(&self, tally: &Tally) -> Result<(), SinkError>;

    fn show_summary(&self, result: &RoundResult) -> Result<(), SinkError>;

    fn hide_summary(&self) -> Result<(), SinkError> {
        Ok(())
    }

    /// Marks the selected difficulty.
    fn show_difficulty(&self, difficulty: Difficulty) -> Result<(), SinkError>;

    fn set_start_enabled(&self, _enabled: bool) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Serializable mirror of every sink call, used by event-stream front-ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewEvent {
    Cleared,
    Logged {
        time: String,
        message: String,
        category: LogCategory,
    },
    FishShown {
        id: String,
        label: String,
    },
    FishRemoved {
        id: String,
        fate: Fate,
    },
    BearCatch,
    Counters {
        caught: u32,
        escaped: u32,
        remaining: u32,
    },
    Summary {
        caught: u32,
        escaped: u32,
        verdict: Verdict,
        message: String,
    },
    SummaryHidden,
    Difficulty {
        level: Difficulty,
        label: String,
    },
    StartEnabled {
        enabled: bool,
    },
}

impl ViewEvent {
    pub fn counters(tally: &Tally) -> Self {
        ViewEvent::Counters {
            caught: tally.caught,
            escaped: tally.escaped,
            remaining: tally.remaining(),
        }
    }

    pub fn summary(result: &RoundResult) -> Self {
        let verdict = result.verdict();
        ViewEvent::Summary {
            caught: result.caught_count,
            escaped: result.escaped_count,
            verdict,
            message: verdict.summary().to_string(),
        }
    }
}

/// A sink that only forwards [`ViewEvent`]s somewhere.
pub trait ViewEventEmitter: Send + Sync + 'static {
    fn emit(&self, event: ViewEvent) -> Result<(), SinkError>;
}

impl<T: ViewEventEmitter> PresentationSink for T {
    fn clear(&self) -> Result<(), SinkError> {
        self.emit(ViewEvent::Cleared)
    }

    fn log_event(&self, entry: &LogEntry) -> Result<(), SinkError> {
        self.emit(ViewEvent::Logged {
            time: entry.time_label(),
            message: entry.message.clone(),
            category: entry.category,
        })
    }

    fn show_fish(&self, placeholder: &Placeholder) -> Result<(), SinkError> {
        self.emit(ViewEvent::FishShown {
            id: placeholder.id.to_string(),
            label: placeholder.label.clone(),
        })
    }

    fn remove_fish(&self, id: &FishId, fate: Fate) -> Result<(), SinkError> {
        self.emit(ViewEvent::FishRemoved {
            id: id.to_string(),
            fate,
        })
    }

    fn bear_catch(&self) -> Result<(), SinkError> {
        self.emit(ViewEvent::BearCatch)
    }

    fn update_counters(&self, tally: &Tally) -> Result<(), SinkError> {
        self.emit(ViewEvent::counters(tally))
    }

    fn show_summary(&self, result: &RoundResult) -> Result<(), SinkError> {
        self.emit(ViewEvent::summary(result))
    }

    fn hide_summary(&self) -> Result<(), SinkError> {
        self.emit(ViewEvent::SummaryHidden)
    }

    fn show_difficulty(&self, difficulty: Difficulty) -> Result<(), SinkError> {
        self.emit(ViewEvent::Difficulty {
            level: difficulty,
            label: difficulty.display_name().to_string(),
        })
    }

    fn set_start_enabled(&self, enabled: bool) -> Result<(), SinkError> {
        self.emit(ViewEvent::StartEnabled { enabled })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_is_index_labelled() {
        let p = Placeholder::for_fish(FishId::new(0, 99));
        assert_eq!(p.label, "Fish 1");
        let p = Placeholder::for_fish(FishId::new(9, 99));
        assert_eq!(p.label, "Fish 10");
    }

    #[test]
    fn test_log_entry_render_has_time_prefix() {
        let entry = LogEntry::now("Caught a carp!", LogCategory::Caught);
        let line = entry.render();
        assert!(line.starts_with('['));
        assert!(line.ends_with("] Caught a carp!"));
        assert_eq!(entry.time_label().len(), 8);
    }

    #[test]
    fn test_view_event_wire_format() {
        let event = ViewEvent::counters(&Tally {
            caught: 2,
            escaped: 1,
            total: 5,
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "counters");
        assert_eq!(json["remaining"], 2);

        let event = ViewEvent::FishRemoved {
            id: "fish-0-1".to_string(),
            fate: Fate::Escaped,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"type":"fish_removed","id":"fish-0-1","fate":"escaped"}"#);
    }

    #[test]
    fn test_summary_event_carries_verdict_message() {
        let result = RoundResult {
            caught_count: 0,
            escaped_count: 3,
            total_spawned: 3,
        };
        match ViewEvent::summary(&result) {
            ViewEvent::Summary {
                verdict, message, ..
            } => {
                assert_eq!(verdict, Verdict::Empty);
                assert_eq!(message, Verdict::Empty.summary());
            }
            other => panic!("unexpected event {:?}", other),
        }
    }
}
