//! Line-oriented sinks for headless play.

use std::collections::HashSet;
use std::io::{self, Stdout, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crossterm::style::Stylize;

use super::{LogCategory, LogEntry, Placeholder, PresentationSink, ViewEvent, ViewEventEmitter};
use crate::core::error::SinkError;
use crate::fishing::types::{Difficulty, Fate, FishId, RoundResult, Tally};

struct ConsoleState<W> {
    out: W,
    on_screen: HashSet<FishId>,
}

/// Prints the round as colored, timestamped lines.
pub struct ConsoleSink<W: Write + Send + 'static = Stdout> {
    state: Mutex<ConsoleState<W>>,
    color: bool,
}

impl ConsoleSink<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout(), true)
    }
}

impl<W: Write + Send + 'static> ConsoleSink<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self {
            state: Mutex::new(ConsoleState {
                out,
                on_screen: HashSet::new(),
            }),
            color,
        }
    }

    /// Returns the writer, e.g. to inspect captured output.
    pub fn into_inner(self) -> W {
        self.state
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .out
    }

    fn state(&self) -> MutexGuard<'_, ConsoleState<W>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn line(&self, text: String) -> Result<(), SinkError> {
        let mut state = self.state();
        writeln!(state.out, "{}", text)?;
        state.out.flush()?;
        Ok(())
    }
}

impl<W: Write + Send + 'static> PresentationSink for ConsoleSink<W> {
    fn clear(&self) -> Result<(), SinkError> {
        self.state().on_screen.clear();
        Ok(())
    }

    fn log_event(&self, entry: &LogEntry) -> Result<(), SinkError> {
        let text = entry.render();
        let text = match (self.color, entry.category) {
            (false, _) => text,
            (true, LogCategory::Info) => text.cyan().to_string(),
            (true, LogCategory::Caught) => text.green().to_string(),
            (true, LogCategory::Escaped) => text.red().to_string(),
        };
        self.line(text)
    }

    fn show_fish(&self, placeholder: &Placeholder) -> Result<(), SinkError> {
        self.state().on_screen.insert(placeholder.id.clone());
        Ok(())
    }

    fn remove_fish(&self, id: &FishId, _fate: Fate) -> Result<(), SinkError> {
        if self.state().on_screen.remove(id) {
            Ok(())
        } else {
            Err(SinkError::MissingPlaceholder(id.clone()))
        }
    }

    fn update_counters(&self, tally: &Tally) -> Result<(), SinkError> {
        self.line(format!(
            "    caught {} | escaped {} | remaining {}",
            tally.caught,
            tally.escaped,
            tally.remaining()
        ))
    }

    fn show_summary(&self, result: &RoundResult) -> Result<(), SinkError> {
        let verdict = result.verdict().summary();
        let verdict = if self.color {
            verdict.bold().to_string()
        } else {
            verdict.to_string()
        };
        self.line(format!(
            "Fish caught: {}  Fish escaped: {}\n{}",
            result.caught_count, result.escaped_count, verdict
        ))
    }

    fn show_difficulty(&self, difficulty: Difficulty) -> Result<(), SinkError> {
        self.line(format!(
            "Difficulty: {} ({} fish)",
            difficulty,
            difficulty.fish_count()
        ))
    }
}

/// Writes one JSON [`ViewEvent`] per line.
pub struct JsonLinesSink<W: Write + Send + 'static = Stdout> {
    out: Mutex<W>,
}

impl JsonLinesSink<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send + 'static> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write + Send + 'static> ViewEventEmitter for JsonLinesSink<W> {
    fn emit(&self, event: ViewEvent) -> Result<(), SinkError> {
        let json = serde_json::to_string(&event)
            .map_err(|e| SinkError::RenderTarget(e.to_string()))?;
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(out, "{}", json)?;
        out.flush()?;
        Ok(())
    }
}
