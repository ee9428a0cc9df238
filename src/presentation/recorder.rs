//! In-memory sink that keeps every [`ViewEvent`] in call order.

use std::sync::{Mutex, PoisonError};

use super::{ViewEvent, ViewEventEmitter};
use crate::core::error::SinkError;

#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<ViewEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far.
    pub fn events(&self) -> Vec<ViewEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ViewEventEmitter for RecordingSink {
    fn emit(&self, event: ViewEvent) -> Result<(), SinkError> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
        Ok(())
    }
}
