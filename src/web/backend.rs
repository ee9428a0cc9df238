//! Broadcast sink for browser clients.
//!
//! Every sink call becomes a JSON [`ViewEvent`] sent to all connected
//! clients. Events since the last clear are kept so a client that joins
//! mid-round sees the current river. Difficulty and start-button events
//! are state, so only the latest of each is kept.

use std::mem::discriminant;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;

use crate::core::constants::WEB_BROADCAST_CAPACITY;
use crate::core::error::SinkError;
use crate::presentation::{ViewEvent, ViewEventEmitter};

pub struct BroadcastSink {
    tx: broadcast::Sender<String>,
    history: Mutex<Vec<ViewEvent>>,
}

impl BroadcastSink {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(WEB_BROADCAST_CAPACITY);
        Self {
            tx,
            history: Mutex::new(Vec::new()),
        }
    }

    fn history(&self) -> MutexGuard<'_, Vec<ViewEvent>> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replay of the current view plus a receiver for everything after it.
    pub fn subscribe(&self) -> (Vec<String>, broadcast::Receiver<String>) {
        let history = self.history();
        let replay = history
            .iter()
            .filter_map(|e| serde_json::to_string(e).ok())
            .collect();
        (replay, self.tx.subscribe())
    }
}

impl Default for BroadcastSink {
    fn default() -> Self {
        Self::new()
    }
}

/// Events that survive a clear.
fn is_sticky(event: &ViewEvent) -> bool {
    matches!(
        event,
        ViewEvent::Difficulty { .. } | ViewEvent::StartEnabled { .. }
    )
}

impl ViewEventEmitter for BroadcastSink {
    fn emit(&self, event: ViewEvent) -> Result<(), SinkError> {
        let json = serde_json::to_string(&event)
            .map_err(|e| SinkError::RenderTarget(e.to_string()))?;

        let mut history = self.history();
        match event {
            ViewEvent::Cleared => history.retain(is_sticky),
            ViewEvent::Difficulty { .. } | ViewEvent::StartEnabled { .. } => {
                let kind = discriminant(&event);
                history.retain(|e| discriminant(e) != kind);
            }
            _ => {}
        }
        history.push(event);
        drop(history);

        // No subscribers is fine
        let _ = self.tx.send(json);
        Ok(())
    }
}
