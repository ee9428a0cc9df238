//! Constants, configuration and errors shared across the crate.

pub mod config;
pub mod constants;
pub mod error;

pub use config::{load_settings, load_settings_from, Settings};
pub use error::{GameError, Result, SinkError};
