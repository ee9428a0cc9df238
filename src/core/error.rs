//! Error types shared by the simulation core and its front-ends.

use thiserror::Error;

use crate::fishing::types::FishId;

/// Failures reported by a presentation sink.
#[derive(Error, Debug)]
pub enum SinkError {
    /// The placeholder for a fish is no longer on screen. Rounds tolerate this.
    #[error("no placeholder rendered for {0}")]
    MissingPlaceholder(FishId),

    #[error("render target unavailable: {0}")]
    RenderTarget(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum GameError {
    #[error("presentation failed: {0}")]
    Presentation(#[from] SinkError),

    #[error("fish task for {id} did not finish: {reason}")]
    FishTask { id: FishId, reason: String },

    #[error("unknown difficulty: {0}")]
    UnknownDifficulty(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
