//! River Bear - a bear catches fish in a river.
//!
//! Each round spawns a batch of fish that resolve on their own random timers
//! as caught or escaped. The round settles them one by one in spawn order
//! and reports everything through a [`presentation::PresentationSink`].

pub mod core;
pub mod fishing;
pub mod presentation;
pub mod ui;
pub mod utils;
pub mod web;

pub use crate::core::{GameError, Result, Settings};
pub use fishing::{Difficulty, FishingGame, RoundResult};
