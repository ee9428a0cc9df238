//! Fishing rounds: types, fish generation, and round orchestration.

pub mod generation;
pub mod logic;
pub mod types;

pub use generation::{
    plan_batch, roll_delay, roll_fate, roll_species, spawn_batch, spawn_planned, spawn_salt,
    FishBatch, FishPlan, FishSource, PendingFish, RandomSource,
};
pub use logic::{FishingGame, GameSession, RoundPhase};
pub use types::*;
