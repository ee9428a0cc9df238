//! Fish generation: rolling each fish's fate and timing, then scheduling it.
//!
//! Every fish is fully decided when it is planned (species, delay, fate) and
//! becomes an independent tokio task that sleeps out its delay before
//! yielding the outcome. Tasks run to completion even if nobody awaits them.

use std::time::Duration;

use rand::Rng;
use tokio::task::JoinHandle;

use super::types::{Fate, FishId, FishOutcome, Species};
use crate::core::constants::{CATCH_CHANCE, FISH_DELAY_MAX_MS, FISH_DELAY_MIN_MS};
use crate::core::error::{GameError, Result};

/// A fish with everything about it already rolled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FishPlan {
    pub index: u32,
    pub species: Species,
    pub delay: Duration,
    pub fate: Fate,
}

/// Rolls a resolution delay uniformly in [1000, 5000) ms.
pub fn roll_delay(rng: &mut impl Rng) -> Duration {
    Duration::from_millis(rng.gen_range(FISH_DELAY_MIN_MS..FISH_DELAY_MAX_MS))
}

/// Rolls whether the bear catches the fish (70%) or it escapes.
pub fn roll_fate(rng: &mut impl Rng) -> Fate {
    if rng.gen_bool(CATCH_CHANCE) {
        Fate::Caught
    } else {
        Fate::Escaped
    }
}

pub fn roll_species(rng: &mut impl Rng) -> Species {
    Species::ALL[rng.gen_range(0..Species::ALL.len())]
}

/// Rolls `count` independent fish, indexed 0..count.
pub fn plan_batch(count: u32, rng: &mut impl Rng) -> Vec<FishPlan> {
    (0..count)
        .map(|index| FishPlan {
            index,
            species: roll_species(rng),
            delay: roll_delay(rng),
            fate: roll_fate(rng),
        })
        .collect()
}

/// Millisecond timestamp used to salt fish ids for a round.
pub fn spawn_salt() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Supplies the fish plans for each round.
pub trait FishSource: Send {
    fn plan_batch(&mut self, count: u32) -> Vec<FishPlan>;
}

/// Default source: independent random rolls per fish.
pub struct RandomSource<R> {
    rng: R,
}

impl<R: Rng + Send> RandomSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng + Send> FishSource for RandomSource<R> {
    fn plan_batch(&mut self, count: u32) -> Vec<FishPlan> {
        plan_batch(count, &mut self.rng)
    }
}

/// A scheduled fish whose outcome may not have landed yet.
#[derive(Debug)]
pub struct PendingFish {
    pub id: FishId,
    handle: JoinHandle<FishOutcome>,
}

impl PendingFish {
    /// True once the fish's timer has fired.
    pub fn is_resolved(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the fish's timer and returns its outcome.
    pub async fn resolve(self) -> Result<FishOutcome> {
        let id = self.id;
        self.handle.await.map_err(|e| GameError::FishTask {
            id,
            reason: e.to_string(),
        })
    }
}

/// The fish of one round, in spawn-index order.
#[derive(Debug, Default)]
pub struct FishBatch {
    fish: Vec<PendingFish>,
}

impl FishBatch {
    pub fn len(&self) -> usize {
        self.fish.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fish.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &FishId> {
        self.fish.iter().map(|f| &f.id)
    }

    pub fn get(&self, index: usize) -> Option<&PendingFish> {
        self.fish.get(index)
    }
}

impl IntoIterator for FishBatch {
    type Item = PendingFish;
    type IntoIter = std::vec::IntoIter<PendingFish>;

    fn into_iter(self) -> Self::IntoIter {
        self.fish.into_iter()
    }
}

/// Schedules one task per plan. Must be called inside a tokio runtime.
pub fn spawn_planned(plans: Vec<FishPlan>, salt: i64) -> FishBatch {
    let fish = plans
        .into_iter()
        .map(|plan| {
            let id = FishId::new(plan.index, salt);
            let outcome = FishOutcome::new(id.clone(), plan.species, plan.fate);
            let deadline = tokio::time::Instant::now() + plan.delay;
            let handle = tokio::spawn(async move {
                tokio::time::sleep_until(deadline).await;
                tracing::debug!(fish = %outcome.id, fate = ?outcome.fate, "fish resolved");
                outcome
            });
            PendingFish { id, handle }
        })
        .collect();
    FishBatch { fish }
}

/// Rolls and schedules `count` fish.
pub fn spawn_batch(count: u32, rng: &mut impl Rng) -> FishBatch {
    spawn_planned(plan_batch(count, rng), spawn_salt())
}
