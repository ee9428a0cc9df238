//! Round orchestration.
//!
//! A round walks `Idle -> Resetting -> Running -> Reconciling(i) -> Completed`.
//! Fish resolve on their own timers in any order; the round settles them
//! strictly by spawn index, so a fast fish behind a slow one waits its turn.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;

use super::generation::{self, FishSource, RandomSource};
use super::types::{Difficulty, Fate, FishOutcome, RoundResult, Tally};
use crate::core::constants::RECONCILE_PACING_MS;
use crate::core::error::{Result, SinkError};
use crate::presentation::{
    LogCategory, LogEntry, Placeholder, PresentationSink, ROUND_START_MESSAGE, WELCOME_MESSAGE,
};

/// Where the current (or last) round stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "phase", content = "index", rename_all = "snake_case")]
pub enum RoundPhase {
    #[default]
    Idle,
    Resetting,
    Running,
    /// Settling the fish at this spawn index
    Reconciling(u32),
    Completed,
}

/// Session state shared between the round and the controls.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GameSession {
    pub is_playing: bool,
    /// Difficulty the next round will use
    pub current_difficulty: Difficulty,
    /// Difficulty fixed at the start of the running or last round
    pub round_difficulty: Option<Difficulty>,
    pub tally: Tally,
    pub phase: RoundPhase,
    pub rounds_played: u32,
}

/// The bear's fishing game: owns the session, the fish source and the sink.
pub struct FishingGame<S: PresentationSink> {
    session: Arc<Mutex<GameSession>>,
    source: Arc<Mutex<Box<dyn FishSource>>>,
    sink: Arc<S>,
    pacing: Duration,
}

impl<S: PresentationSink> Clone for FishingGame<S> {
    fn clone(&self) -> Self {
        Self {
            session: Arc::clone(&self.session),
            source: Arc::clone(&self.source),
            sink: Arc::clone(&self.sink),
            pacing: self.pacing,
        }
    }
}

impl<S: PresentationSink> FishingGame<S> {
    /// Game with random fish drawn from `rng`.
    pub fn new<R: rand::Rng + Send + 'static>(sink: Arc<S>, rng: R) -> Self {
        Self::with_source(sink, RandomSource::new(rng))
    }

    pub fn with_source(sink: Arc<S>, source: impl FishSource + 'static) -> Self {
        Self {
            session: Arc::new(Mutex::new(GameSession::default())),
            source: Arc::new(Mutex::new(Box::new(source))),
            sink,
            pacing: Duration::from_millis(RECONCILE_PACING_MS),
        }
    }

    pub fn sink(&self) -> &Arc<S> {
        &self.sink
    }

    fn session(&self) -> MutexGuard<'_, GameSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the session state.
    pub fn snapshot(&self) -> GameSession {
        self.session().clone()
    }

    pub fn is_playing(&self) -> bool {
        self.session().is_playing
    }

    /// Shows the initial difficulty and the welcome line.
    pub fn open(&self) -> Result<()> {
        let difficulty = self.session().current_difficulty;
        self.sink.show_difficulty(difficulty)?;
        self.sink.update_counters(&Tally::default())?;
        self.sink
            .log_event(&LogEntry::now(WELCOME_MESSAGE, LogCategory::Info))?;
        self.sink.set_start_enabled(true)?;
        Ok(())
    }

    /// Selects the difficulty for the next round.
    ///
    /// Accepted while a round is playing; the running round keeps its fish
    /// count and the new choice applies from the next start.
    pub fn select_difficulty(&self, difficulty: Difficulty) -> Result<()> {
        let playing = {
            let mut session = self.session();
            session.current_difficulty = difficulty;
            session.is_playing
        };
        if playing {
            tracing::info!(%difficulty, "difficulty queued for the next round");
        } else {
            tracing::info!(%difficulty, "difficulty selected");
        }
        self.sink.show_difficulty(difficulty)?;
        Ok(())
    }

    /// Clears counters and the sink, ready for a new start.
    ///
    /// Ignored while a round is playing; returns whether the reset happened.
    pub fn restart(&self) -> Result<bool> {
        {
            let mut session = self.session();
            if session.is_playing {
                tracing::debug!("restart ignored: round in progress");
                return Ok(false);
            }
            session.tally = Tally::default();
            session.phase = RoundPhase::Idle;
        }
        self.sink.clear()?;
        self.sink.hide_summary()?;
        self.sink.update_counters(&Tally::default())?;
        self.sink.set_start_enabled(true)?;
        Ok(true)
    }

    /// Plays one round with the current difficulty.
    ///
    /// Returns `Ok(None)` without touching anything if a round is already
    /// playing. The playing flag is released on every exit path.
    pub async fn start_round(&self) -> Result<Option<RoundResult>> {
        let Some(guard) = PlayingGuard::acquire(self) else {
            tracing::debug!("start ignored: round in progress");
            return Ok(None);
        };

        let result = self.play_round().await;
        drop(guard);

        match &result {
            Ok(r) => tracing::info!(
                caught = r.caught_count,
                escaped = r.escaped_count,
                total = r.total_spawned,
                "round complete"
            ),
            Err(e) => tracing::error!(error = %e, "round aborted"),
        }
        result.map(Some)
    }

    async fn play_round(&self) -> Result<RoundResult> {
        self.sink.set_start_enabled(false)?;

        // Resetting
        let difficulty = {
            let mut session = self.session();
            let difficulty = session.current_difficulty;
            session.round_difficulty = Some(difficulty);
            session.tally = Tally::new(difficulty.fish_count());
            session.phase = RoundPhase::Resetting;
            session.rounds_played += 1;
            difficulty
        };
        self.sink.hide_summary()?;
        self.sink.clear()?;
        self.sink.update_counters(&Tally::default())?;
        self.sink
            .log_event(&LogEntry::now(ROUND_START_MESSAGE, LogCategory::Info))?;

        // Running
        let plans = self
            .source
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .plan_batch(difficulty.fish_count());
        let batch = generation::spawn_planned(plans, generation::spawn_salt());
        tracing::info!(%difficulty, fish = batch.len(), "round started");

        let tally = {
            let mut session = self.session();
            session.tally = Tally::new(batch.len() as u32);
            session.phase = RoundPhase::Running;
            session.tally
        };
        for id in batch.ids() {
            self.sink.show_fish(&Placeholder::for_fish(id.clone()))?;
        }
        self.sink.update_counters(&tally)?;

        // Reconciling, strictly in spawn order
        for (index, fish) in batch.into_iter().enumerate() {
            self.session().phase = RoundPhase::Reconciling(index as u32);
            let outcome = fish.resolve().await?;
            self.reconcile(&outcome)?;
            tokio::time::sleep(self.pacing).await;
        }

        let result = {
            let mut session = self.session();
            session.phase = RoundPhase::Completed;
            RoundResult::from(session.tally)
        };
        self.sink.show_summary(&result)?;
        Ok(result)
    }

    /// Settles one outcome: counters first, then its presentation.
    fn reconcile(&self, outcome: &FishOutcome) -> Result<()> {
        let tally = {
            let mut session = self.session();
            session.tally.record(outcome.fate);
            session.tally
        };
        tracing::debug!(
            fish = %outcome.id,
            species = %outcome.species,
            fate = ?outcome.fate,
            remaining = tally.remaining(),
            "fish reconciled"
        );

        if outcome.fate == Fate::Caught {
            self.sink.bear_catch()?;
        }
        tolerate_missing(self.sink.remove_fish(&outcome.id, outcome.fate))?;
        self.sink
            .log_event(&LogEntry::now(outcome.message.clone(), outcome.fate.into()))?;
        self.sink.update_counters(&tally)?;
        Ok(())
    }
}

/// A vanished placeholder is cosmetic; the round carries on.
fn tolerate_missing(result: std::result::Result<(), SinkError>) -> std::result::Result<(), SinkError> {
    match result {
        Err(SinkError::MissingPlaceholder(id)) => {
            tracing::warn!(fish = %id, "placeholder missing, skipping animation");
            Ok(())
        }
        other => other,
    }
}

/// Holds the playing flag for the duration of a round.
struct PlayingGuard<'a, S: PresentationSink> {
    game: &'a FishingGame<S>,
}

impl<'a, S: PresentationSink> PlayingGuard<'a, S> {
    fn acquire(game: &'a FishingGame<S>) -> Option<Self> {
        let mut session = game.session();
        if session.is_playing {
            return None;
        }
        session.is_playing = true;
        Some(Self { game })
    }
}

impl<S: PresentationSink> Drop for PlayingGuard<'_, S> {
    fn drop(&mut self) {
        {
            let mut session = self.game.session();
            session.is_playing = false;
            if session.phase != RoundPhase::Completed {
                session.phase = RoundPhase::Idle;
            }
        }
        if let Err(e) = self.game.sink.set_start_enabled(true) {
            tracing::warn!(error = %e, "could not re-enable start");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fishing::generation::FishPlan;
    use crate::fishing::types::Species;
    use crate::presentation::{RecordingSink, ViewEvent};

    struct Scripted(Vec<(u64, Fate)>);

    impl FishSource for Scripted {
        fn plan_batch(&mut self, count: u32) -> Vec<FishPlan> {
            (0..count)
                .map(|i| {
                    let (ms, fate) = self.0[i as usize % self.0.len()];
                    FishPlan {
                        index: i,
                        species: Species::Salmon,
                        delay: Duration::from_millis(ms),
                        fate,
                    }
                })
                .collect()
        }
    }

    fn scripted_game(script: Vec<(u64, Fate)>) -> FishingGame<RecordingSink> {
        FishingGame::with_source(Arc::new(RecordingSink::new()), Scripted(script))
    }

    #[test]
    fn test_new_session_is_idle_on_medium() {
        let game = scripted_game(vec![(1000, Fate::Caught)]);
        let snap = game.snapshot();
        assert!(!snap.is_playing);
        assert_eq!(snap.current_difficulty, Difficulty::Medium);
        assert_eq!(snap.phase, RoundPhase::Idle);
        assert_eq!(snap.round_difficulty, None);
    }

    #[test]
    fn test_guard_releases_flag_on_drop() {
        let game = scripted_game(vec![(1000, Fate::Caught)]);
        {
            let _guard = PlayingGuard::acquire(&game).unwrap();
            assert!(game.is_playing());
            assert!(PlayingGuard::acquire(&game).is_none());
        }
        assert!(!game.is_playing());
        assert_eq!(
            game.sink().events().last(),
            Some(&ViewEvent::StartEnabled { enabled: true })
        );
    }

    #[test]
    fn test_tolerate_missing_only_swallows_missing_placeholder() {
        let id = crate::fishing::types::FishId::new(0, 0);
        assert!(tolerate_missing(Err(SinkError::MissingPlaceholder(id))).is_ok());
        assert!(tolerate_missing(Err(SinkError::RenderTarget("log".into()))).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_round_walks_to_completed() {
        let game = scripted_game(vec![(1000, Fate::Caught), (2000, Fate::Escaped)]);
        game.select_difficulty(Difficulty::Easy).unwrap();

        let result = game.start_round().await.unwrap().unwrap();

        assert_eq!(result.total_spawned, 3);
        assert_eq!(result.caught_count, 2);
        assert_eq!(result.escaped_count, 1);
        let snap = game.snapshot();
        assert_eq!(snap.phase, RoundPhase::Completed);
        assert!(!snap.is_playing);
        assert_eq!(snap.rounds_played, 1);
        assert_eq!(snap.round_difficulty, Some(Difficulty::Easy));
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_clears_counters_when_idle() {
        let game = scripted_game(vec![(1000, Fate::Caught)]);
        game.select_difficulty(Difficulty::Easy).unwrap();
        game.start_round().await.unwrap();

        assert!(game.restart().unwrap());
        let snap = game.snapshot();
        assert_eq!(snap.tally, Tally::default());
        assert_eq!(snap.phase, RoundPhase::Idle);
        let events = game.sink().events();
        assert!(events.contains(&ViewEvent::SummaryHidden));
    }
}
