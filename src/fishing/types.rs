//! Fishing round data structures.
//!
//! A round spawns a fixed number of fish for the selected [`Difficulty`].
//! Every fish ends up either [`Fate::Caught`] by the bear or
//! [`Fate::Escaped`] downstream; the [`Tally`] tracks progress while the
//! round runs and freezes into a [`RoundResult`] once every fish is settled.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::constants::{
    EASY_FISH_COUNT, HARD_FISH_COUNT, LIGHT_SNACK_MAX_CAUGHT, MEDIUM_FISH_COUNT,
    SATISFIED_MAX_CAUGHT,
};
use crate::core::error::GameError;

/// Difficulty presets. Each fixes how many fish a round spawns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn display_name(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn fish_count(self) -> u32 {
        match self {
            Difficulty::Easy => EASY_FISH_COUNT,
            Difficulty::Medium => MEDIUM_FISH_COUNT,
            Difficulty::Hard => HARD_FISH_COUNT,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Difficulty {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" | "1" => Ok(Difficulty::Easy),
            "medium" | "2" => Ok(Difficulty::Medium),
            "hard" | "3" => Ok(Difficulty::Hard),
            _ => Err(GameError::UnknownDifficulty(s.to_string())),
        }
    }
}

/// The river's fish species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    Carp,
    Pike,
    Perch,
    Bream,
    Catfish,
    Trout,
    Salmon,
    Sturgeon,
}

impl Species {
    pub const ALL: [Species; 8] = [
        Species::Carp,
        Species::Pike,
        Species::Perch,
        Species::Bream,
        Species::Catfish,
        Species::Trout,
        Species::Salmon,
        Species::Sturgeon,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Species::Carp => "carp",
            Species::Pike => "pike",
            Species::Perch => "perch",
            Species::Bream => "bream",
            Species::Catfish => "catfish",
            Species::Trout => "trout",
            Species::Salmon => "salmon",
            Species::Sturgeon => "sturgeon",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identifies one fish within a round: spawn index plus a millisecond salt.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FishId {
    pub index: u32,
    pub salt: i64,
}

impl FishId {
    pub fn new(index: u32, salt: i64) -> Self {
        Self { index, salt }
    }
}

impl fmt::Display for FishId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fish-{}-{}", self.index, self.salt)
    }
}

/// How a fish's encounter with the bear ended. Doubles as the log category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fate {
    Caught,
    Escaped,
}

/// A resolved fish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FishOutcome {
    pub id: FishId,
    pub species: Species,
    pub fate: Fate,
    pub message: String,
}

impl FishOutcome {
    pub fn new(id: FishId, species: Species, fate: Fate) -> Self {
        let message = match fate {
            Fate::Caught => format!("Caught a {}!", species),
            Fate::Escaped => format!("The {} swam away...", species),
        };
        Self {
            id,
            species,
            fate,
            message,
        }
    }

    pub fn is_caught(&self) -> bool {
        self.fate == Fate::Caught
    }
}

/// Running counters for the round in progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub caught: u32,
    pub escaped: u32,
    pub total: u32,
}

impl Tally {
    pub fn new(total: u32) -> Self {
        Self {
            caught: 0,
            escaped: 0,
            total,
        }
    }

    pub fn settled(&self) -> u32 {
        self.caught + self.escaped
    }

    pub fn remaining(&self) -> u32 {
        self.total.saturating_sub(self.settled())
    }

    pub fn is_complete(&self) -> bool {
        self.settled() == self.total
    }

    /// Counts one settled fish. Ignored once every spawned fish is counted.
    pub fn record(&mut self, fate: Fate) -> bool {
        if self.is_complete() {
            return false;
        }
        match fate {
            Fate::Caught => self.caught += 1,
            Fate::Escaped => self.escaped += 1,
        }
        true
    }
}

/// Final counters of a completed round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    pub caught_count: u32,
    pub escaped_count: u32,
    pub total_spawned: u32,
}

impl RoundResult {
    pub fn verdict(&self) -> Verdict {
        Verdict::for_caught(self.caught_count)
    }
}

impl From<Tally> for RoundResult {
    fn from(tally: Tally) -> Self {
        Self {
            caught_count: tally.caught,
            escaped_count: tally.escaped,
            total_spawned: tally.total,
        }
    }
}

/// How well the bear ate, judged by the number of fish caught.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Empty,
    LightSnack,
    Satisfied,
    Feast,
}

impl Verdict {
    pub fn for_caught(caught: u32) -> Self {
        match caught {
            0 => Verdict::Empty,
            c if c <= LIGHT_SNACK_MAX_CAUGHT => Verdict::LightSnack,
            c if c <= SATISFIED_MAX_CAUGHT => Verdict::Satisfied,
            _ => Verdict::Feast,
        }
    }

    pub fn summary(self) -> &'static str {
        match self {
            Verdict::Empty => "The bear went hungry...",
            Verdict::LightSnack => "The bear had a light snack",
            Verdict::Satisfied => "The bear is full and satisfied!",
            Verdict::Feast => "The bear caught a whole feast!",
        }
    }
}
