//! Seeding: the order players are fed into the pairing loop.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::models::StandingsRow;

/// How to order ranked standings before pairing neighbours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seeding {
    /// Keep the ranked order
    RankBased,

    /// Uniformly random permutation
    Randomized,
}

impl Seeding {
    pub fn apply<R: Rng + ?Sized>(self, rows: &mut [StandingsRow], rng: &mut R) {
        match self {
            Seeding::RankBased => {}
            Seeding::Randomized => rows.shuffle(rng),
        }
    }
}

/// Chooses a [`Seeding`] from the number of rounds already played.
pub trait SeedingPolicy: Send + Sync {
    fn seeding_for(&self, played_rounds: u32) -> Seeding;
}

/// The bundled policies, selectable from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeedingMode {
    /// Random first round, ranked afterwards
    #[default]
    RandomFirstRound,

    /// Ranked every round, including the first
    Ranked,
}

impl SeedingPolicy for SeedingMode {
    fn seeding_for(&self, played_rounds: u32) -> Seeding {
        match self {
            SeedingMode::RandomFirstRound if played_rounds == 0 => Seeding::Randomized,
            _ => Seeding::RankBased,
        }
    }
}
