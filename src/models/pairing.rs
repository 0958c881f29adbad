//! Pairing model: the next round's match-ups.

use serde::{Deserialize, Serialize};

use super::{RivalId, StandingsRow};

/// A rival taking part in a pairing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub rival_id: RivalId,
    pub name: String,
}

impl From<&StandingsRow> for Seat {
    fn from(row: &StandingsRow) -> Self {
        Self {
            rival_id: row.rival_id,
            name: row.name.clone(),
        }
    }
}

/// One slot of a round: a two-player match or a bye.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Pairing {
    Match { a: Seat, b: Seat },
    Bye { player: Seat },
}

impl Pairing {
    /// Rival ids seated in this slot.
    pub fn rival_ids(&self) -> Vec<RivalId> {
        match self {
            Pairing::Match { a, b } => vec![a.rival_id, b.rival_id],
            Pairing::Bye { player } => vec![player.rival_id],
        }
    }

    pub fn is_bye(&self) -> bool {
        matches!(self, Pairing::Bye { .. })
    }
}

/// What the pairing engine produced for a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RoundPlan {
    /// Pairings for the next round, in reporting order
    Pairings { round: u32, pairings: Vec<Pairing> },

    /// No rounds left; the final ranked standings
    Complete { standings: Vec<StandingsRow> },
}
