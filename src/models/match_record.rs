//! Match records: canonical outcomes of reported games.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Fingerprint, GameId, RivalId};

/// Sequential id assigned by the store when a match is appended.
pub type MatchId = u64;

/// One side's result in a two-player match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Won,
    Lost,
    Draw,
}

impl MatchStatus {
    /// The status the other side of the same match must have.
    pub fn complement(self) -> Self {
        match self {
            MatchStatus::Won => MatchStatus::Lost,
            MatchStatus::Lost => MatchStatus::Won,
            MatchStatus::Draw => MatchStatus::Draw,
        }
    }

    /// Parse a reported status. Only the exact lowercase names are accepted.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "won" => Some(MatchStatus::Won),
            "lost" => Some(MatchStatus::Lost),
            "draw" => Some(MatchStatus::Draw),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Won => "won",
            MatchStatus::Lost => "lost",
            MatchStatus::Draw => "draw",
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a single match counts for one rival in the standings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tally {
    Win,
    Loss,
    Draw,
    Bye,
}

/// The order-independent content of a match.
///
/// Two reports of the same match, from either side, produce equal values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CanonicalMatch {
    pub game: GameId,

    /// Lower rival id, or the byed rival
    pub rival_lo: RivalId,

    /// Higher rival id; absent for a bye
    pub rival_hi: Option<RivalId>,

    pub lo_status: Option<MatchStatus>,

    pub hi_status: Option<MatchStatus>,

    pub is_bye: bool,
}

impl CanonicalMatch {
    /// A bye for the given rival.
    pub fn bye(game: GameId, rival: RivalId) -> Self {
        Self {
            game,
            rival_lo: rival,
            rival_hi: None,
            lo_status: None,
            hi_status: None,
            is_bye: true,
        }
    }

    /// The rivals this match involves (one for a bye, two otherwise).
    pub fn rivals(&self) -> impl Iterator<Item = RivalId> {
        std::iter::once(self.rival_lo).chain(self.rival_hi)
    }

    pub fn involves(&self, rival: RivalId) -> bool {
        self.rivals().any(|r| r == rival)
    }

    /// How this match counts for `rival`, or `None` if it is not involved.
    pub fn tally_for(&self, rival: RivalId) -> Option<Tally> {
        if self.is_bye {
            return (self.rival_lo == rival).then_some(Tally::Bye);
        }
        let status = if self.rival_lo == rival {
            self.lo_status
        } else if self.rival_hi == Some(rival) {
            self.hi_status
        } else {
            None
        }?;
        Some(match status {
            MatchStatus::Won => Tally::Win,
            MatchStatus::Lost => Tally::Loss,
            MatchStatus::Draw => Tally::Draw,
        })
    }

    /// Content hash over every canonical field.
    pub fn fingerprint(&self) -> Fingerprint {
        let lo = self.rival_lo.to_string();
        let hi = self.rival_hi.map(|r| r.to_string()).unwrap_or_default();
        Fingerprint::generate(&[
            self.game.as_str(),
            &lo,
            &hi,
            self.lo_status.map(|s| s.as_str()).unwrap_or(""),
            self.hi_status.map(|s| s.as_str()).unwrap_or(""),
            if self.is_bye { "bye" } else { "paired" },
        ])
    }
}

/// A persisted match, as appended by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub match_id: MatchId,

    /// Round of the game this match was recorded in
    pub round: u32,

    #[serde(flatten)]
    pub outcome: CanonicalMatch,

    pub recorded_at: DateTime<Utc>,
}
