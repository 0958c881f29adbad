//! Standings rows derived from match records.

use serde::{Deserialize, Serialize};

use super::{GameId, RivalId, Tally};

/// A rival's aggregate results in one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingsRow {
    pub rival_id: RivalId,
    pub game: GameId,
    pub name: String,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub byes: u32,

    /// Includes byes
    pub matches_played: u32,
}

impl StandingsRow {
    /// A row with no matches played.
    pub fn new(rival_id: RivalId, game: GameId, name: impl Into<String>) -> Self {
        Self {
            rival_id,
            game,
            name: name.into(),
            wins: 0,
            losses: 0,
            draws: 0,
            byes: 0,
            matches_played: 0,
        }
    }

    /// Count one more match.
    pub fn add(&mut self, tally: Tally) {
        match tally {
            Tally::Win => self.wins += 1,
            Tally::Loss => self.losses += 1,
            Tally::Draw => self.draws += 1,
            Tally::Bye => self.byes += 1,
        }
        self.matches_played += 1;
    }

    /// The record as `wins-losses-draws-byes`.
    pub fn record(&self) -> String {
        format!("{}-{}-{}-{}", self.wins, self.losses, self.draws, self.byes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_counts_matches() {
        let mut row = StandingsRow::new(RivalId(1), GameId::from("bingo"), "Pluto");
        row.add(Tally::Win);
        row.add(Tally::Draw);
        row.add(Tally::Bye);
        row.add(Tally::Loss);

        assert_eq!(row.wins, 1);
        assert_eq!(row.losses, 1);
        assert_eq!(row.draws, 1);
        assert_eq!(row.byes, 1);
        assert_eq!(row.matches_played, 4);
        assert_eq!(row.record(), "1-1-1-1");
    }

    #[test]
    fn test_new_row_is_empty() {
        let row = StandingsRow::new(RivalId(2), GameId::from("poker"), "Goofy");
        assert_eq!(row.matches_played, 0);
        assert_eq!(row.record(), "0-0-0-0");
    }
}
