//! Standings aggregation.
//!
//! Ranks a game's standings rows into a total order:
//! - wins, descending
//! - then byes, descending
//! - then draws, descending
//!
//! Rows equal on all three keys keep the order the store returned them in
//! (registration order for the bundled stores). That tie order carries no
//! meaning and callers must not rely on it.

use std::cmp::Reverse;

use thiserror::Error;

use crate::models::{GameId, StandingsRow};
use crate::storage::{StorageError, TournamentStore};

/// Errors from reading standings.
#[derive(Debug, Error)]
pub enum StandingsError {
    #[error(
        "No players registered in {}",
        .game.as_ref().map(GameId::as_str).unwrap_or("any game")
    )]
    EmptyStandings { game: Option<GameId> },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Sort rows by wins, byes, then draws, all descending. Stable.
pub fn rank(mut rows: Vec<StandingsRow>) -> Vec<StandingsRow> {
    rows.sort_by_key(|row| Reverse((row.wins, row.byes, row.draws)));
    rows
}

/// Ranked standings for one game, or for every game combined.
pub fn get_standings<S>(
    store: &S,
    game: Option<&GameId>,
) -> Result<Vec<StandingsRow>, StandingsError>
where
    S: TournamentStore + ?Sized,
{
    let rows = store.list_standings(game)?;
    if rows.is_empty() {
        return Err(StandingsError::EmptyStandings {
            game: game.cloned(),
        });
    }
    Ok(rank(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RivalId, Tally};
    use crate::storage::MemoryStore;
    use pretty_assertions::assert_eq;

    fn row(id: u64, wins: u32, byes: u32, draws: u32) -> StandingsRow {
        let mut row = StandingsRow::new(RivalId(id), GameId::from("bingo"), format!("P{}", id));
        for _ in 0..wins {
            row.add(Tally::Win);
        }
        for _ in 0..byes {
            row.add(Tally::Bye);
        }
        for _ in 0..draws {
            row.add(Tally::Draw);
        }
        row
    }

    fn ids(rows: &[StandingsRow]) -> Vec<u64> {
        rows.iter().map(|r| r.rival_id.0).collect()
    }

    #[test]
    fn test_byes_break_win_ties() {
        let ranked = rank(vec![row(1, 2, 0, 1), row(2, 2, 1, 0)]);
        assert_eq!(ids(&ranked), vec![2, 1]);
    }

    #[test]
    fn test_full_key_order() {
        let ranked = rank(vec![
            row(1, 0, 0, 0),
            row(2, 1, 0, 2),
            row(3, 1, 0, 0),
            row(4, 3, 0, 0),
            row(5, 1, 1, 0),
            row(6, 0, 0, 1),
        ]);
        assert_eq!(ids(&ranked), vec![4, 5, 2, 3, 6, 1]);
    }

    #[test]
    fn test_ties_keep_arrival_order() {
        let ranked = rank(vec![row(7, 1, 0, 0), row(3, 1, 0, 0), row(5, 1, 0, 0)]);
        assert_eq!(ids(&ranked), vec![7, 3, 5]);
    }

    #[test]
    fn test_losses_do_not_affect_rank() {
        let mut loser = row(1, 1, 0, 0);
        loser.add(Tally::Loss);
        loser.add(Tally::Loss);
        let ranked = rank(vec![loser, row(2, 1, 0, 0)]);
        assert_eq!(ids(&ranked), vec![1, 2]);
    }

    #[test]
    fn test_get_standings_empty_game() {
        let store = MemoryStore::new();
        let err = get_standings(&store, Some(&GameId::from("bingo"))).unwrap_err();
        assert!(matches!(err, StandingsError::EmptyStandings { game: Some(_) }));
        assert_eq!(err.to_string(), "No players registered in bingo");

        let err = get_standings(&store, None).unwrap_err();
        assert_eq!(err.to_string(), "No players registered in any game");
    }

    #[test]
    fn test_get_standings_without_matches() {
        let store = MemoryStore::new();
        let game = GameId::from("bingo");
        store.register_player("Fluttershy", None, Some(&game)).unwrap();
        store.register_player("Applejack", None, Some(&game)).unwrap();

        let rows = get_standings(&store, Some(&game)).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.matches_played == 0));
    }
}
