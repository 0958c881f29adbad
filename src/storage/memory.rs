//! Store that keeps its tables in memory.

use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard};

use tracing::debug;

use super::{AppendOutcome, Enrollment, Removed, StorageError, Tables, TournamentStore};
use crate::models::{CanonicalMatch, GameId, MatchRecord, PersonId, StandingsRow};

/// A [`TournamentStore`] backed by [`Tables`] behind a mutex.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, StorageError> {
        self.tables.lock().map_err(|_| StorageError::Poisoned)
    }
}

impl TournamentStore for MemoryStore {
    fn list_standings(&self, game: Option<&GameId>) -> Result<Vec<StandingsRow>, StorageError> {
        Ok(self.tables()?.standings(game))
    }

    fn append_match(&self, outcome: CanonicalMatch) -> Result<AppendOutcome, StorageError> {
        Ok(self.tables()?.append_match(outcome))
    }

    fn count_registered(&self, game: Option<&GameId>) -> Result<usize, StorageError> {
        Ok(self.tables()?.count_registered(game))
    }

    fn list_registered_games(&self) -> Result<BTreeSet<GameId>, StorageError> {
        Ok(self.tables()?.games())
    }

    fn list_matches(&self, game: Option<&GameId>) -> Result<Vec<MatchRecord>, StorageError> {
        Ok(self.tables()?.matches_in(game))
    }

    fn register_player(
        &self,
        name: &str,
        person_id: Option<PersonId>,
        game: Option<&GameId>,
    ) -> Result<Enrollment, StorageError> {
        let change = self.tables()?.register(name, person_id, game)?;
        debug!("Registered {:?}", change.enrollment);
        Ok(change.enrollment)
    }

    fn delete_matches(&self, game: Option<&GameId>) -> Result<usize, StorageError> {
        Ok(self.tables()?.delete_matches(game))
    }

    fn delete_players(&self, person: Option<PersonId>) -> Result<Removed, StorageError> {
        Ok(self.tables()?.delete_players(person))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RivalId;

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        let game = GameId::from("poker");

        let a = store.register_player("Twilight Sparkle", None, Some(&game)).unwrap();
        store.register_player("Rainbow Dash", None, Some(&game)).unwrap();
        assert_eq!(a.rival_id, Some(RivalId(1)));

        let outcome = store
            .append_match(CanonicalMatch::bye(game.clone(), RivalId(1)))
            .unwrap();
        assert!(matches!(outcome, AppendOutcome::Appended(_)));

        let rows = store.list_standings(Some(&game)).unwrap();
        assert_eq!(rows[0].byes, 1);
        assert_eq!(store.count_registered(None).unwrap(), 2);
        assert_eq!(store.list_matches(Some(&game)).unwrap().len(), 1);
        assert!(store.list_registered_games().unwrap().contains(&game));
    }
}
