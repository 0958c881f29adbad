//! Store that persists its tables as JSONL files.

use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, info, warn};

use super::{
    AppendOutcome, Enrollment, JsonlReader, JsonlWriter, Removed, StorageConfig, StorageError,
    Tables, TournamentStore,
};
use crate::models::{
    CanonicalMatch, GameId, MatchRecord, Person, PersonId, Registration, StandingsRow,
};

/// A [`TournamentStore`] over `persons.jsonl`, `registrations.jsonl` and
/// `matches.jsonl` in the data directory.
///
/// Nothing is cached: every call reloads the files, so standings always
/// reflect what is on disk. Writes from this process are serialized by a
/// mutex; new rows are appended as single lines.
#[derive(Debug)]
pub struct FileStore {
    config: StorageConfig,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            write_lock: Mutex::new(()),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>, StorageError> {
        self.write_lock.lock().map_err(|_| StorageError::Poisoned)
    }

    fn load(&self) -> Result<Tables, StorageError> {
        Ok(Tables {
            persons: JsonlReader::new(self.config.persons_path()).read_all()?,
            registrations: JsonlReader::new(self.config.registrations_path()).read_all()?,
            matches: JsonlReader::new(self.config.matches_path()).read_all()?,
        })
    }

    fn persons(&self) -> JsonlWriter<Person> {
        JsonlWriter::new(self.config.persons_path())
    }

    fn registrations(&self) -> JsonlWriter<Registration> {
        JsonlWriter::new(self.config.registrations_path())
    }

    fn matches(&self) -> JsonlWriter<MatchRecord> {
        JsonlWriter::new(self.config.matches_path())
    }
}

impl TournamentStore for FileStore {
    fn list_standings(&self, game: Option<&GameId>) -> Result<Vec<StandingsRow>, StorageError> {
        Ok(self.load()?.standings(game))
    }

    fn append_match(&self, outcome: CanonicalMatch) -> Result<AppendOutcome, StorageError> {
        let _guard = self.lock()?;
        let mut tables = self.load()?;
        let result = tables.append_match(outcome);
        if let AppendOutcome::Appended(record) = &result {
            self.matches().append(record)?;
            debug!("Stored match {} in {:?}", record.match_id, self.config.matches_path());
        }
        Ok(result)
    }

    fn count_registered(&self, game: Option<&GameId>) -> Result<usize, StorageError> {
        Ok(self.load()?.count_registered(game))
    }

    fn list_registered_games(&self) -> Result<BTreeSet<GameId>, StorageError> {
        Ok(self.load()?.games())
    }

    fn list_matches(&self, game: Option<&GameId>) -> Result<Vec<MatchRecord>, StorageError> {
        Ok(self.load()?.matches_in(game))
    }

    fn register_player(
        &self,
        name: &str,
        person_id: Option<PersonId>,
        game: Option<&GameId>,
    ) -> Result<Enrollment, StorageError> {
        let _guard = self.lock()?;
        let mut tables = self.load()?;
        let change = tables.register(name, person_id, game)?;

        if let Some(person) = &change.new_person {
            self.persons().append(person)?;
        }
        if let Some(registration) = &change.new_registration {
            if let Err(err) = self.registrations().append(registration) {
                // Take back the person line so a failed enrollment leaves no trace.
                if let Some(person) = &change.new_person {
                    tables.persons.retain(|p| p.id != person.id);
                    if let Err(rollback) = self.persons().write_all(&tables.persons) {
                        warn!("Failed to roll back person {}: {}", person.id, rollback);
                    }
                }
                return Err(err);
            }
        }
        Ok(change.enrollment)
    }

    fn delete_matches(&self, game: Option<&GameId>) -> Result<usize, StorageError> {
        let _guard = self.lock()?;
        let mut tables = self.load()?;
        let removed = tables.delete_matches(game);
        if removed > 0 {
            self.matches().write_all(&tables.matches)?;
        }
        info!("Deleted {} matches", removed);
        Ok(removed)
    }

    fn delete_players(&self, person: Option<PersonId>) -> Result<Removed, StorageError> {
        let _guard = self.lock()?;
        let mut tables = self.load()?;
        let removed = tables.delete_players(person);

        // Children first, so an interrupted cascade never leaves a match
        // pointing at a missing registration.
        if removed.matches > 0 {
            self.matches().write_all(&tables.matches)?;
        }
        if removed.registrations > 0 {
            self.registrations().write_all(&tables.registrations)?;
        }
        if removed.persons > 0 {
            self.persons().write_all(&tables.persons)?;
        }
        info!(
            "Deleted {} persons, {} registrations, {} matches",
            removed.persons, removed.registrations, removed.matches
        );
        Ok(removed)
    }
}
