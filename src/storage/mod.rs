//! Tournament storage.
//!
//! The engine talks to storage only through [`TournamentStore`]. Two
//! implementations are provided:
//! - [`MemoryStore`]: tables held in memory, for tests and throwaway servers
//! - [`FileStore`]: JSONL files under a data directory
//!
//! Both share the relational core in [`Tables`], which assigns ids, enforces
//! the uniqueness and integrity constraints on matches, and projects
//! standings from the match log.

mod file;
mod jsonl;
mod memory;
mod tables;

pub use file::*;
pub use jsonl::*;
pub use memory::*;
pub use tables::*;

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::models::{CanonicalMatch, GameId, MatchRecord, PersonId, RivalId, StandingsRow};

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Corrupt line {line} in {}: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        line: usize,
        source: serde_json::Error,
    },

    #[error("Storage lock poisoned")]
    Poisoned,

    #[error("Unknown person: {0}")]
    UnknownPerson(PersonId),

    #[error("Person {person} is already registered in {game}")]
    AlreadyRegistered { person: PersonId, game: GameId },
}

/// A constraint the store refused to violate when appending a match.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstraintViolation {
    #[error("rival {rival} already has a match recorded in round {round}")]
    AlreadyReported { rival: RivalId, round: u32 },

    #[error("rival {rival} is not registered in {game}")]
    NotRegistered { rival: RivalId, game: GameId },

    #[error("rival {rival} cannot be paired against itself")]
    SelfPairing { rival: RivalId },

    #[error("malformed match: {0}")]
    Malformed(String),
}

/// Result of an append: the stored record, or the constraint that blocked it.
#[derive(Debug, Clone, PartialEq)]
pub enum AppendOutcome {
    Appended(MatchRecord),
    Rejected(ConstraintViolation),
}

/// Ids produced by registering a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Enrollment {
    pub person_id: PersonId,

    /// Present when a game was given
    pub rival_id: Option<RivalId>,
}

/// Counts removed by a roster deletion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Removed {
    pub persons: usize,
    pub registrations: usize,
    pub matches: usize,
}

/// The storage collaborator the tournament engine depends on.
///
/// Every call reflects all previously committed writes; implementations must
/// not serve stale standings. `append_match` is all-or-nothing.
pub trait TournamentStore: Send + Sync {
    /// Current standings per registered rival, in registration order.
    /// `None` covers every game.
    fn list_standings(&self, game: Option<&GameId>) -> Result<Vec<StandingsRow>, StorageError>;

    /// Atomically append one canonical match.
    fn append_match(&self, outcome: CanonicalMatch) -> Result<AppendOutcome, StorageError>;

    /// Number of registrations, in one game or in all of them.
    fn count_registered(&self, game: Option<&GameId>) -> Result<usize, StorageError>;

    /// Games with at least one registration.
    fn list_registered_games(&self) -> Result<BTreeSet<GameId>, StorageError>;

    /// Stored matches, in one game or in all of them.
    fn list_matches(&self, game: Option<&GameId>) -> Result<Vec<MatchRecord>, StorageError>;

    /// Add a person (unless `person_id` names an existing one) and, when a
    /// game is given, register them in it.
    fn register_player(
        &self,
        name: &str,
        person_id: Option<PersonId>,
        game: Option<&GameId>,
    ) -> Result<Enrollment, StorageError>;

    /// Remove match records, in one game or in all of them.
    fn delete_matches(&self, game: Option<&GameId>) -> Result<usize, StorageError>;

    /// Remove one person or everyone, with their registrations and matches.
    fn delete_players(&self, person: Option<PersonId>) -> Result<Removed, StorageError>;
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn persons_path(&self) -> PathBuf {
        self.data_dir.join("persons.jsonl")
    }

    pub fn registrations_path(&self) -> PathBuf {
        self.data_dir.join("registrations.jsonl")
    }

    pub fn matches_path(&self) -> PathBuf {
        self.data_dir.join("matches.jsonl")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}
