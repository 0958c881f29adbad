//! Tournament service.
//!
//! [`Tournament`] wraps a store with the locking the engine needs when it is
//! shared between concurrent callers: writes to a game are serialized, and
//! reads of a game never overlap a write to it. Operations that span every
//! game (no game given, roster deletion) lock all games at once.
//!
//! Store calls are synchronous and run on the blocking thread pool.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use thiserror::Error;
use tokio::sync::{OwnedRwLockReadGuard, OwnedRwLockWriteGuard, RwLock};

use crate::models::{GameId, MatchRecord, PersonId, RivalId, RoundPlan, StandingsRow};
use crate::pairing::{self, SeedingPolicy};
use crate::recorder::{self, RecordError};
use crate::standings::{self, StandingsError};
use crate::storage::{Enrollment, Removed, StorageError, TournamentStore};

/// Errors from tournament operations.
#[derive(Debug, Error)]
pub enum TournamentError {
    #[error(transparent)]
    Record(#[from] RecordError),

    #[error(transparent)]
    Standings(#[from] StandingsError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Per-game overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSummary {
    pub game: GameId,
    pub players: usize,
    pub matches: usize,
}

/// A store shared between callers, with per-game locking.
pub struct Tournament<S: ?Sized> {
    store: Arc<S>,
    policy: Arc<dyn SeedingPolicy>,
    all_games: Arc<RwLock<()>>,
    games: Mutex<HashMap<GameId, Arc<RwLock<()>>>>,
}

/// Locks covering one store call. They travel with the call onto the
/// blocking pool, so they stay held until the store is done even if the
/// caller stops waiting.
#[derive(Default)]
struct Held {
    _game_read: Option<OwnedRwLockReadGuard<()>>,
    _game_write: Option<OwnedRwLockWriteGuard<()>>,
    _all_read: Option<OwnedRwLockReadGuard<()>>,
    _all_write: Option<OwnedRwLockWriteGuard<()>>,
}

#[derive(Clone, Copy)]
enum Access {
    Read,
    Write,
}

impl<S> Tournament<S>
where
    S: TournamentStore + ?Sized + 'static,
{
    pub fn new(store: Arc<S>, policy: Arc<dyn SeedingPolicy>) -> Self {
        Self {
            store,
            policy,
            all_games: Arc::new(RwLock::new(())),
            games: Mutex::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    fn game_lock(&self, game: &GameId) -> Arc<RwLock<()>> {
        let mut games = self.games.lock().unwrap_or_else(PoisonError::into_inner);
        // Locks only the map refers to are neither held nor awaited.
        games.retain(|_, lock| Arc::strong_count(lock) > 1);
        Arc::clone(games.entry(game.clone()).or_default())
    }

    /// Lock one game, alongside other games.
    async fn lock_game(&self, game: &GameId, access: Access) -> Held {
        let all = Arc::clone(&self.all_games).read_owned().await;
        let lock = self.game_lock(game);
        let mut held = Held {
            _all_read: Some(all),
            ..Held::default()
        };
        match access {
            Access::Read => held._game_read = Some(lock.read_owned().await),
            Access::Write => held._game_write = Some(lock.write_owned().await),
        }
        held
    }

    /// Shut out every per-game operation.
    async fn lock_all(&self) -> Held {
        Held {
            _all_write: Some(Arc::clone(&self.all_games).write_owned().await),
            ..Held::default()
        }
    }

    /// Block only whole-store operations.
    async fn lock_shared(&self) -> Held {
        Held {
            _all_read: Some(Arc::clone(&self.all_games).read_owned().await),
            ..Held::default()
        }
    }

    async fn blocking<T, F>(&self, held: Held, f: F) -> Result<T, TournamentError>
    where
        F: FnOnce(&S) -> Result<T, TournamentError> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || {
            let result = f(&*store);
            drop(held);
            result
        })
        .await?
    }

    /// Record one reported outcome for `game`.
    pub async fn report_outcome(
        &self,
        game: GameId,
        player: RivalId,
        status: Option<String>,
        opponent: Option<RivalId>,
    ) -> Result<MatchRecord, TournamentError> {
        let held = self.lock_game(&game, Access::Write).await;
        self.blocking(held, move |store| {
            Ok(recorder::report_outcome(
                store,
                &game,
                player,
                status.as_deref(),
                opponent,
            )?)
        })
        .await
    }

    /// Ranked standings for one game, or all games combined.
    pub async fn standings(
        &self,
        game: Option<GameId>,
    ) -> Result<Vec<StandingsRow>, TournamentError> {
        match game {
            Some(game) => {
                let held = self.lock_game(&game, Access::Read).await;
                self.blocking(held, move |store| {
                    Ok(standings::get_standings(store, Some(&game))?)
                })
                .await
            }
            None => {
                let held = self.lock_all().await;
                self.blocking(held, |store| Ok(standings::get_standings(store, None)?))
                    .await
            }
        }
    }

    /// Plan the next round of `game`.
    pub async fn next_pairings(&self, game: GameId) -> Result<RoundPlan, TournamentError> {
        let held = self.lock_game(&game, Access::Read).await;
        let policy = Arc::clone(&self.policy);
        self.blocking(held, move |store| {
            let mut rng = rand::thread_rng();
            Ok(pairing::get_next_pairings(
                store,
                &game,
                policy.as_ref(),
                &mut rng,
            )?)
        })
        .await
    }

    /// Add a person and optionally register them in a game.
    pub async fn register_player(
        &self,
        name: String,
        person_id: Option<PersonId>,
        game: Option<GameId>,
    ) -> Result<Enrollment, TournamentError> {
        let held = match &game {
            Some(game) => self.lock_game(game, Access::Write).await,
            None => self.lock_shared().await,
        };
        self.blocking(held, move |store| {
            Ok(store.register_player(&name, person_id, game.as_ref())?)
        })
        .await
    }

    pub async fn count_players(&self, game: Option<GameId>) -> Result<usize, TournamentError> {
        let held = self.lock_shared().await;
        self.blocking(held, move |store| Ok(store.count_registered(game.as_ref())?))
            .await
    }

    /// Every game with registrations, with player and match counts.
    pub async fn list_games(&self) -> Result<Vec<GameSummary>, TournamentError> {
        let held = self.lock_all().await;
        self.blocking(held, |store| {
            let mut summaries = Vec::new();
            for game in store.list_registered_games()? {
                summaries.push(GameSummary {
                    players: store.count_registered(Some(&game))?,
                    matches: store.list_matches(Some(&game))?.len(),
                    game,
                });
            }
            Ok(summaries)
        })
        .await
    }

    /// Stored matches, in one game or in all of them.
    pub async fn matches(&self, game: Option<GameId>) -> Result<Vec<MatchRecord>, TournamentError> {
        let held = match &game {
            Some(game) => self.lock_game(game, Access::Read).await,
            None => self.lock_all().await,
        };
        self.blocking(held, move |store| Ok(store.list_matches(game.as_ref())?))
            .await
    }

    pub async fn delete_matches(&self, game: Option<GameId>) -> Result<usize, TournamentError> {
        let held = match &game {
            Some(game) => self.lock_game(game, Access::Write).await,
            None => self.lock_all().await,
        };
        self.blocking(held, move |store| Ok(store.delete_matches(game.as_ref())?))
            .await
    }

    pub async fn delete_players(
        &self,
        person: Option<PersonId>,
    ) -> Result<Removed, TournamentError> {
        let held = self.lock_all().await;
        self.blocking(held, move |store| Ok(store.delete_players(person)?))
            .await
    }
}
