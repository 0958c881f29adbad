use std::sync::Arc;

use crate::engine::Tournament;
use crate::storage::TournamentStore;

#[derive(Clone)]
pub struct AppState {
    pub tournament: Arc<Tournament<dyn TournamentStore>>,
    pub cors_origin: String,
}
