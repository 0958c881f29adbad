use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{GameId, PersonId};
use crate::storage::{Enrollment, Removed};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,

    /// Register an existing person instead of creating one
    pub person_id: Option<PersonId>,

    pub game: Option<String>,
}

pub async fn register_player(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Enrollment>), ApiError> {
    if req.person_id.is_none() && req.name.trim().is_empty() {
        return Err(ApiError::BadRequest("name must not be empty".to_string()));
    }
    if req.game.as_deref().is_some_and(|g| g.trim().is_empty()) {
        return Err(ApiError::BadRequest("game must not be empty".to_string()));
    }

    let enrollment = state
        .tournament
        .register_player(req.name, req.person_id, req.game.map(GameId::new))
        .await?;

    Ok((StatusCode::CREATED, Json(enrollment)))
}

#[derive(Debug, Deserialize)]
pub struct DeletePlayersParams {
    pub person_id: Option<PersonId>,
}

pub async fn delete_players(
    State(state): State<AppState>,
    Query(params): Query<DeletePlayersParams>,
) -> Result<Json<Removed>, ApiError> {
    let removed = state.tournament.delete_players(params.person_id).await?;
    Ok(Json(removed))
}
