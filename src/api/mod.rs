//! REST API endpoints.
//!
//! Axum-based HTTP API for registering players, reporting match outcomes,
//! and querying standings and pairings.

pub mod routes;
pub mod state;

use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::engine::TournamentError;
use crate::recorder::RecordError;
use crate::standings::StandingsError;
use crate::storage::StorageError;
use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        if let ApiError::Internal(message) = &self {
            tracing::error!("Request failed: {}", message);
        }

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::UnknownPerson(_) => ApiError::NotFound(err.to_string()),
            StorageError::AlreadyRegistered { .. } => ApiError::Conflict(err.to_string()),
            _ => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<TournamentError> for ApiError {
    fn from(err: TournamentError) -> Self {
        match err {
            TournamentError::Record(RecordError::InvalidStatus(_)) => {
                ApiError::BadRequest(err.to_string())
            }
            TournamentError::Record(RecordError::DuplicateMatch(_)) => {
                ApiError::Conflict(err.to_string())
            }
            TournamentError::Standings(StandingsError::EmptyStandings { .. }) => {
                ApiError::NotFound(err.to_string())
            }
            TournamentError::Record(RecordError::Storage(e))
            | TournamentError::Standings(StandingsError::Storage(e))
            | TournamentError::Storage(e) => e.into(),
            TournamentError::Task(_) => ApiError::Internal(err.to_string()),
        }
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    let cors = match state.cors_origin.as_str() {
        "*" => CorsLayer::new().allow_origin(Any),
        origin => match origin.parse::<HeaderValue>() {
            Ok(origin) => CorsLayer::new().allow_origin(origin),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                CorsLayer::new()
            }
        },
    }
    .allow_methods(Any)
    .allow_headers(Any);

    Router::new()
        .route("/api/health", get(routes::games::health))
        .route("/api/games", get(routes::games::list_games))
        .route("/api/standings", get(routes::games::all_standings))
        .route("/api/games/:game/standings", get(routes::games::game_standings))
        .route("/api/games/:game/pairings", get(routes::games::next_pairings))
        .route(
            "/api/players",
            post(routes::players::register_player).delete(routes::players::delete_players),
        )
        .route(
            "/api/matches",
            get(routes::matches::list_all_matches).delete(routes::matches::delete_all_matches),
        )
        .route(
            "/api/games/:game/matches",
            post(routes::matches::report_match)
                .get(routes::matches::list_game_matches)
                .delete(routes::matches::delete_game_matches),
        )
        .fallback(routes::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GameId, RivalId};
    use crate::storage::ConstraintViolation;

    #[test]
    fn test_error_mapping() {
        let err: ApiError =
            TournamentError::Record(RecordError::InvalidStatus("forfeit".into())).into();
        assert!(matches!(err, ApiError::BadRequest(_)));

        let err: ApiError = TournamentError::Record(RecordError::DuplicateMatch(
            ConstraintViolation::SelfPairing { rival: RivalId(1) },
        ))
        .into();
        assert!(matches!(err, ApiError::Conflict(_)));

        let err: ApiError = TournamentError::Standings(StandingsError::EmptyStandings {
            game: Some(GameId::from("bingo")),
        })
        .into();
        assert!(matches!(err, ApiError::NotFound(_)));

        let err: ApiError =
            TournamentError::Storage(StorageError::InvalidPath("x".into())).into();
        assert!(matches!(err, ApiError::Internal(_)));
    }

    #[test]
    fn test_error_status_codes() {
        let resp = ApiError::Conflict("dup".into()).into_response();
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let resp = ApiError::NotFound("x".into()).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
