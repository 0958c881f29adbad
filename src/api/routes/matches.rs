use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{GameId, MatchRecord, RivalId};

#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    pub player: RivalId,

    /// won, lost or draw; absent or "bye" records a bye
    pub status: Option<String>,

    pub opponent: Option<RivalId>,
}

#[derive(Debug, Serialize)]
pub struct MatchesResponse {
    pub total: usize,
    pub matches: Vec<MatchRecord>,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub deleted: usize,
}

pub async fn report_match(
    State(state): State<AppState>,
    Path(game): Path<String>,
    Json(req): Json<ReportRequest>,
) -> Result<(StatusCode, Json<MatchRecord>), ApiError> {
    let record = state
        .tournament
        .report_outcome(GameId::new(game), req.player, req.status, req.opponent)
        .await?;

    Ok((StatusCode::CREATED, Json(record)))
}

async fn list_matches(
    state: AppState,
    game: Option<GameId>,
) -> Result<Json<MatchesResponse>, ApiError> {
    let matches = state.tournament.matches(game).await?;
    Ok(Json(MatchesResponse {
        total: matches.len(),
        matches,
    }))
}

pub async fn list_all_matches(
    State(state): State<AppState>,
) -> Result<Json<MatchesResponse>, ApiError> {
    list_matches(state, None).await
}

pub async fn list_game_matches(
    State(state): State<AppState>,
    Path(game): Path<String>,
) -> Result<Json<MatchesResponse>, ApiError> {
    list_matches(state, Some(GameId::new(game))).await
}

pub async fn delete_all_matches(
    State(state): State<AppState>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let deleted = state.tournament.delete_matches(None).await?;
    Ok(Json(DeletedResponse { deleted }))
}

pub async fn delete_game_matches(
    State(state): State<AppState>,
    Path(game): Path<String>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let deleted = state
        .tournament
        .delete_matches(Some(GameId::new(game)))
        .await?;
    Ok(Json(DeletedResponse { deleted }))
}

#[cfg(test)]
mod tests {
    use crate::api::routes::test_support::*;
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_report_match_stores_canonical_form() {
        let state = test_state();
        register(&state, "bingo", &["A", "B"]).await;

        let (status, json) = send(
            &state,
            "POST",
            "/api/games/bingo/matches",
            Some(json!({ "player": 2, "status": "won", "opponent": 1 })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["round"], 1);
        assert_eq!(json["rival_lo"], 1);
        assert_eq!(json["rival_hi"], 2);
        assert_eq!(json["lo_status"], "lost");
        assert_eq!(json["hi_status"], "won");
    }

    #[tokio::test]
    async fn test_report_bye() {
        let state = test_state();
        register(&state, "bingo", &["A", "B", "C"]).await;

        let (status, json) = send(
            &state,
            "POST",
            "/api/games/bingo/matches",
            Some(json!({ "player": 3 })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["is_bye"], true);
        assert!(json["rival_hi"].is_null());

        let (_, json) = send(&state, "GET", "/api/games/bingo/standings", None).await;
        assert_eq!(json["standings"][0]["name"], "C");
        assert_eq!(json["standings"][0]["byes"], 1);
    }

    #[tokio::test]
    async fn test_duplicate_report_conflicts() {
        let state = test_state();
        register(&state, "bingo", &["A", "B", "C", "D"]).await;

        let body = json!({ "player": 1, "status": "won", "opponent": 2 });
        let (status, _) = send(&state, "POST", "/api/games/bingo/matches", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);

        // Same pairing reported from the other side
        let body = json!({ "player": 2, "status": "lost", "opponent": 1 });
        let (status, json) = send(&state, "POST", "/api/games/bingo/matches", Some(body)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["error"]["code"], "CONFLICT");

        let (_, json) = send(&state, "GET", "/api/games/bingo/matches", None).await;
        assert_eq!(json["total"], 1);
    }

    #[tokio::test]
    async fn test_invalid_status_is_bad_request() {
        let state = test_state();
        register(&state, "bingo", &["A", "B"]).await;

        let (status, json) = send(
            &state,
            "POST",
            "/api/games/bingo/matches",
            Some(json!({ "player": 1, "status": "forfeit", "opponent": 2 })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "BAD_REQUEST");

        let (_, json) = send(&state, "GET", "/api/matches", None).await;
        assert_eq!(json["total"], 0);
    }

    #[tokio::test]
    async fn test_status_is_case_sensitive() {
        let state = test_state();
        register(&state, "bingo", &["A", "B"]).await;

        let (status, _) = send(
            &state,
            "POST",
            "/api/games/bingo/matches",
            Some(json!({ "player": 1, "status": "Won", "opponent": 2 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_matches_by_game() {
        let state = test_state();
        register(&state, "bingo", &["A", "B"]).await;
        register(&state, "canasta", &["C", "D"]).await;

        send(
            &state,
            "POST",
            "/api/games/bingo/matches",
            Some(json!({ "player": 1, "status": "won", "opponent": 2 })),
        )
        .await;
        send(
            &state,
            "POST",
            "/api/games/canasta/matches",
            Some(json!({ "player": 3, "status": "draw", "opponent": 4 })),
        )
        .await;

        let (status, json) = send(&state, "DELETE", "/api/games/bingo/matches", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["deleted"], 1);

        let (_, json) = send(&state, "GET", "/api/matches", None).await;
        assert_eq!(json["total"], 1);
        assert_eq!(json["matches"][0]["game"], "canasta");

        let (_, json) = send(&state, "DELETE", "/api/matches", None).await;
        assert_eq!(json["deleted"], 1);
    }
}
