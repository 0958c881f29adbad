use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::engine::GameSummary;
use crate::models::{GameId, RoundPlan, StandingsRow};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Debug, Serialize)]
pub struct GamesResponse {
    pub games: Vec<GameSummary>,
    pub total_players: usize,
}

pub async fn list_games(State(state): State<AppState>) -> Result<Json<GamesResponse>, ApiError> {
    let games = state.tournament.list_games().await?;
    let total_players = games.iter().map(|g| g.players).sum();
    Ok(Json(GamesResponse {
        games,
        total_players,
    }))
}

#[derive(Debug, Serialize)]
pub struct StandingsEntry {
    /// 1-based position; tied players get distinct positions
    pub rank: usize,

    /// wins-losses-draws-byes
    pub record: String,

    #[serde(flatten)]
    pub row: StandingsRow,
}

#[derive(Debug, Serialize)]
pub struct StandingsResponse {
    pub game: Option<GameId>,
    pub standings: Vec<StandingsEntry>,
}

fn standings_response(game: Option<GameId>, rows: Vec<StandingsRow>) -> StandingsResponse {
    let standings = rows
        .into_iter()
        .enumerate()
        .map(|(i, row)| StandingsEntry {
            rank: i + 1,
            record: row.record(),
            row,
        })
        .collect();
    StandingsResponse { game, standings }
}

pub async fn all_standings(
    State(state): State<AppState>,
) -> Result<Json<StandingsResponse>, ApiError> {
    let rows = state.tournament.standings(None).await?;
    Ok(Json(standings_response(None, rows)))
}

pub async fn game_standings(
    State(state): State<AppState>,
    Path(game): Path<String>,
) -> Result<Json<StandingsResponse>, ApiError> {
    let game = GameId::new(game);
    let rows = state.tournament.standings(Some(game.clone())).await?;
    Ok(Json(standings_response(Some(game), rows)))
}

pub async fn next_pairings(
    State(state): State<AppState>,
    Path(game): Path<String>,
) -> Result<Json<RoundPlan>, ApiError> {
    let plan = state.tournament.next_pairings(GameId::new(game)).await?;
    Ok(Json(plan))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::routes::test_support::*;
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_health() {
        let state = test_state();
        let (status, json) = send(&state, "GET", "/api/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn test_list_games() {
        let state = test_state();
        register(&state, "bingo", &["Pinkie Pie", "Fluttershy"]).await;
        register(&state, "canasta", &["Princess Luna"]).await;

        let (status, json) = send(&state, "GET", "/api/games", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["total_players"], 3);
        assert_eq!(json["games"][0]["game"], "bingo");
        assert_eq!(json["games"][0]["players"], 2);
        assert_eq!(json["games"][1]["game"], "canasta");
    }

    #[tokio::test]
    async fn test_game_standings_ranked() {
        let state = test_state();
        register(&state, "bingo", &["A", "B", "C", "D"]).await;

        send(
            &state,
            "POST",
            "/api/games/bingo/matches",
            Some(json!({ "player": 3, "status": "won", "opponent": 4 })),
        )
        .await;
        send(
            &state,
            "POST",
            "/api/games/bingo/matches",
            Some(json!({ "player": 2, "status": "draw", "opponent": 1 })),
        )
        .await;

        let (status, json) = send(&state, "GET", "/api/games/bingo/standings", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["game"], "bingo");
        assert_eq!(json["standings"][0]["name"], "C");
        assert_eq!(json["standings"][0]["rank"], 1);
        assert_eq!(json["standings"][0]["record"], "1-0-0-0");
        assert_eq!(json["standings"][3]["name"], "D");
    }

    #[tokio::test]
    async fn test_standings_unknown_game() {
        let state = test_state();
        let (status, json) = send(&state, "GET", "/api/games/chess/standings", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "NOT_FOUND");

        let (status, _) = send(&state, "GET", "/api/standings", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_first_round_pairings() {
        let state = test_state();
        register(&state, "bingo", &["A", "B", "C", "D", "E"]).await;

        let (status, json) = send(&state, "GET", "/api/games/bingo/pairings", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "pairings");
        assert_eq!(json["round"], 1);

        let pairings = json["pairings"].as_array().unwrap();
        assert_eq!(pairings.len(), 3);
        assert_eq!(pairings[0]["kind"], "match");
        assert_eq!(pairings[2]["kind"], "bye");
    }

    #[tokio::test]
    async fn test_completed_tournament() {
        let state = test_state();
        register(&state, "poker", &["Twilight Sparkle", "Rainbow Dash"]).await;

        // Two players: floor(log2(2)) = 1, so the game ends after two rounds.
        for result in ["won", "draw"] {
            let (status, _) = send(
                &state,
                "POST",
                "/api/games/poker/matches",
                Some(json!({ "player": 1, "status": result, "opponent": 2 })),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, json) = send(&state, "GET", "/api/games/poker/pairings", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "complete");
        assert_eq!(json["standings"][0]["name"], "Twilight Sparkle");
        assert_eq!(json["standings"][0]["wins"], 1);
        assert_eq!(json["standings"][0]["draws"], 1);
    }
}
