pub mod games;
pub mod matches;
pub mod players;

use axum::http::Uri;

use crate::api::ApiError;

pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("No route for {}", uri.path()))
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::util::ServiceExt;

    use crate::api::build_router;
    use crate::api::state::AppState;
    use crate::engine::Tournament;
    use crate::pairing::SeedingMode;
    use crate::storage::{MemoryStore, TournamentStore};

    pub fn test_state() -> AppState {
        let store: Arc<dyn TournamentStore> = Arc::new(MemoryStore::new());
        AppState {
            tournament: Arc::new(Tournament::new(store, Arc::new(SeedingMode::RandomFirstRound))),
            cors_origin: "*".to_string(),
        }
    }

    pub async fn send(
        state: &AppState,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let resp = build_router(state.clone()).oneshot(request).await.unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn register(state: &AppState, game: &str, names: &[&str]) {
        for name in names {
            let (status, _) = send(
                state,
                "POST",
                "/api/players",
                Some(serde_json::json!({ "name": name, "game": game })),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_unknown_route() {
        let state = test_state();
        let (status, json) = send(&state, "GET", "/api/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "NOT_FOUND");
    }
}
