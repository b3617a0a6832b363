use axum::{
    extract::{rejection::JsonRejection, Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chess_engine::board::parse_fen;
use chess_engine::{MoveSelector, SelectError};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

#[derive(Clone)]
pub struct AppState {
    // One selector for the whole process: its cache and book are shared by all requests
    selector: Arc<Mutex<MoveSelector>>,
}

#[derive(Debug, Deserialize)]
pub struct BotMoveRequest {
    pub fen: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BotMoveResponse {
    #[serde(rename = "move")]
    pub mv: String,
    pub new_fen: String,
    pub source: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("FEN not provided")]
    MissingFen,

    #[error("{0}")]
    InvalidFen(String),

    #[error("{0}")]
    GameOver(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::MissingFen | Self::InvalidFen(_) => StatusCode::BAD_REQUEST,
            Self::GameOver(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<SelectError> for ApiError {
    fn from(err: SelectError) -> Self {
        match err {
            SelectError::NoMoveAvailable { .. } => Self::GameOver(err.to_string()),
            SelectError::Engine(inner) => {
                error!("move selection failed: {}", inner);
                Self::Internal(inner.to_string())
            }
        }
    }
}

pub fn router(selector: MoveSelector) -> Router {
    let state = AppState {
        selector: Arc::new(Mutex::new(selector)),
    };

    Router::new()
        .route("/get_bot_move", post(get_bot_move))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn get_bot_move(
    State(state): State<AppState>,
    payload: Result<Json<BotMoveRequest>, JsonRejection>,
) -> Result<Json<BotMoveResponse>, ApiError> {
    let fen = payload
        .ok()
        .and_then(|Json(request)| request.fen)
        .ok_or(ApiError::MissingFen)?;

    let position = parse_fen(&fen).map_err(|err| ApiError::InvalidFen(err.to_string()))?;

    // The local search is CPU bound, keep it off the async workers
    let selector = Arc::clone(&state.selector);
    let handle = Handle::current();
    let selection = tokio::task::spawn_blocking(move || {
        let mut selector = selector.blocking_lock();
        handle.block_on(selector.select_and_apply(&position))
    })
    .await
    .map_err(|err| {
        error!("move selection task failed: {}", err);
        ApiError::Internal(err.to_string())
    })??;
    info!("{} -> {} ({})", fen, selection.uci(), selection.source);

    Ok(Json(BotMoveResponse {
        mv: selection.uci(),
        new_fen: selection.fen(),
        source: selection.source.as_str().to_string(),
    }))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(ApiError::MissingFen.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::InvalidFen("bad".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::GameOver("mate".to_string()).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_response_uses_move_key() {
        let response = BotMoveResponse {
            mv: "e2e4".to_string(),
            new_fen: "fen".to_string(),
            source: "book".to_string(),
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["move"], "e2e4");
        assert!(value.get("mv").is_none());
    }
}
