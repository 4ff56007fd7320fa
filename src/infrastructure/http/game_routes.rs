//! Game REST endpoints

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::application::dto::{
    ChoiceDto, GameHistoryResponse, GameResultResponse, PlayGameRequest,
};
use crate::application::services::{GameError, GameService};
use crate::infrastructure::state::AppState;

/// Body of every error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub message: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub timestamp: DateTime<Utc>,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, kind: &'static str, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: ErrorDetail {
                message: message.into(),
                kind,
                timestamp: Utc::now(),
            },
        }),
    )
}

fn game_error(err: GameError) -> ApiError {
    match &err {
        GameError::InvalidChoice(_) => {
            api_error(StatusCode::BAD_REQUEST, "InvalidChoice", err.to_string())
        }
        GameError::SourceUnavailable => api_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "SourceUnavailable",
            "Random number service is unavailable, try again later",
        ),
        GameError::Cancelled => {
            api_error(StatusCode::REQUEST_TIMEOUT, "Cancelled", err.to_string())
        }
    }
}

pub fn game_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/game/choices", get(list_choices))
        .route("/api/game/choice", get(random_choice))
        .route("/api/game/play", post(play_game))
        .route("/api/game/history", get(get_history))
        .route("/api/game/reset", delete(reset_game))
}

async fn list_choices(State(state): State<Arc<AppState>>) -> Json<Vec<ChoiceDto>> {
    Json(
        state
            .game_service
            .list_choices()
            .into_iter()
            .map(ChoiceDto::from)
            .collect(),
    )
}

async fn random_choice(State(state): State<Arc<AppState>>) -> Result<Json<ChoiceDto>, ApiError> {
    state
        .game_service
        .random_choice(&state.shutdown.token())
        .await
        .map(|choice| Json(choice.into()))
        .map_err(game_error)
}

async fn play_game(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PlayGameRequest>, JsonRejection>,
) -> Result<Json<GameResultResponse>, ApiError> {
    let Json(request) = payload
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, "ValidationError", e.body_text()))?;

    state
        .game_service
        .play(request.player, &state.shutdown.token())
        .await
        .map(|result| Json(result.into()))
        .map_err(game_error)
}

async fn get_history(State(state): State<Arc<AppState>>) -> Json<GameHistoryResponse> {
    Json(state.game_service.history().await.into())
}

async fn reset_game(State(state): State<Arc<AppState>>) -> StatusCode {
    state.game_service.reset().await;
    StatusCode::NO_CONTENT
}
