use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::response::AppError;
use crate::services::session::ChatTurn;
use crate::services::tutor;
use crate::state::AppState;

use super::tutor_error;

pub fn router() -> Router<AppState> {
    Router::new().route("/:id/chat", post(ask).get(history))
}

#[derive(Debug, Serialize)]
struct SuccessResponse<T> {
    success: bool,
    data: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChatRequest {
    question: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChatResponse {
    question: String,
    answer: String,
}

async fn ask(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<ChatRequest>,
) -> Result<impl IntoResponse, AppError> {
    let question = body.question.trim().to_string();
    if question.is_empty() {
        return Err(AppError::validation("question must not be empty"));
    }

    let answer = tutor::clarify_doubt(&state, id, &question)
        .await
        .map_err(tutor_error)?;

    Ok(Json(SuccessResponse {
        success: true,
        data: ChatResponse { question, answer },
    }))
}

async fn history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let turns: Vec<ChatTurn> = state
        .store
        .with_session(id, |s| s.chat_history.clone())
        .await
        .ok_or_else(|| AppError::not_found("session not found"))?;

    Ok(Json(SuccessResponse {
        success: true,
        data: turns,
    }))
}
