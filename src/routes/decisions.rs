use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::adaptive::DecisionRecord;
use crate::response::AppError;
use crate::services::tutor;
use crate::state::AppState;

use super::tutor_error;

pub fn router() -> Router<AppState> {
    Router::new().route("/:id/decision", post(decide))
}

#[derive(Debug, Serialize)]
struct SuccessResponse<T> {
    success: bool,
    data: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DecideRequest {
    quiz_score: Option<f64>,
}

async fn decide(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<DecideRequest>,
) -> Result<impl IntoResponse, AppError> {
    let decision: DecisionRecord = tutor::decide_next_action(&state, id, body.quiz_score)
        .await
        .map_err(tutor_error)?;

    Ok(Json(SuccessResponse {
        success: true,
        data: decision,
    }))
}
