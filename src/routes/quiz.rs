use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::adaptive::{DifficultyLevel, LearnerProfile, ReviewOutcome};
use crate::model::QuizQuestion;
use crate::response::AppError;
use crate::services::tutor::{self, QuizReport};
use crate::state::AppState;

use super::tutor_error;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:id/quiz/generate", post(generate))
        .route("/:id/quiz/submit", post(submit))
        .route("/:id/answer/review", post(review))
}

#[derive(Debug, Serialize)]
struct SuccessResponse<T> {
    success: bool,
    data: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateQuizRequest {
    difficulty: Option<DifficultyLevel>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitQuizRequest {
    answers: Vec<String>,
    difficulty: Option<DifficultyLevel>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitQuizResponse {
    #[serde(flatten)]
    report: QuizReport,
    profile: LearnerProfile,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReviewRequest {
    student_response: String,
    correct_answer: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReviewResponse {
    #[serde(flatten)]
    outcome: ReviewOutcome,
    profile: LearnerProfile,
}

async fn generate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<GenerateQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    let questions: Vec<QuizQuestion> = tutor::generate_quiz(&state, id, body.difficulty)
        .await
        .map_err(tutor_error)?;

    Ok(Json(SuccessResponse {
        success: true,
        data: questions,
    }))
}

async fn submit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<SubmitQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    let report = tutor::submit_quiz(&state, id, &body.answers, body.difficulty)
        .await
        .map_err(tutor_error)?;
    let profile = current_profile(&state, id).await?;

    Ok(Json(SuccessResponse {
        success: true,
        data: SubmitQuizResponse { report, profile },
    }))
}

async fn review(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<ReviewRequest>,
) -> Result<impl IntoResponse, AppError> {
    let student_response = body.student_response.trim();
    if student_response.is_empty() {
        return Err(AppError::validation("studentResponse must not be empty"));
    }

    let outcome = tutor::review_answer(&state, id, student_response, body.correct_answer.trim())
        .await
        .map_err(tutor_error)?;
    let profile = current_profile(&state, id).await?;

    Ok(Json(SuccessResponse {
        success: true,
        data: ReviewResponse { outcome, profile },
    }))
}

async fn current_profile(state: &AppState, id: Uuid) -> Result<LearnerProfile, AppError> {
    state
        .store
        .with_session(id, |s| s.profile.clone())
        .await
        .ok_or_else(|| AppError::not_found("session not found"))
}
