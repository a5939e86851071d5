use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::adaptive::{ContentKind, DifficultyLevel};
use crate::model::ContentAnalysis;
use crate::response::AppError;
use crate::services::tutor;
use crate::state::AppState;

use super::tutor_error;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:id/content/analyze", post(analyze))
        .route("/:id/content/explain", post(explain))
        .route("/:id/content/summary", post(summary))
        .route("/:id/multimodal", post(multimodal))
        .route("/:id/exercises", post(exercises))
        .route("/:id/topics/next", post(next_topic))
}

#[derive(Debug, Serialize)]
struct SuccessResponse<T> {
    success: bool,
    data: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeRequest {
    content: String,
    content_type: Option<ContentKind>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContentOverrideRequest {
    content: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExplanationResponse {
    explanation: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SummaryResponse {
    summary: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MultimodalRequest {
    image_base64: Option<String>,
    mime_type: Option<String>,
    text: Option<String>,
    audio_transcript: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExercisesRequest {
    topic: Option<String>,
    difficulty: Option<DifficultyLevel>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NextTopicRequest {
    current_topic: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NextTopicResponse {
    suggestion: String,
}

async fn analyze(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<AnalyzeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let content = body.content.trim();
    if content.is_empty() {
        return Err(AppError::validation("content must not be empty"));
    }

    let kind = body.content_type.unwrap_or_default();
    let analysis: ContentAnalysis = tutor::analyze_content(&state, id, content, kind)
        .await
        .map_err(tutor_error)?;

    Ok(Json(SuccessResponse {
        success: true,
        data: analysis,
    }))
}

async fn explain(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<ContentOverrideRequest>,
) -> Result<impl IntoResponse, AppError> {
    let explanation = tutor::explain_content(&state, id, body.content.as_deref())
        .await
        .map_err(tutor_error)?;

    Ok(Json(SuccessResponse {
        success: true,
        data: ExplanationResponse { explanation },
    }))
}

async fn summary(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<ContentOverrideRequest>,
) -> Result<impl IntoResponse, AppError> {
    let summary = tutor::summarize_content(&state, id, body.content.as_deref())
        .await
        .map_err(tutor_error)?;

    Ok(Json(SuccessResponse {
        success: true,
        data: SummaryResponse { summary },
    }))
}

async fn multimodal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<MultimodalRequest>,
) -> Result<impl IntoResponse, AppError> {
    let image = match (body.image_base64.as_deref(), body.mime_type.as_deref()) {
        (Some(data), Some(mime)) => Some((mime, data)),
        (Some(_), None) => {
            return Err(AppError::validation("mimeType is required with imageBase64"));
        }
        _ => None,
    };

    let explanation = tutor::explain_multimodal(
        &state,
        id,
        body.text.as_deref().unwrap_or(""),
        body.audio_transcript.as_deref().unwrap_or(""),
        image,
    )
    .await
    .map_err(tutor_error)?;

    Ok(Json(SuccessResponse {
        success: true,
        data: ExplanationResponse { explanation },
    }))
}

async fn exercises(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<ExercisesRequest>,
) -> Result<impl IntoResponse, AppError> {
    let exercises =
        tutor::practice_exercises(&state, id, body.topic.as_deref(), body.difficulty)
            .await
            .map_err(tutor_error)?;

    Ok(Json(SuccessResponse {
        success: true,
        data: exercises,
    }))
}

async fn next_topic(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<NextTopicRequest>,
) -> Result<impl IntoResponse, AppError> {
    let suggestion = tutor::suggest_next_topic(&state, id, body.current_topic.as_deref())
        .await
        .map_err(tutor_error)?;

    Ok(Json(SuccessResponse {
        success: true,
        data: NextTopicResponse { suggestion },
    }))
}
