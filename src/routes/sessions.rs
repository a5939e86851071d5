use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::adaptive::{DecisionLogEntry, DifficultyLevel, LearnerProfile, LearningStyle};
use crate::response::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_session))
        .route("/:id", get(get_session).delete(delete_session))
        .route("/:id/profile", get(get_profile))
        .route("/:id/decisions", get(list_decisions))
        .route("/:id/topics", post(add_topic))
        .route("/:id/difficulty", put(set_difficulty))
}

#[derive(Debug, Serialize)]
struct SuccessResponse<T> {
    success: bool,
    data: T,
}

#[derive(Debug, Serialize)]
struct SuccessMessageResponse {
    success: bool,
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateSessionRequest {
    native_language: String,
    learning_style: Option<LearningStyle>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateSessionResponse {
    session_id: Uuid,
    profile: LearnerProfile,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionSnapshot {
    session_id: Uuid,
    profile: LearnerProfile,
    has_content: bool,
    quiz_attempts: usize,
    chat_turns: usize,
    decision_count: usize,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DecisionsQuery {
    limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddTopicRequest {
    topic: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AddTopicResponse {
    added: bool,
    topics_covered: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SetDifficultyRequest {
    difficulty: String,
}

async fn create_session(
    State(state): State<AppState>,
    Json(body): Json<CreateSessionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let language = body.native_language.trim();
    if language.is_empty() {
        return Err(AppError::validation("nativeLanguage must not be empty"));
    }

    let session = state.store.create(language.to_string()).await;
    let profile = match body.learning_style {
        Some(style) => state
            .store
            .with_session_mut(session.id, |s| {
                s.profile.learning_style = style;
                s.profile.clone()
            })
            .await
            .unwrap_or(session.profile),
        None => session.profile,
    };

    Ok(Json(SuccessResponse {
        success: true,
        data: CreateSessionResponse {
            session_id: session.id,
            profile,
        },
    }))
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let snapshot = state
        .store
        .with_session(id, |s| SessionSnapshot {
            session_id: s.id,
            profile: s.profile.clone(),
            has_content: !s.current_content.is_empty(),
            quiz_attempts: s.quiz_scores.len(),
            chat_turns: s.chat_history.len(),
            decision_count: s.decision_log.len(),
            created_at: s.created_at,
            updated_at: s.updated_at,
        })
        .await
        .ok_or_else(|| AppError::not_found("session not found"))?;

    Ok(Json(SuccessResponse {
        success: true,
        data: snapshot,
    }))
}

async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    if !state.store.remove(id).await {
        return Err(AppError::not_found("session not found"));
    }

    Ok(Json(SuccessMessageResponse {
        success: true,
        message: "Session deleted".to_string(),
    }))
}

async fn get_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let profile = state
        .store
        .with_session(id, |s| s.profile.clone())
        .await
        .ok_or_else(|| AppError::not_found("session not found"))?;

    Ok(Json(SuccessResponse {
        success: true,
        data: profile,
    }))
}

async fn list_decisions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<DecisionsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let entries: Vec<DecisionLogEntry> = state
        .store
        .with_session(id, |s| match query.limit {
            Some(limit) => s.decision_log.recent(limit).cloned().collect(),
            None => s.decision_log.entries().cloned().collect(),
        })
        .await
        .ok_or_else(|| AppError::not_found("session not found"))?;

    Ok(Json(SuccessResponse {
        success: true,
        data: entries,
    }))
}

async fn add_topic(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<AddTopicRequest>,
) -> Result<impl IntoResponse, AppError> {
    let topic = body.topic.trim().to_string();
    if topic.is_empty() {
        return Err(AppError::validation("topic must not be empty"));
    }

    let response = state
        .store
        .with_session_mut(id, |s| AddTopicResponse {
            added: s.profile.add_topic(&topic),
            topics_covered: s.profile.topics_covered.clone(),
        })
        .await
        .ok_or_else(|| AppError::not_found("session not found"))?;

    Ok(Json(SuccessResponse {
        success: true,
        data: response,
    }))
}

async fn set_difficulty(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<SetDifficultyRequest>,
) -> Result<impl IntoResponse, AppError> {
    let level =
        DifficultyLevel::parse(&body.difficulty).map_err(|e| AppError::validation(e.to_string()))?;

    let profile = state
        .store
        .with_session_mut(id, |s| {
            s.profile.set_difficulty(level);
            s.profile.clone()
        })
        .await
        .ok_or_else(|| AppError::not_found("session not found"))?;

    Ok(Json(SuccessResponse {
        success: true,
        data: profile,
    }))
}
