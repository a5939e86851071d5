mod chat;
mod content;
mod decisions;
mod health;
mod quiz;
mod sessions;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Router;

use crate::response::{json_error, AppError};
use crate::services::tutor::TutorError;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let sessions_api = sessions::router()
        .merge(content::router())
        .merge(quiz::router())
        .merge(chat::router())
        .merge(decisions::router());

    let mut app = Router::new().nest("/api/sessions", sessions_api);

    for path in ["/health", "/api/health"] {
        app = app.nest(path, health::router());
    }

    app.fallback(fallback_handler).with_state(state)
}

/// Single mapping from service failures to HTTP errors, shared by every
/// route module.
fn tutor_error(err: TutorError) -> AppError {
    match err {
        TutorError::SessionNotFound => AppError::not_found(err.to_string()),
        TutorError::NoContent | TutorError::NoQuiz => AppError::bad_request(err.to_string()),
        TutorError::InvalidImage(_) | TutorError::Invalid(_) => {
            AppError::validation(err.to_string())
        }
        TutorError::ModelUnavailable => json_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "MODEL_UNAVAILABLE",
            err.to_string(),
        ),
        TutorError::Model(_) => json_error(StatusCode::BAD_GATEWAY, "MODEL_ERROR", err.to_string()),
    }
}

async fn fallback_handler() -> Response {
    json_error(StatusCode::NOT_FOUND, "NOT_FOUND", "Route not found").into_response()
}
