use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(root))
}

async fn root(State(state): State<AppState>) -> Response {
    let response = HealthResponse {
        status: "ok",
        model: if state.model.is_some() {
            "gemini"
        } else {
            "offline"
        },
        active_sessions: state.store.count().await,
        uptime: state.uptime_seconds(),
        timestamp: now_iso(),
    };

    Json(response).into_response()
}

fn now_iso() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: &'static str,
    model: &'static str,
    active_sessions: usize,
    uptime: u64,
    timestamp: String,
}
