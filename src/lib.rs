pub mod adaptive;
pub mod config;
pub mod logging;
pub mod model;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;

use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::Config;
use crate::state::AppState;

pub async fn create_app(config: &Config) -> axum::Router {
    let state = AppState::new(config);

    routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
