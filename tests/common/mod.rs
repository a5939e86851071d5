use axum::Router;

use edubridge_backend::config::Config;

/// App wired for tests: no model key, so every operation takes the
/// deterministic offline path.
pub async fn create_test_app() -> Router {
    std::env::remove_var("GEMINI_API_KEY");
    std::env::remove_var("TUTOR_CONFIG_PATH");
    std::env::remove_var("ENABLE_FILE_LOGS");
    std::env::remove_var("DECISION_LOG_CAPACITY");

    edubridge_backend::create_app(&Config::from_env()).await
}
