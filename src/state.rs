use std::time::Instant;

use tracing::info;

use crate::adaptive::AdaptationEngine;
use crate::config::Config;
use crate::model::prompts::load_tutor_config_from_env;
use crate::model::{GeminiClient, Prompts};
use crate::services::session::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub store: SessionStore,
    pub model: Option<GeminiClient>,
    pub prompts: Prompts,
    pub engine: AdaptationEngine,
    started_at: Instant,
}

impl AppState {
    /// Build state from env: load prompt overrides, init the optional model
    /// client, set up the session store.
    pub fn new(config: &Config) -> Self {
        let prompts = load_tutor_config_from_env()
            .map(|c| c.prompts)
            .unwrap_or_default();

        let model = GeminiClient::from_env();
        if let Some(m) = &model {
            info!(base_url = %m.base_url, model = %m.model, "Gemini enabled.");
        } else {
            info!("Gemini disabled (no GEMINI_API_KEY). Serving offline fallbacks.");
        }

        Self {
            store: SessionStore::new(config.decision_log_capacity),
            model,
            prompts,
            engine: AdaptationEngine::default(),
            started_at: Instant::now(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
