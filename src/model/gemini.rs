//! Minimal Gemini client for our use-cases.
//!
//! We only call generateContent, with either a plain text prompt or a text
//! prompt plus one inline image. Calls are instrumented and log model names,
//! latencies, and token counts (not contents).
//!
//! NOTE: The API key travels in a header and never appears in logs.

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::ModelError;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";

#[derive(Clone)]
pub struct GeminiClient {
    pub client: reqwest::Client,
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

impl GeminiClient {
    /// Construct the client if we find GEMINI_API_KEY; otherwise return None.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("GEMINI_API_KEY").ok().filter(|k| !k.trim().is_empty())?;
        let base_url =
            std::env::var("GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        let model = std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .ok()?;

        Some(Self { client, api_key, base_url, model })
    }

    /// Text-only generation. Used for explanations, chat, and JSON-shaped prompts.
    #[instrument(level = "info", skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
    pub async fn generate_text(&self, prompt: &str) -> Result<String, ModelError> {
        self.generate(vec![Part::text(prompt)]).await
    }

    /// Generation over a text prompt plus one inline image (base64 payload).
    #[instrument(level = "info", skip(self, prompt, data_base64), fields(model = %self.model, mime = %mime_type, data_len = data_base64.len()))]
    pub async fn generate_with_image(
        &self,
        prompt: &str,
        mime_type: &str,
        data_base64: &str,
    ) -> Result<String, ModelError> {
        let parts = vec![Part::text(prompt), Part::inline_image(mime_type, data_base64)];
        self.generate(parts).await
    }

    async fn generate(&self, parts: Vec<Part>) -> Result<String, ModelError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let req = GenerateRequest { contents: vec![Content { parts }] };

        let start = std::time::Instant::now();
        let res = self
            .client
            .post(&url)
            .header(USER_AGENT, "edubridge-backend/0.1")
            .header(CONTENT_TYPE, "application/json")
            .header("x-goog-api-key", &self.api_key)
            .json(&req)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            let message = extract_gemini_error(&body).unwrap_or(body);
            return Err(ModelError::Api { status, message });
        }

        let body: GenerateResponse = res.json().await?;
        if let Some(usage) = &body.usage_metadata {
            info!(
                prompt_tokens = ?usage.prompt_token_count,
                candidate_tokens = ?usage.candidates_token_count,
                total_tokens = ?usage.total_token_count,
                elapsed = ?start.elapsed(),
                "Gemini usage"
            );
        }

        let text = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts)
            .unwrap_or_default()
            .into_iter()
            .find_map(|p| p.text)
            .unwrap_or_default()
            .trim()
            .to_string();

        if text.is_empty() {
            return Err(ModelError::EmptyResponse);
        }
        Ok(text)
    }
}

// --- Wire DTOs ---

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

impl Part {
    fn text(text: &str) -> Self {
        Self { text: Some(text.to_string()), inline_data: None }
    }

    fn inline_image(mime_type: &str, data_base64: &str) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.to_string(),
                data: data_base64.to_string(),
            }),
        }
    }
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default, rename = "usageMetadata")]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct UsageMetadata {
    #[serde(default, rename = "promptTokenCount")]
    prompt_token_count: Option<u32>,
    #[serde(default, rename = "candidatesTokenCount")]
    candidates_token_count: Option<u32>,
    #[serde(default, rename = "totalTokenCount")]
    total_token_count: Option<u32>,
}

/// Try to extract a clean error message from a Gemini error body.
fn extract_gemini_error(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct EWrap {
        error: EObj,
    }
    #[derive(Deserialize)]
    struct EObj {
        message: String,
    }
    match serde_json::from_str::<EWrap>(body) {
        Ok(w) => Some(w.error.message),
        Err(_) => None,
    }
}
