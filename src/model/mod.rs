//! Generative-model boundary.
//!
//! Everything fallible about talking to the model lives here: the HTTP
//! client, prompt templates, and the parse/validation layer that turns raw
//! model text into typed records. The adaptation core never sees raw model
//! output.

pub mod gemini;
pub mod parse;
pub mod prompts;

use thiserror::Error;

use crate::adaptive::AdaptiveError;

pub use gemini::GeminiClient;
pub use parse::{ContentAnalysis, QuizQuestion};
pub use prompts::{fill_template, Prompts};

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("model returned HTTP {status}: {message}")]
    Api { status: u16, message: String },
    #[error("model returned no content")]
    EmptyResponse,
    #[error("model returned an empty quiz")]
    EmptyQuiz,
    #[error("model returned malformed JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),
    #[error("model returned unknown next action: {0:?}")]
    UnknownAction(String),
    #[error(transparent)]
    Invalid(#[from] AdaptiveError),
}
