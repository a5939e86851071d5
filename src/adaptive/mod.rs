//! Learner-state adaptation core.
//!
//! Pure, synchronous state-transition logic: quiz performance classification,
//! the next-action decision cascade, and the per-session decision log. All
//! inputs are validated at construction (`QuizResult::new`,
//! `DifficultyLevel::parse`); the engine itself has no failure modes.

pub mod engine;
pub mod log;
pub mod profile;
pub mod types;

pub use engine::AdaptationEngine;
pub use log::{DecisionKind, DecisionLog, DecisionLogEntry};
pub use profile::LearnerProfile;
pub use types::{
    Adaptation, AdaptiveError, ContentKind, DecisionAction, DecisionContext, DecisionRecord,
    DifficultyLevel, EngagementLevel, LearningStyle, NextQuizAction, Priority, QuizResult,
    ReviewOutcome,
};
