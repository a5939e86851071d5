use serde::{Deserialize, Serialize};

use crate::adaptive::types::{DifficultyLevel, EngagementLevel, LearningStyle};

/// Per-session record of one learner's mastery state.
///
/// `topics_covered`, `weak_areas` and `strengths` are insertion-ordered and
/// duplicate-free; the adds are idempotent. `native_language` is fixed at
/// creation. `learning_style` and `engagement_level` are informational and
/// never read by the decision logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnerProfile {
    pub native_language: String,
    pub difficulty_level: DifficultyLevel,
    pub learning_style: LearningStyle,
    pub topics_covered: Vec<String>,
    pub weak_areas: Vec<String>,
    pub strengths: Vec<String>,
    pub engagement_level: EngagementLevel,
}

impl LearnerProfile {
    pub fn new(native_language: impl Into<String>) -> Self {
        Self {
            native_language: native_language.into(),
            difficulty_level: DifficultyLevel::Beginner,
            learning_style: LearningStyle::Visual,
            topics_covered: Vec::new(),
            weak_areas: Vec::new(),
            strengths: Vec::new(),
            engagement_level: EngagementLevel::High,
        }
    }

    /// Appends the topic unless already present. Returns whether it was added.
    pub fn add_topic(&mut self, name: &str) -> bool {
        push_unique(&mut self.topics_covered, name)
    }

    /// Appends the misconception unless already present. Returns whether it
    /// was added.
    pub fn add_weak_area(&mut self, name: &str) -> bool {
        push_unique(&mut self.weak_areas, name)
    }

    /// Appends the strength unless already present. Returns whether it was
    /// added.
    pub fn add_strength(&mut self, name: &str) -> bool {
        push_unique(&mut self.strengths, name)
    }

    pub fn set_difficulty(&mut self, level: DifficultyLevel) {
        self.difficulty_level = level;
    }
}

fn push_unique(items: &mut Vec<String>, name: &str) -> bool {
    if items.iter().any(|existing| existing == name) {
        return false;
    }
    items.push(name.to_string());
    true
}
