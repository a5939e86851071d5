use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical difficulty ladder. Quiz-facing contexts historically use the
/// labels easy/medium/hard for the same three rungs; both vocabularies are
/// accepted on input and mapped here, never stored as free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum DifficultyLevel {
    #[default]
    #[serde(alias = "easy")]
    Beginner,
    #[serde(alias = "medium")]
    Intermediate,
    #[serde(alias = "hard")]
    Advanced,
}

impl DifficultyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }

    /// Label used when issuing quizzes.
    pub fn quiz_label(&self) -> &'static str {
        match self {
            Self::Beginner => "easy",
            Self::Intermediate => "medium",
            Self::Advanced => "hard",
        }
    }

    /// Strict parse accepting both vocabularies. Unknown values are
    /// rejected so a caller can keep the previous level instead of
    /// corrupting the enum domain.
    pub fn parse(s: &str) -> Result<Self, AdaptiveError> {
        match s.trim().to_lowercase().as_str() {
            "beginner" | "easy" => Ok(Self::Beginner),
            "intermediate" | "medium" => Ok(Self::Intermediate),
            "advanced" | "hard" => Ok(Self::Advanced),
            _ => Err(AdaptiveError::UnknownDifficulty(s.trim().to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum LearningStyle {
    #[default]
    Visual,
    Auditory,
    Reading,
    Kinesthetic,
}

impl LearningStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Visual => "visual",
            Self::Auditory => "auditory",
            Self::Reading => "reading",
            Self::Kinesthetic => "kinesthetic",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum EngagementLevel {
    #[default]
    High,
    Medium,
    Low,
}

impl EngagementLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// What kind of learning material was handed in for analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum ContentKind {
    #[default]
    Text,
    Pdf,
    Audio,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Pdf => "pdf",
            Self::Audio => "audio",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// Outcome bucket for one graded quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NextQuizAction {
    MoveForward,
    Review,
    DeepDive,
}

impl NextQuizAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MoveForward => "move_forward",
            Self::Review => "review",
            Self::DeepDive => "deep_dive",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "move_forward" => Some(Self::MoveForward),
            "review" => Some(Self::Review),
            "deep_dive" => Some(Self::DeepDive),
            _ => None,
        }
    }
}

/// Pedagogical next step chosen by the decision cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionAction {
    StartLearning,
    ReviewWeakAreas,
    AdvanceDifficulty,
    ProvideDetailedExplanation,
    ContinueLearning,
}

impl DecisionAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StartLearning => "start_learning",
            Self::ReviewWeakAreas => "review_weak_areas",
            Self::AdvanceDifficulty => "advance_difficulty",
            Self::ProvideDetailedExplanation => "provide_detailed_explanation",
            Self::ContinueLearning => "continue_learning",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdaptiveError {
    #[error("correct count {correct} exceeds total questions {total}")]
    CorrectExceedsTotal { correct: u32, total: u32 },
    #[error("unknown difficulty level: {0:?}")]
    UnknownDifficulty(String),
}

/// One graded quiz, validated at construction. Counts are unsigned so
/// negative values are unrepresentable; the only malformed shape left is
/// `correct > total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    pub correct_count: u32,
    pub total_questions: u32,
    pub difficulty: DifficultyLevel,
}

impl QuizResult {
    pub fn new(
        correct_count: u32,
        total_questions: u32,
        difficulty: DifficultyLevel,
    ) -> Result<Self, AdaptiveError> {
        if correct_count > total_questions {
            return Err(AdaptiveError::CorrectExceedsTotal {
                correct: correct_count,
                total: total_questions,
            });
        }
        Ok(Self {
            correct_count,
            total_questions,
            difficulty,
        })
    }

    /// 0..=100, with an empty quiz defined as 0 rather than an error.
    pub fn score_percentage(&self) -> f64 {
        if self.total_questions == 0 {
            return 0.0;
        }
        self.correct_count as f64 / self.total_questions as f64 * 100.0
    }
}

/// Result of classifying one quiz's performance.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Adaptation {
    pub next_action: NextQuizAction,
    pub recommended_difficulty: DifficultyLevel,
    pub feedback: String,
}

/// Recommended next pedagogical action plus justification.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionRecord {
    pub action: DecisionAction,
    pub reasoning: String,
    pub priority: Priority,
    pub suggested_content: String,
}

/// Caller-supplied context for the decision cascade. A missing quiz score
/// counts as 0 so a session that never took a quiz can still be routed to
/// a detailed explanation.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionContext {
    pub quiz_score: Option<f64>,
}

/// Validated outcome of a model-side answer review. Built by the model
/// boundary; by the time the engine sees one, the difficulty has already
/// been parsed and the misconception normalized (empty strings dropped).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewOutcome {
    pub is_correct: bool,
    pub misconception: Option<String>,
    pub next_action: NextQuizAction,
    pub recommended_difficulty: DifficultyLevel,
    pub additional_topics: Vec<String>,
}
