//! Typed parsing of model output.
//!
//! Gemini is asked for strict JSON but routinely wraps it in Markdown code
//! fences, so every parser first strips fence markers and then deserializes
//! into a typed record. Enum-valued fields are validated here so the
//! adaptation core only ever receives canonical values.

use serde::{Deserialize, Serialize};

use super::ModelError;
use crate::adaptive::{DifficultyLevel, NextQuizAction, ReviewOutcome};

/// Remove Markdown code-fence markers the model likes to wrap JSON in.
pub fn strip_code_fences(raw: &str) -> String {
    raw.trim().replace("```json", "").replace("```", "").trim().to_string()
}

/// Structured reading of a piece of learning content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentAnalysis {
    #[serde(default, alias = "main_topic")]
    pub main_topic: String,
    #[serde(default, alias = "difficulty_level")]
    pub difficulty_level: String,
    #[serde(default, alias = "key_concepts")]
    pub key_concepts: Vec<String>,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default, alias = "learning_plan")]
    pub learning_plan: Vec<String>,
    #[serde(default, alias = "confusion_points")]
    pub confusion_points: Vec<String>,
    #[serde(default, alias = "teaching_strategy")]
    pub teaching_strategy: String,
}

/// One generated quiz question. `question` and `correct` are mandatory
/// because grading is impossible without them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    #[serde(rename = "type", default = "default_question_type")]
    pub question_type: String,
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    pub correct: String,
    #[serde(default)]
    pub explanation: String,
}

fn default_question_type() -> String {
    "mcq".to_string()
}

#[derive(Deserialize)]
struct AnswerReviewRaw {
    #[serde(default)]
    is_correct: bool,
    #[serde(default)]
    misconception: Option<String>,
    next_action: String,
    recommended_difficulty: String,
    #[serde(default)]
    additional_topics: Vec<String>,
}

pub fn parse_content_analysis(raw: &str) -> Result<ContentAnalysis, ModelError> {
    let cleaned = strip_code_fences(raw);
    let analysis = serde_json::from_str::<ContentAnalysis>(&cleaned)?;
    Ok(analysis)
}

pub fn parse_quiz(raw: &str) -> Result<Vec<QuizQuestion>, ModelError> {
    let cleaned = strip_code_fences(raw);
    let questions = serde_json::from_str::<Vec<QuizQuestion>>(&cleaned)?;
    if questions.is_empty() {
        return Err(ModelError::EmptyQuiz);
    }
    Ok(questions)
}

pub fn parse_answer_review(raw: &str) -> Result<ReviewOutcome, ModelError> {
    let cleaned = strip_code_fences(raw);
    let review = serde_json::from_str::<AnswerReviewRaw>(&cleaned)?;

    let next_action = NextQuizAction::from_str(review.next_action.trim())
        .ok_or_else(|| ModelError::UnknownAction(review.next_action.clone()))?;
    let recommended_difficulty = DifficultyLevel::parse(&review.recommended_difficulty)?;
    // An empty or whitespace misconception carries no information; drop it so
    // it never lands in the weak-area list.
    let misconception = review
        .misconception
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty());

    Ok(ReviewOutcome {
        is_correct: review.is_correct,
        misconception,
        next_action,
        recommended_difficulty,
        additional_topics: review.additional_topics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_json_fences() {
        let raw = "```json\n{\"mainTopic\": \"Photosynthesis\"}\n```";
        assert_eq!(strip_code_fences(raw), "{\"mainTopic\": \"Photosynthesis\"}");
    }

    #[test]
    fn strips_bare_fences() {
        let raw = "```\n[1, 2]\n```";
        assert_eq!(strip_code_fences(raw), "[1, 2]");
    }

    #[test]
    fn parses_analysis_with_snake_case_keys() {
        let raw = r#"{
            "main_topic": "Photosynthesis",
            "difficulty_level": "intermediate",
            "key_concepts": ["chlorophyll", "light reactions"],
            "prerequisites": ["cell structure"],
            "learning_plan": ["overview", "light reactions", "dark reactions"],
            "confusion_points": ["ATP vs ADP"],
            "teaching_strategy": "visual diagrams"
        }"#;
        let analysis = parse_content_analysis(raw).unwrap();
        assert_eq!(analysis.main_topic, "Photosynthesis");
        assert_eq!(analysis.learning_plan.len(), 3);
        assert_eq!(analysis.teaching_strategy, "visual diagrams");
    }

    #[test]
    fn analysis_tolerates_missing_fields() {
        let analysis = parse_content_analysis("{}").unwrap();
        assert_eq!(analysis.main_topic, "");
        assert!(analysis.key_concepts.is_empty());
    }

    #[test]
    fn parses_fenced_quiz() {
        let raw = r#"```json
        [
            {"type": "mcq", "question": "2+2?", "options": ["3", "4"], "correct": "4", "explanation": "basic sum"},
            {"question": "3+3?", "options": ["5", "6"], "correct": "6"}
        ]
        ```"#;
        let quiz = parse_quiz(raw).unwrap();
        assert_eq!(quiz.len(), 2);
        assert_eq!(quiz[0].correct, "4");
        assert_eq!(quiz[1].question_type, "mcq");
        assert_eq!(quiz[1].explanation, "");
    }

    #[test]
    fn empty_quiz_is_an_error() {
        assert!(matches!(parse_quiz("[]"), Err(ModelError::EmptyQuiz)));
    }

    #[test]
    fn garbage_quiz_is_an_error() {
        assert!(matches!(
            parse_quiz("Here are your questions!"),
            Err(ModelError::MalformedJson(_))
        ));
    }

    #[test]
    fn parses_answer_review() {
        let raw = r#"{
            "is_correct": false,
            "misconception": "Confuses mass and weight",
            "next_action": "deep_dive",
            "recommended_difficulty": "beginner",
            "additional_topics": ["gravity"]
        }"#;
        let review = parse_answer_review(raw).unwrap();
        assert!(!review.is_correct);
        assert_eq!(review.next_action, NextQuizAction::DeepDive);
        assert_eq!(review.recommended_difficulty, DifficultyLevel::Beginner);
        assert_eq!(review.misconception.as_deref(), Some("Confuses mass and weight"));
    }

    #[test]
    fn blank_misconception_is_dropped() {
        let raw = r#"{
            "is_correct": true,
            "misconception": "  ",
            "next_action": "move_forward",
            "recommended_difficulty": "advanced"
        }"#;
        let review = parse_answer_review(raw).unwrap();
        assert!(review.misconception.is_none());
        assert!(review.additional_topics.is_empty());
    }

    #[test]
    fn unknown_next_action_is_rejected() {
        let raw = r#"{
            "next_action": "sideways",
            "recommended_difficulty": "beginner"
        }"#;
        assert!(matches!(
            parse_answer_review(raw),
            Err(ModelError::UnknownAction(a)) if a == "sideways"
        ));
    }

    #[test]
    fn legacy_difficulty_vocabulary_is_accepted() {
        let raw = r#"{
            "is_correct": true,
            "next_action": "review",
            "recommended_difficulty": "medium"
        }"#;
        let review = parse_answer_review(raw).unwrap();
        assert_eq!(review.recommended_difficulty, DifficultyLevel::Intermediate);
    }
}
