use crate::adaptive::log::{DecisionKind, DecisionLog};
use crate::adaptive::profile::LearnerProfile;
use crate::adaptive::types::{
    Adaptation, DecisionAction, DecisionContext, DecisionRecord, DifficultyLevel, NextQuizAction,
    Priority, QuizResult, ReviewOutcome,
};

/// Deterministic rule table over a handful of counters. Stateless; all
/// session state lives in the profile and log passed into each call.
#[derive(Debug, Clone)]
pub struct AdaptationEngine {
    mastery_threshold: f64,
    review_threshold: f64,
    weak_area_backlog: usize,
    advance_min_topics: usize,
    advance_max_weak: usize,
}

impl AdaptationEngine {
    pub fn new(mastery_threshold: f64, review_threshold: f64) -> Self {
        Self {
            mastery_threshold,
            review_threshold,
            weak_area_backlog: 2,
            advance_min_topics: 3,
            advance_max_weak: 1,
        }
    }

    /// Buckets one quiz's score. Pure; boundaries are inclusive upward
    /// (exactly 80 is mastered, exactly 60 is review).
    pub fn classify_quiz(&self, result: &QuizResult) -> Adaptation {
        let score = result.score_percentage();

        if score >= self.mastery_threshold {
            // Both legacy targets of this branch ("hard" and "advanced")
            // name the top rung of the canonical ladder.
            Adaptation {
                next_action: NextQuizAction::MoveForward,
                recommended_difficulty: DifficultyLevel::Advanced,
                feedback: "Excellent! You have mastered this topic.".to_string(),
            }
        } else if score >= self.review_threshold {
            Adaptation {
                next_action: NextQuizAction::Review,
                recommended_difficulty: result.difficulty,
                feedback: "Good progress! Review the concepts and try again.".to_string(),
            }
        } else {
            let recommended = if result.difficulty == DifficultyLevel::Advanced {
                DifficultyLevel::Intermediate
            } else {
                result.difficulty
            };
            Adaptation {
                next_action: NextQuizAction::DeepDive,
                recommended_difficulty: recommended,
                feedback: "Let's take it slower. I'll explain the concepts in more detail."
                    .to_string(),
            }
        }
    }

    /// Classifies and applies the result to the profile in one atomic step:
    /// the recommended difficulty overwrites the profile's level, a mastered
    /// topic is recorded as a strength, a failed quiz's misconception as a
    /// weak area, and the adjustment is logged.
    pub fn apply_quiz(
        &self,
        profile: &mut LearnerProfile,
        log: &mut DecisionLog,
        result: &QuizResult,
        topic: Option<&str>,
        misconception: Option<&str>,
    ) -> Adaptation {
        let adaptation = self.classify_quiz(result);

        profile.set_difficulty(adaptation.recommended_difficulty);
        match adaptation.next_action {
            NextQuizAction::MoveForward => {
                if let Some(topic) = topic {
                    profile.add_strength(topic);
                }
            }
            NextQuizAction::DeepDive => {
                if let Some(misconception) = misconception {
                    profile.add_weak_area(misconception);
                }
            }
            NextQuizAction::Review => {}
        }

        log.record(
            DecisionKind::AdaptiveLearning,
            format!(
                "Quiz scored {:.0}% - Action: {}",
                result.score_percentage(),
                adaptation.next_action.as_str()
            ),
            format!(
                "Adjusting difficulty to {}",
                adaptation.recommended_difficulty.as_str()
            ),
        );

        adaptation
    }

    /// Applies a validated model-side answer review: difficulty overwrite,
    /// weak-area append on a wrong answer, log entry. Validation happened at
    /// the parse boundary, so nothing here can fail halfway.
    pub fn apply_review(
        &self,
        profile: &mut LearnerProfile,
        log: &mut DecisionLog,
        outcome: &ReviewOutcome,
    ) {
        profile.set_difficulty(outcome.recommended_difficulty);
        if !outcome.is_correct {
            if let Some(misconception) = outcome.misconception.as_deref() {
                profile.add_weak_area(misconception);
            }
        }

        log.record(
            DecisionKind::AdaptiveLearning,
            format!(
                "Student response analyzed - Action: {}",
                outcome.next_action.as_str()
            ),
            format!(
                "Adjusting difficulty to {}",
                outcome.recommended_difficulty.as_str()
            ),
        );
    }

    /// Ordered cascade of mutually exclusive rules; the first match wins.
    /// Rule order is a deliberate priority chain: an empty profile always
    /// starts learning even with a long weak-area backlog.
    pub fn decide_next_action(
        &self,
        profile: &LearnerProfile,
        context: &DecisionContext,
        log: &mut DecisionLog,
    ) -> DecisionRecord {
        let topics_count = profile.topics_covered.len();
        let weak_count = profile.weak_areas.len();

        let decision = if topics_count == 0 {
            DecisionRecord {
                action: DecisionAction::StartLearning,
                reasoning: "No topics covered yet. Student needs to begin learning journey."
                    .to_string(),
                priority: Priority::High,
                suggested_content: "Start with fundamental concepts".to_string(),
            }
        } else if weak_count > self.weak_area_backlog {
            let preview = profile
                .weak_areas
                .iter()
                .take(3)
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            DecisionRecord {
                action: DecisionAction::ReviewWeakAreas,
                reasoning: format!(
                    "Student has {weak_count} weak areas. Consolidation needed before advancing."
                ),
                priority: Priority::High,
                suggested_content: format!("Review: {preview}"),
            }
        } else if topics_count >= self.advance_min_topics && weak_count <= self.advance_max_weak {
            DecisionRecord {
                action: DecisionAction::AdvanceDifficulty,
                reasoning: "Strong performance across topics. Ready for more challenging content."
                    .to_string(),
                priority: Priority::Medium,
                suggested_content: format!(
                    "Advance from {} to next level",
                    profile.difficulty_level.as_str()
                ),
            }
        } else if context.quiz_score.unwrap_or(0.0) < self.review_threshold {
            DecisionRecord {
                action: DecisionAction::ProvideDetailedExplanation,
                reasoning: "Quiz score below 60%. Deeper explanation with examples needed."
                    .to_string(),
                priority: Priority::High,
                suggested_content: "Break down concepts with visual aids".to_string(),
            }
        } else {
            DecisionRecord {
                action: DecisionAction::ContinueLearning,
                reasoning: "Steady progress. Continue with current learning path.".to_string(),
                priority: Priority::Medium,
                suggested_content: "Explore related topics or practice more".to_string(),
            }
        };

        log.record(
            DecisionKind::StrategicPlanning,
            decision.reasoning.clone(),
            decision.action.as_str(),
        );

        decision
    }
}

impl Default for AdaptationEngine {
    fn default() -> Self {
        Self::new(80.0, 60.0)
    }
}
