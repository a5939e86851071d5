//! Prompt templates and optional TOML overrides.
//!
//! Every model call renders one of these templates with `fill_template`.
//! Defaults cover the full tutoring flow; operators can override them via
//! TUTOR_CONFIG_PATH if they need to tune tone or structure.

use serde::Deserialize;
use tracing::{error, info};

#[derive(Clone, Debug, Deserialize, Default)]
pub struct TutorConfig {
    #[serde(default)]
    pub prompts: Prompts,
}

/// Prompts used by the Gemini client. Placeholders like `{content}` are
/// substituted at call time. A TOML override may name any subset of the
/// fields; the rest keep their defaults.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Prompts {
    pub analyze_content: String,
    pub translate_explain: String,
    pub quiz: String,
    pub clarify_doubt: String,
    pub image_explain: String,
    pub practice_exercises: String,
    pub answer_review: String,
    pub next_topic: String,
    pub summary: String,
}

impl Default for Prompts {
    fn default() -> Self {
        Self {
            analyze_content: r#"You are an autonomous educational AI agent. Analyze this content and create a comprehensive learning plan.

Content Type: {content_type}
Content: {content}

Your task (think step-by-step):
1. Identify the main concepts and difficulty level
2. Determine prerequisite knowledge needed
3. Plan a learning sequence
4. Identify potential confusion points for non-English speakers
5. Suggest multimodal teaching strategies

Respond in JSON format with:
{
    "main_topic": "topic name",
    "difficulty_level": "beginner/intermediate/advanced",
    "key_concepts": ["concept1", "concept2"],
    "prerequisites": ["prereq1", "prereq2"],
    "learning_plan": ["step1", "step2", "step3"],
    "confusion_points": ["point1", "point2"],
    "teaching_strategy": "recommended approach"
}
"#.into(),
            translate_explain: r#"You are an educational AI agent helping students learn in their native language.

Original Content: {content}
Content Analysis: {analysis}
Target Language: {language}

CRITICAL: Write your ENTIRE response in {language} ONLY. Do NOT mix English and {language}. Every word, every sentence must be in {language}.

Your autonomous task:
1. Translate the content completely to {language}
2. Add explanations for difficult concepts using local examples
3. Include cultural context where relevant
4. Use simple language appropriate for the difficulty level
5. Add visual/metaphorical descriptions

Write everything in {language}. Section headings, explanations, examples - everything must be in {language}.
"#.into(),
            quiz: r#"Create an interactive multiple choice quiz in {language} based on this content.

Content: {content}
Difficulty: {difficulty}

Generate 5 multiple choice questions with 4 options each.

For each question, provide:
- Question in {language}
- Four options (A, B, C, D)
- Correct answer (A, B, C, or D)
- Explanation in {language}

Make questions progressively challenging and test different aspects of understanding.

Return as JSON array:
[
    {
        "type": "mcq",
        "question": "...",
        "options": ["Option A text", "Option B text", "Option C text", "Option D text"],
        "correct": "Option A text",
        "explanation": "..."
    }
]
"#.into(),
            clarify_doubt: r#"You are a patient tutor helping a student who is learning in {language}.

Context: {context}
Student's Question: {question}
Student Profile: {profile}

Your autonomous response should:
1. Understand the core confusion
2. Provide a clear explanation in {language}
3. Use analogies from daily life
4. Break down complex ideas into simple steps
5. Ask follow-up questions to ensure understanding
6. Suggest related practice exercises

Respond conversationally in {language}.
"#.into(),
            image_explain: r#"You are an educational AI assistant. Analyze this educational image and explain it COMPLETELY and ONLY in {language}.

Additional Context: {context}

CRITICAL INSTRUCTION: Your ENTIRE response must be ONLY in {language}. Do NOT use ANY English words. NO English headings, NO English structure, NO English at all. Everything - headings, subheadings, explanations, examples - must be in {language}.

Your task (all in {language}):
1. Describe what you see in the image
2. Explain the educational concept in detail
3. Translate English text from the image to {language}
4. Provide real-world examples
5. Memory tips

Write in simple, clear {language} that students can easily understand. DO NOT mix with English. Every single word must be in {language}.
"#.into(),
            practice_exercises: r#"Create 5 practice exercises for:
Topic: {topic}
Difficulty: {difficulty}
Language: {language}

Exercises should be:
1. Progressively challenging
2. Real-world applicable
3. Explained in simple {language}

Format as a numbered list with detailed instructions.
"#.into(),
            answer_review: r#"Analyze student's performance and adapt the learning path.

Student Response: {student_response}
Correct Answer: {correct_answer}
Student Profile: {profile}

Determine:
1. Is the answer correct?
2. What misconception does the student have (if any)?
3. Should we move forward or review?
4. What additional resources are needed?
5. Update difficulty level

Respond in JSON:
{
    "is_correct": true/false,
    "misconception": "identified issue",
    "next_action": "move_forward/review/deep_dive",
    "recommended_difficulty": "beginner/intermediate/advanced",
    "additional_topics": ["topic1", "topic2"]
}
"#.into(),
            next_topic: r#"Based on the student's learning profile and current topic, suggest the next logical topic to study.

Current Topic: {current_topic}
Student Level: {level}
Topics Covered: {topics}
Weak Areas: {weak_areas}

Suggest the next topic that:
1. Builds on current knowledge
2. Addresses weak areas if any
3. Matches current difficulty level
4. Maintains engagement

Respond with just the topic name in {language}.
"#.into(),
            summary: r#"Create a structured summary in {language}:

Content: {content}

Include:
1. Key Points - bullet points
2. Memory Tips
3. Practical Examples
4. Next Steps

Write every heading and every line in {language}. Make it visually structured with emojis and formatting.
"#.into(),
        }
    }
}

/// Substitute `{key}` placeholders in a template. Unknown placeholders are
/// left untouched, which keeps JSON skeletons inside prompts intact.
pub fn fill_template(tpl: &str, vars: &[(&str, &str)]) -> String {
    let mut out = tpl.to_string();
    for (k, v) in vars {
        out = out.replace(&format!("{{{}}}", k), v);
    }
    out
}

/// Attempt to load `TutorConfig` from TUTOR_CONFIG_PATH. On any parsing or
/// IO error, returns None and the built-in defaults stay in effect.
pub fn load_tutor_config_from_env() -> Option<TutorConfig> {
    let path = std::env::var("TUTOR_CONFIG_PATH").ok()?;
    match std::fs::read_to_string(&path) {
        Ok(s) => match toml::from_str::<TutorConfig>(&s) {
            Ok(cfg) => {
                info!(%path, "Loaded tutor config (TOML)");
                Some(cfg)
            }
            Err(e) => {
                error!(%path, error = %e, "Failed to parse TOML config");
                None
            }
        },
        Err(e) => {
            error!(%path, error = %e, "Failed to read TOML config file");
            None
        }
    }
}
