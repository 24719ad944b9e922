use clap::ValueEnum;
use log::{debug, error};
use rand::rng;
use serde_json::{json, Value};
use std::fmt;
use thiserror::Error;

use super::config::Config;
use super::quiz::{repair_quiz, QuizQuestion};

const SYSTEM_MESSAGE: &str = "You are a helpful assistant that outputs strict JSON.";

/// Coarse difficulty hint forwarded into the prompt. Nothing downstream
/// enforces it; the model is trusted to follow the instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "Easy"),
            Difficulty::Medium => write!(f, "Medium"),
            Difficulty::Hard => write!(f, "Hard"),
        }
    }
}

impl Difficulty {
    fn instructions(&self) -> &'static str {
        match self {
            Difficulty::Easy => {
                "Blank out a keyword in a statement of the user text and use the keyword as \
                 the answer. Alternatively, generate \"fill in the blank\" problems. \
                 Example: \"The _____ is the powerhouse of the cell\"."
            }
            Difficulty::Medium => {
                "Phrase a problem based on a statement in the user text without including \
                 the answer. Or: ask what a keyword in the user text means, and use \
                 descriptions of keywords as answer choices."
            }
            Difficulty::Hard => "Any style, including answers that require calculations.",
        }
    }
}

#[derive(Debug, Error)]
pub enum AgentError {
    /// Transport-level failure before any response arrived.
    #[error("Could not connect to the model endpoint. Is it running?")]
    Connect(#[source] Box<ureq::Error>),
    /// The model replied, but not with parseable JSON.
    #[error("The model failed to return valid JSON. Try again.")]
    BadJson(#[source] serde_json::Error),
    /// The output parsed as JSON but carried no `quiz` array.
    #[error("The model output had no quiz in it. Try again.")]
    MissingQuiz,
    /// The response envelope had no message content to read.
    #[error("The model response had no usable content.")]
    MissingContent,
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// Builds the teacher-AI prompt that pins the exact JSON shape the rest of
/// the pipeline expects.
pub fn build_prompt(text: &str, question_count: u32, difficulty: Difficulty) -> String {
    format!(
        r#"You are a Teacher AI. Your goal is to generate a quiz based on the user's text.

Instructions:
1. Create {question_count} multiple-choice questions based on the text below.
2. Difficulty Level: {difficulty}.
2-1. Based on the given difficulty level, generate questions as follows: {hint}

3. You must output ONLY a raw JSON object as indicated by the following structure. Do not add markdown formatting like ```json.

Required JSON Structure:
{{"quiz": [
    {{
        "question": "The question text",
        "options": ["Option A", "Option B", "Option C", "Option D"],
        "answer": "The exact text of the correct option",
        "explanation": "A short explanation of why it is correct. If the answer is factual information, use verified facts outside the given text as reference if possible."
    }}
]}}

User Text:
"{text}"

4. Additional instructions for generating answers:
If the answer is a numeric value, make sure it follows a number format like 987,654,321.12345.
If the answer has a unit, make sure the other choices have the same unit.
"#,
        hint = difficulty.instructions(),
    )
}

/// Sends one blocking generation request and returns the repaired quiz.
///
/// A single attempt is made; there is no retry, backoff or timeout policy.
/// Every failure mode collapses into an [`AgentError`] whose display string
/// is meant for the user, so front ends show it instead of propagating.
pub fn generate_quiz(
    config: &Config,
    text: &str,
    question_count: u32,
    difficulty: Difficulty,
) -> Result<Vec<QuizQuestion>, AgentError> {
    let prompt = build_prompt(text, question_count, difficulty);
    let payload = json!({
        "model": config.model,
        "messages": [
            { "role": "system", "content": SYSTEM_MESSAGE },
            { "role": "user", "content": prompt },
        ],
        // Forces the model to emit valid JSON and the whole response at once.
        "format": "json",
        "stream": false,
    });

    debug!(
        "[Agent] Requesting {} {} questions from {}",
        question_count, difficulty, config.endpoint
    );
    let response = ureq::post(&config.endpoint)
        .set("Authorization", &format!("Bearer {}", config.api_key))
        .send_json(payload)
        .map_err(|err| match err {
            ureq::Error::Status(code, _) => {
                error!("[Agent] Endpoint answered with status {}", code);
                AgentError::Unexpected(format!("the model endpoint returned status {code}"))
            }
            transport => AgentError::Connect(Box::new(transport)),
        })?;

    let body: Value = response
        .into_json()
        .map_err(|err| AgentError::Unexpected(err.to_string()))?;
    let content = body
        .get("message")
        .and_then(|message| message.get("content"))
        .and_then(Value::as_str)
        .ok_or(AgentError::MissingContent)?;
    debug!("[Agent] Raw model output: {}", content);

    let mut questions = parse_quiz(content)?;
    repair_quiz(&mut questions, &mut rng());
    debug!("[Agent] Parsed and repaired {} questions", questions.len());
    Ok(questions)
}

/// Strips markdown code fences the model sometimes adds despite the prompt,
/// then pulls the `quiz` array out of the JSON.
fn parse_quiz(content: &str) -> Result<Vec<QuizQuestion>, AgentError> {
    let cleaned = content.replace("```json", "").replace("```", "");
    let parsed: Value = serde_json::from_str(cleaned.trim()).map_err(AgentError::BadJson)?;
    let quiz = parsed.get("quiz").ok_or(AgentError::MissingQuiz)?;
    serde_json::from_value(quiz.clone()).map_err(AgentError::BadJson)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_plain_quiz_object() {
        let content = r#"{"quiz": [{"question": "Q1", "options": ["A", "B"], "answer": "A", "explanation": "E"}]}"#;
        let quiz = parse_quiz(content).unwrap();
        assert_eq!(quiz.len(), 1);
        assert_eq!(quiz[0].question, "Q1");
        assert_eq!(quiz[0].options, vec!["A", "B"]);
        assert_eq!(quiz[0].answer, "A");
    }

    #[test]
    fn strips_markdown_fences() {
        let content = "```json\n{\"quiz\": [{\"question\": \"Q\", \"options\": [], \"answer\": \"X\", \"explanation\": \"\"}]}\n```";
        let quiz = parse_quiz(content).unwrap();
        assert_eq!(quiz.len(), 1);
        assert_eq!(quiz[0].answer, "X");
    }

    #[test]
    fn tolerates_missing_fields() {
        let content = r#"{"quiz": [{"answer": "X"}]}"#;
        let quiz = parse_quiz(content).unwrap();
        assert_eq!(quiz[0].question, "");
        assert!(quiz[0].options.is_empty());
    }

    #[test]
    fn rejects_non_json_output() {
        assert!(matches!(
            parse_quiz("I'm sorry, I cannot do that."),
            Err(AgentError::BadJson(_))
        ));
    }

    #[test]
    fn rejects_json_without_a_quiz_array() {
        assert!(matches!(
            parse_quiz(r#"{"questions": []}"#),
            Err(AgentError::MissingQuiz)
        ));
    }

    #[test]
    fn prompt_carries_the_settings_and_text() {
        let prompt = build_prompt("The mitochondria is the powerhouse.", 4, Difficulty::Hard);
        assert!(prompt.contains("Create 4 multiple-choice questions"));
        assert!(prompt.contains("Difficulty Level: Hard"));
        assert!(prompt.contains("The mitochondria is the powerhouse."));
        assert!(prompt.contains("\"quiz\""));
    }

    #[test]
    fn difficulty_round_trips_through_clap_values() {
        for (variant, name) in [
            (Difficulty::Easy, "easy"),
            (Difficulty::Medium, "medium"),
            (Difficulty::Hard, "hard"),
        ] {
            let parsed = Difficulty::from_str(name, true).unwrap();
            assert_eq!(parsed, variant);
        }
        assert_eq!(Difficulty::Medium.to_string(), "Medium");
    }
}
