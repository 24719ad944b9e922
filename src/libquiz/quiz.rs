use log::{debug, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Filler text used when the model returns a question with no options at all.
pub const PLACEHOLDER_OPTION: &str = "Error";

/// One generated multiple-choice question. Every field defaults so that
/// records with missing keys still deserialize; the repair step runs before
/// anything is shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub explanation: String,
}

/// Ensures every question has its correct answer listed among its options.
///
/// The model occasionally forgets to include the answer in the choices; when
/// that happens a random option is overwritten with the answer text. Matching
/// is case-sensitive and only trims surrounding whitespace, so a question
/// that already lists its answer verbatim is left untouched. This never
/// fails; it repairs rather than rejects.
pub fn repair_quiz(questions: &mut [QuizQuestion], rng: &mut impl Rng) {
    for (idx, q) in questions.iter_mut().enumerate() {
        let correct = q.answer.trim();

        if q.options.is_empty() {
            warn!(
                "[Repair] Question {} came back without options, synthesizing a set",
                idx + 1
            );
            q.options = vec![
                PLACEHOLDER_OPTION.to_string(),
                PLACEHOLDER_OPTION.to_string(),
                PLACEHOLDER_OPTION.to_string(),
                correct.to_string(),
            ];
            continue;
        }

        if !q.options.iter().any(|opt| opt == correct) {
            let slot = rng.random_range(0..q.options.len());
            warn!(
                "[Repair] Question {}: answer missing from options, overwriting option {}",
                idx + 1,
                slot + 1
            );
            q.options[slot] = correct.to_string();
        }
    }
}

/// Result of checking a user's selection against a question.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Correct,
    Incorrect { answer: String, explanation: String },
    NoSelection,
}

/// The current quiz plus per-question answer state. A session is created
/// wholesale for each generation request and discarded on reset; selections
/// never outlive the quiz they belong to.
#[derive(Debug, Default)]
pub struct Session {
    questions: Vec<QuizQuestion>,
    selections: Vec<Option<usize>>,
}

impl Session {
    pub fn new(questions: Vec<QuizQuestion>) -> Session {
        let count = questions.len();
        debug!("[Session] Starting a fresh session with {} questions", count);
        Session {
            questions,
            selections: vec![None; count],
        }
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn selection(&self, question: usize) -> Option<usize> {
        self.selections.get(question).copied().flatten()
    }

    pub fn select(&mut self, question: usize, option: usize) {
        if let Some(slot) = self.selections.get_mut(question) {
            *slot = Some(option);
        }
    }

    /// Compares the stored selection against the question's answer by exact
    /// text equality.
    pub fn check(&self, question: usize) -> Outcome {
        let q = match self.questions.get(question) {
            Some(q) => q,
            None => return Outcome::NoSelection,
        };
        let picked = match self.selection(question) {
            Some(picked) => picked,
            None => return Outcome::NoSelection,
        };
        match q.options.get(picked) {
            Some(option) if *option == q.answer => Outcome::Correct,
            _ => Outcome::Incorrect {
                answer: q.answer.clone(),
                explanation: q.explanation.clone(),
            },
        }
    }

    /// Number of questions whose current selection is correct.
    pub fn score(&self) -> usize {
        (0..self.questions.len())
            .filter(|idx| self.check(*idx) == Outcome::Correct)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn question(options: &[&str], answer: &str) -> QuizQuestion {
        QuizQuestion {
            question: "Q".to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            answer: answer.to_string(),
            explanation: "because".to_string(),
        }
    }

    #[test]
    fn missing_answer_overwrites_one_option() {
        let mut quiz = vec![question(&["A", "B", "C"], "D")];
        repair_quiz(&mut quiz, &mut StdRng::seed_from_u64(7));
        assert_eq!(quiz[0].options.len(), 3);
        assert_eq!(quiz[0].options.iter().filter(|o| *o == "D").count(), 1);
    }

    #[test]
    fn empty_options_are_synthesized() {
        let mut quiz = vec![question(&[], "X")];
        repair_quiz(&mut quiz, &mut StdRng::seed_from_u64(7));
        assert_eq!(quiz[0].options, vec!["Error", "Error", "Error", "X"]);
    }

    #[test]
    fn empty_options_and_empty_answer() {
        let mut quiz = vec![question(&[], "")];
        repair_quiz(&mut quiz, &mut StdRng::seed_from_u64(7));
        assert_eq!(quiz[0].options, vec!["Error", "Error", "Error", ""]);
    }

    #[test]
    fn valid_question_is_untouched() {
        let mut quiz = vec![question(&["Paris", "London"], "Paris")];
        repair_quiz(&mut quiz, &mut StdRng::seed_from_u64(7));
        assert_eq!(quiz[0].options, vec!["Paris", "London"]);
    }

    #[test]
    fn answer_is_trimmed_before_matching() {
        let mut quiz = vec![question(&["Paris", "London"], "  Paris  ")];
        repair_quiz(&mut quiz, &mut StdRng::seed_from_u64(7));
        // Trimmed answer already matches, so the distractor survives.
        assert_eq!(quiz[0].options, vec!["Paris", "London"]);
    }

    #[test]
    fn matching_stays_case_sensitive() {
        let mut quiz = vec![question(&["Paris", "London"], "paris")];
        repair_quiz(&mut quiz, &mut StdRng::seed_from_u64(7));
        assert_eq!(quiz[0].options.len(), 2);
        assert!(quiz[0].options.contains(&"paris".to_string()));
    }

    #[test]
    fn repair_is_idempotent() {
        let mut quiz = vec![
            question(&["A", "B", "C"], "D"),
            question(&[], "X"),
            question(&["Paris", "London"], "Paris"),
        ];
        repair_quiz(&mut quiz, &mut StdRng::seed_from_u64(42));
        let once = quiz.clone();
        repair_quiz(&mut quiz, &mut StdRng::seed_from_u64(1234));
        assert_eq!(quiz, once);
    }

    #[test]
    fn repair_is_deterministic_under_a_seed() {
        let mut first = vec![question(&["A", "B", "C", "D"], "E")];
        let mut second = first.clone();
        repair_quiz(&mut first, &mut StdRng::seed_from_u64(99));
        repair_quiz(&mut second, &mut StdRng::seed_from_u64(99));
        assert_eq!(first, second);
    }

    #[test]
    fn checking_the_correct_selection() {
        let mut session = Session::new(vec![question(&["Paris", "London"], "Paris")]);
        session.select(0, 0);
        assert_eq!(session.check(0), Outcome::Correct);
        assert_eq!(session.score(), 1);
    }

    #[test]
    fn checking_a_wrong_selection_surfaces_the_explanation() {
        let mut session = Session::new(vec![question(&["Paris", "London"], "Paris")]);
        session.select(0, 1);
        assert_eq!(
            session.check(0),
            Outcome::Incorrect {
                answer: "Paris".to_string(),
                explanation: "because".to_string(),
            }
        );
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn checking_without_a_selection() {
        let session = Session::new(vec![question(&["Paris", "London"], "Paris")]);
        assert_eq!(session.check(0), Outcome::NoSelection);
    }

    #[test]
    fn a_new_session_starts_with_no_selections() {
        let mut old = Session::new(vec![question(&["A", "B"], "A")]);
        old.select(0, 0);
        let fresh = Session::new(old.questions().to_vec());
        assert_eq!(fresh.selection(0), None);
        assert_eq!(fresh.score(), 0);
    }

    #[test]
    fn records_with_missing_fields_deserialize_to_defaults() {
        let q: QuizQuestion = serde_json::from_str(r#"{"options":[],"answer":"X"}"#).unwrap();
        assert_eq!(q.question, "");
        assert_eq!(q.options, Vec::<String>::new());
        assert_eq!(q.answer, "X");
        assert_eq!(q.explanation, "");
    }
}
