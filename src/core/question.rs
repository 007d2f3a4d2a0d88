//! Question records consumed from the question supply.
//!
//! Questions arrive already generated. The engine never inspects how they
//! were built; it only reads `answer`, `options`, and `display`.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::error::SessionError;

/// Candidate answers for one question. Four options is the common case.
pub type Options = SmallVec<[i64; 4]>;

/// One arithmetic question.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Rendered prompt, e.g. `"3 + 4"`.
    pub display: String,

    /// The correct answer.
    pub answer: i64,

    /// Multiple-choice options. Exactly one equals `answer` when present.
    pub options: Option<Options>,
}

impl Question {
    /// Create a question without options.
    pub fn new(display: impl Into<String>, answer: i64) -> Self {
        Self {
            display: display.into(),
            answer,
            options: None,
        }
    }

    /// Attach multiple-choice options.
    #[must_use]
    pub fn with_options(mut self, options: &[i64]) -> Self {
        self.options = Some(SmallVec::from_slice(options));
        self
    }

    /// Options as a slice (empty when absent).
    #[must_use]
    pub fn option_values(&self) -> &[i64] {
        self.options.as_deref().unwrap_or(&[])
    }

    /// Check whether `value` answers this question.
    #[must_use]
    pub fn is_correct(&self, value: i64) -> bool {
        value == self.answer
    }
}

/// Arithmetic operation the supply was configured with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    #[default]
    Addition,
    Subtraction,
    Multiplication,
    Division,
}

/// Settings the question supply was run with.
///
/// Opaque to the engine apart from `question_count`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSettings {
    pub operation: Operation,
    pub min_number: i64,
    pub max_number: i64,
    pub question_count: usize,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            operation: Operation::Addition,
            min_number: 1,
            max_number: 10,
            question_count: 10,
        }
    }
}

/// A validated, non-empty, immutable question sequence.
///
/// Serialized as a plain list; deserializing runs the same validation as
/// [`QuestionSet::new`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Question>", into = "Vec<Question>")]
pub struct QuestionSet {
    questions: Vec<Question>,
}

impl QuestionSet {
    /// Validate a question sequence.
    ///
    /// Fails on an empty sequence or on a question whose options do not
    /// contain the answer exactly once.
    pub fn new(questions: Vec<Question>) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::NoQuestions);
        }

        for (index, question) in questions.iter().enumerate() {
            if let Some(options) = &question.options {
                let hits = options.iter().filter(|&&o| o == question.answer).count();
                if hits != 1 {
                    return Err(SessionError::MalformedOptions { index, hits });
                }
            }
        }

        Ok(Self { questions })
    }

    /// Validate a sequence, keeping at most `settings.question_count`
    /// questions. A count of zero keeps everything.
    pub fn from_supply(mut questions: Vec<Question>, settings: &GameSettings) -> Result<Self, SessionError> {
        if settings.question_count > 0 {
            questions.truncate(settings.question_count);
        }
        Self::new(questions)
    }

    /// Require every question to carry options.
    pub fn require_options(&self) -> Result<(), SessionError> {
        match self.questions.iter().position(|q| q.options.is_none()) {
            Some(index) => Err(SessionError::MissingOptions { index }),
            None => Ok(()),
        }
    }

    /// Number of questions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always false; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Get a question by index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// The largest option count across all questions.
    #[must_use]
    pub fn max_options(&self) -> usize {
        self.questions.iter().map(|q| q.option_values().len()).max().unwrap_or(0)
    }

    /// Iterate over questions in order.
    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }
}

impl TryFrom<Vec<Question>> for QuestionSet {
    type Error = SessionError;

    fn try_from(questions: Vec<Question>) -> Result<Self, SessionError> {
        Self::new(questions)
    }
}

impl From<QuestionSet> for Vec<Question> {
    fn from(set: QuestionSet) -> Self {
        set.questions
    }
}

impl std::ops::Index<usize> for QuestionSet {
    type Output = Question;

    fn index(&self, index: usize) -> &Question {
        &self.questions[index]
    }
}
