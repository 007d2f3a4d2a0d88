//! Session controller: per-question progression shared by every template.
//!
//! ## Lifecycle
//!
//! ```text
//! Presenting --submit/record--> Answered --advance--> Presenting (index + 1)
//!                                        \--advance--> Complete (last question)
//! any live phase --conclude--> Complete
//! ```
//!
//! The controller enforces at most one scored submission per question.
//! Extra submissions are rejected, not queued. `Complete` is terminal.
//!
//! ```
//! use math_arcade::core::{Question, QuestionSet};
//! use math_arcade::session::{Progress, SessionController};
//!
//! let questions = QuestionSet::new(vec![Question::new("1 + 1", 2)]).unwrap();
//! let mut session = SessionController::new(questions);
//!
//! assert_eq!(session.submit_answer(2), Ok(true));
//! assert!(matches!(session.advance(), Ok(Progress::Complete(o)) if o.score == 1));
//! ```

mod outcome;

pub use outcome::{Outcome, Rating};

use im::Vector;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::core::{Question, QuestionSet, Rejection};

/// Where the controller is in the current question.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for an answer.
    Presenting,
    /// An answer was accepted; waiting for `advance`.
    Answered { correct: bool },
    /// Terminal.
    Complete,
}

/// Observable session state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub index: usize,
    pub score: usize,
    pub locked: bool,
    pub complete: bool,
}

/// One accepted answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub index: usize,
    pub correct: bool,
}

/// Result of `advance`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Progress {
    /// Moved on to the question at this index.
    Next(usize),
    /// The session is over.
    Complete(Outcome),
}

/// Generic question-progression state machine.
#[derive(Clone, Debug)]
pub struct SessionController {
    questions: QuestionSet,
    rounds: usize,
    index: usize,
    score: usize,
    phase: Phase,
    history: Vector<AnswerRecord>,
}

impl SessionController {
    /// One round per question.
    #[must_use]
    pub fn new(questions: QuestionSet) -> Self {
        let rounds = questions.len();
        Self::with_rounds(questions, rounds)
    }

    /// A fixed number of rounds over the question set.
    ///
    /// Used when a mechanic consumes several questions in one round (the
    /// ordering puzzle). `rounds` is clamped to `1..=questions.len()`.
    #[must_use]
    pub fn with_rounds(questions: QuestionSet, rounds: usize) -> Self {
        let rounds = rounds.clamp(1, questions.len());
        Self {
            questions,
            rounds,
            index: 0,
            score: 0,
            phase: Phase::Presenting,
            history: Vector::new(),
        }
    }

    // === Queries ===

    /// The full question set.
    #[must_use]
    pub fn questions(&self) -> &QuestionSet {
        &self.questions
    }

    /// The question being presented.
    #[must_use]
    pub fn current(&self) -> &Question {
        &self.questions[self.index]
    }

    /// Index of the question being presented.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of rounds (N).
    #[must_use]
    pub fn total(&self) -> usize {
        self.rounds
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }

    /// True once an answer was accepted for the current question.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        !matches!(self.phase, Phase::Presenting)
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.index + 1 == self.rounds
    }

    /// Snapshot of the observable state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        SessionState {
            index: self.index,
            score: self.score,
            locked: self.is_locked(),
            complete: self.is_complete(),
        }
    }

    /// Accepted answers in order.
    #[must_use]
    pub fn history(&self) -> &Vector<AnswerRecord> {
        &self.history
    }

    /// Final result so far.
    #[must_use]
    pub fn outcome(&self) -> Outcome {
        Outcome::new(self.score, self.rounds)
    }

    // === Transitions ===

    /// Submit a numeric answer to the current question.
    ///
    /// Returns whether it was correct.
    pub fn submit_answer(&mut self, value: i64) -> Result<bool, Rejection> {
        let correct = self.current().is_correct(value);
        self.record(correct)?;
        Ok(correct)
    }

    /// Accept an already-judged answer for the current question.
    pub fn record(&mut self, correct: bool) -> Result<(), Rejection> {
        match self.phase {
            Phase::Complete => return Err(Rejection::SessionComplete),
            Phase::Answered { .. } => return Err(Rejection::AlreadyAnswered),
            Phase::Presenting => {}
        }

        self.phase = Phase::Answered { correct };
        if correct {
            self.score += 1;
        }
        self.history.push_back(AnswerRecord {
            index: self.index,
            correct,
        });
        debug!("question {} answered, correct={} score={}", self.index, correct, self.score);
        Ok(())
    }

    /// Move past an answered question.
    pub fn advance(&mut self) -> Result<Progress, Rejection> {
        match self.phase {
            Phase::Complete => Err(Rejection::SessionComplete),
            Phase::Presenting => Err(Rejection::NotAnswered),
            Phase::Answered { .. } if self.is_last() => {
                self.phase = Phase::Complete;
                Ok(Progress::Complete(self.outcome()))
            }
            Phase::Answered { .. } => {
                self.index += 1;
                self.phase = Phase::Presenting;
                debug!("advanced to question {}", self.index);
                Ok(Progress::Next(self.index))
            }
        }
    }

    /// End the session from any phase.
    ///
    /// Returns `None` if it was already complete.
    pub fn conclude(&mut self) -> Option<Outcome> {
        if self.is_complete() {
            return None;
        }
        self.phase = Phase::Complete;
        Some(self.outcome())
    }
}
