//! Final score reporting.

use serde::{Deserialize, Serialize};

/// Final score of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub score: usize,
    pub total: usize,
}

/// Feedback band for a finished session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rating {
    Perfect,
    Great,
    KeepPracticing,
}

impl Outcome {
    #[must_use]
    pub const fn new(score: usize, total: usize) -> Self {
        Self { score, total }
    }

    /// Fraction of rounds answered correctly.
    #[must_use]
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.score as f64 / self.total as f64
    }

    /// Perfect at full marks, great at 70% or more.
    #[must_use]
    pub fn rating(&self) -> Rating {
        if self.score >= self.total {
            Rating::Perfect
        } else if self.score as f64 >= self.total as f64 * 0.7 {
            Rating::Great
        } else {
            Rating::KeepPracticing
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.score, self.total)
    }
}
