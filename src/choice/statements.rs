//! True/false statement deck.

use serde::{Deserialize, Serialize};

use crate::core::{ChoiceConfig, GameRng, Question, QuestionSet};

/// One statement to judge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    /// Rendered statement, e.g. `"3 + 4 = 8"`.
    pub equation: String,
    pub answer: i64,
    pub shown: i64,
    /// Computed from `shown == answer`, never from the coin flip, so a
    /// zero offset still yields a true statement.
    pub is_true: bool,
}

impl Statement {
    /// Statement showing `shown` as the result of `question`.
    #[must_use]
    pub fn new(question: &Question, shown: i64) -> Self {
        Self {
            equation: format!("{} = {}", question.display, shown),
            answer: question.answer,
            shown,
            is_true: shown == question.answer,
        }
    }
}

/// Statements for a whole session, one per question, drawn once.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementDeck {
    statements: Vec<Statement>,
}

impl StatementDeck {
    pub fn build(questions: &QuestionSet, config: &ChoiceConfig, rng: &mut GameRng) -> Self {
        let statements = questions
            .iter()
            .map(|question| {
                let shown = if rng.gen_bool(config.true_probability) {
                    question.answer
                } else {
                    let offset = rng.gen_range_i64(config.false_offset_min..=config.false_offset_max);
                    question.answer.saturating_add(offset)
                };
                Statement::new(question, shown)
            })
            .collect();
        Self { statements }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Statement> {
        self.statements.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Statement> {
        self.statements.iter()
    }
}

impl std::ops::Index<usize> for StatementDeck {
    type Output = Statement;

    fn index(&self, index: usize) -> &Statement {
        &self.statements[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn questions() -> QuestionSet {
        QuestionSet::new((1..=20).map(|a| Question::new(format!("{} + 0", a), a)).collect()).unwrap()
    }

    #[test]
    fn test_all_true() {
        let config = ChoiceConfig {
            true_probability: 1.0,
            ..ChoiceConfig::default()
        };
        let deck = StatementDeck::build(&questions(), &config, &mut GameRng::new(1));

        assert_eq!(deck.len(), 20);
        assert!(deck.iter().all(|s| s.is_true && s.shown == s.answer));
        assert_eq!(deck[2].equation, "3 + 0 = 3");
    }

    #[test]
    fn test_false_offsets_stay_in_range() {
        let config = ChoiceConfig {
            true_probability: 0.0,
            ..ChoiceConfig::default()
        };
        let deck = StatementDeck::build(&questions(), &config, &mut GameRng::new(9));

        for s in deck.iter() {
            let offset = s.shown - s.answer;
            assert!((-3..=2).contains(&offset));
            assert_eq!(s.is_true, offset == 0);
        }
    }

    #[test]
    fn test_extreme_answers_saturate() {
        let config = ChoiceConfig {
            true_probability: 0.0,
            ..ChoiceConfig::default()
        };
        let set = QuestionSet::new(vec![
            Question::new("max", i64::MAX),
            Question::new("min", i64::MIN),
            Question::new("max again", i64::MAX - 1),
        ])
        .unwrap();

        for seed in 0..32 {
            let deck = StatementDeck::build(&set, &config, &mut GameRng::new(seed));
            for s in deck.iter() {
                assert_eq!(s.is_true, s.shown == s.answer);
                assert!(s.shown.abs_diff(s.answer) <= 3);
            }
        }
    }

    #[test]
    fn test_deterministic() {
        let config = ChoiceConfig::default();
        let a = StatementDeck::build(&questions(), &config, &mut GameRng::new(5));
        let b = StatementDeck::build(&questions(), &config, &mut GameRng::new(5));
        assert_eq!(a, b);
    }
}
