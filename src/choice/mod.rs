//! Option-pick mechanic for the quiz family and true/false.
//!
//! Two modes:
//!
//! - **Manual**: the player picks a numeric option, the host advances when
//!   the player asks for the next question.
//! - **Statements**: each question becomes a statement `"a + b = shown"`
//!   that the player judges; the next question follows automatically
//!   after a feedback pause.

mod statements;

pub use statements::{Statement, StatementDeck};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::core::{ChoiceConfig, GameRng, QuestionSet, Rejection};
use crate::engine::{Ctx, Input, MechanicSystem, Task};

/// What the player picked for the current question.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection {
    Value(i64),
    Verdict(bool),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
enum Mode {
    Manual,
    Statements(StatementDeck),
}

/// Option-pick board.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChoiceBoard {
    mode: Mode,
    selected: Option<Selection>,
}

impl ChoiceBoard {
    /// Board for templates with a "next" button.
    #[must_use]
    pub fn manual() -> Self {
        Self {
            mode: Mode::Manual,
            selected: None,
        }
    }

    /// Board for true/false, with the statement deck drawn up front.
    #[must_use]
    pub fn statements(questions: &QuestionSet, config: &ChoiceConfig, rng: &mut GameRng) -> Self {
        Self {
            mode: Mode::Statements(StatementDeck::build(questions, config, rng)),
            selected: None,
        }
    }

    /// The player's pick for the current question, if any.
    #[must_use]
    pub fn selected(&self) -> Option<Selection> {
        self.selected
    }

    /// Statement deck in true/false mode.
    #[must_use]
    pub fn deck(&self) -> Option<&StatementDeck> {
        match &self.mode {
            Mode::Statements(deck) => Some(deck),
            Mode::Manual => None,
        }
    }

    fn answer(&mut self, value: i64, ctx: &mut Ctx<'_>) -> Result<(), Rejection> {
        if let Mode::Statements(_) = self.mode {
            return Err(Rejection::Unsupported { input: "answer" });
        }
        ctx.submit(value)?;
        self.selected = Some(Selection::Value(value));
        Ok(())
    }

    fn verdict(&mut self, verdict: bool, ctx: &mut Ctx<'_>) -> Result<(), Rejection> {
        let Mode::Statements(deck) = &self.mode else {
            return Err(Rejection::Unsupported { input: "verdict" });
        };
        let statement = &deck[ctx.session.index()];
        ctx.record(verdict == statement.is_true)?;
        self.selected = Some(Selection::Verdict(verdict));

        let delay = ctx.config.choice.feedback_delay;
        let scope = ctx.question_scope();
        ctx.after(delay, scope, Task::FeedbackAdvance);
        Ok(())
    }

    fn next(&mut self, ctx: &mut Ctx<'_>) -> Result<(), Rejection> {
        ctx.advance()?;
        self.selected = None;
        Ok(())
    }
}

impl MechanicSystem for ChoiceBoard {
    fn start(&mut self, _ctx: &mut Ctx<'_>) {}

    fn on_task(&mut self, task: &Task, ctx: &mut Ctx<'_>) {
        if *task == Task::FeedbackAdvance {
            if let Err(rejection) = self.next(ctx) {
                warn!("feedback advance failed: {}", rejection);
            }
        }
    }

    fn handle(&mut self, input: &Input, ctx: &mut Ctx<'_>) -> Result<(), Rejection> {
        match input {
            Input::Answer(value) => self.answer(*value, ctx),
            Input::Verdict(verdict) => self.verdict(*verdict, ctx),
            Input::Advance => match self.mode {
                Mode::Manual => self.next(ctx),
                Mode::Statements(_) => Err(Rejection::AdvanceScheduled),
            },
            other => Err(Rejection::Unsupported { input: other.name() }),
        }
    }
}
