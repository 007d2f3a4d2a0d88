//! Mutable view of a running session handed to mechanics.

use log::{debug, info};

use crate::clock::{Scope, TimerId, TimerQueue};
use crate::core::{EngineConfig, EntityAllocator, GameRng, Millis, Question, Rejection};
use crate::session::{Progress, SessionController};

use super::event::{EndReason, SessionEvent};
use super::task::Task;

/// Everything a mechanic may read or mutate while handling an input or a
/// fired task. Built fresh for every call from the `Game`'s fields.
pub struct Ctx<'a> {
    /// Session time of the input or task being handled.
    pub now: Millis,
    pub session: &'a mut SessionController,
    pub timers: &'a mut TimerQueue<Task>,
    pub rng: &'a mut GameRng,
    pub ids: &'a mut EntityAllocator,
    pub config: &'a EngineConfig,
    pub events: &'a mut Vec<SessionEvent>,
}

impl Ctx<'_> {
    /// The question being presented.
    #[must_use]
    pub fn question(&self) -> &Question {
        self.session.current()
    }

    /// Scope of the current question.
    #[must_use]
    pub fn question_scope(&self) -> Scope {
        Scope::Question(self.session.index())
    }

    pub fn emit(&mut self, event: SessionEvent) {
        self.events.push(event);
    }

    /// Schedule a one-shot task.
    pub fn after(&mut self, delay: Millis, scope: Scope, task: Task) -> TimerId {
        self.timers.schedule(self.now, delay, scope, task)
    }

    /// Schedule a periodic task.
    pub fn every(&mut self, period: Millis, scope: Scope, task: Task) -> TimerId {
        self.timers.every(self.now, period, scope, task)
    }

    /// Accept a judged answer and report it.
    pub fn record(&mut self, correct: bool) -> Result<(), Rejection> {
        self.session.record(correct)?;
        self.emit(SessionEvent::Answered {
            index: self.session.index(),
            correct,
            score: self.session.score(),
        });
        Ok(())
    }

    /// Accept a numeric answer and report it.
    pub fn submit(&mut self, value: i64) -> Result<bool, Rejection> {
        let correct = self.question().is_correct(value);
        self.record(correct)?;
        Ok(correct)
    }

    /// Leave the current question.
    ///
    /// Tasks owned by the question are cancelled. On the last question the
    /// session completes and every remaining task is cancelled.
    pub fn advance(&mut self) -> Result<Progress, Rejection> {
        let leaving = self.question_scope();
        let progress = self.session.advance()?;
        self.timers.cancel_scope(leaving);

        match progress {
            Progress::Next(index) => self.emit(SessionEvent::QuestionAdvanced { index }),
            Progress::Complete(_) => self.finish(EndReason::Exhausted),
        }
        Ok(progress)
    }

    /// End the session early. No-op if it is already complete.
    pub fn conclude(&mut self, reason: EndReason) {
        if self.session.conclude().is_some() {
            self.finish(reason);
        } else {
            debug!("conclude({:?}) on a finished session ignored", reason);
        }
    }

    fn finish(&mut self, reason: EndReason) {
        let outcome = self.session.outcome();
        let cancelled = self.timers.cancel_all();
        info!(
            "session complete at {}: {} ({:?}, {} task(s) cancelled)",
            self.now, outcome, reason, cancelled
        );
        self.emit(SessionEvent::Completed { outcome, reason });
    }
}
