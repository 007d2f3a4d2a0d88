//! Spawn scheduler: timed-reveal targets with a concurrency cap.
//!
//! ## Timers
//!
//! - `SpawnTick` every `tick`: if fewer than `max_visible` slots are showing,
//!   reveal one random hidden slot.
//! - `HideEntity` once per spawn, `visible_for` after it appeared.
//! - `SessionBudget` once, when the duration budget runs out.
//!
//! All three live in the session scope. Visible targets outlive a question
//! change on purpose: a target revealed for question `i` stays on the board
//! after the player moves to `i + 1`, and hitting it then is reported as
//! stale without scoring.
//!
//! A whack and an expiry can race. Whichever runs first hides the target;
//! the other finds it already hidden (or finds a different spawn in the
//! slot) and does nothing.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::clock::Scope;
use crate::core::{EntityId, Millis, Rejection, SpawnConfig};
use crate::engine::{Ctx, EndReason, HitKind, Input, MechanicSystem, SessionEvent, Task};

/// A revealed target.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnEntity {
    pub id: EntityId,
    pub slot: usize,
    pub value: i64,
    /// Fixed at creation.
    pub is_correct: bool,
    pub visible: bool,
    pub created_at: Millis,
    /// Question index that was current when it spawned.
    pub question: usize,
}

/// Board of slots and the targets shown in them.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SpawnScheduler {
    /// Last spawn per slot; `None` until a slot is first used.
    slots: Vec<Option<SpawnEntity>>,
    started_at: Millis,
}

impl SpawnScheduler {
    /// Create an empty board.
    #[must_use]
    pub fn new(slots: usize) -> Self {
        Self {
            slots: vec![None; slots],
            started_at: Millis::ZERO,
        }
    }

    /// Number of slots.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Whatever last spawned in a slot.
    #[must_use]
    pub fn slot(&self, slot: usize) -> Option<&SpawnEntity> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    /// Targets currently showing.
    pub fn visible(&self) -> impl Iterator<Item = &SpawnEntity> {
        self.slots.iter().flatten().filter(|e| e.visible)
    }

    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.visible().count()
    }

    /// Time left in the session budget.
    #[must_use]
    pub fn time_left(&self, now: Millis, config: &SpawnConfig) -> Millis {
        (self.started_at + config.session_budget).saturating_sub(now)
    }

    fn is_showing(&self, slot: usize) -> bool {
        self.slot(slot).is_some_and(|e| e.visible)
    }

    fn spawn(&mut self, ctx: &mut Ctx<'_>) {
        let config = &ctx.config.spawn;
        if self.visible_count() >= config.max_visible {
            return;
        }

        let hidden: Vec<usize> = (0..self.slots.len()).filter(|&s| !self.is_showing(s)).collect();
        let Some(&slot) = ctx.rng.choose(&hidden) else {
            return;
        };

        let question = ctx.session.current();
        let answer = question.answer;
        let value = if ctx.rng.gen_bool(config.correct_probability) {
            answer
        } else {
            let distractors: Vec<i64> = question.option_values().iter().copied().filter(|&o| o != answer).collect();
            ctx.rng.choose(&distractors).copied().unwrap_or(answer)
        };

        let entity = SpawnEntity {
            id: ctx.ids.alloc(),
            slot,
            value,
            is_correct: value == answer,
            visible: true,
            created_at: ctx.now,
            question: ctx.session.index(),
        };
        let id = entity.id;
        self.slots[slot] = Some(entity);

        let visible_for = config.visible_for;
        ctx.after(visible_for, Scope::Session, Task::HideEntity { id });
        ctx.emit(SessionEvent::Spawned { id, slot, value });
    }

    fn expire(&mut self, id: EntityId, ctx: &mut Ctx<'_>) {
        let Some(entity) = self.slots.iter_mut().flatten().find(|e| e.id == id) else {
            return;
        };
        if entity.visible {
            entity.visible = false;
            let slot = entity.slot;
            ctx.emit(SessionEvent::Expired { id, slot });
        }
    }

    fn whack(&mut self, slot: usize, ctx: &mut Ctx<'_>) -> Result<(), Rejection> {
        let live_index = ctx.session.index();
        let entity = self
            .slots
            .get_mut(slot)
            .ok_or(Rejection::SlotOutOfRange { slot })?
            .as_mut()
            .filter(|e| e.visible)
            .ok_or(Rejection::SlotEmpty { slot })?;

        entity.visible = false;
        let id = entity.id;
        let hit = if entity.question != live_index {
            HitKind::Stale
        } else if entity.is_correct {
            HitKind::Correct
        } else {
            HitKind::Wrong
        };
        ctx.emit(SessionEvent::Whacked { id, slot, hit });

        if hit == HitKind::Correct {
            ctx.record(true)?;
            ctx.advance()?;
        } else {
            debug!("whack on {} in slot {} scored nothing ({:?})", id, slot, hit);
        }
        Ok(())
    }
}

impl MechanicSystem for SpawnScheduler {
    fn start(&mut self, ctx: &mut Ctx<'_>) {
        self.started_at = ctx.now;
        let (tick, budget) = (ctx.config.spawn.tick, ctx.config.spawn.session_budget);
        ctx.every(tick, Scope::Session, Task::SpawnTick);
        ctx.after(budget, Scope::Session, Task::SessionBudget);
    }

    fn on_task(&mut self, task: &Task, ctx: &mut Ctx<'_>) {
        match task {
            Task::SpawnTick => self.spawn(ctx),
            Task::HideEntity { id } => self.expire(*id, ctx),
            Task::SessionBudget => ctx.conclude(EndReason::TimeUp),
            other => warn!("spawn scheduler ignoring {:?}", other),
        }
    }

    fn handle(&mut self, input: &Input, ctx: &mut Ctx<'_>) -> Result<(), Rejection> {
        match input {
            Input::Whack { slot } => self.whack(*slot, ctx),
            Input::Advance => Err(Rejection::AdvanceScheduled),
            other => Err(Rejection::Unsupported { input: other.name() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board_is_empty() {
        let board = SpawnScheduler::new(9);
        assert_eq!(board.slot_count(), 9);
        assert_eq!(board.visible_count(), 0);
        assert!(board.slot(3).is_none());
        assert!(board.slot(42).is_none());
    }

    #[test]
    fn test_time_left() {
        let board = SpawnScheduler::new(9);
        let config = SpawnConfig::default();
        assert_eq!(board.time_left(Millis(0), &config), Millis(30_000));
        assert_eq!(board.time_left(Millis(29_500), &config), Millis(500));
        assert_eq!(board.time_left(Millis(40_000), &config), Millis::ZERO);
    }
}
