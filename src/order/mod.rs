//! Order validator: arrange a shuffled list by ascending value.
//!
//! The puzzle is built once from the first `sample_size` questions and
//! scored as a single round. The live sequence only changes through
//! [`Input::Reorder`] and [`Input::MoveItem`]; nothing else touches it.
//! A correct check freezes the list, and the session completes once
//! `settle_delay` has passed.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::core::{EntityId, Rejection};
use crate::engine::{Ctx, Input, MechanicSystem, SessionEvent, Task};

/// One question as a rankable item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankItem {
    pub id: EntityId,
    pub display: String,
    pub value: i64,
}

/// Result of a check.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckReport {
    pub correct: bool,
    /// Whether each position holds the item the reference order puts there.
    pub positions: Vec<bool>,
}

/// Ids sorted by ascending value. Ties keep their current relative order.
#[must_use]
pub fn reference_order(items: &[RankItem]) -> Vec<EntityId> {
    let mut sorted: Vec<&RankItem> = items.iter().collect();
    sorted.sort_by_key(|item| item.value);
    sorted.into_iter().map(|item| item.id).collect()
}

/// Compare a sequence against its reference order position by position.
#[must_use]
pub fn check_order(items: &[RankItem]) -> CheckReport {
    let positions: Vec<bool> = items
        .iter()
        .zip(reference_order(items))
        .map(|(item, expected)| item.id == expected)
        .collect();
    CheckReport {
        correct: positions.iter().all(|&ok| ok),
        positions,
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct OrderValidator {
    items: Vec<RankItem>,
    last_check: Option<CheckReport>,
    settled: bool,
}

impl OrderValidator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Items in their current order.
    #[must_use]
    pub fn items(&self) -> &[RankItem] {
        &self.items
    }

    #[must_use]
    pub fn ids(&self) -> Vec<EntityId> {
        self.items.iter().map(|item| item.id).collect()
    }

    /// Report of the last check, cleared by any reorder.
    #[must_use]
    pub fn last_check(&self) -> Option<&CheckReport> {
        self.last_check.as_ref()
    }

    /// True once a check succeeded.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// Replace the live order with a permutation of the current ids.
    pub fn reorder(&mut self, ids: &[EntityId]) -> Result<(), Rejection> {
        if self.settled {
            return Err(Rejection::OrderSettled);
        }
        if ids.len() != self.items.len() {
            return Err(Rejection::InvalidPermutation);
        }

        let mut pool: Vec<Option<RankItem>> = self.items.iter().cloned().map(Some).collect();
        let mut reordered = Vec::with_capacity(ids.len());
        for id in ids {
            let item = pool
                .iter_mut()
                .find(|slot| slot.as_ref().is_some_and(|item| item.id == *id))
                .and_then(Option::take)
                .ok_or(Rejection::InvalidPermutation)?;
            reordered.push(item);
        }

        self.items = reordered;
        self.last_check = None;
        Ok(())
    }

    /// Move the item at `from` so it ends up at `to`.
    pub fn move_item(&mut self, from: usize, to: usize) -> Result<(), Rejection> {
        if self.settled {
            return Err(Rejection::OrderSettled);
        }
        let len = self.items.len();
        for index in [from, to] {
            if index >= len {
                return Err(Rejection::PositionOutOfRange { index, len });
            }
        }

        let item = self.items.remove(from);
        self.items.insert(to, item);
        self.last_check = None;
        Ok(())
    }

    /// Check the live order.
    pub fn check(&mut self) -> Result<CheckReport, Rejection> {
        if self.settled {
            return Err(Rejection::OrderSettled);
        }
        let report = check_order(&self.items);
        self.settled = report.correct;
        self.last_check = Some(report.clone());
        Ok(report)
    }

    fn submit(&mut self, ctx: &mut Ctx<'_>) -> Result<(), Rejection> {
        let report = self.check()?;
        debug!(
            "order check: {}/{} in place",
            report.positions.iter().filter(|&&ok| ok).count(),
            report.positions.len()
        );
        ctx.emit(SessionEvent::OrderChecked { correct: report.correct });

        if report.correct {
            ctx.record(true)?;
            let delay = ctx.config.order.settle_delay;
            let scope = ctx.question_scope();
            ctx.after(delay, scope, Task::OrderSettled);
        }
        Ok(())
    }
}

impl MechanicSystem for OrderValidator {
    fn start(&mut self, ctx: &mut Ctx<'_>) {
        let sample = ctx.config.order.sample_size;
        let mut items: Vec<RankItem> = ctx
            .session
            .questions()
            .iter()
            .take(sample)
            .map(|question| RankItem {
                id: ctx.ids.alloc(),
                display: question.display.clone(),
                value: question.answer,
            })
            .collect();
        ctx.rng.shuffle(&mut items);

        self.items = items;
        self.last_check = None;
        self.settled = false;
    }

    fn on_task(&mut self, task: &Task, ctx: &mut Ctx<'_>) {
        match task {
            Task::OrderSettled => {
                if let Err(rejection) = ctx.advance() {
                    warn!("order settle failed: {}", rejection);
                }
            }
            other => warn!("order validator ignoring {:?}", other),
        }
    }

    fn handle(&mut self, input: &Input, ctx: &mut Ctx<'_>) -> Result<(), Rejection> {
        match input {
            Input::Reorder(ids) => self.reorder(ids),
            Input::MoveItem { from, to } => self.move_item(*from, *to),
            Input::Check => self.submit(ctx),
            Input::Advance => Err(Rejection::AdvanceScheduled),
            other => Err(Rejection::Unsupported { input: other.name() }),
        }
    }
}
