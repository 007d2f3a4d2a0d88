//! Grid navigator: walk a square grid and collect the item carrying the
//! answer.
//!
//! Every option of the current question is placed on its own cell. The
//! origin `(0, 0)` is where the player starts and never holds an item.
//! Stepping onto a cell collects the first uncollected item there. A wrong
//! item stays collected and does nothing; the correct one scores and, after
//! `advance_delay`, moves the session on with a fresh layout.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::core::{EntityId, Rejection, SessionError};
use crate::engine::{Ctx, Input, MechanicSystem, SessionEvent, Task};
use crate::session::Progress;

/// A cell on the grid. Column `x`, row `y`, origin top-left.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub x: usize,
    pub y: usize,
}

impl GridPos {
    pub const ORIGIN: GridPos = GridPos { x: 0, y: 0 };

    #[must_use]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// One step in `direction`, clamped to a `size x size` grid.
    #[must_use]
    pub fn step(self, direction: Direction, size: usize) -> Self {
        let last = size.saturating_sub(1);
        match direction {
            Direction::Up => Self::new(self.x, self.y.saturating_sub(1)),
            Direction::Down => Self::new(self.x, (self.y + 1).min(last)),
            Direction::Left => Self::new(self.x.saturating_sub(1), self.y),
            Direction::Right => Self::new((self.x + 1).min(last), self.y),
        }
    }
}

impl std::fmt::Display for GridPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// An option placed on the grid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectibleItem {
    pub id: EntityId,
    pub position: GridPos,
    pub value: i64,
    pub collected: bool,
}

/// Player position and the items of the current question.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GridNavigator {
    size: usize,
    player: GridPos,
    items: Vec<CollectibleItem>,
}

impl GridNavigator {
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            size,
            player: GridPos::ORIGIN,
            items: Vec::new(),
        }
    }

    /// Fail if a `size x size` grid cannot hold `items` on distinct cells
    /// away from the origin.
    pub fn check_capacity(size: usize, items: usize) -> Result<(), SessionError> {
        let free_cells = (size * size).saturating_sub(1);
        if items > free_cells {
            return Err(SessionError::GridTooSmall { free_cells, items });
        }
        Ok(())
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    #[must_use]
    pub fn player(&self) -> GridPos {
        self.player
    }

    #[must_use]
    pub fn items(&self) -> &[CollectibleItem] {
        &self.items
    }

    /// Uncollected item on a cell, if any.
    #[must_use]
    pub fn item_at(&self, position: GridPos) -> Option<&CollectibleItem> {
        self.items.iter().find(|i| i.position == position && !i.collected)
    }

    /// Reset the player and scatter the current options on free cells.
    fn place(&mut self, ctx: &mut Ctx<'_>) {
        let mut cells: Vec<GridPos> = (0..self.size)
            .flat_map(|y| (0..self.size).map(move |x| GridPos::new(x, y)))
            .filter(|&cell| cell != GridPos::ORIGIN)
            .collect();
        ctx.rng.shuffle(&mut cells);

        let question = ctx.session.current();
        self.player = GridPos::ORIGIN;
        self.items = question
            .option_values()
            .iter()
            .zip(cells)
            .map(|(&value, position)| CollectibleItem {
                id: ctx.ids.alloc(),
                position,
                value,
                collected: false,
            })
            .collect();
        debug!("placed {} item(s) for question {}", self.items.len(), ctx.session.index());
    }

    fn step(&mut self, direction: Direction, ctx: &mut Ctx<'_>) -> Result<(), Rejection> {
        self.player = self.player.step(direction, self.size);
        ctx.emit(SessionEvent::Moved { position: self.player });

        let player = self.player;
        let Some(item) = self.items.iter_mut().find(|i| i.position == player && !i.collected) else {
            return Ok(());
        };
        item.collected = true;
        let (id, value) = (item.id, item.value);

        let correct = ctx.question().is_correct(value);
        ctx.emit(SessionEvent::Collected { item: id, correct });
        if correct {
            ctx.record(true)?;
            let delay = ctx.config.grid.advance_delay;
            let scope = ctx.question_scope();
            ctx.after(delay, scope, Task::CollectAdvance);
        }
        Ok(())
    }

    fn next(&mut self, ctx: &mut Ctx<'_>) {
        match ctx.advance() {
            Ok(Progress::Next(_)) => self.place(ctx),
            Ok(Progress::Complete(_)) => {}
            Err(rejection) => warn!("collect advance failed: {}", rejection),
        }
    }
}

impl MechanicSystem for GridNavigator {
    fn start(&mut self, ctx: &mut Ctx<'_>) {
        self.place(ctx);
    }

    fn on_task(&mut self, task: &Task, ctx: &mut Ctx<'_>) {
        match task {
            Task::CollectAdvance => self.next(ctx),
            other => warn!("grid navigator ignoring {:?}", other),
        }
    }

    fn handle(&mut self, input: &Input, ctx: &mut Ctx<'_>) -> Result<(), Rejection> {
        match input {
            Input::Move(direction) => self.step(*direction, ctx),
            Input::Advance => Err(Rejection::AdvanceScheduled),
            other => Err(Rejection::Unsupported { input: other.name() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_step_clamps() {
        let origin = GridPos::ORIGIN;
        assert_eq!(origin.step(Direction::Up, 6), origin);
        assert_eq!(origin.step(Direction::Left, 6), origin);
        assert_eq!(origin.step(Direction::Right, 6), GridPos::new(1, 0));
        assert_eq!(origin.step(Direction::Down, 6), GridPos::new(0, 1));

        let corner = GridPos::new(5, 5);
        assert_eq!(corner.step(Direction::Down, 6), corner);
        assert_eq!(corner.step(Direction::Right, 6), corner);
    }

    #[test]
    fn test_check_capacity() {
        assert!(GridNavigator::check_capacity(6, 4).is_ok());
        assert!(GridNavigator::check_capacity(2, 3).is_ok());
        assert_eq!(
            GridNavigator::check_capacity(2, 4),
            Err(SessionError::GridTooSmall { free_cells: 3, items: 4 })
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(GridPos::new(2, 3).to_string(), "(2, 3)");
    }

    fn direction() -> impl Strategy<Value = Direction> {
        prop_oneof![
            Just(Direction::Up),
            Just(Direction::Down),
            Just(Direction::Left),
            Just(Direction::Right),
        ]
    }

    proptest! {
        #[test]
        fn prop_steps_stay_in_bounds(size in 1usize..10, moves in prop::collection::vec(direction(), 0..100)) {
            let mut pos = GridPos::ORIGIN;
            for d in moves {
                let next = pos.step(d, size);
                prop_assert!(next.x < size && next.y < size);
                prop_assert!(next.x.abs_diff(pos.x) + next.y.abs_diff(pos.y) <= 1);
                pos = next;
            }
        }
    }
}
