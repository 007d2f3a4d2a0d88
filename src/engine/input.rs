//! User interactions.

use serde::{Deserialize, Serialize};

use crate::core::EntityId;
use crate::grid::Direction;

/// One user interaction. Each mechanic accepts a subset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Input {
    /// Pick a numeric option.
    Answer(i64),
    /// Judge a true/false statement.
    Verdict(bool),
    /// Go to the next question after answering.
    Advance,
    /// Hit whatever is in a spawn slot.
    Whack { slot: usize },
    /// Shoot at a plane.
    Fire { plane: EntityId },
    /// Step one cell.
    Move(Direction),
    /// Replace the live order with a permutation of it.
    Reorder(Vec<EntityId>),
    /// Drag the item at `from` to position `to`.
    MoveItem { from: usize, to: usize },
    /// Validate the live order.
    Check,
}

impl Input {
    /// Short name for logs and rejections.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Input::Answer(_) => "answer",
            Input::Verdict(_) => "verdict",
            Input::Advance => "advance",
            Input::Whack { .. } => "whack",
            Input::Fire { .. } => "fire",
            Input::Move(_) => "move",
            Input::Reorder(_) => "reorder",
            Input::MoveItem { .. } => "move item",
            Input::Check => "check",
        }
    }
}
