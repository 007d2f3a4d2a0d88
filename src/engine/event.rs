//! Events reported upward to the hosting presentation layer.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::core::EntityId;
use crate::grid::GridPos;
use crate::session::Outcome;

/// Why a session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// The last question was resolved.
    Exhausted,
    /// The duration budget ran out.
    TimeUp,
    /// The host left the session.
    Exited,
}

/// How a whack landed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitKind {
    Correct,
    Wrong,
    /// The target was spawned for an earlier question.
    Stale,
}

/// Something the host may want to render or react to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// An answer was accepted for the question at `index`.
    Answered { index: usize, correct: bool, score: usize },
    /// The question at `index` is now current.
    QuestionAdvanced { index: usize },
    Spawned { id: EntityId, slot: usize, value: i64 },
    Expired { id: EntityId, slot: usize },
    Whacked { id: EntityId, slot: usize, hit: HitKind },
    Fired { projectile: EntityId, target: EntityId, origin: Vec2 },
    ShotResolved { plane: EntityId, correct: bool },
    /// A wrong shot's marker was cleared; the question can be retried.
    ShotCleared { plane: EntityId },
    Moved { position: GridPos },
    Collected { item: EntityId, correct: bool },
    OrderChecked { correct: bool },
    /// Delivered exactly once per session.
    Completed { outcome: Outcome, reason: EndReason },
}
