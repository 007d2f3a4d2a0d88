//! Scheduled task payloads.
//!
//! Tasks carry only ids and flags. The handler looks up the live entity
//! when the task fires, so nothing scheduled can act on a stale copy.

use serde::{Deserialize, Serialize};

use crate::core::EntityId;

/// Every kind of deferred work a mechanic schedules.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Task {
    /// Timed-reveal session ran out of time.
    SessionBudget,
    /// Periodic spawn attempt.
    SpawnTick,
    /// A spawned entity's visible window closed.
    HideEntity { id: EntityId },
    /// Periodic plane motion.
    PlaneTick,
    /// Periodic projectile motion.
    ProjectileTick,
    /// Phase 1 of a shot: the hit is decided.
    ShotLands { plane: EntityId },
    /// Phase 2 of a shot: advance or clear the marker.
    ShotSettles { plane: EntityId, correct: bool },
    /// The correct grid item was collected; move on.
    CollectAdvance,
    /// True/false feedback pause is over; move on.
    FeedbackAdvance,
    /// A correct order has been on display long enough.
    OrderSettled,
}
