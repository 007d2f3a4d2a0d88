//! # math-arcade
//!
//! Session and interaction engine for arithmetic practice games.
//!
//! ## Design Principles
//!
//! 1. **Host-Driven Time**: The engine never reads a wall clock. The host
//!    passes the current session time to every call and all timers are
//!    tasks in one queue.
//!
//! 2. **One Controller, Many Mechanics**: Every template shares the same
//!    question progression. A template only picks the interaction mechanic
//!    that feeds it answers.
//!
//! 3. **Reject, Don't Queue**: Inputs that arrive at the wrong moment are
//!    rejected with a reason and leave state untouched.
//!
//! ## Architecture
//!
//! - **Scoped Timers**: Tasks belong to the session or to one question.
//!   Leaving a question cancels its tasks; completion cancels everything.
//!
//! - **Fresh Reads**: Tasks carry ids, never snapshots. A fired task looks
//!   up the live state it acts on.
//!
//! - **Deterministic**: All randomness flows through a seeded `GameRng`,
//!   so a seed plus an input log replays a session exactly.
//!
//! ## Modules
//!
//! - `core`: Questions, ids, time, RNG, configuration, errors
//! - `session`: Question progression and outcome
//! - `clock`: Scoped timer queue
//! - `engine`: `Game`, inputs, events and the `MechanicSystem` trait
//! - `templates`: The ten templates and their mechanics
//! - `choice`, `spawn`, `motion`, `grid`, `order`: The mechanics

pub mod core;
pub mod session;
pub mod clock;
pub mod engine;
pub mod templates;
pub mod choice;
pub mod spawn;
pub mod motion;
pub mod grid;
pub mod order;

// Re-export commonly used types
pub use crate::core::{
    EntityId, Millis, Question, QuestionSet, GameSettings, Operation,
    GameRng, GameRngState,
    EngineConfig, SpawnConfig, MotionConfig, GridConfig, OrderConfig, ChoiceConfig,
    Rejection, SessionError,
};

pub use crate::session::{SessionController, SessionState, Phase, Progress, Outcome, Rating};

pub use crate::clock::{Scope, TimerId, TimerQueue};

pub use crate::engine::{Game, GameSnapshot, Mechanic, MechanicSystem, Input, SessionEvent, EndReason, HitKind};

pub use crate::templates::{Template, MechanicKind};

pub use crate::choice::{ChoiceBoard, Statement, StatementDeck};
pub use crate::spawn::{SpawnScheduler, SpawnEntity};
pub use crate::motion::{MotionUpdater, Plane, Projectile};
pub use crate::grid::{GridNavigator, GridPos, Direction, CollectibleItem};
pub use crate::order::{OrderValidator, RankItem, CheckReport};
