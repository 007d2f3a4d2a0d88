//! Core engine types: questions, entities, time, RNG, configuration, errors.
//!
//! Everything here is template-agnostic. Mechanics build on these types;
//! none of them know which template is running.

pub mod entity;
pub mod question;
pub mod time;
pub mod rng;
pub mod config;
pub mod error;

pub use entity::{EntityAllocator, EntityId};
pub use question::{GameSettings, Operation, Options, Question, QuestionSet};
pub use time::Millis;
pub use rng::{GameRng, GameRngState};
pub use config::{ChoiceConfig, EngineConfig, GridConfig, MotionConfig, OrderConfig, SpawnConfig};
pub use error::{Rejection, SessionError};
