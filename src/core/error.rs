//! Error types.
//!
//! Two kinds of failure exist:
//!
//! - [`SessionError`]: a precondition on the inputs to a session does not
//!   hold. The session never starts.
//! - [`Rejection`]: an interaction was not accepted. State is unchanged
//!   and the host may drop it silently.

use thiserror::Error;

use super::entity::EntityId;

/// A session could not be started.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("question sequence is empty")]
    NoQuestions,

    #[error("question {index} has options containing the answer {hits} times")]
    MalformedOptions { index: usize, hits: usize },

    #[error("question {index} has no options")]
    MissingOptions { index: usize },

    #[error("grid has {free_cells} free cells but a question needs {items}")]
    GridTooSmall { free_cells: usize, items: usize },

    #[error("invalid engine config: {0}")]
    InvalidConfig(&'static str),
}

/// An interaction that was ignored.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("session is complete")]
    SessionComplete,

    #[error("current question is already answered")]
    AlreadyAnswered,

    #[error("current question has not been answered")]
    NotAnswered,

    #[error("the next question is scheduled automatically")]
    AdvanceScheduled,

    #[error("{input} is not supported by this template")]
    Unsupported { input: &'static str },

    #[error("slot {slot} is out of range")]
    SlotOutOfRange { slot: usize },

    #[error("slot {slot} has nothing visible")]
    SlotEmpty { slot: usize },

    #[error("{0} does not exist")]
    UnknownEntity(EntityId),

    #[error("{0} is not visible")]
    NotVisible(EntityId),

    #[error("{0} belongs to an earlier question")]
    StaleTarget(EntityId),

    #[error("a shot is still being resolved")]
    ResolutionPending,

    #[error("not a permutation of the current items")]
    InvalidPermutation,

    #[error("position {index} is out of range for {len} items")]
    PositionOutOfRange { index: usize, len: usize },

    #[error("the order has already been accepted")]
    OrderSettled,
}
