//! Scheduled tasks for a single-threaded session.
//!
//! Every interval and timeout a mechanic needs is a task in one
//! [`TimerQueue`]. The host drives the queue by reporting the current
//! session time; due tasks pop out in `(due, scheduling order)` order, so
//! a task scheduled earlier never fires after one scheduled later with an
//! equal or longer delay.
//!
//! ## Scopes
//!
//! Each task is scheduled under a [`Scope`]. Cancelling a scope removes
//! its tasks and bumps the scope generation; a task whose token carries an
//! old generation is discarded when popped instead of being delivered.
//! Mechanics cancel `Scope::Question(i)` when question `i` is left behind
//! and everything when the session ends.
//!
//! ```
//! use math_arcade::clock::{Scope, TimerQueue};
//! use math_arcade::core::Millis;
//!
//! let mut timers = TimerQueue::new();
//! timers.schedule(Millis(0), Millis(500), Scope::Question(0), "hide");
//! timers.every(Millis(0), Millis(200), Scope::Session, "tick");
//!
//! timers.cancel_scope(Scope::Question(0));
//!
//! let fired: Vec<_> = std::iter::from_fn(|| timers.pop_due(Millis(500)))
//!     .map(|f| f.task)
//!     .collect();
//! assert_eq!(fired, vec!["tick", "tick"]);
//! ```

mod queue;

pub use queue::{Cadence, Fired, Scope, ScopeToken, TimerId, TimerQueue};
