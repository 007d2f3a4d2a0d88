//! Timer queue implementation.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use log::trace;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::Millis;

/// Owner of a scheduled task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scope {
    /// Lives until the session ends.
    Session,
    /// Lives while the question at this index is current.
    Question(usize),
}

/// Scope plus the generation the task was scheduled in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeToken {
    pub scope: Scope,
    pub generation: u32,
}

/// Unique handle for a scheduled task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerId(pub u64);

/// Whether a task fires once or repeats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cadence {
    Once,
    /// Re-armed from its own due time after every firing.
    Every(Millis),
}

/// A task that came due.
#[derive(Clone, Debug, PartialEq)]
pub struct Fired<T> {
    pub id: TimerId,
    pub due: Millis,
    pub scope: Scope,
    pub task: T,
}

#[derive(Clone, Debug)]
struct Entry<T> {
    due: Millis,
    seq: u64,
    id: TimerId,
    token: ScopeToken,
    cadence: Cadence,
    task: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    // Reversed: BinaryHeap is a max-heap and the earliest entry must pop first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Single-threaded queue of scheduled tasks.
#[derive(Clone, Debug)]
pub struct TimerQueue<T> {
    heap: BinaryHeap<Entry<T>>,
    generations: FxHashMap<Scope, u32>,
    next_seq: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            heap: BinaryHeap::new(),
            generations: FxHashMap::default(),
            next_seq: 0,
        }
    }
}

impl<T: Clone + std::fmt::Debug> TimerQueue<T> {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current token for a scope.
    #[must_use]
    pub fn token(&self, scope: Scope) -> ScopeToken {
        ScopeToken {
            scope,
            generation: self.generations.get(&scope).copied().unwrap_or(0),
        }
    }

    /// Check whether a token still belongs to a live scope.
    #[must_use]
    pub fn is_live(&self, token: ScopeToken) -> bool {
        self.token(token.scope) == token
    }

    /// Fire `task` once, `delay` after `now`.
    pub fn schedule(&mut self, now: Millis, delay: Millis, scope: Scope, task: T) -> TimerId {
        self.push(now + delay, scope, Cadence::Once, task)
    }

    /// Fire `task` every `period`, starting one period after `now`.
    pub fn every(&mut self, now: Millis, period: Millis, scope: Scope, task: T) -> TimerId {
        debug_assert!(period > Millis::ZERO, "periodic task needs a non-zero period");
        self.push(now + period, scope, Cadence::Every(period), task)
    }

    fn push(&mut self, due: Millis, scope: Scope, cadence: Cadence, task: T) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        let id = TimerId(seq);
        self.heap.push(Entry {
            due,
            seq,
            id,
            token: self.token(scope),
            cadence,
            task,
        });
        id
    }

    /// Cancel one task. Returns false if it was not pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.heap.len();
        self.heap.retain(|e| e.id != id);
        self.heap.len() != before
    }

    /// Cancel every task in `scope`. Returns how many were removed.
    pub fn cancel_scope(&mut self, scope: Scope) -> usize {
        *self.generations.entry(scope).or_insert(0) += 1;
        let before = self.heap.len();
        self.heap.retain(|e| e.token.scope != scope);
        let removed = before - self.heap.len();
        trace!("cancelled {} task(s) in {:?}", removed, scope);
        removed
    }

    /// Cancel everything.
    pub fn cancel_all(&mut self) -> usize {
        let scopes: Vec<Scope> = self.heap.iter().map(|e| e.token.scope).collect();
        for scope in scopes {
            *self.generations.entry(scope).or_insert(0) += 1;
        }
        let removed = self.heap.len();
        self.heap.clear();
        removed
    }

    /// Pop the earliest task due at or before `now`.
    ///
    /// Periodic tasks are re-armed before they are returned. Tasks whose
    /// scope was cancelled after they were scheduled are discarded.
    pub fn pop_due(&mut self, now: Millis) -> Option<Fired<T>> {
        loop {
            if self.heap.peek().map_or(true, |e| e.due > now) {
                return None;
            }
            let entry = self.heap.pop()?;

            if !self.is_live(entry.token) {
                trace!("discarding {:?} from cancelled {:?}", entry.task, entry.token.scope);
                continue;
            }

            if let Cadence::Every(period) = entry.cadence {
                let seq = self.next_seq;
                self.next_seq += 1;
                self.heap.push(Entry {
                    due: entry.due + period,
                    seq,
                    id: entry.id,
                    token: entry.token,
                    cadence: entry.cadence,
                    task: entry.task.clone(),
                });
            }

            trace!("firing {:?} at {}", entry.task, entry.due);
            return Some(Fired {
                id: entry.id,
                due: entry.due,
                scope: entry.token.scope,
                task: entry.task,
            });
        }
    }

    /// Due time of the next pending task.
    #[must_use]
    pub fn next_due(&self) -> Option<Millis> {
        self.heap.peek().map(|e| e.due)
    }

    /// Number of pending tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Pending tasks in a scope.
    #[must_use]
    pub fn pending_in(&self, scope: Scope) -> usize {
        self.heap.iter().filter(|e| e.token.scope == scope).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(timers: &mut TimerQueue<&'static str>, now: Millis) -> Vec<(u64, &'static str)> {
        std::iter::from_fn(|| timers.pop_due(now))
            .map(|f| (f.due.raw(), f.task))
            .collect()
    }

    #[test]
    fn test_fires_in_due_order() {
        let mut timers = TimerQueue::new();
        timers.schedule(Millis(0), Millis(300), Scope::Session, "c");
        timers.schedule(Millis(0), Millis(100), Scope::Session, "a");
        timers.schedule(Millis(0), Millis(200), Scope::Session, "b");

        assert_eq!(drain(&mut timers, Millis(1000)), vec![(100, "a"), (200, "b"), (300, "c")]);
        assert!(timers.is_empty());
    }

    #[test]
    fn test_equal_due_keeps_schedule_order() {
        let mut timers = TimerQueue::new();
        timers.schedule(Millis(0), Millis(100), Scope::Session, "first");
        timers.schedule(Millis(0), Millis(100), Scope::Session, "second");

        assert_eq!(drain(&mut timers, Millis(100)), vec![(100, "first"), (100, "second")]);
    }

    #[test]
    fn test_not_due_yet() {
        let mut timers = TimerQueue::new();
        timers.schedule(Millis(0), Millis(100), Scope::Session, "later");

        assert!(timers.pop_due(Millis(99)).is_none());
        assert_eq!(timers.next_due(), Some(Millis(100)));
    }

    #[test]
    fn test_periodic_rearms() {
        let mut timers = TimerQueue::new();
        let id = timers.every(Millis(0), Millis(50), Scope::Session, "tick");

        assert_eq!(drain(&mut timers, Millis(160)).len(), 3);
        assert_eq!(timers.next_due(), Some(Millis(200)));

        assert!(timers.cancel(id));
        assert!(timers.is_empty());
    }

    #[test]
    fn test_cancel_scope() {
        let mut timers = TimerQueue::new();
        timers.schedule(Millis(0), Millis(100), Scope::Question(0), "q0");
        timers.schedule(Millis(0), Millis(100), Scope::Question(1), "q1");
        timers.every(Millis(0), Millis(100), Scope::Session, "tick");

        assert_eq!(timers.cancel_scope(Scope::Question(0)), 1);
        assert_eq!(timers.pending_in(Scope::Question(0)), 0);

        assert_eq!(drain(&mut timers, Millis(100)), vec![(100, "q1"), (100, "tick")]);
    }

    #[test]
    fn test_stale_generation_is_discarded() {
        let mut timers = TimerQueue::new();
        let old = timers.token(Scope::Question(0));

        timers.cancel_scope(Scope::Question(0));
        assert!(!timers.is_live(old));

        // Scheduling after cancellation uses the new generation.
        timers.schedule(Millis(0), Millis(10), Scope::Question(0), "fresh");
        assert_eq!(drain(&mut timers, Millis(10)), vec![(10, "fresh")]);
    }

    #[test]
    fn test_cancel_all() {
        let mut timers = TimerQueue::new();
        timers.schedule(Millis(0), Millis(10), Scope::Question(3), "a");
        timers.every(Millis(0), Millis(10), Scope::Session, "b");

        assert_eq!(timers.cancel_all(), 2);
        assert!(drain(&mut timers, Millis(1000)).is_empty());
        assert!(!timers.is_live(ScopeToken { scope: Scope::Session, generation: 0 }));
    }
}
