//! Cooperative timers on a virtual clock.
//!
//! Nothing here sleeps or spawns. The owner moves the clock forward with
//! [`Scheduler::advance`] and then pops due timers one at a time, so every
//! callback runs to completion on the caller's thread. Timers due at the same
//! instant pop in the order they were scheduled.

use std::time::Duration;

/// Handle for cancelling a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// A timer that has come due.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timer<A> {
    /// Handle the timer was scheduled under.
    pub id: TimerId,
    /// Virtual time at which it fires.
    pub due: Duration,
    /// What to do when it fires.
    pub action: A,
}

/// Pending timers keyed on a virtual clock.
#[derive(Debug, Clone)]
pub struct Scheduler<A> {
    now: Duration,
    next_id: u64,
    pending: Vec<Timer<A>>,
}

impl<A> Default for Scheduler<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Scheduler<A> {
    /// Create an empty scheduler at time zero.
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            pending: Vec::new(),
        }
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule an action `delay` after now. Due times saturate at
    /// `Duration::MAX`.
    pub fn schedule(&mut self, delay: Duration, action: A) -> TimerId {
        self.schedule_at(self.now.saturating_add(delay), action)
    }

    /// Schedule an action at an absolute virtual time. Times in the past are
    /// due immediately.
    pub fn schedule_at(&mut self, due: Duration, action: A) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(Timer { id, due, action });
        id
    }

    /// Cancel a timer. Returns `false` if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|t| t.id != id);
        self.pending.len() != before
    }

    /// Drop every pending timer.
    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    /// Move the clock forward. The clock stops at `Duration::MAX`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }

    /// Remove and return the earliest timer that is due, if any.
    pub fn pop_due(&mut self) -> Option<Timer<A>> {
        let now = self.now;
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= now)
            .min_by_key(|(_, t)| (t.due, t.id))
            .map(|(i, _)| i)?;
        Some(self.pending.remove(idx))
    }

    /// Number of pending timers.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether no timers are pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
