//! Named, cancelable delayed messages for the gesture state machines.
//!
//! The platform event-handler `SendEvent`/`RemoveEvent` pattern is replaced by
//! an explicit queue: a state machine schedules a message with a deadline and
//! later drains the messages that became due, feeding each into its own
//! `on_timer` entry point. No real clock is involved; the owner passes "now"
//! in, which makes every timeout deterministic under test.

use std::mem::Discriminant;

/// Ticket returned by [`TimerQueue::schedule`].
///
/// A handle is invalidated as soon as the schedule it came from fires, is
/// canceled, or is superseded by re-scheduling the same message name, so a
/// stale handle can never cancel a newer timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerHandle {
    generation: u64,
}

#[derive(Debug)]
struct Entry<M> {
    msg: M,
    deadline_ms: u64,
    generation: u64,
}

/// A queue of pending delayed messages.
///
/// Message identity is the enum variant: at most one timer per variant is
/// outstanding, and re-scheduling a variant replaces its pending entry.
#[derive(Debug)]
pub struct TimerQueue<M> {
    entries: Vec<Entry<M>>,
    next_generation: u64,
}

impl<M> Default for TimerQueue<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> TimerQueue<M> {
    /// Create an empty queue.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_generation: 0,
        }
    }

    fn discriminant_of(msg: &M) -> Discriminant<M> {
        std::mem::discriminant(msg)
    }

    /// Schedule `msg` to become due at `now_ms + delay_ms`, replacing any
    /// pending entry of the same variant.
    pub fn schedule(&mut self, msg: M, now_ms: u64, delay_ms: u64) -> TimerHandle {
        self.cancel(&msg);
        self.next_generation += 1;
        let generation = self.next_generation;
        self.entries.push(Entry {
            msg,
            deadline_ms: now_ms.saturating_add(delay_ms),
            generation,
        });
        TimerHandle { generation }
    }

    /// Cancel the pending entry of `msg`'s variant, if any. Idempotent; the
    /// payload of `msg` is ignored.
    pub fn cancel(&mut self, msg: &M) {
        let d = Self::discriminant_of(msg);
        self.entries.retain(|e| Self::discriminant_of(&e.msg) != d);
    }

    /// Cancel by handle. A handle from a superseded or fired schedule is a
    /// no-op.
    pub fn cancel_handle(&mut self, handle: TimerHandle) {
        self.entries.retain(|e| e.generation != handle.generation);
    }

    /// Whether a timer of `msg`'s variant is pending.
    #[must_use]
    pub fn is_pending(&self, msg: &M) -> bool {
        let d = Self::discriminant_of(msg);
        self.entries.iter().any(|e| Self::discriminant_of(&e.msg) == d)
    }

    /// Remove and return every message whose deadline is at or before
    /// `now_ms`, in deadline order.
    pub fn drain_due(&mut self, now_ms: u64) -> Vec<M> {
        let mut due: Vec<Entry<M>> = Vec::new();
        let mut i = 0;
        while i < self.entries.len() {
            if self.entries[i].deadline_ms <= now_ms {
                due.push(self.entries.swap_remove(i));
            } else {
                i += 1;
            }
        }
        due.sort_by_key(|e| (e.deadline_ms, e.generation));
        due.into_iter().map(|e| e.msg).collect()
    }

    /// Earliest pending deadline, if any. Hosts use this to program a wakeup.
    #[must_use]
    pub fn next_deadline(&self) -> Option<u64> {
        self.entries.iter().map(|e| e.deadline_ms).min()
    }

    /// Drop every pending entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
