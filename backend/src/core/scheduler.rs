//! Timer queue over virtual time
//!
//! Timers carry an arbitrary payload and fire in due-time order; timers due
//! at the same instant fire in the order they were scheduled. Nothing fires
//! until the owner advances the queue's clock.

use crate::core::clock::VirtualClock;
use std::collections::BTreeMap;

/// Handle for cancelling a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// A timer that came due
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FiredTimer<T> {
    pub id: TimerId,
    /// Virtual time the timer was due at (ms)
    pub due_ms: u64,
    pub payload: T,
}

/// Deterministic timer queue
///
/// # Example
/// ```
/// use orcatax_core_rs::TimerQueue;
///
/// let mut timers = TimerQueue::new();
/// timers.schedule_after(900, "package");
/// timers.schedule_after(500, "validate");
///
/// let fired: Vec<_> = timers.advance_by(1_000).into_iter().map(|t| t.payload).collect();
/// assert_eq!(fired, vec!["validate", "package"]);
/// assert_eq!(timers.now_ms(), 1_000);
/// ```
#[derive(Debug, Clone)]
pub struct TimerQueue<T> {
    clock: VirtualClock,

    /// (due time, sequence) → payload; the sequence keeps FIFO order
    pending: BTreeMap<(u64, u64), T>,

    next_seq: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            clock: VirtualClock::new(),
            pending: BTreeMap::new(),
            next_seq: 0,
        }
    }

    /// Current virtual time (ms)
    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Schedule `payload` to fire `delay_ms` after the current time
    pub fn schedule_after(&mut self, delay_ms: u64, payload: T) -> TimerId {
        let due = self.clock.now_ms().saturating_add(delay_ms);
        let seq = self.next_seq;
        self.next_seq += 1;

        self.pending.insert((due, seq), payload);
        TimerId(seq)
    }

    /// Cancel a pending timer, returning its payload
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        let key = *self.pending.keys().find(|(_, seq)| *seq == id.0)?;
        self.pending.remove(&key)
    }

    /// Number of timers not yet fired
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    /// Due time of the next timer, if any
    pub fn next_due_ms(&self) -> Option<u64> {
        self.pending.keys().next().map(|(due, _)| *due)
    }

    /// Advance the clock by `ms`, firing every timer that comes due
    pub fn advance_by(&mut self, ms: u64) -> Vec<FiredTimer<T>> {
        let target = self.clock.now_ms().saturating_add(ms);
        self.advance_to(target)
    }

    /// Advance the clock to `target_ms`, firing every timer due by then
    pub fn advance_to(&mut self, target_ms: u64) -> Vec<FiredTimer<T>> {
        let mut fired = Vec::new();
        while let Some(timer) = self.pop_due(target_ms) {
            fired.push(timer);
        }
        self.clock.advance_to(target_ms);
        fired
    }

    /// Fire only the next timer, jumping the clock to its due time
    pub fn fire_next(&mut self) -> Option<FiredTimer<T>> {
        let due = self.next_due_ms()?;
        self.pop_due(due)
    }

    fn pop_due(&mut self, target_ms: u64) -> Option<FiredTimer<T>> {
        let (&(due, seq), _) = self.pending.iter().next()?;
        if due > target_ms {
            return None;
        }

        let payload = self.pending.remove(&(due, seq))?;
        self.clock.advance_to(due);
        Some(FiredTimer {
            id: TimerId(seq),
            due_ms: due,
            payload,
        })
    }
}
