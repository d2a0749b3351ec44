//! Virtual time for simulated delays
//!
//! Workflow steps that used to wait on wall-clock timers run against a
//! virtual millisecond clock instead. Time only moves when the caller
//! advances it, so step logic stays synchronous and tests never sleep.

use serde::{Deserialize, Serialize};

/// Monotonic virtual clock in milliseconds
///
/// # Example
/// ```
/// use orcatax_core_rs::VirtualClock;
///
/// let mut clock = VirtualClock::new();
/// assert_eq!(clock.now_ms(), 0);
///
/// clock.advance_by(500);
/// assert_eq!(clock.now_ms(), 500);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualClock {
    /// Milliseconds elapsed since the clock was created
    now_ms: u64,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self { now_ms: 0 }
    }

    /// Current virtual time (ms)
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Move time forward by `ms`
    pub fn advance_by(&mut self, ms: u64) {
        self.now_ms = self.now_ms.saturating_add(ms);
    }

    /// Move time forward to `target_ms`; earlier targets are ignored
    pub fn advance_to(&mut self, target_ms: u64) {
        self.now_ms = self.now_ms.max(target_ms);
    }
}
