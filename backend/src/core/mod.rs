//! Engine primitives: money units, virtual time and timers

pub mod clock;
pub mod money;
pub mod scheduler;
