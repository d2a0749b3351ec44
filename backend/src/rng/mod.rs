//! Deterministic random number generation
//!
//! Uses the Mulberry32 algorithm so generated datasets are reproducible.
//! CRITICAL: All randomness in the engine goes through this module, except
//! the opt-in `CoinSource::Entropy` posture coin.

mod mulberry;

pub use mulberry::RngManager;
