//! Client store: command application and read snapshots
//!
//! See `engine.rs` for the store and `snapshot.rs` for the read side.

pub mod engine;
pub mod snapshot;

pub use engine::{ClientStore, Command, StoreConfig, StoreError, DEFAULT_ID_SEED};
pub use snapshot::{roster_fingerprint, StoreSnapshot};
