//! OrcaTax Practice Core - Rust Engine
//!
//! Deterministic engine behind a small tax-practice console: a seeded client
//! roster, mock tax metrics, reports, and the timer-driven workflows an
//! advisor runs against a client.
//!
//! # Architecture
//!
//! - **rng**: Deterministic random number generation (Mulberry32)
//! - **models**: Domain types (Client, status table, events, documents)
//! - **factory**: Seeded roster generation
//! - **metrics**: Tax profile, advisory summary, forecasts
//! - **reports**: Roster-wide aggregations
//! - **store**: Single owner of mutable state; snapshots and commands
//! - **workflows**: E-sign, return wizard, e-file, agent run, doc checks
//! - **core**: Money helpers, virtual clock and timer queue
//! - **document**: Client summary layout and PDF rendering
//! - **config**: TOML configuration
//!
//! # Critical Invariants
//!
//! 1. All money of record is i64 (cents); derived tax amounts are i64
//!    micro-dollars
//! 2. All randomness is deterministic (seeded RNG) unless opted out
//! 3. Status changes only follow the transition table

// Module declarations
pub mod config;
pub mod core;
pub mod document;
pub mod factory;
pub mod metrics;
pub mod models;
pub mod reports;
pub mod rng;
pub mod store;
pub mod workflows;

// Re-exports for convenience
pub use config::{ConfigError, PracticeConfig};
pub use self::core::{clock::VirtualClock, scheduler::TimerQueue};
pub use document::{DocumentError, DocumentRenderer, PdfRenderer};
pub use factory::{generate, generate_with, CoinSource, FactoryConfig};
pub use metrics::{compute_tax_profile, summarize, TaxProfile, TaxRates};
pub use models::{
    client::{Client, ClientError, ClientType, FilingStatus, NewClient, Posture},
    event::{ChangeCause, Event, EventLog},
    status::{ClientStatus, StatusError},
};
pub use reports::Report;
pub use rng::RngManager;
pub use store::{ClientStore, Command, StoreConfig, StoreError, StoreSnapshot};
pub use workflows::{Workflow, WorkflowError, WorkflowKind, WorkflowRunner};
