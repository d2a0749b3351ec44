//! Domain models for the practice engine

pub mod client;
pub mod document;
pub mod event;
pub mod state;
pub mod status;

// Re-exports
pub use client::{
    Client, ClientError, ClientType, ContactInfo, Financials, FilingStatus, NewClient, Posture,
    MAX_AMOUNT_CENTS,
};
pub use document::{DocumentKind, DocumentLedger, DocumentSource, UploadedDocument};
pub use event::{ChangeCause, Event, EventLog};
pub use state::{ClientRoster, RosterError};
pub use status::{ClientStatus, StatusError};
