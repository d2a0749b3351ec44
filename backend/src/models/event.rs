//! Event logging for store auditing and replay.
//!
//! Every mutation the store accepts is recorded as an [`Event`]. Events let
//! callers:
//! - Audit how a client reached its current status
//! - Drive notifications ("Status → Filed") without re-diffing snapshots
//! - Replay a session deterministically
//!
//! # Example
//!
//! ```rust
//! use orcatax_core_rs::models::{ChangeCause, Event, EventLog};
//! use orcatax_core_rs::ClientStatus;
//!
//! let mut log = EventLog::new();
//! log.log(Event::StatusChanged {
//!     client_id: "C0001".to_string(),
//!     from: ClientStatus::Review,
//!     to: ClientStatus::Filed,
//!     cause: ChangeCause::EFileAccepted,
//! });
//!
//! assert_eq!(log.events_for_client("C0001").len(), 1);
//! ```

use crate::models::status::ClientStatus;
use serde::{Deserialize, Serialize};

/// What triggered a status change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeCause {
    /// Advisor changed the status directly
    Manual,

    /// Engagement e-sign reached `Archived`
    ESignCompleted,

    /// Return intake wizard was finished
    ReturnCompleted,

    /// E-file submission was accepted
    EFileAccepted,
}

/// Store event capturing an accepted mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// A synthetic roster replaced the collection
    ClientsGenerated {
        count: usize,
        seed: u32,
        /// Hex SHA-256 of the new roster
        fingerprint: String,
    },

    /// A client was added through the manual form
    ClientAdded { client_id: String, name: String },

    /// A client's status changed
    StatusChanged {
        client_id: String,
        from: ClientStatus,
        to: ClientStatus,
        cause: ChangeCause,
    },
}

impl Event {
    /// Get a short description of the event type
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::ClientsGenerated { .. } => "ClientsGenerated",
            Event::ClientAdded { .. } => "ClientAdded",
            Event::StatusChanged { .. } => "StatusChanged",
        }
    }

    /// Get client ID if event relates to a specific client
    pub fn client_id(&self) -> Option<&str> {
        match self {
            Event::ClientAdded { client_id, .. } => Some(client_id),
            Event::StatusChanged { client_id, .. } => Some(client_id),
            Event::ClientsGenerated { .. } => None,
        }
    }
}

/// Event log for storing and querying store events.
///
/// This is a simple wrapper around Vec<Event> with convenience methods.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Add an event to the log
    pub fn log(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Get all events in the order they were accepted
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Get events of a specific type
    pub fn events_of_type(&self, event_type: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Get events for a specific client
    pub fn events_for_client(&self, client_id: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.client_id() == Some(client_id))
            .collect()
    }
}
