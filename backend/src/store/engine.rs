//! Client store - the one owner of mutable practice state
//!
//! The store owns the roster, the event log and the seeded id stream.
//! Callers change state only by applying a [`Command`]; they read state
//! through [`StoreSnapshot`]s.
//!
//! # Critical Invariants
//!
//! 1. **All-or-nothing**: A rejected command leaves roster, log and version
//!    untouched
//! 2. **Checked transitions**: Status changes go through the transition table
//! 3. **Determinism**: Same roster + same id seed + same commands → same
//!    state (manual ids come from the seeded id stream)
//!
//! # Example
//!
//! ```rust
//! use orcatax_core_rs::factory::generate;
//! use orcatax_core_rs::models::{ChangeCause, NewClient};
//! use orcatax_core_rs::store::{ClientStore, Command, StoreConfig};
//! use orcatax_core_rs::ClientStatus;
//!
//! let mut store = ClientStore::new(generate(3, 2025), &StoreConfig::default()).unwrap();
//!
//! // C0001 is waiting on documents
//! store.apply(Command::ChangeStatus {
//!     client_id: "C0001".to_string(),
//!     to: ClientStatus::Review,
//!     cause: ChangeCause::Manual,
//! }).unwrap();
//!
//! store.apply(Command::AddClient(NewClient::named("Skyler Brown"))).unwrap();
//!
//! let snapshot = store.snapshot();
//! assert_eq!(snapshot.len(), 4);
//! assert_eq!(snapshot.clients()[0].name(), "Skyler Brown");
//! assert_eq!(snapshot.get("C0001").unwrap().status(), ClientStatus::Review);
//! ```

use crate::factory::{allocate_manual_id, generate_with, manual_client, FactoryConfig};
use crate::models::client::{Client, ClientError, NewClient};
use crate::models::event::{ChangeCause, Event, EventLog};
use crate::models::state::{ClientRoster, RosterError};
use crate::models::status::{ClientStatus, StatusError};
use crate::rng::RngManager;
use crate::store::snapshot::{roster_fingerprint, StoreSnapshot};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Default seed of the manual-id stream
pub const DEFAULT_ID_SEED: u32 = 1040;

/// Store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Seed of the stream manual client ids are drawn from
    pub id_seed: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            id_seed: DEFAULT_ID_SEED,
        }
    }
}

/// A requested mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Add a client from the manual-add form
    AddClient(NewClient),

    /// Move a client to a new status
    ChangeStatus {
        client_id: String,
        to: ClientStatus,
        cause: ChangeCause,
    },

    /// Replace the whole roster with a freshly generated one
    Regenerate(FactoryConfig),
}

/// Reasons a command is rejected
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("{client_id}: {source}")]
    Status {
        client_id: String,
        #[source]
        source: StatusError,
    },

    #[error(transparent)]
    Roster(#[from] RosterError),

    #[error("Client not found: {0}")]
    ClientNotFound(String),

    #[error("No free client ids remain")]
    IdSpaceExhausted,

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Owner of the client roster
#[derive(Debug)]
pub struct ClientStore {
    roster: ClientRoster,
    events: EventLog,
    id_rng: RngManager,

    /// Number of accepted commands
    version: u64,

    /// Shared copy handed out by `snapshot()`, rebuilt after each mutation
    published: Arc<[Client]>,
}

impl ClientStore {
    /// Create a store over an existing roster
    ///
    /// # Errors
    /// `Roster(DuplicateId)` if two clients share an id
    pub fn new(clients: Vec<Client>, config: &StoreConfig) -> Result<Self, StoreError> {
        let published: Arc<[Client]> = clients.clone().into();
        let roster = ClientRoster::new(clients)?;

        Ok(Self {
            roster,
            events: EventLog::new(),
            id_rng: RngManager::new(config.id_seed),
            version: 0,
            published,
        })
    }

    /// Create a store over a generated roster
    pub fn generated(factory: &FactoryConfig, config: &StoreConfig) -> Result<Self, StoreError> {
        let mut store = Self::new(Vec::new(), config)?;
        store.apply(Command::Regenerate(factory.clone()))?;
        Ok(store)
    }

    /// Apply a command, returning the events it produced
    ///
    /// # Errors
    /// - `Client(NameRequired)` for a blank manual-add name
    /// - `Status` for a transition the table does not allow
    /// - `ClientNotFound` for an unknown client id
    /// - `IdSpaceExhausted` if every four-digit id is taken
    pub fn apply(&mut self, command: Command) -> Result<Vec<Event>, StoreError> {
        let events = match command {
            Command::AddClient(form) => self.add_client(form)?,
            Command::ChangeStatus {
                client_id,
                to,
                cause,
            } => self.change_status(client_id, to, cause)?,
            Command::Regenerate(factory) => self.regenerate(&factory)?,
        };

        for event in &events {
            self.events.log(event.clone());
        }
        self.version += 1;
        self.published = self.roster.clients().to_vec().into();

        Ok(events)
    }

    /// Current roster as an immutable snapshot
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot::new(Arc::clone(&self.published), self.version)
    }

    pub fn get(&self, client_id: &str) -> Option<&Client> {
        self.roster.get(client_id)
    }

    pub fn len(&self) -> usize {
        self.roster.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roster.is_empty()
    }

    /// Number of accepted commands
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Every event accepted so far
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    fn add_client(&mut self, form: NewClient) -> Result<Vec<Event>, StoreError> {
        form.validate()?;

        let roster = &self.roster;
        let id = allocate_manual_id(&mut self.id_rng, |id| roster.contains(id))
            .ok_or(StoreError::IdSpaceExhausted)?;
        let client = manual_client(form, id)?;
        let event = Event::ClientAdded {
            client_id: client.id().to_string(),
            name: client.name().to_string(),
        };

        debug!(client_id = client.id(), "client added");
        self.roster.prepend(client)?;
        Ok(vec![event])
    }

    fn change_status(
        &mut self,
        client_id: String,
        to: ClientStatus,
        cause: ChangeCause,
    ) -> Result<Vec<Event>, StoreError> {
        let current = self
            .roster
            .get(&client_id)
            .ok_or_else(|| StoreError::ClientNotFound(client_id.clone()))?;
        let from = current.status();

        let updated = current.with_status(to).map_err(|source| {
            warn!(client_id = %client_id, %from, %to, ?cause, "status change rejected");
            StoreError::Status {
                client_id: client_id.clone(),
                source,
            }
        })?;

        self.roster.replace(updated)?;
        debug!(client_id = %client_id, %from, %to, ?cause, "status changed");

        Ok(vec![Event::StatusChanged {
            client_id,
            from,
            to,
            cause,
        }])
    }

    fn regenerate(&mut self, factory: &FactoryConfig) -> Result<Vec<Event>, StoreError> {
        let roster = ClientRoster::new(generate_with(factory))?;
        let fingerprint = roster_fingerprint(roster.clients())?;
        self.roster = roster;
        debug!(count = factory.count, seed = factory.seed, %fingerprint, "roster regenerated");

        Ok(vec![Event::ClientsGenerated {
            count: factory.count,
            seed: factory.seed,
            fingerprint,
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::generate;

    fn store() -> ClientStore {
        ClientStore::new(generate(3, 2025), &StoreConfig::default()).unwrap()
    }

    #[test]
    fn test_blank_name_rejected_without_side_effects() {
        let mut store = store();
        let before = store.snapshot();

        let err = store.apply(Command::AddClient(NewClient::named("   "))).unwrap_err();

        assert_eq!(err, StoreError::Client(ClientError::NameRequired));
        assert_eq!(store.len(), 3);
        assert_eq!(store.version(), 0);
        assert!(store.events().is_empty());
        assert!(store.snapshot().shares_storage_with(&before));
    }

    #[test]
    fn test_disallowed_transition_rejected() {
        let mut store = store();

        // C0003 is Filed; Filed → Ready is not in the table
        let err = store
            .apply(Command::ChangeStatus {
                client_id: "C0003".to_string(),
                to: ClientStatus::Ready,
                cause: ChangeCause::Manual,
            })
            .unwrap_err();

        assert!(matches!(
            err,
            StoreError::Status {
                source: StatusError::TransitionNotAllowed { .. },
                ..
            }
        ));
        assert_eq!(store.get("C0003").unwrap().status(), ClientStatus::Filed);
    }

    #[test]
    fn test_unknown_client() {
        let mut store = store();
        let err = store
            .apply(Command::ChangeStatus {
                client_id: "C9999".to_string(),
                to: ClientStatus::Review,
                cause: ChangeCause::Manual,
            })
            .unwrap_err();
        assert_eq!(err, StoreError::ClientNotFound("C9999".to_string()));
    }

    #[test]
    fn test_snapshots_are_isolated() {
        let mut store = store();
        let before = store.snapshot();

        store
            .apply(Command::ChangeStatus {
                client_id: "C0002".to_string(),
                to: ClientStatus::Review,
                cause: ChangeCause::Manual,
            })
            .unwrap();

        assert_eq!(before.get("C0002").unwrap().status(), ClientStatus::InProgress);
        assert_eq!(store.snapshot().get("C0002").unwrap().status(), ClientStatus::Review);
        assert_eq!(store.snapshot().version(), 1);
    }

    #[test]
    fn test_manual_ids_are_seeded() {
        let mut a = store();
        let mut b = store();

        a.apply(Command::AddClient(NewClient::named("Blake Moore"))).unwrap();
        b.apply(Command::AddClient(NewClient::named("Blake Moore"))).unwrap();

        assert_eq!(a.snapshot().clients()[0].id(), b.snapshot().clients()[0].id());
    }

    #[test]
    fn test_regenerate() {
        let mut store = ClientStore::generated(
            &FactoryConfig {
                count: 5,
                ..FactoryConfig::default()
            },
            &StoreConfig::default(),
        )
        .unwrap();

        assert_eq!(store.len(), 5);
        assert_eq!(store.events().events_of_type("ClientsGenerated").len(), 1);

        let events = store
            .apply(Command::Regenerate(FactoryConfig {
                count: 2,
                ..FactoryConfig::default()
            }))
            .unwrap();
        assert_eq!(store.snapshot().len(), 2);

        let expected = store.snapshot().fingerprint().unwrap();
        match &events[..] {
            [Event::ClientsGenerated { count, fingerprint, .. }] => {
                assert_eq!(*count, 2);
                assert_eq!(*fingerprint, expected);
                assert_eq!(fingerprint.len(), 64);
            }
            other => panic!("unexpected events {:?}", other),
        }
    }
}
