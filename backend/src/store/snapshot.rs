//! Immutable store snapshots
//!
//! Presentation layers read the roster through a [`StoreSnapshot`]: a
//! shared, read-only copy tagged with the store version it was taken at.
//! Snapshots never observe later mutations.

use crate::models::client::Client;
use crate::store::StoreError;
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// Read-only view of the roster at one store version
#[derive(Debug, Clone)]
pub struct StoreSnapshot {
    clients: Arc<[Client]>,
    version: u64,
}

impl StoreSnapshot {
    pub(crate) fn new(clients: Arc<[Client]>, version: u64) -> Self {
        Self { clients, version }
    }

    /// Clients in display order
    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    /// Number of accepted mutations before this snapshot was taken
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Look up a client by id (linear scan)
    pub fn get(&self, id: &str) -> Option<&Client> {
        self.clients.iter().find(|c| c.id() == id)
    }

    /// True if both snapshots share the same backing allocation
    pub fn shares_storage_with(&self, other: &StoreSnapshot) -> bool {
        Arc::ptr_eq(&self.clients, &other.clients)
    }

    /// Hex SHA-256 of the roster, see [`roster_fingerprint`]
    pub fn fingerprint(&self) -> Result<String, StoreError> {
        roster_fingerprint(self.clients())
    }
}

/// Hex SHA-256 of the roster's JSON form
///
/// `Client` serializes as fixed-order structs with no maps, so equal rosters
/// hash equal regardless of which store produced them. Regeneration records
/// this value in its event.
pub fn roster_fingerprint(clients: &[Client]) -> Result<String, StoreError> {
    let json = serde_json::to_vec(clients)
        .map_err(|e| StoreError::Serialization(format!("roster serialization failed: {}", e)))?;

    Ok(format!("{:x}", Sha256::digest(&json)))
}
