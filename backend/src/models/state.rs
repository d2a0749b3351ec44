//! Client roster
//!
//! The ordered client collection owned by the store.
//!
//! # Critical Invariants
//!
//! 1. **Id Uniqueness**: Each client ID appears exactly once
//! 2. **Index Validity**: `index[id]` always points at the client with that id
//! 3. **Stable Order**: Generated clients keep `C0001..` order; manually added
//!    clients are prepended (newest first)

use crate::models::client::Client;
use std::collections::HashMap;
use thiserror::Error;

/// Errors raised by roster mutations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RosterError {
    #[error("Client ID {0} already exists")]
    DuplicateId(String),

    #[error("Client not found: {0}")]
    ClientNotFound(String),
}

/// Ordered, id-indexed client collection
///
/// # Example
///
/// ```rust
/// use orcatax_core_rs::factory::generate;
/// use orcatax_core_rs::models::ClientRoster;
///
/// let roster = ClientRoster::new(generate(3, 2025)).unwrap();
/// assert_eq!(roster.len(), 3);
/// assert!(roster.get("C0002").is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClientRoster {
    /// Clients in display order
    clients: Vec<Client>,

    /// Client id → position in `clients`
    index: HashMap<String, usize>,
}

impl ClientRoster {
    /// Build a roster from an ordered collection
    ///
    /// # Errors
    /// `DuplicateId` if two clients share an id
    pub fn new(clients: Vec<Client>) -> Result<Self, RosterError> {
        let mut index = HashMap::with_capacity(clients.len());
        for (pos, client) in clients.iter().enumerate() {
            if index.insert(client.id().to_string(), pos).is_some() {
                return Err(RosterError::DuplicateId(client.id().to_string()));
            }
        }

        Ok(Self { clients, index })
    }

    /// Get reference to a client by ID
    pub fn get(&self, id: &str) -> Option<&Client> {
        self.index.get(id).map(|&pos| &self.clients[pos])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Insert a client at the front of the roster
    ///
    /// # Errors
    /// `DuplicateId` if the id is taken; the roster is left unchanged
    pub fn prepend(&mut self, client: Client) -> Result<(), RosterError> {
        if self.contains(client.id()) {
            return Err(RosterError::DuplicateId(client.id().to_string()));
        }

        self.clients.insert(0, client);
        self.reindex();
        Ok(())
    }

    /// Replace a client wholesale, returning the previous value
    ///
    /// # Errors
    /// `ClientNotFound` if no client has the replacement's id
    pub fn replace(&mut self, client: Client) -> Result<Client, RosterError> {
        let pos = *self
            .index
            .get(client.id())
            .ok_or_else(|| RosterError::ClientNotFound(client.id().to_string()))?;

        Ok(std::mem::replace(&mut self.clients[pos], client))
    }

    /// Get all clients in display order
    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    fn reindex(&mut self) {
        self.index = self
            .clients
            .iter()
            .enumerate()
            .map(|(pos, client)| (client.id().to_string(), pos))
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::generate;
    use crate::models::status::ClientStatus;

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut clients = generate(2, 1);
        clients.push(clients[0].clone());

        assert_eq!(
            ClientRoster::new(clients).unwrap_err(),
            RosterError::DuplicateId("C0001".to_string())
        );
    }

    #[test]
    fn test_prepend_keeps_index_valid() {
        let mut all = generate(4, 9);
        let last = all.pop().unwrap();
        let mut roster = ClientRoster::new(all).unwrap();

        roster.prepend(last).unwrap();

        assert_eq!(roster.clients()[0].id(), "C0004");
        for client in roster.clients() {
            assert_eq!(roster.get(client.id()).unwrap().id(), client.id());
        }
    }

    #[test]
    fn test_prepend_duplicate_leaves_roster_unchanged() {
        let clients = generate(3, 9);
        let dup = clients[1].clone();
        let mut roster = ClientRoster::new(clients.clone()).unwrap();

        assert!(roster.prepend(dup).is_err());
        assert_eq!(roster.clients(), clients.as_slice());
    }

    #[test]
    fn test_replace_swaps_value() {
        let clients = generate(3, 5);
        let target = clients
            .iter()
            .find(|c| c.status().can_transition_to(ClientStatus::PaymentDue))
            .unwrap()
            .clone();
        let mut roster = ClientRoster::new(clients).unwrap();

        let updated = target.with_status(ClientStatus::PaymentDue).unwrap();
        let previous = roster.replace(updated).unwrap();

        assert_eq!(previous, target);
        assert_eq!(
            roster.get(target.id()).unwrap().status(),
            ClientStatus::PaymentDue
        );
    }
}
