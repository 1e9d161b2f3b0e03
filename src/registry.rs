//! Registry of joined clients
//!
//! Maps a display name to the `Client` holding it. Owned by the state actor
//! alone; entries are inserted or removed, never modified in place.

use std::collections::HashMap;

use crate::client::Client;
use crate::types::SessionId;

/// Name → Client mapping
#[derive(Debug, Default)]
pub struct Registry {
    clients: HashMap<String, Client>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a client unless its name is already taken
    ///
    /// Returns false and leaves the existing entry untouched on collision.
    pub fn try_insert(&mut self, client: Client) -> bool {
        if self.clients.contains_key(&client.name) {
            return false;
        }
        self.clients.insert(client.name.clone(), client);
        true
    }

    /// Remove `name` if it is held by session `id`
    ///
    /// Returns the removed client. Removing an absent name, or a name now
    /// held by another session, is a no-op.
    pub fn remove(&mut self, id: SessionId, name: &str) -> Option<Client> {
        match self.clients.get(name) {
            Some(client) if client.id == id => self.clients.remove(name),
            _ => None,
        }
    }

    /// Check whether a name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.clients.contains_key(name)
    }

    /// Get the client registered under `name`
    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<&Client> {
        self.clients.get(name)
    }

    /// Number of registered clients
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    /// Check if no client is registered
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.clients.keys().cloned().collect();
        names.sort();
        names
    }

    /// Snapshot of every recipient except `exclude`
    ///
    /// Broadcast writes happen against this copy, never while iterating the map.
    pub fn recipients(&self, exclude: Option<&str>) -> Vec<Client> {
        self.clients
            .values()
            .filter(|client| Some(client.name.as_str()) != exclude)
            .cloned()
            .collect()
    }
}
