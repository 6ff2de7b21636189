//! Connection Registry: live connection → display name.

use std::collections::HashMap;

use super::value_object::{ConnectionId, PlayerName};

/// Name reported for connections that never joined (or already left).
pub const UNKNOWN_PLAYER_NAME: &str = "Unknown";

#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    names: HashMap<ConnectionId, PlayerName>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the display name of a connection.
    ///
    /// Returns `false` without touching the existing mapping when the connection
    /// already has a name (duplicate join from the same connection).
    pub fn register(&mut self, connection_id: ConnectionId, name: PlayerName) -> bool {
        if self.names.contains_key(&connection_id) {
            tracing::warn!(
                "Connection '{}' already joined as '{}', ignoring duplicate join",
                connection_id,
                self.lookup(&connection_id)
            );
            return false;
        }
        self.names.insert(connection_id, name);
        true
    }

    pub fn lookup(&self, connection_id: &ConnectionId) -> &str {
        self.names
            .get(connection_id)
            .map(PlayerName::as_str)
            .unwrap_or(UNKNOWN_PLAYER_NAME)
    }

    pub fn remove(&mut self, connection_id: &ConnectionId) -> Option<PlayerName> {
        self.names.remove(connection_id)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
