//! Storage for the energy lines drawn between towers.

use std::collections::BTreeMap;

use tanabata_core::{ConnectionId, ConnectionSnapshot, TowerId};

#[derive(Debug)]
pub(crate) struct ConnectionRegistry {
    entries: BTreeMap<ConnectionId, ConnectionSnapshot>,
    next_connection_id: ConnectionId,
}

impl ConnectionRegistry {
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_connection_id: ConnectionId::new(0),
        }
    }

    pub(crate) fn insert(&mut self, from: TowerId, to: TowerId) -> ConnectionId {
        let id = self.next_connection_id;
        self.next_connection_id = ConnectionId::new(id.get().saturating_add(1));
        let _ = self
            .entries
            .insert(id, ConnectionSnapshot { id, from, to });
        id
    }

    pub(crate) fn remove(&mut self, connection: ConnectionId) {
        let _ = self.entries.remove(&connection);
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &ConnectionSnapshot> {
        self.entries.values()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
