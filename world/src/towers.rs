//! Authoritative tower state management utilities.

use std::collections::BTreeMap;

use tanabata_core::{Hex, TowerId, TowerKind, TowerSnapshot};

/// Snapshot of a tower stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct TowerState {
    /// Identifier allocated by the world for the tower.
    pub(crate) id: TowerId,
    /// Kind of tower that was constructed.
    pub(crate) kind: TowerKind,
    /// Cell occupied by the tower.
    pub(crate) hex: Hex,
    /// Whether the energy network currently powers the tower.
    pub(crate) active: bool,
}

impl TowerState {
    pub(crate) fn snapshot(&self) -> TowerSnapshot {
        TowerSnapshot {
            id: self.id,
            kind: self.kind,
            hex: self.hex,
            active: self.active,
        }
    }
}

/// Registry that stores towers and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct TowerRegistry {
    entries: BTreeMap<TowerId, TowerState>,
    by_hex: BTreeMap<Hex, TowerId>,
    next_tower_id: TowerId,
}

impl TowerRegistry {
    /// Creates an empty tower registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            by_hex: BTreeMap::new(),
            next_tower_id: TowerId::new(0),
        }
    }

    /// Stores a new unpowered tower and returns its identifier.
    pub(crate) fn insert(&mut self, kind: TowerKind, hex: Hex) -> TowerId {
        let id = self.next_tower_id;
        self.next_tower_id = TowerId::new(id.get().saturating_add(1));
        let _ = self.entries.insert(
            id,
            TowerState {
                id,
                kind,
                hex,
                active: false,
            },
        );
        let _ = self.by_hex.insert(hex, id);
        id
    }

    pub(crate) fn remove(&mut self, tower: TowerId) -> Option<TowerState> {
        let state = self.entries.remove(&tower)?;
        let _ = self.by_hex.remove(&state.hex);
        Some(state)
    }

    pub(crate) fn get(&self, tower: TowerId) -> Option<&TowerState> {
        self.entries.get(&tower)
    }

    pub(crate) fn get_mut(&mut self, tower: TowerId) -> Option<&mut TowerState> {
        self.entries.get_mut(&tower)
    }

    /// Tower standing on the provided cell, if any.
    pub(crate) fn at(&self, hex: Hex) -> Option<TowerId> {
        self.by_hex.get(&hex).copied()
    }

    /// Iterator over stored towers in ascending identifier order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &TowerState> {
        self.entries.values()
    }

    /// Drops every tower while keeping the identifier counter running.
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.by_hex.clear();
    }
}
