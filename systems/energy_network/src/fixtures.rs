//! In-memory store and invariant checks shared by the unit tests.

use std::collections::{BTreeMap, BTreeSet};

use tanabata_core::{
    ConnectionId, ConnectionSnapshot, ConnectionView, GridOracle, Hex, OreVeinId,
    OreVeinSnapshot, TowerId, TowerKind, TowerSnapshot, TowerView,
};

use crate::{adjacency::adjacency, EnergyNetwork, NetworkStore, UnionFind};

#[derive(Debug, Default)]
pub(crate) struct MemoryStore {
    towers: BTreeMap<TowerId, TowerSnapshot>,
    connections: BTreeMap<ConnectionId, ConnectionSnapshot>,
    veins: BTreeMap<Hex, OreVeinSnapshot>,
    next_tower: u32,
    next_connection: u32,
    next_vein: u32,
}

impl MemoryStore {
    pub(crate) fn add_tower(&mut self, kind: TowerKind, hex: Hex) -> TowerId {
        let id = TowerId::new(self.next_tower);
        self.next_tower += 1;
        let _ = self.towers.insert(
            id,
            TowerSnapshot {
                id,
                kind,
                hex,
                active: false,
            },
        );
        id
    }

    pub(crate) fn add_vein(&mut self, hex: Hex, power: f32) -> OreVeinId {
        let id = OreVeinId::new(self.next_vein);
        self.next_vein += 1;
        let reserve = power * 100.0;
        let _ = self.veins.insert(
            hex,
            OreVeinSnapshot {
                id,
                hex,
                power,
                reserve,
                max_reserve: reserve,
            },
        );
        id
    }

    pub(crate) fn set_reserve(&mut self, hex: Hex, reserve: f32) {
        if let Some(vein) = self.veins.get_mut(&hex) {
            vein.reserve = reserve;
        }
    }

    pub(crate) fn snapshot(&self, tower: TowerId) -> TowerSnapshot {
        *self.towers.get(&tower).expect("tower exists")
    }

    pub(crate) fn is_active(&self, tower: TowerId) -> bool {
        self.snapshot(tower).active
    }

    pub(crate) fn links(&self) -> Vec<(u32, u32)> {
        let mut links: Vec<(u32, u32)> = self
            .connections
            .values()
            .map(|connection| {
                let (a, b) = (connection.from.get(), connection.to.get());
                (a.min(b), a.max(b))
            })
            .collect();
        links.sort_unstable();
        links
    }

    pub(crate) fn has_link(&self, a: TowerId, b: TowerId) -> bool {
        self.connections
            .values()
            .any(|connection| connection.joins(a, b))
    }
}

impl NetworkStore for MemoryStore {
    fn towers(&self) -> TowerView {
        TowerView::from_snapshots(self.towers.values().copied().collect())
    }

    fn tower(&self, tower: TowerId) -> Option<TowerSnapshot> {
        self.towers.get(&tower).copied()
    }

    fn set_active(&mut self, tower: TowerId, active: bool) {
        if let Some(entry) = self.towers.get_mut(&tower) {
            entry.active = active;
        }
    }

    fn delete_tower(&mut self, tower: TowerId) -> bool {
        self.towers.remove(&tower).is_some()
    }

    fn connections(&self) -> ConnectionView {
        ConnectionView::from_snapshots(self.connections.values().copied().collect())
    }

    fn connect(&mut self, from: TowerId, to: TowerId) -> ConnectionId {
        let id = ConnectionId::new(self.next_connection);
        self.next_connection += 1;
        let _ = self
            .connections
            .insert(id, ConnectionSnapshot { id, from, to });
        id
    }

    fn disconnect(&mut self, connection: ConnectionId) {
        let _ = self.connections.remove(&connection);
    }

    fn clear_connections(&mut self) {
        self.connections.clear();
    }

    fn ore_vein_at(&self, hex: Hex) -> Option<OreVeinSnapshot> {
        self.veins.get(&hex).copied()
    }
}

/// Checks that connections form a forest of valid edges joining only powered
/// towers, that power matches reachability from sources and that walls stay
/// dark.
pub(crate) fn assert_network_invariants<G: GridOracle>(
    network: &EnergyNetwork<G>,
    store: &MemoryStore,
) {
    let towers: Vec<TowerSnapshot> = store.towers.values().copied().collect();
    let rules = network.edge_rules(&towers);
    let mut sets = UnionFind::new();
    for connection in store.connections.values() {
        let from = store.snapshot(connection.from);
        let to = store.snapshot(connection.to);
        assert!(
            rules.connect_distance(&from, &to).is_some(),
            "connection {connection:?} breaks the edge rules"
        );
        assert!(
            from.active && to.active,
            "connection {connection:?} touches an unpowered tower"
        );
        assert!(
            !from.kind.is_wall() && !to.kind.is_wall(),
            "connection {connection:?} touches a wall"
        );
        assert!(
            sets.union(connection.from, connection.to),
            "connection {connection:?} closes a cycle"
        );
    }

    let sources: Vec<TowerId> = store
        .towers
        .values()
        .filter(|tower| network.is_source(store, tower))
        .map(|tower| tower.id)
        .collect();
    let reachable: BTreeSet<TowerId> = adjacency(store).reachable_from(sources);
    for tower in store.towers.values() {
        let expected = !tower.kind.is_wall() && reachable.contains(&tower.id);
        assert_eq!(
            tower.active, expected,
            "tower {:?} power flag disagrees with reachability",
            tower.id
        );
    }
}
