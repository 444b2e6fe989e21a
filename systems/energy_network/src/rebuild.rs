//! Full recomputation of the network as a minimum spanning forest.

use std::collections::BTreeSet;

use tanabata_core::{GridOracle, TowerId, TowerSnapshot};
use tracing::debug;

use crate::{edges::sort_edges, EnergyNetwork, NetworkStore, UnionFind};

impl<G: GridOracle> EnergyNetwork<G> {
    /// Discards every connection and recomputes power from tower positions.
    ///
    /// Candidate edges among non-wall towers are fed to Kruskal's algorithm.
    /// Components holding at least one source are powered and keep their
    /// spanning-tree edges; every other edge is dropped. `refresh` is invoked
    /// once per tower with its final power state.
    pub fn rebuild<S, R>(&self, store: &mut S, mut refresh: R)
    where
        S: NetworkStore,
        R: FnMut(TowerId, bool),
    {
        let towers = store.towers().into_vec();
        for tower in &towers {
            store.set_active(tower.id, false);
        }
        if towers.is_empty() {
            store.clear_connections();
            debug!("rebuilt empty energy network");
            return;
        }

        let members: Vec<TowerSnapshot> = towers
            .iter()
            .filter(|tower| !tower.kind.is_wall())
            .copied()
            .collect();
        let mut edges = self.edge_rules(&towers).all_edges(&members);
        sort_edges(&mut edges);

        let mut sets = UnionFind::new();
        for tower in &members {
            sets.insert(tower.id);
        }
        let forest: Vec<_> = edges
            .into_iter()
            .filter(|edge| sets.union(edge.from, edge.to))
            .collect();

        let source_roots: BTreeSet<TowerId> = members
            .iter()
            .filter(|tower| self.is_source(store, tower))
            .map(|tower| sets.find(tower.id))
            .collect();
        let mut powered = BTreeSet::new();
        for tower in &members {
            if source_roots.contains(&sets.find(tower.id)) {
                store.set_active(tower.id, true);
                let _ = powered.insert(tower.id);
            }
        }

        store.clear_connections();
        let mut kept = 0_usize;
        for edge in forest {
            if powered.contains(&edge.from) && powered.contains(&edge.to) {
                let _ = store.connect(edge.from, edge.to);
                kept += 1;
            }
        }

        debug!(
            towers = towers.len(),
            sources = source_roots.len(),
            powered = powered.len(),
            connections = kept,
            "rebuilt energy network"
        );

        for tower in &towers {
            refresh(tower.id, powered.contains(&tower.id));
        }
    }
}
