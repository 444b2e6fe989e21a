//! Breadth-first power propagation over the connection graph.

use std::collections::BTreeSet;

use tanabata_core::{GridOracle, OreVeinId, TowerId};
use tracing::debug;

use crate::{adjacency::adjacency, EnergyNetwork, NetworkStore};

impl<G: GridOracle> EnergyNetwork<G> {
    /// Towers reachable through connections from any source miner.
    pub fn powered_towers<S: NetworkStore>(&self, store: &S) -> BTreeSet<TowerId> {
        let towers = store.towers();
        let sources: Vec<TowerId> = towers
            .iter()
            .filter(|tower| self.is_source(store, tower))
            .map(|tower| tower.id)
            .collect();
        adjacency(store).reachable_from(sources)
    }

    /// Ore veins feeding the network component that contains `tower`, in
    /// breadth-first order starting from the tower itself.
    pub fn find_power_sources_for_tower<S: NetworkStore>(
        &self,
        store: &S,
        tower: TowerId,
    ) -> Vec<OreVeinId> {
        if store.tower(tower).is_none() {
            return Vec::new();
        }

        adjacency(store)
            .breadth_first(tower)
            .into_iter()
            .filter_map(|id| store.tower(id))
            .filter(|candidate| self.is_source(store, candidate))
            .filter_map(|source| store.ore_vein_at(source.hex))
            .map(|vein| vein.id)
            .collect()
    }

    /// Shortest chain of connected towers from `tower` to the nearest source,
    /// both ends included.
    pub fn find_path_to_power_source<S: NetworkStore>(
        &self,
        store: &S,
        tower: TowerId,
    ) -> Option<Vec<TowerId>> {
        let _ = store.tower(tower)?;
        adjacency(store).shortest_path(tower, |candidate| {
            store
                .tower(candidate)
                .is_some_and(|snapshot| self.is_source(store, &snapshot))
        })
    }

    /// Recomputes power flags from the existing connections after sources
    /// changed, drops connections that lost power and refreshes every tower.
    pub fn revalidate_power<S, R>(&self, store: &mut S, mut refresh: R)
    where
        S: NetworkStore,
        R: FnMut(TowerId, bool),
    {
        let powered = self.powered_towers(store);
        let changed = apply_power(store, &powered);
        let pruned = prune_orphans(store);
        debug!(
            powered = powered.len(),
            changed, pruned, "revalidated energy network"
        );

        for tower in store.towers().iter() {
            refresh(tower.id, tower.active);
        }
    }
}

/// Writes the powered flag of every tower, forcing walls dark. Returns how
/// many towers flipped.
pub(crate) fn apply_power<S: NetworkStore>(store: &mut S, powered: &BTreeSet<TowerId>) -> usize {
    let mut changed = 0;
    for tower in store.towers().into_vec() {
        let active = !tower.kind.is_wall() && powered.contains(&tower.id);
        if active != tower.active {
            store.set_active(tower.id, active);
            changed += 1;
        }
    }
    changed
}

/// Deletes every connection with a missing or unpowered endpoint. Returns how
/// many connections were removed.
pub(crate) fn prune_orphans<S: NetworkStore>(store: &mut S) -> usize {
    let orphans: Vec<_> = store
        .connections()
        .iter()
        .filter(|connection| {
            let live = |tower| store.tower(tower).is_some_and(|snapshot| snapshot.active);
            !live(connection.from) || !live(connection.to)
        })
        .map(|connection| connection.id)
        .collect();
    for connection in &orphans {
        store.disconnect(*connection);
    }
    orphans.len()
}
