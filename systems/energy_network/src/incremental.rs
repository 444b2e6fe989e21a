//! Incremental network updates after a single tower is placed or removed.

use std::collections::{BTreeSet, VecDeque};

use tanabata_core::{GridOracle, TowerId, TowerSnapshot};
use tracing::{debug, trace};

use crate::{
    adjacency::adjacency,
    edges::{sort_edges, CandidateEdge},
    propagation::{apply_power, prune_orphans},
    EnergyNetwork, NetworkStore, UnionFind,
};

impl<G: GridOracle> EnergyNetwork<G> {
    /// Wires a freshly placed tower into the network.
    ///
    /// A miner landing on an existing miner line splits that line in two.
    /// Any other tower links to the cheapest active tower it can reach,
    /// preferring links that do not close a triangle, and then powers every
    /// inactive tower that becomes reachable from it. Walls and unknown
    /// towers are ignored.
    ///
    /// A tower that lands inside a miner line it cannot split breaks that
    /// line. The network is then recomputed with [`EnergyNetwork::rebuild`],
    /// since towers that lost power may still reach a source elsewhere.
    pub fn insert_tower<S, R>(&self, store: &mut S, tower: TowerId, mut refresh: R)
    where
        S: NetworkStore,
        R: FnMut(TowerId, bool),
    {
        let Some(placed) = store.tower(tower) else {
            return;
        };
        if placed.kind.is_wall() {
            return;
        }

        let intercepted = placed.kind.is_miner() && self.intercept_line(store, &placed);
        if self.cut_blocked_lines(store, &placed) {
            self.rebuild(store, refresh);
            return;
        }
        if intercepted {
            refresh(placed.id, true);
            self.expand_from(store, placed.id, &mut refresh);
            return;
        }

        let towers = store.towers().into_vec();
        let rules = self.edge_rules(&towers);
        let mut candidates: Vec<CandidateEdge> = towers
            .iter()
            .filter(|other| other.active)
            .filter_map(|other| rules.edge(&placed, other))
            .collect();
        sort_edges(&mut candidates);

        if candidates.is_empty() && !self.is_source(store, &placed) {
            store.set_active(placed.id, false);
            refresh(placed.id, false);
            trace!(tower = placed.id.get(), "placed tower has no power");
            return;
        }

        store.set_active(placed.id, true);
        let graph = adjacency(store);
        let chosen = candidates
            .iter()
            .find(|edge| !graph.forms_triangle(edge.from, edge.to))
            .or_else(|| candidates.first());
        if let Some(edge) = chosen {
            let _ = store.connect(edge.from, edge.to);
            debug!(
                from = edge.from.get(),
                to = edge.to.get(),
                weight = edge.weight(),
                "linked placed tower"
            );
        }

        refresh(placed.id, true);
        self.expand_from(store, placed.id, &mut refresh);
    }

    /// Deletes a tower along with its connections and revalidates the
    /// network. Returns `false` when the tower did not exist.
    pub fn remove_tower<S, R>(&self, store: &mut S, tower: TowerId, refresh: R) -> bool
    where
        S: NetworkStore,
        R: FnMut(TowerId, bool),
    {
        let Some(removed) = store.tower(tower) else {
            return false;
        };

        let towers = store.towers().into_vec();
        let rules = self.edge_rules(&towers);
        let mut neighbours: BTreeSet<TowerId> = towers
            .iter()
            .filter(|other| rules.connect_distance(&removed, other).is_some())
            .map(|other| other.id)
            .collect();

        for connection in store.connections().iter() {
            if let Some(other) = connection.other(tower) {
                let _ = neighbours.insert(other);
                store.disconnect(connection.id);
            }
        }
        let _ = store.delete_tower(tower);
        debug!(
            tower = tower.get(),
            neighbours = neighbours.len(),
            "removed tower from energy network"
        );

        let neighbours: Vec<TowerId> = neighbours.into_iter().collect();
        self.handle_removal(store, &neighbours, refresh);
        true
    }

    /// Revalidates power after the caller already deleted a tower and every
    /// connection touching it.
    ///
    /// `neighbours` lists the towers that were, or could have been, linked
    /// to the removed one; when reconnection is enabled they seed the search
    /// for bridges towards towers that lost power.
    pub fn handle_removal<S, R>(&self, store: &mut S, neighbours: &[TowerId], mut refresh: R)
    where
        S: NetworkStore,
        R: FnMut(TowerId, bool),
    {
        let powered = self.powered_towers(store);
        let changed = apply_power(store, &powered);

        if self.config.reconnect_after_removal {
            self.reconnect(store, neighbours);
        }

        let pruned = prune_orphans(store);
        debug!(changed, pruned, "revalidated network after removal");

        for tower in store.towers().iter() {
            refresh(tower.id, tower.active);
        }
    }

    fn intercept_line<S: NetworkStore>(&self, store: &mut S, placed: &TowerSnapshot) -> bool {
        for connection in store.connections().iter() {
            let (Some(first), Some(second)) =
                (store.tower(connection.from), store.tower(connection.to))
            else {
                continue;
            };
            if !first.kind.is_miner() || !second.kind.is_miner() {
                continue;
            }

            let span = self.grid.distance(first.hex, second.hex);
            let to_first = self.grid.distance(first.hex, placed.hex);
            let to_second = self.grid.distance(placed.hex, second.hex);
            let on_segment = to_first > 0
                && to_second > 0
                && to_first + to_second == span
                && self.grid.is_collinear(first.hex, placed.hex);
            if !on_segment {
                continue;
            }

            store.disconnect(connection.id);
            store.set_active(placed.id, true);
            let _ = store.connect(first.id, placed.id);
            let _ = store.connect(placed.id, second.id);
            debug!(
                tower = placed.id.get(),
                from = first.id.get(),
                to = second.id.get(),
                "miner intercepted line"
            );
            return true;
        }
        false
    }

    /// Drops every miner line passing strictly through the placed tower's
    /// cell. Returns whether any line was cut.
    fn cut_blocked_lines<S: NetworkStore>(&self, store: &mut S, placed: &TowerSnapshot) -> bool {
        let mut cut = false;
        for connection in store.connections().iter() {
            let (Some(first), Some(second)) =
                (store.tower(connection.from), store.tower(connection.to))
            else {
                continue;
            };
            if !first.kind.is_miner() || !second.kind.is_miner() {
                continue;
            }
            if !self
                .grid
                .cells_between(first.hex, second.hex)
                .contains(&placed.hex)
            {
                continue;
            }

            store.disconnect(connection.id);
            cut = true;
            debug!(
                tower = placed.id.get(),
                from = first.id.get(),
                to = second.id.get(),
                "placed tower cut miner line"
            );
        }
        cut
    }

    fn expand_from<S, R>(&self, store: &mut S, start: TowerId, refresh: &mut R)
    where
        S: NetworkStore,
        R: FnMut(TowerId, bool),
    {
        let mut towers = store.towers().into_vec();
        let rules = self.edge_rules(&towers);
        let mut graph = adjacency(store);
        let mut queue = VecDeque::from([start]);
        let mut activated = 0_usize;

        while let Some(current_id) = queue.pop_front() {
            let Some(current) = towers.iter().find(|tower| tower.id == current_id).copied() else {
                continue;
            };

            for other in towers.iter_mut() {
                if other.active || other.kind.is_wall() {
                    continue;
                }
                if rules.connect_distance(&current, other).is_none() {
                    continue;
                }
                if graph.forms_triangle(current.id, other.id) {
                    continue;
                }

                other.active = true;
                store.set_active(other.id, true);
                let _ = store.connect(current.id, other.id);
                graph.link(current.id, other.id);
                refresh(other.id, true);
                queue.push_back(other.id);
                activated += 1;
            }
        }

        if activated > 0 {
            debug!(
                start = start.get(),
                activated, "expanded energy network"
            );
        }
    }

    fn reconnect<S: NetworkStore>(&self, store: &mut S, neighbours: &[TowerId]) {
        self.merge_active_networks(store);

        loop {
            let towers = store.towers().into_vec();
            let rules = self.edge_rules(&towers);
            let seeds: Vec<TowerId> = neighbours
                .iter()
                .copied()
                .filter(|id| store.tower(*id).is_some())
                .collect();
            let stranded = adjacency(store).reachable_from(seeds);

            let mut sets = UnionFind::new();
            for tower in &towers {
                sets.insert(tower.id);
            }
            for connection in store.connections().iter() {
                let _ = sets.union(connection.from, connection.to);
            }

            let mut bridges = Vec::new();
            for active in towers.iter().filter(|tower| tower.active) {
                for inactive in towers
                    .iter()
                    .filter(|tower| !tower.active && stranded.contains(&tower.id))
                {
                    if let Some(edge) = rules.edge(active, inactive) {
                        bridges.push(edge);
                    }
                }
            }
            sort_edges(&mut bridges);

            let Some(bridge) = bridges
                .into_iter()
                .find(|edge| !sets.connected(edge.from, edge.to))
            else {
                break;
            };

            let _ = store.connect(bridge.from, bridge.to);
            let powered = self.powered_towers(store);
            let _ = apply_power(store, &powered);
            debug!(
                from = bridge.from.get(),
                to = bridge.to.get(),
                "bridged orphaned tower"
            );
        }
    }

    fn merge_active_networks<S: NetworkStore>(&self, store: &mut S) {
        let towers = store.towers().into_vec();
        let active: Vec<TowerSnapshot> = towers.iter().filter(|tower| tower.active).copied().collect();
        if active.len() <= 1 {
            return;
        }

        let mut sets = UnionFind::new();
        for tower in &active {
            sets.insert(tower.id);
        }
        for connection in store.connections().iter() {
            let both_active = active.iter().any(|tower| tower.id == connection.from)
                && active.iter().any(|tower| tower.id == connection.to);
            if both_active {
                let _ = sets.union(connection.from, connection.to);
            }
        }

        let mut bridges = self.edge_rules(&towers).all_edges(&active);
        sort_edges(&mut bridges);
        for bridge in bridges {
            if sets.union(bridge.from, bridge.to) {
                let _ = store.connect(bridge.from, bridge.to);
                debug!(
                    from = bridge.from.get(),
                    to = bridge.to.get(),
                    "merged active networks"
                );
            }
        }
    }
}
