#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Energy network system that decides which towers are powered.
//!
//! Miners standing on ore veins act as sources. Every other non-wall tower is
//! powered only while a chain of energy connections links it to a source. The
//! system keeps that chain as a minimum-cost forest: [`EnergyNetwork::rebuild`]
//! recomputes it from scratch with Kruskal's algorithm, while
//! [`EnergyNetwork::insert_tower`] and [`EnergyNetwork::remove_tower`] patch it
//! incrementally after single edits.
//!
//! Storage stays with the caller. The system reads and writes towers,
//! connections and ore veins exclusively through [`NetworkStore`], and reports
//! every tower whose appearance may need a refresh through a callback.

mod adjacency;
mod edges;
mod incremental;
mod propagation;
mod rebuild;
mod union_find;

pub use adjacency::AdjacencyGraph;
pub use edges::{
    edge_weight, sort_edges, CandidateEdge, MINER_TO_MINER_BASE, MIXED_BASE, NO_MINER_BASE,
};
pub use union_find::UnionFind;

use serde::{Deserialize, Serialize};
use tanabata_core::{
    ConnectionId, ConnectionView, GridOracle, Hex, HexGrid, OreVeinSnapshot, TowerId,
    TowerSnapshot, TowerView,
};

/// Default reach of a miner-to-miner line measured in hex steps.
pub const DEFAULT_TRANSFER_RADIUS: u32 = 3;

/// Default reserve below which an ore vein stops powering its miner.
pub const DEFAULT_DEPLETION_THRESHOLD: f32 = 1.0;

/// Tunables consumed by the energy network.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Maximum hex distance spanned by a miner-to-miner line.
    pub transfer_radius: u32,
    /// Reserve an ore vein must hold for its miner to count as a source.
    pub depletion_threshold: f32,
    /// Whether removals try to rebuild bridges towards orphaned towers.
    pub reconnect_after_removal: bool,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            transfer_radius: DEFAULT_TRANSFER_RADIUS,
            depletion_threshold: DEFAULT_DEPLETION_THRESHOLD,
            reconnect_after_removal: false,
        }
    }
}

/// Storage consulted and mutated by the energy network.
///
/// Implementations must enumerate towers and connections in ascending
/// identifier order so that every traversal stays deterministic.
pub trait NetworkStore {
    /// Captures every tower currently placed.
    fn towers(&self) -> TowerView;

    /// Looks up a single tower.
    fn tower(&self, tower: TowerId) -> Option<TowerSnapshot>;

    /// Updates the powered flag of a tower. Unknown towers are ignored.
    fn set_active(&mut self, tower: TowerId, active: bool);

    /// Deletes a tower, reporting whether it existed.
    fn delete_tower(&mut self, tower: TowerId) -> bool;

    /// Captures every energy connection.
    fn connections(&self) -> ConnectionView;

    /// Draws a new connection between two towers.
    fn connect(&mut self, from: TowerId, to: TowerId) -> ConnectionId;

    /// Erases a connection. Unknown identifiers are ignored.
    fn disconnect(&mut self, connection: ConnectionId);

    /// Erases every connection.
    fn clear_connections(&mut self);

    /// Ore vein lying under the provided cell, if any.
    fn ore_vein_at(&self, hex: Hex) -> Option<OreVeinSnapshot>;
}

/// Engine maintaining the energy network over a [`NetworkStore`].
#[derive(Clone, Copy, Debug, Default)]
pub struct EnergyNetwork<G = HexGrid> {
    config: NetworkConfig,
    grid: G,
}

impl EnergyNetwork<HexGrid> {
    /// Creates an engine operating on the unbounded axial hex grid.
    #[must_use]
    pub fn new(config: NetworkConfig) -> Self {
        Self::with_grid(config, HexGrid)
    }
}

impl<G: GridOracle> EnergyNetwork<G> {
    /// Creates an engine that answers geometric questions through `grid`.
    #[must_use]
    pub fn with_grid(config: NetworkConfig, grid: G) -> Self {
        Self { config, grid }
    }

    /// Configuration the engine runs with.
    #[must_use]
    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Reports whether the tower is a miner sitting on a vein that still
    /// holds enough reserve to feed the network.
    pub fn is_source<S: NetworkStore>(&self, store: &S, tower: &TowerSnapshot) -> bool {
        tower.kind.is_miner()
            && store
                .ore_vein_at(tower.hex)
                .is_some_and(|vein| vein.reserve >= self.config.depletion_threshold)
    }

    /// Enumerates every connectable pair among the provided towers.
    ///
    /// Walls are skipped and the result is sorted by priority.
    #[must_use]
    pub fn candidate_edges(&self, towers: &[TowerSnapshot]) -> Vec<CandidateEdge> {
        let rules = self.edge_rules(towers);
        let mut edges = rules.all_edges(towers);
        sort_edges(&mut edges);
        edges
    }

    pub(crate) fn edge_rules(&self, towers: &[TowerSnapshot]) -> edges::EdgeRules<'_, G> {
        edges::EdgeRules::new(&self.grid, self.config.transfer_radius, towers)
    }
}

#[cfg(test)]
pub(crate) mod fixtures;
