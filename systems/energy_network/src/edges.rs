//! Candidate edge generation and weighting.

use std::collections::BTreeSet;

use tanabata_core::{GridOracle, Hex, TowerId, TowerKind, TowerSnapshot};

/// Base weight of a line joining two miners.
pub const MINER_TO_MINER_BASE: u32 = 100;

/// Base weight of a line joining a miner with a non-miner.
pub const MIXED_BASE: u32 = 200;

/// Base weight of a line joining two non-miners.
pub const NO_MINER_BASE: u32 = 300;

/// Priority of a connection between two tower kinds. Lower is better.
#[must_use]
pub fn edge_weight(from: TowerKind, to: TowerKind, distance: u32) -> u32 {
    let base = match (from.is_miner(), to.is_miner()) {
        (true, true) => MINER_TO_MINER_BASE,
        (true, false) | (false, true) => MIXED_BASE,
        (false, false) => NO_MINER_BASE,
    };
    base + distance
}

/// Possible connection between two towers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CandidateEdge {
    /// Tower the edge was discovered from.
    pub from: TowerId,
    /// Tower the edge leads to.
    pub to: TowerId,
    /// Kind of the `from` tower.
    pub from_kind: TowerKind,
    /// Kind of the `to` tower.
    pub to_kind: TowerKind,
    /// Hex distance between both endpoints.
    pub distance: u32,
}

impl CandidateEdge {
    /// Priority of the edge. Lower is better.
    #[must_use]
    pub fn weight(&self) -> u32 {
        edge_weight(self.from_kind, self.to_kind, self.distance)
    }

    fn sort_key(&self) -> (u32, TowerId, TowerId) {
        (
            self.weight(),
            self.from.min(self.to),
            self.from.max(self.to),
        )
    }
}

/// Orders edges by weight, breaking ties by the smaller then the larger
/// endpoint identifier.
pub fn sort_edges(edges: &mut [CandidateEdge]) {
    edges.sort_by_key(CandidateEdge::sort_key);
}

/// Connectivity rules evaluated against a fixed tower layout.
#[derive(Debug)]
pub(crate) struct EdgeRules<'a, G> {
    grid: &'a G,
    transfer_radius: u32,
    conductors: BTreeSet<Hex>,
}

impl<'a, G: GridOracle> EdgeRules<'a, G> {
    pub(crate) fn new(grid: &'a G, transfer_radius: u32, towers: &[TowerSnapshot]) -> Self {
        let conductors = towers
            .iter()
            .filter(|tower| !tower.kind.is_wall())
            .map(|tower| tower.hex)
            .collect();
        Self {
            grid,
            transfer_radius,
            conductors,
        }
    }

    /// Distance of a legal connection between both towers, if one exists.
    pub(crate) fn connect_distance(&self, a: &TowerSnapshot, b: &TowerSnapshot) -> Option<u32> {
        if a.id == b.id || a.kind.is_wall() || b.kind.is_wall() {
            return None;
        }

        if self.grid.is_neighbor(a.hex, b.hex) {
            return Some(1);
        }

        let distance = self.grid.distance(a.hex, b.hex);
        let miner_line = a.kind.is_miner()
            && b.kind.is_miner()
            && distance > 1
            && distance <= self.transfer_radius
            && self.grid.is_collinear(a.hex, b.hex);
        if !miner_line {
            return None;
        }

        let blocked = self
            .grid
            .cells_between(a.hex, b.hex)
            .iter()
            .any(|cell| self.conductors.contains(cell));
        (!blocked).then_some(distance)
    }

    pub(crate) fn edge(&self, from: &TowerSnapshot, to: &TowerSnapshot) -> Option<CandidateEdge> {
        self.connect_distance(from, to).map(|distance| CandidateEdge {
            from: from.id,
            to: to.id,
            from_kind: from.kind,
            to_kind: to.kind,
            distance,
        })
    }

    /// Every connectable unordered pair, discovered in ascending id order.
    pub(crate) fn all_edges(&self, towers: &[TowerSnapshot]) -> Vec<CandidateEdge> {
        let mut edges = Vec::new();
        for (index, first) in towers.iter().enumerate() {
            for second in &towers[index + 1..] {
                if let Some(edge) = self.edge(first, second) {
                    edges.push(edge);
                }
            }
        }
        edges
    }
}
