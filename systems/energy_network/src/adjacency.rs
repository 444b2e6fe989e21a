//! Neighbour lists derived from the current connection set.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use tanabata_core::{ConnectionSnapshot, TowerId};

use crate::NetworkStore;

/// Undirected graph whose edges mirror the energy connections.
#[derive(Clone, Debug, Default)]
pub struct AdjacencyGraph {
    neighbors: BTreeMap<TowerId, BTreeSet<TowerId>>,
}

impl AdjacencyGraph {
    /// Builds the graph from connections, skipping those whose endpoints fail
    /// the `exists` check.
    pub fn from_connections<'a, I, F>(connections: I, mut exists: F) -> Self
    where
        I: IntoIterator<Item = &'a ConnectionSnapshot>,
        F: FnMut(TowerId) -> bool,
    {
        let mut graph = Self::default();
        for connection in connections {
            if exists(connection.from) && exists(connection.to) {
                graph.link(connection.from, connection.to);
            }
        }
        graph
    }

    /// Adds an undirected edge.
    pub fn link(&mut self, a: TowerId, b: TowerId) {
        let _ = self.neighbors.entry(a).or_default().insert(b);
        let _ = self.neighbors.entry(b).or_default().insert(a);
    }

    /// Towers linked to `tower`, in ascending id order.
    pub fn neighbors(&self, tower: TowerId) -> impl Iterator<Item = TowerId> + '_ {
        self.neighbors
            .get(&tower)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    /// Reports whether linking `a` and `b` would close a three-cycle.
    #[must_use]
    pub fn forms_triangle(&self, a: TowerId, b: TowerId) -> bool {
        let (Some(first), Some(second)) = (self.neighbors.get(&a), self.neighbors.get(&b)) else {
            return false;
        };
        first.intersection(second).next().is_some()
    }

    /// Every tower reachable from any of the roots, roots included.
    pub fn reachable_from<I>(&self, roots: I) -> BTreeSet<TowerId>
    where
        I: IntoIterator<Item = TowerId>,
    {
        let mut visited = BTreeSet::new();
        let mut queue = VecDeque::new();
        for root in roots {
            if visited.insert(root) {
                queue.push_back(root);
            }
        }

        while let Some(current) = queue.pop_front() {
            for next in self.neighbors(current) {
                if visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        visited
    }

    /// Towers reachable from `start` in breadth-first order, `start` first.
    #[must_use]
    pub fn breadth_first(&self, start: TowerId) -> Vec<TowerId> {
        let mut visited = BTreeSet::from([start]);
        let mut order = vec![start];
        let mut head = 0;
        while let Some(&current) = order.get(head) {
            head += 1;
            for next in self.neighbors(current) {
                if visited.insert(next) {
                    order.push(next);
                }
            }
        }
        order
    }

    /// Shortest chain of towers from `start` to the first tower satisfying
    /// `is_goal`, both ends included.
    pub fn shortest_path<F>(&self, start: TowerId, mut is_goal: F) -> Option<Vec<TowerId>>
    where
        F: FnMut(TowerId) -> bool,
    {
        let mut came_from: BTreeMap<TowerId, TowerId> = BTreeMap::new();
        let mut queue = VecDeque::from([start]);
        let _ = came_from.insert(start, start);

        while let Some(current) = queue.pop_front() {
            if is_goal(current) {
                let mut path = vec![current];
                let mut cursor = current;
                while cursor != start {
                    cursor = *came_from.get(&cursor)?;
                    path.push(cursor);
                }
                path.reverse();
                return Some(path);
            }

            for next in self.neighbors(current) {
                if !came_from.contains_key(&next) {
                    let _ = came_from.insert(next, current);
                    queue.push_back(next);
                }
            }
        }
        None
    }
}

/// Graph mirroring the store's connections between towers that still exist.
pub(crate) fn adjacency<S: NetworkStore>(store: &S) -> AdjacencyGraph {
    let towers: BTreeSet<TowerId> = store.towers().iter().map(|tower| tower.id).collect();
    let connections = store.connections();
    AdjacencyGraph::from_connections(connections.iter(), |tower| towers.contains(&tower))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tanabata_core::ConnectionId;

    fn id(value: u32) -> TowerId {
        TowerId::new(value)
    }

    fn chain(links: &[(u32, u32)]) -> AdjacencyGraph {
        let mut graph = AdjacencyGraph::default();
        for &(a, b) in links {
            graph.link(id(a), id(b));
        }
        graph
    }

    #[test]
    fn connections_to_missing_towers_are_skipped() {
        let connections = [
            ConnectionSnapshot {
                id: ConnectionId::new(0),
                from: id(1),
                to: id(2),
            },
            ConnectionSnapshot {
                id: ConnectionId::new(1),
                from: id(2),
                to: id(9),
            },
        ];
        let graph = AdjacencyGraph::from_connections(connections.iter(), |tower| tower != id(9));
        assert_eq!(graph.neighbors(id(2)).collect::<Vec<_>>(), vec![id(1)]);
        assert_eq!(graph.neighbors(id(9)).count(), 0);
    }

    #[test]
    fn shared_neighbour_forms_triangle() {
        let graph = chain(&[(1, 2), (2, 3)]);
        assert!(graph.forms_triangle(id(1), id(3)));
        assert!(!graph.forms_triangle(id(1), id(2)));
        assert!(!graph.forms_triangle(id(1), id(7)));
    }

    #[test]
    fn reachability_includes_isolated_roots() {
        let graph = chain(&[(1, 2), (2, 3), (5, 6)]);
        let reached = graph.reachable_from([id(1), id(9)]);
        assert_eq!(reached, BTreeSet::from([id(1), id(2), id(3), id(9)]));
    }

    #[test]
    fn breadth_first_visits_nearest_first() {
        let graph = chain(&[(1, 2), (1, 3), (2, 4)]);
        assert_eq!(graph.breadth_first(id(1)), vec![id(1), id(2), id(3), id(4)]);
    }

    #[test]
    fn shortest_path_walks_to_nearest_goal() {
        let graph = chain(&[(1, 2), (2, 3), (3, 4), (1, 5)]);
        let path = graph.shortest_path(id(4), |tower| tower == id(5) || tower == id(3));
        assert_eq!(path, Some(vec![id(4), id(3)]));
        let path = graph.shortest_path(id(4), |tower| tower == id(5));
        assert_eq!(path, Some(vec![id(4), id(3), id(2), id(1), id(5)]));
        assert_eq!(graph.shortest_path(id(4), |tower| tower == id(8)), None);
    }
}
