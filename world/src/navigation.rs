//! Breadth-first route checks over the hex map.

use std::collections::{BTreeMap, VecDeque};

use tanabata_core::Hex;

use crate::map::HexMap;

/// Step distances to a goal tile, seeded from the goal by a reverse
/// breadth-first search.
///
/// Blocked tiles and tiles that cannot reach the goal are absent from the
/// field, so callers can tell them apart from traversable tiles.
#[derive(Clone, Debug, Default)]
pub(crate) struct NavigationField {
    distances: BTreeMap<Hex, u32>,
}

impl NavigationField {
    /// Rebuilds the distances towards `goal` using a reverse breadth-first search.
    pub(crate) fn rebuild_with<F>(&mut self, map: &HexMap, goal: Hex, mut is_blocked: F)
    where
        F: FnMut(Hex) -> bool,
    {
        self.distances.clear();
        if !map.contains(goal) || is_blocked(goal) {
            return;
        }

        let _ = self.distances.insert(goal, 0);
        let mut queue = VecDeque::from([goal]);

        while let Some(cell) = queue.pop_front() {
            let Some(&current) = self.distances.get(&cell) else {
                continue;
            };
            let next_distance = current.saturating_add(1);

            for neighbor in cell.neighbors() {
                if !map.contains(neighbor) || is_blocked(neighbor) {
                    continue;
                }
                if self.distances.contains_key(&neighbor) {
                    continue;
                }

                let _ = self.distances.insert(neighbor, next_distance);
                queue.push_back(neighbor);
            }
        }
    }

    /// Distance captured for the provided tile, if it can reach the goal.
    #[must_use]
    pub(crate) fn distance(&self, cell: Hex) -> Option<u32> {
        self.distances.get(&cell).copied()
    }
}

/// Length of the route visiting every waypoint in order, or `None` when any
/// leg is cut off.
pub(crate) fn route_length<F>(map: &HexMap, mut is_blocked: F) -> Option<u32>
where
    F: FnMut(Hex) -> bool,
{
    let waypoints = map.waypoints();
    let mut field = NavigationField::default();
    let mut total = 0_u32;

    for leg in waypoints.windows(2) {
        let [from, to] = [leg[0], leg[1]];
        field.rebuild_with(map, to, &mut is_blocked);
        total = total.saturating_add(field.distance(from)?);
    }
    Some(total)
}
