//! Axial hex coordinates and the grid adjacency oracle.
//!
//! Cells use pointy-top axial coordinates `(q, r)` with the implicit cube
//! component `s = -q - r`. Two cells lie on a common straight line when they
//! share any of the three cube components.

use serde::{Deserialize, Serialize};

const AXIAL_DIRECTIONS: [(i32, i32); 6] = [(1, 0), (1, -1), (0, -1), (-1, 0), (-1, 1), (0, 1)];

/// Location of a single hex cell expressed in axial coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Hex {
    q: i32,
    r: i32,
}

impl Hex {
    /// Origin cell at the centre of the map.
    pub const ORIGIN: Hex = Hex::new(0, 0);

    /// Creates a new axial coordinate.
    #[must_use]
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Column-like axial component.
    #[must_use]
    pub const fn q(&self) -> i32 {
        self.q
    }

    /// Row-like axial component.
    #[must_use]
    pub const fn r(&self) -> i32 {
        self.r
    }

    /// Implicit third cube component.
    #[must_use]
    pub const fn s(&self) -> i32 {
        -self.q - self.r
    }

    /// Number of unit steps separating two cells.
    #[must_use]
    pub fn distance(self, other: Hex) -> u32 {
        let dq = self.q - other.q;
        let dr = self.r - other.r;
        (dq.unsigned_abs() + dr.unsigned_abs() + (dq + dr).unsigned_abs()) / 2
    }

    /// Reports whether both cells share one of the three hex axes.
    #[must_use]
    pub fn is_on_same_line(self, other: Hex) -> bool {
        self.q == other.q || self.r == other.r || self.s() == other.s()
    }

    /// Six cells that touch this cell, whether or not they exist on a map.
    pub fn neighbors(self) -> impl Iterator<Item = Hex> {
        AXIAL_DIRECTIONS
            .into_iter()
            .map(move |(dq, dr)| Hex::new(self.q + dq, self.r + dr))
    }

    /// Cells visited when drawing a straight line from `self` to `end`,
    /// endpoints included.
    ///
    /// Collinear endpoints are walked with exact unit steps; any other pair
    /// falls back to cube interpolation with rounding.
    #[must_use]
    pub fn line_to(self, end: Hex) -> Vec<Hex> {
        let steps = self.distance(end);
        if steps == 0 {
            return vec![self];
        }

        let mut cells = Vec::with_capacity(steps as usize + 1);
        if self.is_on_same_line(end) {
            let span = steps as i32;
            let step_q = (end.q - self.q) / span;
            let step_r = (end.r - self.r) / span;
            for index in 0..=span {
                cells.push(Hex::new(self.q + step_q * index, self.r + step_r * index));
            }
            return cells;
        }

        let total = f64::from(steps);
        for index in 0..=steps {
            let t = f64::from(index) / total;
            let q = f64::from(self.q) + f64::from(end.q - self.q) * t;
            let r = f64::from(self.r) + f64::from(end.r - self.r) * t;
            cells.push(cube_round(q, r));
        }
        cells
    }

    /// Every cell of a hexagonal area of the given radius centred on `self`.
    pub fn spiral(self, radius: u32) -> impl Iterator<Item = Hex> {
        let radius = radius as i32;
        (-radius..=radius).flat_map(move |dq| {
            let lower = (-radius).max(-dq - radius);
            let upper = radius.min(-dq + radius);
            (lower..=upper).map(move |dr| Hex::new(self.q + dq, self.r + dr))
        })
    }
}

fn cube_round(q: f64, r: f64) -> Hex {
    let s = -q - r;
    let mut rounded_q = q.round();
    let mut rounded_r = r.round();
    let rounded_s = s.round();

    let q_diff = (rounded_q - q).abs();
    let r_diff = (rounded_r - r).abs();
    let s_diff = (rounded_s - s).abs();

    if q_diff > r_diff && q_diff > s_diff {
        rounded_q = -rounded_r - rounded_s;
    } else if r_diff > s_diff {
        rounded_r = -rounded_q - rounded_s;
    }

    Hex::new(rounded_q as i32, rounded_r as i32)
}

/// Geometric queries the energy network needs from the hex grid.
pub trait GridOracle {
    /// Integer hex distance between two cells.
    fn distance(&self, from: Hex, to: Hex) -> u32;

    /// Reports whether both cells are unit neighbours.
    fn is_neighbor(&self, from: Hex, to: Hex) -> bool {
        self.distance(from, to) == 1
    }

    /// Reports whether both cells lie on a common straight line.
    fn is_collinear(&self, from: Hex, to: Hex) -> bool;

    /// Cells strictly between the two endpoints of a straight line.
    fn cells_between(&self, from: Hex, to: Hex) -> Vec<Hex>;
}

/// Unbounded axial hex grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HexGrid;

impl GridOracle for HexGrid {
    fn distance(&self, from: Hex, to: Hex) -> u32 {
        from.distance(to)
    }

    fn is_collinear(&self, from: Hex, to: Hex) -> bool {
        from.is_on_same_line(to)
    }

    fn cells_between(&self, from: Hex, to: Hex) -> Vec<Hex> {
        let line = from.line_to(to);
        if line.len() <= 2 {
            return Vec::new();
        }
        line[1..line.len() - 1].to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_symmetric_across_axes() {
        let origin = Hex::ORIGIN;
        assert_eq!(origin.distance(Hex::new(3, 0)), 3);
        assert_eq!(origin.distance(Hex::new(0, -3)), 3);
        assert_eq!(origin.distance(Hex::new(2, -3)), 3);
        assert_eq!(Hex::new(2, -3).distance(origin), 3);
        assert_eq!(origin.distance(Hex::new(2, 1)), 3);
    }

    #[test]
    fn every_neighbor_is_one_step_away() {
        let center = Hex::new(4, -2);
        let neighbors: Vec<Hex> = center.neighbors().collect();
        assert_eq!(neighbors.len(), 6);
        assert!(neighbors.iter().all(|cell| center.distance(*cell) == 1));
    }

    #[test]
    fn collinearity_follows_cube_axes() {
        let origin = Hex::ORIGIN;
        assert!(origin.is_on_same_line(Hex::new(3, 0)));
        assert!(origin.is_on_same_line(Hex::new(0, 2)));
        assert!(origin.is_on_same_line(Hex::new(2, -2)));
        assert!(!origin.is_on_same_line(Hex::new(2, 1)));
    }

    #[test]
    fn straight_lines_step_through_every_cell() {
        let line = Hex::new(0, 0).line_to(Hex::new(-3, 3));
        assert_eq!(
            line,
            vec![
                Hex::new(0, 0),
                Hex::new(-1, 1),
                Hex::new(-2, 2),
                Hex::new(-3, 3)
            ]
        );
    }

    #[test]
    fn cells_between_excludes_endpoints() {
        let grid = HexGrid;
        assert_eq!(
            grid.cells_between(Hex::new(0, 0), Hex::new(0, 3)),
            vec![Hex::new(0, 1), Hex::new(0, 2)]
        );
        assert!(grid.cells_between(Hex::new(0, 0), Hex::new(1, 0)).is_empty());
    }

    #[test]
    fn skewed_lines_stay_contiguous() {
        let line = Hex::new(0, 0).line_to(Hex::new(3, 1));
        assert_eq!(line.len(), 5);
        for pair in line.windows(2) {
            assert_eq!(pair[0].distance(pair[1]), 1, "gap in {line:?}");
        }
    }

    #[test]
    fn spiral_covers_hexagon() {
        assert_eq!(Hex::ORIGIN.spiral(0).count(), 1);
        assert_eq!(Hex::ORIGIN.spiral(1).count(), 7);
        assert_eq!(Hex::ORIGIN.spiral(2).count(), 19);
        assert!(Hex::ORIGIN.spiral(3).all(|cell| cell.distance(Hex::ORIGIN) <= 3));
    }
}
