//! Hexagonal playfield layout.

use std::collections::BTreeMap;

use tanabata_core::Hex;

/// Role a tile plays on the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TileKind {
    /// Ordinary tile that accepts towers.
    Buildable,
    /// Tile where creeps enter the map.
    Entry,
    /// Tile creeps must reach.
    Exit,
    /// Waypoint creeps must visit between entry and exit.
    Checkpoint,
}

impl TileKind {
    /// Reports whether towers may be constructed on the tile.
    #[must_use]
    pub const fn is_buildable(self) -> bool {
        matches!(self, Self::Buildable)
    }
}

/// Hexagonal map with an entry and exit carved just outside its rim.
#[derive(Clone, Debug)]
pub struct HexMap {
    radius: u32,
    tiles: BTreeMap<Hex, TileKind>,
    entry: Hex,
    exit: Hex,
    checkpoints: Vec<Hex>,
}

impl HexMap {
    /// Creates a hexagon of the provided radius centred on the origin.
    ///
    /// Checkpoints sit on the six axes at `radius - 3` steps from the centre
    /// and are omitted on maps too small to hold them.
    #[must_use]
    pub(crate) fn hexagon(radius: u32) -> Self {
        let mut tiles: BTreeMap<Hex, TileKind> = Hex::ORIGIN
            .spiral(radius)
            .map(|hex| (hex, TileKind::Buildable))
            .collect();

        let reach = i32::try_from(radius).unwrap_or(i32::MAX / 4);
        let offset = reach - reach / 2 + 1;
        let entry = Hex::new(-(reach + 1), offset);
        let exit = Hex::new(reach + 1, -offset);
        let _ = tiles.insert(entry, TileKind::Entry);
        let _ = tiles.insert(exit, TileKind::Exit);

        let span = reach - 3;
        let checkpoints = if span < 1 {
            Vec::new()
        } else {
            vec![
                Hex::new(-span, span),
                Hex::new(span, -span),
                Hex::new(0, -span),
                Hex::new(0, span),
                Hex::new(span, 0),
                Hex::new(-span, 0),
            ]
        };
        for checkpoint in &checkpoints {
            let _ = tiles.insert(*checkpoint, TileKind::Checkpoint);
        }

        Self {
            radius,
            tiles,
            entry,
            exit,
            checkpoints,
        }
    }

    /// Number of rings surrounding the centre tile.
    #[must_use]
    pub fn radius(&self) -> u32 {
        self.radius
    }

    /// Role of the tile at `hex`, if the map contains it.
    #[must_use]
    pub fn tile(&self, hex: Hex) -> Option<TileKind> {
        self.tiles.get(&hex).copied()
    }

    /// Reports whether the map contains `hex`.
    #[must_use]
    pub fn contains(&self, hex: Hex) -> bool {
        self.tiles.contains_key(&hex)
    }

    /// Iterator over every tile in coordinate order.
    pub fn tiles(&self) -> impl Iterator<Item = (Hex, TileKind)> + '_ {
        self.tiles.iter().map(|(hex, kind)| (*hex, *kind))
    }

    /// Number of tiles on the map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Reports whether the map has no tiles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Tile where creeps enter.
    #[must_use]
    pub fn entry(&self) -> Hex {
        self.entry
    }

    /// Tile creeps must reach.
    #[must_use]
    pub fn exit(&self) -> Hex {
        self.exit
    }

    /// Waypoints in visiting order.
    #[must_use]
    pub fn checkpoints(&self) -> &[Hex] {
        &self.checkpoints
    }

    /// Entry, checkpoints and exit in visiting order.
    #[must_use]
    pub fn waypoints(&self) -> Vec<Hex> {
        let mut waypoints = Vec::with_capacity(self.checkpoints.len() + 2);
        waypoints.push(self.entry);
        waypoints.extend_from_slice(&self.checkpoints);
        waypoints.push(self.exit);
        waypoints
    }
}
