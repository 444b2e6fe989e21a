#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Tanabata engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and the energy network system. Adapters submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! describing what changed. Read-only views expose towers, ore veins and the
//! energy connections that justify which towers are powered.

mod hex;

pub use hex::{GridOracle, Hex, HexGrid};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Tanabata.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the map with a hexagon of the provided radius, clearing every
    /// tower, connection and ore vein.
    ConfigureMap {
        /// Number of rings surrounding the centre cell.
        radius: u32,
    },
    /// Deposits an ore vein on the provided cell.
    PlaceOreVein {
        /// Cell hosting the vein.
        hex: Hex,
        /// Strength of the vein; the initial reserve scales with it.
        power: f32,
    },
    /// Consumes part of an ore vein's reserve.
    DrainOre {
        /// Vein being mined.
        vein: OreVeinId,
        /// Amount removed from the reserve.
        amount: f32,
    },
    /// Requests placement of a tower on the provided cell.
    PlaceTower {
        /// Type of tower to construct.
        kind: TowerKind,
        /// Cell occupied by the tower.
        hex: Hex,
    },
    /// Requests removal of an existing tower from the world.
    RemoveTower {
        /// Identifier of the tower targeted for removal.
        tower: TowerId,
    },
    /// Recomputes the whole energy network from tower positions.
    RebuildNetwork,
    /// Replaces all towers and veins with the provided layout and rebuilds
    /// the energy network once every piece is in place.
    LoadLayout {
        /// Towers composing the layout.
        towers: Vec<TowerPlacement>,
        /// Ore veins composing the layout.
        veins: Vec<OreVeinPlacement>,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Announces that a fresh map replaced the previous one.
    MapConfigured {
        /// Radius of the new map.
        radius: u32,
    },
    /// Confirms that an ore vein was deposited.
    OreVeinPlaced {
        /// Identifier assigned to the vein.
        vein: OreVeinId,
        /// Cell hosting the vein.
        hex: Hex,
    },
    /// Reports that a vein fell below the depletion threshold and no longer
    /// powers the miner standing on it.
    OreDepleted {
        /// Vein that ran dry.
        vein: OreVeinId,
    },
    /// Confirms that a tower was placed into the world.
    TowerPlaced {
        /// Identifier assigned to the tower by the world.
        tower: TowerId,
        /// Type of tower that was placed.
        kind: TowerKind,
        /// Cell occupied by the tower.
        hex: Hex,
    },
    /// Confirms that a tower was removed from the world.
    TowerRemoved {
        /// Identifier of the tower that was removed.
        tower: TowerId,
        /// Cell previously occupied by the tower.
        hex: Hex,
    },
    /// Reports that a tower placement request was rejected.
    TowerPlacementRejected {
        /// Type of tower requested for placement.
        kind: TowerKind,
        /// Cell provided in the placement request.
        hex: Hex,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Reports that a tower removal request was rejected.
    TowerRemovalRejected {
        /// Identifier of the tower targeted for removal.
        tower: TowerId,
        /// Specific reason the removal failed.
        reason: RemovalError,
    },
    /// Visual refresh request for a tower touched by a network update.
    TowerPowerChanged {
        /// Tower whose appearance should be refreshed.
        tower: TowerId,
        /// Whether the tower is currently powered.
        active: bool,
    },
    /// Confirms that the energy network was recomputed from scratch.
    NetworkRebuilt {
        /// Number of connections that survived the rebuild.
        connections: usize,
    },
    /// Confirms that a layout replaced the previous towers and veins.
    LayoutLoaded {
        /// Number of towers accepted from the layout.
        towers: usize,
        /// Number of veins accepted from the layout.
        veins: usize,
    },
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an ore vein.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OreVeinId(u32);

impl OreVeinId {
    /// Creates a new ore vein identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an energy connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConnectionId(u32);

impl ConnectionId {
    /// Creates a new connection identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Types of towers that can be constructed on the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TowerKind {
    /// Extracts energy when standing on an ore vein and relays it along lines.
    Miner,
    /// Consumes energy to attack.
    Attacker,
    /// Passive obstacle that never joins the energy network.
    Wall,
}

impl TowerKind {
    /// Reports whether the tower is a miner.
    #[must_use]
    pub const fn is_miner(self) -> bool {
        matches!(self, Self::Miner)
    }

    /// Reports whether the tower is a wall.
    #[must_use]
    pub const fn is_wall(self) -> bool {
        matches!(self, Self::Wall)
    }
}

/// Reasons a tower placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum PlacementError {
    /// The requested cell lies outside the map.
    #[error("cell lies outside the map")]
    OutOfBounds,
    /// The requested cell exists but does not accept towers.
    #[error("cell does not accept towers")]
    NotBuildable,
    /// Another tower already stands on the requested cell.
    #[error("cell is already occupied")]
    Occupied,
    /// The tower would cut every route between entry, checkpoints and exit.
    #[error("tower would block the only route to the exit")]
    BlocksPath,
}

/// Reasons a tower removal request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum RemovalError {
    /// No tower with the provided identifier exists.
    #[error("no tower with the requested identifier exists")]
    MissingTower,
}

/// Tower description used when loading a layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TowerPlacement {
    /// Type of tower to construct.
    pub kind: TowerKind,
    /// Cell occupied by the tower.
    pub hex: Hex,
}

/// Ore vein description used when loading a layout.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OreVeinPlacement {
    /// Cell hosting the vein.
    pub hex: Hex,
    /// Strength of the vein.
    pub power: f32,
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Kind of tower that was constructed.
    pub kind: TowerKind,
    /// Cell occupied by the tower.
    pub hex: Hex,
    /// Whether the tower is currently powered.
    pub active: bool,
}

/// Read-only snapshot describing all towers placed on the map.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot captured for a tower.
    #[must_use]
    pub fn get(&self, tower: TowerId) -> Option<&TowerSnapshot> {
        self.snapshots
            .binary_search_by_key(&tower, |snapshot| snapshot.id)
            .ok()
            .and_then(|index| self.snapshots.get(index))
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Energy line drawn between two powered towers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConnectionSnapshot {
    /// Identifier allocated to the connection.
    pub id: ConnectionId,
    /// First endpoint.
    pub from: TowerId,
    /// Second endpoint.
    pub to: TowerId,
}

impl ConnectionSnapshot {
    /// Reports whether the connection ends at the provided tower.
    #[must_use]
    pub fn touches(&self, tower: TowerId) -> bool {
        self.from == tower || self.to == tower
    }

    /// Endpoint opposite to `tower`, if the connection touches it.
    #[must_use]
    pub fn other(&self, tower: TowerId) -> Option<TowerId> {
        if self.from == tower {
            Some(self.to)
        } else if self.to == tower {
            Some(self.from)
        } else {
            None
        }
    }

    /// Reports whether the connection joins exactly the two towers, in either order.
    #[must_use]
    pub fn joins(&self, first: TowerId, second: TowerId) -> bool {
        (self.from == first && self.to == second) || (self.from == second && self.to == first)
    }
}

/// Read-only snapshot describing every energy connection.
#[derive(Clone, Debug, Default)]
pub struct ConnectionView {
    snapshots: Vec<ConnectionSnapshot>,
}

impl ConnectionView {
    /// Creates a new connection view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ConnectionSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured connections in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &ConnectionSnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured connections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no connections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Reports whether any connection joins the two towers.
    #[must_use]
    pub fn links(&self, first: TowerId, second: TowerId) -> bool {
        self.snapshots
            .iter()
            .any(|snapshot| snapshot.joins(first, second))
    }
}

/// Immutable representation of an ore vein.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OreVeinSnapshot {
    /// Identifier allocated to the vein.
    pub id: OreVeinId,
    /// Cell hosting the vein.
    pub hex: Hex,
    /// Strength of the vein.
    pub power: f32,
    /// Reserve left to mine.
    pub reserve: f32,
    /// Reserve the vein started with.
    pub max_reserve: f32,
}

/// Read-only snapshot describing every ore vein.
#[derive(Clone, Debug, Default)]
pub struct OreVeinView {
    snapshots: Vec<OreVeinSnapshot>,
}

impl OreVeinView {
    /// Creates a new ore vein view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<OreVeinSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured veins in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &OreVeinSnapshot> {
        self.snapshots.iter()
    }
}
