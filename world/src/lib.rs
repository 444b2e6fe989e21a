#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Tanabata.
//!
//! The world owns the hex map, the towers standing on it, the ore veins
//! beneath them and the energy connections drawn between them. Every mutation
//! goes through [`apply`]; read access goes through the [`query`] module.

mod connections;
mod map;
mod navigation;
mod ore;
mod towers;

pub use map::{HexMap, TileKind};

use connections::ConnectionRegistry;
use ore::OreField;
use tanabata_core::{
    Command, ConnectionId, ConnectionView, Event, Hex, OreVeinPlacement, OreVeinSnapshot,
    PlacementError, RemovalError, TowerId, TowerPlacement, TowerSnapshot, TowerView,
    WELCOME_BANNER,
};
use tanabata_system_energy_network::{EnergyNetwork, NetworkConfig, NetworkStore};
use towers::{TowerRegistry, TowerState};
use tracing::{debug, info, warn};

/// Radius used until a map is configured explicitly.
pub const DEFAULT_MAP_RADIUS: u32 = 13;

/// Largest map radius the world accepts; larger requests are clamped.
pub const MAX_MAP_RADIUS: u32 = 64;

/// Represents the authoritative Tanabata world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    map: HexMap,
    grid: EnergyGrid,
    network: EnergyNetwork,
}

impl World {
    /// Creates a new world with the default map and network settings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_network_config(NetworkConfig::default())
    }

    /// Creates a new world whose energy network uses the provided settings.
    #[must_use]
    pub fn with_network_config(config: NetworkConfig) -> Self {
        Self {
            banner: WELCOME_BANNER,
            map: HexMap::hexagon(DEFAULT_MAP_RADIUS),
            grid: EnergyGrid::new(),
            network: EnergyNetwork::new(config),
        }
    }

    fn validate_placement(&self, hex: Hex) -> Result<(), PlacementError> {
        let tile = self.map.tile(hex).ok_or(PlacementError::OutOfBounds)?;
        if !tile.is_buildable() {
            return Err(PlacementError::NotBuildable);
        }
        if self.grid.towers.at(hex).is_some() {
            return Err(PlacementError::Occupied);
        }

        let blocked = |cell: Hex| cell == hex || self.grid.towers.at(cell).is_some();
        if navigation::route_length(&self.map, blocked).is_none() {
            return Err(PlacementError::BlocksPath);
        }
        Ok(())
    }

    fn deposit_vein(&mut self, placement: OreVeinPlacement, out_events: &mut Vec<Event>) -> bool {
        if !self.map.contains(placement.hex) {
            warn!(
                q = placement.hex.q(),
                r = placement.hex.r(),
                "ignored ore vein outside the map"
            );
            return false;
        }
        let vein = self.grid.ore.deposit(placement.hex, placement.power);
        out_events.push(Event::OreVeinPlaced {
            vein,
            hex: placement.hex,
        });
        true
    }

    fn place_tower(
        &mut self,
        placement: TowerPlacement,
        out_events: &mut Vec<Event>,
    ) -> Option<TowerId> {
        let TowerPlacement { kind, hex } = placement;
        if let Err(reason) = self.validate_placement(hex) {
            debug!(?kind, q = hex.q(), r = hex.r(), %reason, "rejected tower placement");
            out_events.push(Event::TowerPlacementRejected { kind, hex, reason });
            return None;
        }

        let tower = self.grid.towers.insert(kind, hex);
        out_events.push(Event::TowerPlaced { tower, kind, hex });
        Some(tower)
    }

    fn rebuild_network(&mut self, out_events: &mut Vec<Event>) {
        self.network.rebuild(&mut self.grid, |tower, active| {
            out_events.push(Event::TowerPowerChanged { tower, active });
        });
        out_events.push(Event::NetworkRebuilt {
            connections: self.grid.connections.len(),
        });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureMap { radius } => {
            if radius > MAX_MAP_RADIUS {
                warn!(
                    requested = radius,
                    max = MAX_MAP_RADIUS,
                    "map radius clamped"
                );
            }
            let radius = radius.min(MAX_MAP_RADIUS);
            world.map = HexMap::hexagon(radius);
            world.grid.clear();
            info!(radius, tiles = world.map.len(), "configured map");
            out_events.push(Event::MapConfigured { radius });
        }
        Command::PlaceOreVein { hex, power } => {
            if !world.deposit_vein(OreVeinPlacement { hex, power }, out_events) {
                return;
            }

            let miner_on_vein = world
                .grid
                .towers
                .at(hex)
                .and_then(|tower| world.grid.towers.get(tower))
                .is_some_and(|state| state.kind.is_miner());
            if miner_on_vein {
                world.rebuild_network(out_events);
            }
        }
        Command::DrainOre { vein, amount } => {
            let Some((before, after)) = world.grid.ore.drain(vein, amount) else {
                return;
            };
            let threshold = world.network.config().depletion_threshold;
            if before >= threshold && after < threshold {
                info!(vein = vein.get(), reserve = after, "ore vein depleted");
                out_events.push(Event::OreDepleted { vein });
                world.network.revalidate_power(&mut world.grid, |tower, active| {
                    out_events.push(Event::TowerPowerChanged { tower, active });
                });
            }
        }
        Command::PlaceTower { kind, hex } => {
            let Some(tower) = world.place_tower(TowerPlacement { kind, hex }, out_events) else {
                return;
            };
            world.network.insert_tower(&mut world.grid, tower, |tower, active| {
                out_events.push(Event::TowerPowerChanged { tower, active });
            });
        }
        Command::RemoveTower { tower } => {
            let Some(hex) = world.grid.towers.get(tower).map(|state| state.hex) else {
                out_events.push(Event::TowerRemovalRejected {
                    tower,
                    reason: RemovalError::MissingTower,
                });
                return;
            };

            out_events.push(Event::TowerRemoved { tower, hex });
            let _ = world
                .network
                .remove_tower(&mut world.grid, tower, |tower, active| {
                    out_events.push(Event::TowerPowerChanged { tower, active });
                });
        }
        Command::RebuildNetwork => world.rebuild_network(out_events),
        Command::LoadLayout { towers, veins } => {
            world.grid.clear();

            let mut vein_count = 0;
            for placement in veins {
                if world.deposit_vein(placement, out_events) {
                    vein_count += 1;
                }
            }
            let mut tower_count = 0;
            for placement in towers {
                if world.place_tower(placement, out_events).is_some() {
                    tower_count += 1;
                }
            }

            info!(
                towers = tower_count,
                veins = vein_count,
                "loaded layout"
            );
            out_events.push(Event::LayoutLoaded {
                towers: tower_count,
                veins: vein_count,
            });
            world.rebuild_network(out_events);
        }
    }
}

/// Towers, connections and ore consulted by the energy network.
#[derive(Debug)]
struct EnergyGrid {
    towers: TowerRegistry,
    connections: ConnectionRegistry,
    ore: OreField,
}

impl EnergyGrid {
    fn new() -> Self {
        Self {
            towers: TowerRegistry::new(),
            connections: ConnectionRegistry::new(),
            ore: OreField::new(),
        }
    }

    fn clear(&mut self) {
        self.towers.clear();
        self.connections.clear();
        self.ore.clear();
    }
}

impl NetworkStore for EnergyGrid {
    fn towers(&self) -> TowerView {
        TowerView::from_snapshots(self.towers.iter().map(TowerState::snapshot).collect())
    }

    fn tower(&self, tower: TowerId) -> Option<TowerSnapshot> {
        self.towers.get(tower).map(TowerState::snapshot)
    }

    fn set_active(&mut self, tower: TowerId, active: bool) {
        if let Some(state) = self.towers.get_mut(tower) {
            state.active = active;
        }
    }

    fn delete_tower(&mut self, tower: TowerId) -> bool {
        self.towers.remove(tower).is_some()
    }

    fn connections(&self) -> ConnectionView {
        ConnectionView::from_snapshots(self.connections.iter().copied().collect())
    }

    fn connect(&mut self, from: TowerId, to: TowerId) -> ConnectionId {
        self.connections.insert(from, to)
    }

    fn disconnect(&mut self, connection: ConnectionId) {
        self.connections.remove(connection);
    }

    fn clear_connections(&mut self) {
        self.connections.clear();
    }

    fn ore_vein_at(&self, hex: Hex) -> Option<OreVeinSnapshot> {
        self.ore.at(hex)
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::collections::BTreeSet;

    use super::{navigation, HexMap, World};
    use tanabata_core::{
        ConnectionView, Hex, OreVeinId, OreVeinSnapshot, OreVeinView, TowerId, TowerView,
    };
    use tanabata_system_energy_network::{NetworkConfig, NetworkStore};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the hex map.
    #[must_use]
    pub fn map(world: &World) -> &HexMap {
        &world.map
    }

    /// Settings the energy network runs with.
    #[must_use]
    pub fn network_config(world: &World) -> &NetworkConfig {
        world.network.config()
    }

    /// Captures a read-only view of every tower.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        world.grid.towers()
    }

    /// Tower standing on the provided cell, if any.
    #[must_use]
    pub fn tower_at(world: &World, hex: Hex) -> Option<TowerId> {
        world.grid.towers.at(hex)
    }

    /// Captures a read-only view of every energy connection.
    #[must_use]
    pub fn connection_view(world: &World) -> ConnectionView {
        world.grid.connections()
    }

    /// Captures a read-only view of every ore vein.
    #[must_use]
    pub fn ore_view(world: &World) -> OreVeinView {
        OreVeinView::from_snapshots(world.grid.ore.iter().copied().collect())
    }

    /// Looks up a single ore vein.
    #[must_use]
    pub fn ore_vein(world: &World, vein: OreVeinId) -> Option<OreVeinSnapshot> {
        world.grid.ore.get(vein)
    }

    /// Towers reachable through connections from a powered miner.
    #[must_use]
    pub fn powered_towers(world: &World) -> BTreeSet<TowerId> {
        world.network.powered_towers(&world.grid)
    }

    /// Ore veins feeding the network component that contains `tower`.
    #[must_use]
    pub fn power_sources_for(world: &World, tower: TowerId) -> Vec<OreVeinId> {
        world
            .network
            .find_power_sources_for_tower(&world.grid, tower)
    }

    /// Shortest chain of connected towers from `tower` to a powered miner.
    #[must_use]
    pub fn path_to_power_source(world: &World, tower: TowerId) -> Option<Vec<TowerId>> {
        world.network.find_path_to_power_source(&world.grid, tower)
    }

    /// Length of the creep route through every checkpoint, or `None` when
    /// towers cut it off.
    #[must_use]
    pub fn route_length(world: &World) -> Option<u32> {
        navigation::route_length(&world.map, |cell| world.grid.towers.at(cell).is_some())
    }
}
