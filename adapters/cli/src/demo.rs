//! Scripted session showing how the energy network reacts to placements,
//! removals and ore depletion.

use std::fmt::Write as _;

use tanabata_core::{Command, Event, Hex, OreVeinId, TowerId, TowerKind};
use tanabata_world::{self as world, query, World};
use tracing::{debug, info};

/// Commands replayed by the demo session.
pub(crate) fn script() -> Vec<Command> {
    let tower = |kind, q, r| Command::PlaceTower {
        kind,
        hex: Hex::new(q, r),
    };
    vec![
        Command::ConfigureMap { radius: 6 },
        Command::PlaceOreVein {
            hex: Hex::ORIGIN,
            power: 0.5,
        },
        Command::PlaceOreVein {
            hex: Hex::new(-1, 2),
            power: 0.3,
        },
        Command::PlaceOreVein {
            hex: Hex::new(2, 2),
            power: 0.05,
        },
        tower(TowerKind::Miner, 0, 0),
        tower(TowerKind::Attacker, 1, 0),
        tower(TowerKind::Attacker, 2, 0),
        tower(TowerKind::Wall, 0, 1),
        tower(TowerKind::Miner, -1, 2),
        tower(TowerKind::Miner, 2, 2),
        tower(TowerKind::Miner, 0, 2),
        tower(TowerKind::Attacker, 1, -1),
        Command::RemoveTower {
            tower: TowerId::new(0),
        },
        Command::DrainOre {
            vein: OreVeinId::new(2),
            amount: 4.5,
        },
    ]
}

/// Replays the demo script into the provided world.
pub(crate) fn run(world: &mut World) {
    let mut events = Vec::new();
    for command in script() {
        debug!(?command, "applying demo command");
        world::apply(world, command, &mut events);
        for event in events.drain(..) {
            match event {
                Event::TowerPlacementRejected { kind, hex, reason } => {
                    info!(?kind, q = hex.q(), r = hex.r(), %reason, "placement rejected");
                }
                Event::OreDepleted { vein } => info!(vein = vein.get(), "ore vein depleted"),
                other => debug!(event = ?other, "world event"),
            }
        }
    }
}

/// Human-readable summary of the towers and connections in the world.
pub(crate) fn describe(world: &World) -> String {
    let mut report = String::new();
    let map = query::map(world);
    let route = query::route_length(world)
        .map_or_else(|| "blocked".to_owned(), |length| length.to_string());
    let _ = writeln!(report, "map radius {}, route length {route}", map.radius());

    let towers = query::tower_view(world);
    let powered = query::powered_towers(world);
    for tower in towers.iter() {
        let state = if tower.active { "powered" } else { "dark" };
        let sources: Vec<u32> = query::power_sources_for(world, tower.id)
            .into_iter()
            .map(|vein| vein.get())
            .collect();
        let _ = writeln!(
            report,
            "tower {:>3} {:<8} ({:>3}, {:>3}) {state:<7} sources {sources:?}",
            tower.id.get(),
            format!("{:?}", tower.kind).to_lowercase(),
            tower.hex.q(),
            tower.hex.r(),
        );
    }

    for connection in query::connection_view(world).iter() {
        let _ = writeln!(
            report,
            "link {:>3}: {} -> {}",
            connection.id.get(),
            connection.from.get(),
            connection.to.get()
        );
    }

    let _ = write!(
        report,
        "{} of {} towers powered",
        powered.len(),
        towers.iter().count()
    );
    report
}
