use std::collections::BTreeSet;

use tanabata_core::{Command, Event, Hex, OreVeinId, PlacementError, TowerId, TowerKind};
use tanabata_system_energy_network::NetworkConfig;
use tanabata_world::{self as world, query, World};

fn world_with_radius(radius: u32) -> World {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(&mut world, Command::ConfigureMap { radius }, &mut events);
    world
}

fn run(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);
    events
}

fn place(world: &mut World, kind: TowerKind, hex: Hex) -> TowerId {
    let events = run(world, Command::PlaceTower { kind, hex });
    events
        .iter()
        .find_map(|event| match event {
            Event::TowerPlaced { tower, .. } => Some(*tower),
            _ => None,
        })
        .expect("tower placement succeeded")
}

fn vein(world: &mut World, hex: Hex, power: f32) -> OreVeinId {
    let events = run(world, Command::PlaceOreVein { hex, power });
    events
        .iter()
        .find_map(|event| match event {
            Event::OreVeinPlaced { vein, .. } => Some(*vein),
            _ => None,
        })
        .expect("vein placement succeeded")
}

fn is_active(world: &World, tower: TowerId) -> bool {
    query::tower_view(world)
        .get(tower)
        .is_some_and(|snapshot| snapshot.active)
}

#[test]
fn attacker_beside_powered_miner_draws_power() {
    let mut world = world_with_radius(6);
    let ore = vein(&mut world, Hex::ORIGIN, 0.5);

    let miner_events = run(
        &mut world,
        Command::PlaceTower {
            kind: TowerKind::Miner,
            hex: Hex::ORIGIN,
        },
    );
    let miner = TowerId::new(0);
    assert_eq!(
        miner_events,
        vec![
            Event::TowerPlaced {
                tower: miner,
                kind: TowerKind::Miner,
                hex: Hex::ORIGIN,
            },
            Event::TowerPowerChanged {
                tower: miner,
                active: true,
            },
        ]
    );

    let attacker = place(&mut world, TowerKind::Attacker, Hex::new(1, 0));

    assert!(is_active(&world, attacker));
    assert!(query::connection_view(&world).links(miner, attacker));
    assert_eq!(query::power_sources_for(&world, attacker), vec![ore]);
    assert_eq!(
        query::path_to_power_source(&world, attacker),
        Some(vec![attacker, miner])
    );
}

#[test]
fn attacker_out_of_reach_stays_dark() {
    let mut world = world_with_radius(6);
    let _ = vein(&mut world, Hex::ORIGIN, 0.5);
    let _ = place(&mut world, TowerKind::Miner, Hex::ORIGIN);

    let attacker = place(&mut world, TowerKind::Attacker, Hex::new(2, 0));

    assert!(!is_active(&world, attacker));
    assert!(query::connection_view(&world).is_empty());
    assert!(query::power_sources_for(&world, attacker).is_empty());
    assert_eq!(query::path_to_power_source(&world, attacker), None);
}

#[test]
fn miner_placed_on_a_miner_line_splits_it() {
    let mut world = world_with_radius(6);
    let _ = vein(&mut world, Hex::new(-1, 1), 0.4);
    let _ = vein(&mut world, Hex::new(2, 1), 0.4);
    let west = place(&mut world, TowerKind::Miner, Hex::new(-1, 1));
    let east = place(&mut world, TowerKind::Miner, Hex::new(2, 1));
    assert!(query::connection_view(&world).links(west, east));

    let middle = place(&mut world, TowerKind::Miner, Hex::new(0, 1));

    let connections = query::connection_view(&world);
    assert_eq!(connections.len(), 2);
    assert!(!connections.links(west, east));
    assert!(connections.links(west, middle));
    assert!(connections.links(middle, east));
    assert!(is_active(&world, middle));
}

#[test]
fn walls_never_join_the_network() {
    let mut world = world_with_radius(6);
    let _ = vein(&mut world, Hex::ORIGIN, 0.5);
    let _ = place(&mut world, TowerKind::Miner, Hex::ORIGIN);

    let events = run(
        &mut world,
        Command::PlaceTower {
            kind: TowerKind::Wall,
            hex: Hex::new(0, 1),
        },
    );

    assert_eq!(events.len(), 1, "walls emit no refresh: {events:?}");
    let wall = TowerId::new(1);
    assert!(!is_active(&world, wall));
    assert!(query::connection_view(&world)
        .iter()
        .all(|connection| !connection.touches(wall)));
}

#[test]
fn removing_the_only_miner_darkens_its_branch() {
    let mut world = world_with_radius(6);
    let _ = vein(&mut world, Hex::ORIGIN, 0.5);
    let miner = place(&mut world, TowerKind::Miner, Hex::ORIGIN);
    let near = place(&mut world, TowerKind::Attacker, Hex::new(1, 0));
    let far = place(&mut world, TowerKind::Attacker, Hex::new(2, 0));
    assert!(is_active(&world, far));

    let events = run(&mut world, Command::RemoveTower { tower: miner });

    assert_eq!(
        events,
        vec![
            Event::TowerRemoved {
                tower: miner,
                hex: Hex::ORIGIN,
            },
            Event::TowerPowerChanged {
                tower: near,
                active: false,
            },
            Event::TowerPowerChanged {
                tower: far,
                active: false,
            },
        ]
    );
    assert!(query::connection_view(&world).is_empty());
    assert!(query::powered_towers(&world).is_empty());
    assert_eq!(query::tower_at(&world, Hex::ORIGIN), None);
}

#[test]
fn depleted_vein_stops_feeding_the_network() {
    let mut world = world_with_radius(6);
    let ore = vein(&mut world, Hex::ORIGIN, 0.5);
    let miner = place(&mut world, TowerKind::Miner, Hex::ORIGIN);
    let attacker = place(&mut world, TowerKind::Attacker, Hex::new(1, 0));

    let partial = run(
        &mut world,
        Command::DrainOre {
            vein: ore,
            amount: 10.0,
        },
    );
    assert!(partial.is_empty());
    assert!(is_active(&world, attacker));

    let events = run(
        &mut world,
        Command::DrainOre {
            vein: ore,
            amount: 39.5,
        },
    );

    assert_eq!(
        events,
        vec![
            Event::OreDepleted { vein: ore },
            Event::TowerPowerChanged {
                tower: miner,
                active: false,
            },
            Event::TowerPowerChanged {
                tower: attacker,
                active: false,
            },
        ]
    );
    assert!(query::connection_view(&world).is_empty());
    let reserve = query::ore_vein(&world, ore)
        .map(|snapshot| snapshot.reserve)
        .expect("vein survives depletion");
    assert!((reserve - 0.5).abs() < 1e-4);
}

#[test]
fn vein_placed_under_a_miner_rebuilds_the_network() {
    let mut world = world_with_radius(6);
    let miner = place(&mut world, TowerKind::Miner, Hex::ORIGIN);
    let attacker = place(&mut world, TowerKind::Attacker, Hex::new(0, 1));
    assert!(!is_active(&world, miner));

    let events = run(
        &mut world,
        Command::PlaceOreVein {
            hex: Hex::ORIGIN,
            power: 0.2,
        },
    );

    assert_eq!(events.last(), Some(&Event::NetworkRebuilt { connections: 1 }));
    assert!(is_active(&world, miner));
    assert!(is_active(&world, attacker));
}

#[test]
fn loaded_layout_is_wired_as_a_spanning_forest() {
    let mut world = world_with_radius(6);
    let layout = Command::LoadLayout {
        towers: vec![
            tanabata_core::TowerPlacement {
                kind: TowerKind::Miner,
                hex: Hex::ORIGIN,
            },
            tanabata_core::TowerPlacement {
                kind: TowerKind::Attacker,
                hex: Hex::new(1, 0),
            },
            tanabata_core::TowerPlacement {
                kind: TowerKind::Attacker,
                hex: Hex::new(0, 1),
            },
        ],
        veins: vec![tanabata_core::OreVeinPlacement {
            hex: Hex::ORIGIN,
            power: 0.3,
        }],
    };

    let events = run(&mut world, layout);

    assert!(events.contains(&Event::LayoutLoaded {
        towers: 3,
        veins: 1,
    }));
    assert_eq!(events.last(), Some(&Event::NetworkRebuilt { connections: 2 }));
    let connections = query::connection_view(&world);
    assert!(connections.links(TowerId::new(0), TowerId::new(1)));
    assert!(connections.links(TowerId::new(0), TowerId::new(2)));
    assert!(!connections.links(TowerId::new(1), TowerId::new(2)));
}

#[test]
fn placement_that_seals_the_route_is_rejected() {
    let mut world = world_with_radius(1);
    let entry = query::map(&world).entry();
    let choke = entry
        .neighbors()
        .find(|cell| query::map(&world).contains(*cell))
        .expect("entry touches the map");

    let events = run(
        &mut world,
        Command::PlaceTower {
            kind: TowerKind::Wall,
            hex: choke,
        },
    );

    assert_eq!(
        events,
        vec![Event::TowerPlacementRejected {
            kind: TowerKind::Wall,
            hex: choke,
            reason: PlacementError::BlocksPath,
        }]
    );
    assert!(query::route_length(&world).is_some());
}

#[test]
fn attacker_between_linked_miners_cuts_their_line() {
    let mut world = world_with_radius(8);
    let _ = vein(&mut world, Hex::ORIGIN, 0.5);
    let source = place(&mut world, TowerKind::Miner, Hex::ORIGIN);
    let far = place(&mut world, TowerKind::Miner, Hex::new(3, 0));
    assert!(query::connection_view(&world).links(source, far));

    let events = run(
        &mut world,
        Command::PlaceTower {
            kind: TowerKind::Attacker,
            hex: Hex::new(2, 0),
        },
    );

    assert!(events.contains(&Event::TowerPowerChanged {
        tower: far,
        active: false,
    }));
    assert!(query::connection_view(&world).is_empty());
    assert!(is_active(&world, source));
    assert!(!is_active(&world, far));
    assert_eq!(query::powered_towers(&world), BTreeSet::from([source]));
}

#[test]
fn reconnection_keeps_orphaned_branch_powered() {
    for reconnect_after_removal in [true, false] {
        let mut world = World::with_network_config(NetworkConfig {
            reconnect_after_removal,
            ..NetworkConfig::default()
        });
        let _ = run(&mut world, Command::ConfigureMap { radius: 6 });
        let _ = vein(&mut world, Hex::ORIGIN, 0.5);
        let _ = place(&mut world, TowerKind::Miner, Hex::ORIGIN);
        let hub = place(&mut world, TowerKind::Attacker, Hex::new(1, 0));
        let far = place(&mut world, TowerKind::Attacker, Hex::new(2, 0));
        let side = place(&mut world, TowerKind::Attacker, Hex::new(1, 1));
        let helper = place(&mut world, TowerKind::Attacker, Hex::new(0, 1));
        assert!(query::connection_view(&world).links(hub, far));
        assert!(query::connection_view(&world).links(hub, side));

        let events = run(&mut world, Command::RemoveTower { tower: hub });

        assert_eq!(
            events.first(),
            Some(&Event::TowerRemoved {
                tower: hub,
                hex: Hex::new(1, 0),
            })
        );
        assert!(is_active(&world, helper));
        assert_eq!(is_active(&world, side), reconnect_after_removal);
        assert_eq!(is_active(&world, far), reconnect_after_removal);
        assert_eq!(
            query::connection_view(&world).links(helper, side),
            reconnect_after_removal
        );
        assert_eq!(
            query::path_to_power_source(&world, far).is_some(),
            reconnect_after_removal
        );
    }
}
