//! Seeded ore vein placement for fresh maps.

use std::ops::Range;

use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tanabata_core::{Command, Hex, OreVeinPlacement};
use tanabata_world::{self as world, query, World};

use crate::layout_transfer::LayoutSnapshot;

/// Strength range drawn for every scattered vein.
const VEIN_POWER: Range<f32> = 0.05..0.70;

/// Scatters `count` ore veins across the buildable tiles of a map with the
/// provided radius. The same seed always yields the same layout.
pub(crate) fn scatter(radius: u32, count: usize, seed: u64) -> LayoutSnapshot {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(&mut world, Command::ConfigureMap { radius }, &mut events);

    let cells: Vec<Hex> = query::map(&world)
        .tiles()
        .filter(|(_, tile)| tile.is_buildable())
        .map(|(hex, _)| hex)
        .collect();

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut chosen: Vec<Hex> = cells.choose_multiple(&mut rng, count).copied().collect();
    chosen.sort();

    let veins = chosen
        .into_iter()
        .map(|hex| OreVeinPlacement {
            hex,
            power: rng.gen_range(VEIN_POWER),
        })
        .collect();

    LayoutSnapshot {
        radius,
        towers: Vec::new(),
        veins,
    }
}
