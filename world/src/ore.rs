//! Ore veins that feed miners.

use std::collections::BTreeMap;

use tanabata_core::{Hex, OreVeinId, OreVeinSnapshot};

/// Reserve granted per unit of vein power.
pub(crate) const RESERVE_PER_POWER: f32 = 100.0;

#[derive(Debug)]
pub(crate) struct OreField {
    veins: BTreeMap<OreVeinId, OreVeinSnapshot>,
    by_hex: BTreeMap<Hex, OreVeinId>,
    next_vein_id: OreVeinId,
}

impl OreField {
    pub(crate) fn new() -> Self {
        Self {
            veins: BTreeMap::new(),
            by_hex: BTreeMap::new(),
            next_vein_id: OreVeinId::new(0),
        }
    }

    /// Deposits ore on `hex`. A second deposit on the same cell strengthens
    /// the existing vein instead of creating a new one.
    pub(crate) fn deposit(&mut self, hex: Hex, power: f32) -> OreVeinId {
        let added = power.max(0.0) * RESERVE_PER_POWER;
        if let Some(vein) = self
            .by_hex
            .get(&hex)
            .and_then(|id| self.veins.get_mut(id))
        {
            vein.power += power.max(0.0);
            vein.reserve += added;
            vein.max_reserve += added;
            return vein.id;
        }

        let id = self.next_vein_id;
        self.next_vein_id = OreVeinId::new(id.get().saturating_add(1));
        let _ = self.veins.insert(
            id,
            OreVeinSnapshot {
                id,
                hex,
                power: power.max(0.0),
                reserve: added,
                max_reserve: added,
            },
        );
        let _ = self.by_hex.insert(hex, id);
        id
    }

    /// Lowers the reserve of a vein, saturating at zero. Returns the reserve
    /// before and after draining.
    pub(crate) fn drain(&mut self, vein: OreVeinId, amount: f32) -> Option<(f32, f32)> {
        let entry = self.veins.get_mut(&vein)?;
        let before = entry.reserve;
        entry.reserve = (before - amount.max(0.0)).max(0.0);
        Some((before, entry.reserve))
    }

    pub(crate) fn at(&self, hex: Hex) -> Option<OreVeinSnapshot> {
        self.by_hex
            .get(&hex)
            .and_then(|id| self.veins.get(id))
            .copied()
    }

    pub(crate) fn get(&self, vein: OreVeinId) -> Option<OreVeinSnapshot> {
        self.veins.get(&vein).copied()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &OreVeinSnapshot> {
        self.veins.values()
    }

    pub(crate) fn clear(&mut self) {
        self.veins.clear();
        self.by_hex.clear();
    }
}
