use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Everything a player can hold, from keys to ammunition. The wire names
/// match the strings the level editor writes into map files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InventoryItem {
    #[serde(rename = "InventoryItem.RedKey")]
    RedKey,
    #[serde(rename = "InventoryItem.BlueKey")]
    BlueKey,
    #[serde(rename = "InventoryItem.YellowKey")]
    YellowKey,
    #[serde(rename = "InventoryItem.SkeletonKey")]
    SkeletonKey,
    #[serde(rename = "InventoryItem.Backpack")]
    Backpack,
    #[serde(rename = "InventoryItem.Pistol")]
    Pistol,
    #[serde(rename = "InventoryItem.PistolAmmo")]
    PistolAmmo,
    #[serde(rename = "InventoryItem.Shotgun")]
    Shotgun,
    #[serde(rename = "InventoryItem.ShotgunAmmo")]
    ShotgunAmmo,
    #[serde(rename = "InventoryItem.Rifle")]
    Rifle,
    #[serde(rename = "InventoryItem.RifleAmmo")]
    RifleAmmo,
    #[serde(rename = "InventoryItem.RocketLauncher")]
    RocketLauncher,
    #[serde(rename = "InventoryItem.RocketLauncherAmmo")]
    RocketLauncherAmmo,
    #[serde(rename = "InventoryItem.Bfg")]
    Bfg,
    #[serde(rename = "InventoryItem.BfgAmmo")]
    BfgAmmo,
    #[serde(rename = "InventoryItem.Health")]
    Health,
    #[serde(rename = "InventoryItem.Armor")]
    Armor,
}

impl fmt::Display for InventoryItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            InventoryItem::RedKey => "red key",
            InventoryItem::BlueKey => "blue key",
            InventoryItem::YellowKey => "yellow key",
            InventoryItem::SkeletonKey => "skeleton key",
            InventoryItem::Backpack => "backpack",
            InventoryItem::Pistol => "pistol",
            InventoryItem::PistolAmmo => "pistol ammo",
            InventoryItem::Shotgun => "shotgun",
            InventoryItem::ShotgunAmmo => "shotgun shells",
            InventoryItem::Rifle => "rifle",
            InventoryItem::RifleAmmo => "rifle ammo",
            InventoryItem::RocketLauncher => "rocket launcher",
            InventoryItem::RocketLauncherAmmo => "rockets",
            InventoryItem::Bfg => "BFG",
            InventoryItem::BfgAmmo => "BFG charge",
            InventoryItem::Health => "health",
            InventoryItem::Armor => "armor",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy)]
struct ItemRecord {
    count: u32,
    max: u32,
}

impl ItemRecord {
    fn new(max: u32) -> Self {
        Self { count: 0, max }
    }
}

const ITEM_CAPS: &[(InventoryItem, u32)] = &[
    (InventoryItem::RedKey, 1),
    (InventoryItem::BlueKey, 1),
    (InventoryItem::YellowKey, 1),
    (InventoryItem::SkeletonKey, 1),
    (InventoryItem::Backpack, 1),
    (InventoryItem::Pistol, 1),
    (InventoryItem::PistolAmmo, 50),
    (InventoryItem::Shotgun, 1),
    (InventoryItem::ShotgunAmmo, 40),
    (InventoryItem::Rifle, 1),
    (InventoryItem::RifleAmmo, 200),
    (InventoryItem::RocketLauncher, 1),
    (InventoryItem::RocketLauncherAmmo, 8),
    (InventoryItem::Bfg, 1),
    (InventoryItem::BfgAmmo, 4),
];

/// Item ledger with a hard per-item cap. Weapons and keys cap at one, ammo
/// at the per-weapon carrying limit.
pub struct Inventory {
    items: HashMap<InventoryItem, ItemRecord>,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new()
    }
}

impl Inventory {
    pub fn new() -> Self {
        let mut items = HashMap::new();
        for &(item, max) in ITEM_CAPS {
            items.insert(item, ItemRecord::new(max));
        }
        Self { items }
    }

    pub fn reset(&mut self) {
        for record in self.items.values_mut() {
            record.count = 0;
        }
    }

    pub fn reset_weapons(&mut self) {
        for item in [
            InventoryItem::Pistol,
            InventoryItem::PistolAmmo,
            InventoryItem::Shotgun,
            InventoryItem::ShotgunAmmo,
            InventoryItem::Rifle,
            InventoryItem::RifleAmmo,
            InventoryItem::RocketLauncher,
            InventoryItem::RocketLauncherAmmo,
            InventoryItem::Bfg,
            InventoryItem::BfgAmmo,
        ] {
            if let Some(record) = self.items.get_mut(&item) {
                record.count = 0;
            }
        }
    }

    pub fn has_item(&self, item: InventoryItem) -> bool {
        self.item_count(item) > 0
    }

    pub fn item_count(&self, item: InventoryItem) -> u32 {
        self.items.get(&item).map(|r| r.count).unwrap_or(0)
    }

    pub fn is_item_full(&self, item: InventoryItem) -> bool {
        self.items.get(&item).map(|r| r.count == r.max).unwrap_or(true)
    }

    /// Adds up to `amount` of `item`, clamped at the item's cap. Returns
    /// false (and adds nothing) when the cap is already reached.
    pub fn add_item(&mut self, item: InventoryItem, amount: u32) -> bool {
        let Some(record) = self.items.get_mut(&item) else {
            return false;
        };
        if record.count == record.max {
            return false;
        }
        record.count = (record.count + amount).min(record.max);
        true
    }

    pub fn set_item(&mut self, item: InventoryItem, count: u32) {
        if let Some(record) = self.items.get_mut(&item) {
            record.count = count.min(record.max);
        }
    }

    pub fn remove_item(&mut self, item: InventoryItem, amount: u32) {
        if let Some(record) = self.items.get_mut(&item) {
            record.count = record.count.saturating_sub(amount);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_clamps_at_cap_and_refuses_when_full() {
        let mut inventory = Inventory::new();
        assert!(inventory.add_item(InventoryItem::ShotgunAmmo, 35));
        assert!(inventory.add_item(InventoryItem::ShotgunAmmo, 35));
        assert_eq!(inventory.item_count(InventoryItem::ShotgunAmmo), 40);
        assert!(!inventory.add_item(InventoryItem::ShotgunAmmo, 1));
    }

    #[test]
    fn remove_saturates_at_zero() {
        let mut inventory = Inventory::new();
        inventory.add_item(InventoryItem::PistolAmmo, 3);
        inventory.remove_item(InventoryItem::PistolAmmo, 10);
        assert_eq!(inventory.item_count(InventoryItem::PistolAmmo), 0);
    }

    #[test]
    fn reset_weapons_keeps_keys() {
        let mut inventory = Inventory::new();
        inventory.add_item(InventoryItem::RedKey, 1);
        inventory.add_item(InventoryItem::Shotgun, 1);
        inventory.reset_weapons();
        assert!(inventory.has_item(InventoryItem::RedKey));
        assert!(!inventory.has_item(InventoryItem::Shotgun));
    }
}
