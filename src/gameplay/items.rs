//! Item identifiers and the static item database.

use serde::{Deserialize, Serialize};

/// Every obtainable item in the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemId {
    Sword,
    Shield,
    Bow,
    Bomb,
    Hookshot,
    Boomerang,
    Slingshot,
    HeartContainer,
    MagicJar,
    Key,
    BossKey,
}

/// Static properties of an item type.
#[derive(Debug, Clone, Copy)]
pub struct ItemInfo {
    /// Whether more than one can occupy a single inventory entry.
    pub stackable: bool,
    /// Upper bound for the inventory quantity of this item.
    pub max_stack: u32,
    /// Whether the item can be placed in an equipment slot.
    pub equipable: bool,
}

/// Look up the static properties of an item.
#[must_use]
pub const fn item_info(item: ItemId) -> ItemInfo {
    match item {
        ItemId::Sword | ItemId::Shield | ItemId::Bow | ItemId::Hookshot
        | ItemId::Boomerang | ItemId::Slingshot => ItemInfo {
            stackable: false,
            max_stack: 1,
            equipable: true,
        },
        ItemId::Bomb => ItemInfo {
            stackable: true,
            max_stack: 30,
            equipable: false,
        },
        ItemId::MagicJar => ItemInfo {
            stackable: true,
            max_stack: 4,
            equipable: false,
        },
        ItemId::Key => ItemInfo {
            stackable: true,
            max_stack: 99,
            equipable: false,
        },
        ItemId::HeartContainer | ItemId::BossKey => ItemInfo {
            stackable: false,
            max_stack: 1,
            equipable: false,
        },
    }
}

/// Inventory granted on a fresh game: a sword and a shield.
pub const INITIAL_INVENTORY: [(ItemId, u32); 2] = [(ItemId::Sword, 1), (ItemId::Shield, 1)];
