//! Persistence contract: the versioned snapshot, capture/apply, and the
//! auto-save countdown.
//!
//! The crate only defines the snapshot and when to request one; encoding
//! and the storage medium belong to the save collaborator. Restoration is
//! best-effort: a major-version mismatch warns and proceeds, and unknown
//! level ids keep the current level.

use std::collections::BTreeMap;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::gameplay::items::ItemId;
use crate::gameplay::level::LevelId;
use crate::gameplay::store::GameStore;
use crate::{GameSet, simulation_running};

// === Constants ===

pub const SAVE_VERSION: &str = "1.0.0";

/// Seconds of play between auto-save requests.
pub const AUTO_SAVE_INTERVAL: f32 = 60.0;

// === Snapshot ===

/// A complete, versioned save snapshot. Field names follow the external
/// persistence contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveData {
    pub version: String,
    /// Wall-clock milliseconds, supplied by the caller; the simulation
    /// itself never reads a real clock.
    pub timestamp: u64,
    pub play_time: f32,
    pub player: PlayerSave,
    pub world: WorldSave,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSave {
    pub position: [f32; 3],
    pub rotation: [f32; 3],
    pub health: f32,
    pub max_health: f32,
    pub magic: f32,
    pub max_magic: f32,
    pub inventory: Vec<InventoryEntry>,
    pub equipped_item: Option<ItemId>,
    pub rupees: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryEntry {
    pub item_id: ItemId,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldSave {
    pub current_level: String,
    pub time_of_day: f32,
    pub enemies_defeated: Vec<String>,
    pub chests_opened: Vec<String>,
    pub flags: BTreeMap<String, bool>,
    pub npcs_interacted: Vec<String>,
}

/// Major-version compatibility check; minor and patch never gate a load.
#[must_use]
pub fn is_compatible(version: &str) -> bool {
    version.split('.').next() == SAVE_VERSION.split('.').next()
}

/// Snapshots the store. Collections are sorted so two captures of the
/// same state serialize identically.
#[must_use]
pub fn capture(store: &GameStore, timestamp: u64) -> SaveData {
    let sorted = |set: &std::collections::HashSet<String>| {
        let mut items: Vec<String> = set.iter().cloned().collect();
        items.sort_unstable();
        items
    };
    let mut inventory: Vec<InventoryEntry> = store
        .player
        .inventory
        .iter()
        .map(|(&item_id, &quantity)| InventoryEntry { item_id, quantity })
        .collect();
    inventory.sort_unstable_by_key(|entry| entry.item_id);

    SaveData {
        version: SAVE_VERSION.to_string(),
        timestamp,
        play_time: store.play_time,
        player: PlayerSave {
            position: store.player.position.to_array(),
            rotation: store.player.rotation.to_array(),
            health: store.player.health,
            max_health: store.player.max_health,
            magic: store.player.magic,
            max_magic: store.player.max_magic,
            inventory,
            equipped_item: store.player.equipped_item,
            rupees: store.player.rupees,
        },
        world: WorldSave {
            current_level: store.world.current_level.id().to_string(),
            time_of_day: store.world.time_of_day,
            enemies_defeated: sorted(&store.world.enemies_defeated),
            chests_opened: sorted(&store.world.chests_opened),
            flags: store
                .world
                .flags
                .iter()
                .map(|(name, &value)| (name.clone(), value))
                .collect(),
            npcs_interacted: sorted(&store.world.npcs_interacted),
        },
    }
}

/// Restores a snapshot into the store, best-effort, through the mutation
/// API. Typically called on a freshly reset store.
pub fn apply(store: &mut GameStore, data: &SaveData) {
    if !is_compatible(&data.version) {
        warn!(
            "Save version {} does not match {}; restoring best-effort",
            data.version, SAVE_VERSION
        );
    }

    store.set_player_position(Vec3::from_array(data.player.position));
    store.set_player_rotation(Vec3::from_array(data.player.rotation));
    store.player.max_health = data.player.max_health;
    store.player.max_magic = data.player.max_magic;
    store.set_player_health(data.player.health);
    store.set_player_magic(data.player.magic);

    store.player.inventory.clear();
    for entry in &data.player.inventory {
        store.add_item(entry.item_id, entry.quantity);
    }
    store.set_equipped_item(data.player.equipped_item);
    store.player.rupees = data.player.rupees;

    if let Some(level) = LevelId::from_id(&data.world.current_level) {
        store.set_current_level(level);
    } else {
        warn!(
            "Save references unknown level {:?}; keeping {}",
            data.world.current_level,
            store.world.current_level.id()
        );
    }
    store.world.time_of_day = data.world.time_of_day.rem_euclid(1.0);
    for id in &data.world.enemies_defeated {
        store.defeat_enemy(id);
    }
    for id in &data.world.chests_opened {
        store.open_chest(id);
    }
    for (flag, &value) in &data.world.flags {
        store.set_flag(flag, value);
    }
    for id in &data.world.npcs_interacted {
        store.interact_with_npc(id);
    }
    store.play_time = data.play_time;
}

// === Auto-save ===

/// Asks the save collaborator to write the given slot. Emitted by the
/// auto-save countdown; a menu could emit it too.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveRequested {
    pub slot: u32,
}

/// Countdown to the next auto-save, ticked only while playing.
#[derive(Resource, Debug, Clone)]
pub struct AutoSaveTimer {
    pub remaining: f32,
}

impl Default for AutoSaveTimer {
    fn default() -> Self {
        Self {
            remaining: AUTO_SAVE_INTERVAL,
        }
    }
}

// === Systems ===

/// Accrues played time and requests an auto-save each interval.
/// Runs in `GameSet::Time`.
fn tick_session(
    time: Res<Time>,
    mut store: ResMut<GameStore>,
    mut timer: ResMut<AutoSaveTimer>,
    mut requests: MessageWriter<SaveRequested>,
) {
    let delta = time.delta_secs();
    store.play_time += delta;

    timer.remaining -= delta;
    if timer.remaining <= 0.0 {
        timer.remaining += AUTO_SAVE_INTERVAL;
        requests.write(SaveRequested {
            slot: store.save_slot,
        });
        info!("Auto-save requested (slot {})", store.save_slot);
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.add_message::<SaveRequested>();
    app.init_resource::<AutoSaveTimer>();
    app.add_systems(
        Update,
        tick_session.in_set(GameSet::Time).run_if(simulation_running),
    );
}
