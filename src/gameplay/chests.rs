//! Treasure chests: proximity opening and item grants.

use bevy::prelude::*;

use crate::gameplay::items::ItemId;
use crate::gameplay::npcs::NpcInteract;
use crate::gameplay::store::GameStore;
use crate::input::InputEdges;
use crate::{GameSet, simulation_running};

/// How close the player must stand to open a chest.
pub const OPEN_RANGE: f32 = 2.0;

/// One treasure chest and its contents.
#[derive(Component, Debug, Clone)]
pub struct Chest {
    pub id: String,
    pub position: Vec3,
    pub item: ItemId,
    pub quantity: u32,
}

// === Systems ===

/// Opens the nearest unopened chest in range on an interact press and
/// grants its contents. Opening is permanent for the session.
fn open_chest(mut edges: ResMut<InputEdges>, mut store: ResMut<GameStore>, chests: Query<&Chest>) {
    if !edges.interact_pressed {
        return;
    }

    let player_pos = store.player.position;
    let nearest = chests
        .iter()
        .filter(|chest| !store.world.chests_opened.contains(&chest.id))
        .map(|chest| (chest, chest.position.distance(player_pos)))
        .filter(|&(_, distance)| distance < OPEN_RANGE)
        .min_by(|a, b| a.1.total_cmp(&b.1));
    let Some((chest, _)) = nearest else {
        return;
    };

    edges.interact_pressed = false;
    store.open_chest(&chest.id);
    store.add_item(chest.item, chest.quantity);
    info!("Opened {}: {:?} x{}", chest.id, chest.item, chest.quantity);
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.add_systems(
        Update,
        open_chest
            .in_set(GameSet::Interact)
            .after(NpcInteract)
            .run_if(simulation_running),
    );
}
