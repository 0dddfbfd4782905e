//! Village NPCs: proximity interaction and dialogue.

use bevy::prelude::*;

use crate::gameplay::store::GameStore;
use crate::gameplay::time::effects;
use crate::input::InputEdges;
use crate::{GameSet, simulation_running};

/// How close the player must stand to talk.
pub const TALK_RANGE: f32 = 2.5;

/// Public set so chest interaction can order after NPC dialogue; a press
/// that starts a conversation must not also open a chest.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct NpcInteract;

/// One conversational character.
#[derive(Component, Debug, Clone)]
pub struct Npc {
    pub id: String,
    pub name: String,
    pub position: Vec3,
    pub dialogue: Vec<String>,
}

// === Systems ===

/// Starts a conversation with the nearest NPC in range on an interact
/// press. NPCs only respond while the current period keeps them active.
fn talk_to_npc(mut edges: ResMut<InputEdges>, mut store: ResMut<GameStore>, npcs: Query<&Npc>) {
    if !edges.interact_pressed {
        return;
    }
    if !effects(store.world.time_of_day).npcs_active {
        return;
    }

    let player_pos = store.player.position;
    let nearest = npcs
        .iter()
        .map(|npc| (npc, npc.position.distance(player_pos)))
        .filter(|&(_, distance)| distance < TALK_RANGE)
        .min_by(|a, b| a.1.total_cmp(&b.1));
    let Some((npc, _)) = nearest else {
        return;
    };

    edges.interact_pressed = false;
    store.interact_with_npc(&npc.id);
    store.set_dialogue(npc.dialogue.clone());
    debug!("Talking to {}", npc.name);
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.add_systems(
        Update,
        talk_to_npc
            .in_set(GameSet::Interact)
            .in_set(NpcInteract)
            .run_if(simulation_running),
    );
}
