//! Gameplay domains: the store, the day-night clock, the player and enemy
//! state machines, proximity interactions, and persistence snapshots.

pub mod chests;
pub mod combat;
pub mod enemies;
pub mod items;
pub mod level;
pub mod npcs;
pub mod phase;
pub mod player;
pub mod save;
pub mod store;
pub mod time;

use bevy::prelude::*;

pub(super) fn plugin(app: &mut App) {
    app.add_plugins((
        phase::plugin,
        level::plugin,
        time::plugin,
        player::plugin,
        npcs::plugin,
        chests::plugin,
        enemies::plugin,
        save::plugin,
    ));
}
