//! Session phase transitions driven by pause and interact presses.
//!
//! The store owns the phase itself; this module routes input edges into
//! transitions and propagates play-halt cancellation to live enemies.

use bevy::prelude::*;

use crate::GameSet;
use crate::gameplay::enemies::Enemy;
use crate::gameplay::level::LoadLevel;
use crate::gameplay::store::{GamePhase, GameStore};
use crate::input::InputEdges;

// === Systems ===

/// Pause toggles between playing and paused; other phases ignore it.
fn handle_pause(edges: Res<InputEdges>, mut store: ResMut<GameStore>) {
    if !edges.pause_pressed {
        return;
    }
    match store.phase() {
        GamePhase::Playing => store.set_phase(GamePhase::Paused),
        GamePhase::Paused => store.set_phase(GamePhase::Playing),
        _ => {}
    }
}

/// Routes an interact press by phase: starts a fresh session from the
/// title, continues after a game over, advances an open dialogue. While
/// playing, the press is left for the NPC and chest systems downstream.
fn route_interact(
    mut edges: ResMut<InputEdges>,
    mut store: ResMut<GameStore>,
    mut loads: MessageWriter<LoadLevel>,
) {
    if !edges.interact_pressed {
        return;
    }
    match store.phase() {
        GamePhase::Title | GamePhase::GameOver => {
            edges.interact_pressed = false;
            store.reset();
            loads.write(LoadLevel(store.world.current_level));
        }
        GamePhase::Dialogue => {
            edges.interact_pressed = false;
            store.advance_dialogue();
        }
        _ => {}
    }
}

/// Zeroes per-enemy countdowns the frame play halts, mirroring the
/// store-side cancellation of the player's in-flight actions.
fn cancel_enemy_timers(
    store: Res<GameStore>,
    mut previous: Local<GamePhase>,
    mut enemies: Query<&mut Enemy>,
) {
    let phase = store.phase();
    if *previous == GamePhase::Playing && phase != GamePhase::Playing {
        for mut enemy in &mut enemies {
            enemy.hit_debounce = 0.0;
            enemy.attack_cooldown = 0.0;
        }
    }
    *previous = phase;
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.add_systems(
        Update,
        (handle_pause, route_interact, cancel_enemy_timers)
            .chain()
            .in_set(GameSet::Phase),
    );
}
