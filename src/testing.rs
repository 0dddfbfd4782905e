//! Testing utilities for Bevy systems.
//!
//! Every helper app runs on a manual clock: each [`tick`] advances the
//! virtual time by exactly [`FRAME`], so timelines in tests are exact.

#![cfg(test)]

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

use crate::gameplay::level::{LevelId, LoadLevel};
use crate::gameplay::store::GameStore;
use crate::input::InputSnapshot;

/// The fixed frame delta for test apps.
pub const FRAME: Duration = Duration::from_millis(100);

/// Creates a headless app running the full simulation on a manual clock.
/// One priming update is consumed so the first [`tick`] already advances
/// time by a full [`FRAME`].
pub fn create_test_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(crate::plugin);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(FRAME));
    app.update();
    app
}

/// Resets the store to a fresh session and instantiates the given level.
pub fn start_playing(app: &mut App, level: LevelId) {
    {
        let mut store = app.world_mut().resource_mut::<GameStore>();
        store.reset();
        store.set_current_level(level);
    }
    load_level(app, level);
}

/// Requests a level load and runs the frame that performs it.
pub fn load_level(app: &mut App, level: LevelId) {
    app.world_mut().write_message(LoadLevel(level));
    app.update();
}

/// Helper to advance the app by one frame.
pub fn tick(app: &mut App) {
    app.update();
}

/// Helper to advance the app by multiple frames.
pub fn tick_multiple(app: &mut App, count: usize) {
    for _ in 0..count {
        app.update();
    }
}

/// Shorthand for reading the store.
pub fn store(app: &App) -> &GameStore {
    app.world().resource::<GameStore>()
}

/// Presses and releases interact across two frames, producing exactly one
/// press edge.
pub fn press_interact(app: &mut App) {
    press(app, |input, down| input.interact = down);
}

/// Presses and releases pause across two frames.
pub fn press_pause(app: &mut App) {
    press(app, |input, down| input.pause = down);
}

fn press(app: &mut App, set: impl Fn(&mut InputSnapshot, bool)) {
    set(&mut app.world_mut().resource_mut::<InputSnapshot>(), true);
    app.update();
    set(&mut app.world_mut().resource_mut::<InputSnapshot>(), false);
    app.update();
}
