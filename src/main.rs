//! Headless demo: drives a scripted session against the simulation and
//! logs its progress. Useful as a smoke test and as a minimal example of
//! hosting the core without a renderer.

use std::time::Duration;

use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

use duskfall::gameplay::store::GameStore;
use duskfall::gameplay::time::format_time;
use duskfall::input::InputSnapshot;

/// Fixed simulated frame delta, roughly 60 fps.
const FRAME: Duration = Duration::from_millis(16);

const SESSION_FRAMES: u32 = 1200;

fn main() {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(LogPlugin::default())
        .add_plugins(duskfall::plugin)
        .insert_resource(TimeUpdateStrategy::ManualDuration(FRAME));

    // First update primes the clock; every later frame advances by FRAME.
    app.update();

    for frame in 0..SESSION_FRAMES {
        script(&mut app.world_mut().resource_mut::<InputSnapshot>(), frame);
        app.update();

        if frame % 120 == 0 {
            let store = app.world().resource::<GameStore>();
            info!(
                "[{}] {:?} | pos {:.1} | health {:.0}/{:.0} | {} rupees",
                format_time(store.world.time_of_day),
                store.phase(),
                store.player.position,
                store.player.health,
                store.player.max_health,
                store.player.rupees,
            );
        }
    }

    let store = app.world().resource::<GameStore>();
    info!(
        "Session over after {:.1}s played: {} enemies defeated, {} chests opened, {} rupees",
        store.play_time,
        store.world.enemies_defeated.len(),
        store.world.chests_opened.len(),
        store.player.rupees,
    );
}

/// One frame of scripted intent: start from the title, wander the field,
/// swing at whatever wanders close, and roll away again.
fn script(input: &mut InputSnapshot, frame: u32) {
    input.interact = frame == 0;

    input.move_forward = (20..320).contains(&frame);
    input.move_right = (380..560).contains(&frame);
    input.move_backward = (700..900).contains(&frame);

    input.attack = (320..380).contains(&frame) && frame % 30 == 0;
    input.defend = (560..620).contains(&frame);
    input.roll = frame == 640;
    input.jump = frame == 950;
}
