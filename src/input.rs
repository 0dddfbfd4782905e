//! Frame input contract: the intent snapshot the platform layer writes
//! and the press edges gameplay systems consume.
//!
//! The simulation never reads devices. Whatever captures keyboard, mouse,
//! or touch state flattens it into an [`InputSnapshot`] before each frame;
//! everything here is plain data.

use bevy::input::keyboard::KeyCode;
use bevy::input::mouse::MouseButton;
use bevy::prelude::*;

use crate::GameSet;

/// One frame of player intent. Booleans are held-state; single-fire
/// presses are derived into [`InputEdges`].
#[derive(Resource, Debug, Clone)]
pub struct InputSnapshot {
    pub move_forward: bool,
    pub move_backward: bool,
    pub move_left: bool,
    pub move_right: bool,

    pub jump: bool,
    pub attack: bool,
    pub defend: bool,
    pub roll: bool,
    pub interact: bool,

    /// Camera rotation deltas accumulated since the last frame.
    pub camera_rotate: Vec2,
    /// Horizontal yaw of the camera, used to make movement camera-relative.
    pub camera_yaw: f32,

    pub pause: bool,
    pub target_lock: bool,

    pub use_item: bool,
    /// Quick slot held this frame, `-1` when none.
    pub item_slot: i32,

    /// Virtual joystick axes in `[-1, 1]`.
    pub touch_move: Vec2,
}

impl Default for InputSnapshot {
    fn default() -> Self {
        Self {
            move_forward: false,
            move_backward: false,
            move_left: false,
            move_right: false,
            jump: false,
            attack: false,
            defend: false,
            roll: false,
            interact: false,
            camera_rotate: Vec2::ZERO,
            camera_yaw: 0.0,
            pause: false,
            target_lock: false,
            use_item: false,
            item_slot: -1,
            touch_move: Vec2::ZERO,
        }
    }
}

/// Intents that fire exactly once, on the frame a control goes down.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct InputEdges {
    pub pause_pressed: bool,
    pub interact_pressed: bool,
    /// Quick slot newly selected this frame.
    pub item_slot_selected: Option<usize>,
}

// === Systems ===

/// Default keyboard bindings for hosts that run Bevy's input plugin:
/// WASD/arrows to move, Space jump, Shift roll, E interact, Q target
/// lock, R use item, Escape/P pause, digits 1-5 for quick slots. Hosts
/// with their own capture layer (touch, replays) write the snapshot
/// directly instead.
fn read_keyboard(keys: Res<ButtonInput<KeyCode>>, mut input: ResMut<InputSnapshot>) {
    input.move_forward = keys.any_pressed([KeyCode::KeyW, KeyCode::ArrowUp]);
    input.move_backward = keys.any_pressed([KeyCode::KeyS, KeyCode::ArrowDown]);
    input.move_left = keys.any_pressed([KeyCode::KeyA, KeyCode::ArrowLeft]);
    input.move_right = keys.any_pressed([KeyCode::KeyD, KeyCode::ArrowRight]);

    input.jump = keys.pressed(KeyCode::Space);
    input.roll = keys.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]);
    input.interact = keys.pressed(KeyCode::KeyE);
    input.target_lock = keys.pressed(KeyCode::KeyQ);
    input.use_item = keys.pressed(KeyCode::KeyR);
    input.pause = keys.any_pressed([KeyCode::Escape, KeyCode::KeyP]);

    const SLOTS: [KeyCode; 5] = [
        KeyCode::Digit1,
        KeyCode::Digit2,
        KeyCode::Digit3,
        KeyCode::Digit4,
        KeyCode::Digit5,
    ];
    input.item_slot = SLOTS
        .iter()
        .position(|&key| keys.pressed(key))
        .map_or(-1, |slot| slot as i32);
}

/// Mouse bindings: left button attacks, right button defends.
fn read_mouse(buttons: Res<ButtonInput<MouseButton>>, mut input: ResMut<InputSnapshot>) {
    input.attack = buttons.pressed(MouseButton::Left);
    input.defend = buttons.pressed(MouseButton::Right);
}

/// Derives press edges by comparing this frame's snapshot with the last.
/// Runs in `GameSet::Input`, unconditionally, so pause works while paused.
fn detect_edges(
    input: Res<InputSnapshot>,
    mut edges: ResMut<InputEdges>,
    mut previous: Local<InputSnapshot>,
) {
    edges.pause_pressed = input.pause && !previous.pause;
    edges.interact_pressed = input.interact && !previous.interact;
    edges.item_slot_selected = if input.item_slot >= 0 && input.item_slot != previous.item_slot {
        usize::try_from(input.item_slot).ok()
    } else {
        None
    };
    *previous = input.clone();
}

// === Plugin ===

pub(crate) fn plugin(app: &mut App) {
    app.init_resource::<InputSnapshot>()
        .init_resource::<InputEdges>()
        .add_systems(
            Update,
            (
                read_keyboard.run_if(resource_exists::<ButtonInput<KeyCode>>),
                read_mouse.run_if(resource_exists::<ButtonInput<MouseButton>>),
                detect_edges,
            )
                .chain()
                .in_set(GameSet::Input),
        );
}
