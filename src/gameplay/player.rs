//! Per-frame player simulation: movement, jumping, rolling, attacking.
//!
//! The whole controller is a pure function of the store, the input
//! snapshot, and the frame delta, so every rule here can be tested with
//! exact timesteps.

use bevy::prelude::*;

use crate::gameplay::items::item_info;
use crate::gameplay::store::GameStore;
use crate::input::{InputEdges, InputSnapshot};
use crate::{GameSet, simulation_running};

// === Constants ===

pub const MOVE_SPEED: f32 = 5.0;

pub const JUMP_FORCE: f32 = 8.0;

pub const GRAVITY: f32 = 20.0;

/// How fast the character turns toward its movement heading.
pub const ROTATION_SPEED: f32 = 10.0;

pub const ATTACK_COOLDOWN: f32 = 0.4;

pub const ROLL_SPEED: f32 = 10.0;

pub const ROLL_DURATION: f32 = 0.5;

/// Height of the player's center when standing on the ground plane.
pub const GROUND_HEIGHT: f32 = 1.0;

/// Horizontal velocity kept per idle frame. Applied once per frame, not
/// delta-scaled; a faster frame rate brakes harder.
const VELOCITY_DECAY: f32 = 0.9;

/// Analog axes below this are treated as noise.
const TOUCH_DEADZONE: f32 = 0.1;

/// Analog deflection needed to count as a digital direction when picking
/// a roll heading.
const ROLL_TOUCH_THRESHOLD: f32 = 0.3;

// === Frame Logic ===

/// Advances the player by one frame.
///
/// Precedence is strict: an active roll owns the frame; an attack
/// suppresses steering but not gravity; defending is a plain reflection
/// of the input. `bounds` is the half-extent of the current level.
pub(crate) fn advance_player(
    store: &mut GameStore,
    input: &InputSnapshot,
    delta: f32,
    bounds: f32,
) {
    tick_invincibility(store, delta);

    // An active roll displaces the player and consumes the frame.
    if store.player.rolling {
        let displacement = store.player.roll_direction * ROLL_SPEED * delta;
        store.player.position += displacement;
        store.player.roll_elapsed += delta;
        if store.player.roll_elapsed >= ROLL_DURATION {
            store.player.rolling = false;
            store.player.roll_elapsed = 0.0;
        }
        clamp_to_bounds(store, bounds);
        return;
    }

    // Attack: trigger, then accumulate until the swing completes.
    if input.attack && !store.player.attacking && !store.player.rolling {
        store.player.attacking = true;
        store.player.attack_elapsed = 0.0;
    }
    if store.player.attacking {
        store.player.attack_elapsed += delta;
        if store.player.attack_elapsed >= ATTACK_COOLDOWN {
            store.player.attacking = false;
            store.player.attack_elapsed = 0.0;
        }
    }

    store.player.defending = input.defend;

    // Roll trigger. Displacement starts next frame; this frame still moves
    // normally.
    if input.roll && store.player.grounded && !store.player.rolling && !store.player.attacking {
        store.player.rolling = true;
        store.player.roll_elapsed = 0.0;
        store.player.roll_direction = roll_direction(store, input);
    }

    // Steering, camera-relative. Suppressed while a swing is in progress;
    // falling is not.
    let intent = movement_intent(input);
    if intent.length_squared() > 0.0 && !store.player.attacking {
        let direction = Quat::from_rotation_y(input.camera_yaw) * intent.normalize();
        store.player.velocity.x = direction.x * MOVE_SPEED;
        store.player.velocity.z = direction.z * MOVE_SPEED;

        let target_yaw = direction.x.atan2(direction.z);
        let turn = (ROTATION_SPEED * delta).min(1.0);
        store.player.rotation.y = store.player.rotation.y.lerp(target_yaw, turn);
    } else {
        store.player.velocity.x *= VELOCITY_DECAY;
        store.player.velocity.z *= VELOCITY_DECAY;
    }

    store.player.velocity.y -= GRAVITY * delta;
    if input.jump && store.player.grounded {
        store.player.velocity.y = JUMP_FORCE;
        store.player.grounded = false;
    }

    store.player.position += store.player.velocity * delta;
    if store.player.position.y <= GROUND_HEIGHT {
        store.player.position.y = GROUND_HEIGHT;
        store.player.velocity.y = 0.0;
        store.player.grounded = true;
    }

    clamp_to_bounds(store, bounds);
}

fn tick_invincibility(store: &mut GameStore, delta: f32) {
    if store.player.invincible {
        store.player.invincibility_remaining -= delta;
        if store.player.invincibility_remaining <= 0.0 {
            store.player.invincible = false;
            store.player.invincibility_remaining = 0.0;
        }
    }
}

/// Digital movement axes, with analog input replacing them outside the
/// deadzone.
fn movement_intent(input: &InputSnapshot) -> Vec3 {
    let mut intent = Vec3::ZERO;
    if input.move_forward {
        intent.z -= 1.0;
    }
    if input.move_backward {
        intent.z += 1.0;
    }
    if input.move_left {
        intent.x -= 1.0;
    }
    if input.move_right {
        intent.x += 1.0;
    }
    if input.touch_move.x.abs() > TOUCH_DEADZONE || input.touch_move.y.abs() > TOUCH_DEADZONE {
        intent.x = input.touch_move.x;
        intent.z = input.touch_move.y;
    }
    intent
}

/// Heading for a starting roll: the movement intent rotated into camera
/// space, or the character's current facing when no direction is held.
fn roll_direction(store: &GameStore, input: &InputSnapshot) -> Vec3 {
    let mut intent = Vec3::ZERO;
    if input.move_forward || input.touch_move.y < -ROLL_TOUCH_THRESHOLD {
        intent.z -= 1.0;
    }
    if input.move_backward || input.touch_move.y > ROLL_TOUCH_THRESHOLD {
        intent.z += 1.0;
    }
    if input.move_left || input.touch_move.x < -ROLL_TOUCH_THRESHOLD {
        intent.x -= 1.0;
    }
    if input.move_right || input.touch_move.x > ROLL_TOUCH_THRESHOLD {
        intent.x += 1.0;
    }

    if intent.length_squared() > 0.0 {
        Quat::from_rotation_y(input.camera_yaw) * intent.normalize()
    } else {
        let yaw = store.player.rotation.y;
        Vec3::new(yaw.sin(), 0.0, yaw.cos())
    }
}

fn clamp_to_bounds(store: &mut GameStore, bounds: f32) {
    store.player.position.x = store.player.position.x.clamp(-bounds, bounds);
    store.player.position.z = store.player.position.z.clamp(-bounds, bounds);
}

// === Systems ===

/// Runs the player frame. Runs in `GameSet::Player`.
fn update_player(time: Res<Time>, input: Res<InputSnapshot>, mut store: ResMut<GameStore>) {
    let bounds = store.world.current_level.bounds();
    advance_player(&mut store, &input, time.delta_secs(), bounds);
}

/// Equips the item picked by a quick-slot press. Slots address the
/// player's equipable items in a stable order.
fn select_equipment_slot(edges: Res<InputEdges>, mut store: ResMut<GameStore>) {
    let Some(slot) = edges.item_slot_selected else {
        return;
    };
    let mut owned: Vec<_> = store
        .player
        .inventory
        .keys()
        .copied()
        .filter(|item| item_info(*item).equipable)
        .collect();
    owned.sort_unstable();
    if let Some(&item) = owned.get(slot) {
        store.set_equipped_item(Some(item));
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.add_systems(
        Update,
        (update_player, select_equipment_slot)
            .in_set(GameSet::Player)
            .run_if(simulation_running),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gameplay::items::ItemId;
    use crate::gameplay::store::{GamePhase, PLAYER_MAX_HEALTH};
    use pretty_assertions::assert_eq;

    const BOUNDS: f32 = 48.0;
    const STEP: f32 = 0.1;

    fn playing_store() -> GameStore {
        let mut store = GameStore::default();
        store.set_phase(GamePhase::Playing);
        store
    }

    /// One frame with no input, long enough to land the player.
    fn settle(store: &mut GameStore) {
        advance_player(store, &InputSnapshot::default(), STEP, BOUNDS);
        assert!(store.player.grounded);
    }

    fn step(store: &mut GameStore, input: &InputSnapshot) {
        advance_player(store, input, STEP, BOUNDS);
    }

    #[test]
    fn player_settles_onto_ground_plane() {
        let mut store = playing_store();
        assert!(!store.player.grounded);
        settle(&mut store);
        assert_eq!(store.player.position.y, GROUND_HEIGHT);
        assert_eq!(store.player.velocity.y, 0.0);
    }

    #[test]
    fn movement_is_camera_relative() {
        let mut store = playing_store();
        settle(&mut store);

        let input = InputSnapshot {
            move_forward: true,
            camera_yaw: std::f32::consts::FRAC_PI_2,
            ..Default::default()
        };
        step(&mut store, &input);
        // Forward intent (0, 0, -1) swung 90 degrees lands on -x.
        assert!((store.player.velocity.x + MOVE_SPEED).abs() < 1e-4);
        assert!(store.player.velocity.z.abs() < 1e-4);
    }

    #[test]
    fn touch_axes_replace_keyboard_outside_deadzone() {
        let mut store = playing_store();
        settle(&mut store);

        let input = InputSnapshot {
            move_forward: true,
            touch_move: Vec2::new(0.5, 0.0),
            ..Default::default()
        };
        step(&mut store, &input);
        // Touch replaced the whole intent, so movement is pure +x.
        assert!((store.player.velocity.x - MOVE_SPEED).abs() < 1e-4);
        assert!(store.player.velocity.z.abs() < 1e-4);
    }

    #[test]
    fn touch_inside_deadzone_is_noise() {
        let mut store = playing_store();
        settle(&mut store);
        store.player.velocity.x = 5.0;

        let input = InputSnapshot {
            touch_move: Vec2::new(0.05, 0.05),
            ..Default::default()
        };
        step(&mut store, &input);
        assert!((store.player.velocity.x - 4.5).abs() < 1e-4);
    }

    #[test]
    fn idle_velocity_decays_per_frame_not_per_second() {
        let mut store = playing_store();
        settle(&mut store);
        store.player.velocity.x = 5.0;
        store.player.velocity.z = -2.0;

        step(&mut store, &InputSnapshot::default());
        assert!((store.player.velocity.x - 4.5).abs() < 1e-5);
        assert!((store.player.velocity.z + 1.8).abs() < 1e-5);
    }

    #[test]
    fn rotation_turns_toward_heading() {
        let mut store = playing_store();
        settle(&mut store);

        let input = InputSnapshot {
            move_right: true,
            ..Default::default()
        };
        // Half-strength turn: 10 * 0.05 = 0.5 of the way to pi/2.
        advance_player(&mut store, &input, 0.05, BOUNDS);
        let expected = std::f32::consts::FRAC_PI_2 * 0.5;
        assert!((store.player.rotation.y - expected).abs() < 1e-3);
    }

    #[test]
    fn jump_launches_only_from_the_ground() {
        let mut store = playing_store();
        settle(&mut store);

        let jump = InputSnapshot {
            jump: true,
            ..Default::default()
        };
        step(&mut store, &jump);
        assert!(!store.player.grounded);
        assert!((store.player.position.y - (GROUND_HEIGHT + JUMP_FORCE * STEP)).abs() < 1e-4);

        // Holding jump mid-air does nothing.
        let airborne_y = store.player.velocity.y;
        step(&mut store, &jump);
        assert!(store.player.velocity.y < airborne_y);
    }

    #[test]
    fn gravity_brings_the_player_back_down() {
        let mut store = playing_store();
        settle(&mut store);
        step(
            &mut store,
            &InputSnapshot {
                jump: true,
                ..Default::default()
            },
        );
        for _ in 0..20 {
            step(&mut store, &InputSnapshot::default());
        }
        assert!(store.player.grounded);
        assert_eq!(store.player.position.y, GROUND_HEIGHT);
    }

    #[test]
    fn attack_swing_lasts_the_cooldown_and_suppresses_steering() {
        let mut store = playing_store();
        settle(&mut store);

        let input = InputSnapshot {
            attack: true,
            move_forward: true,
            ..Default::default()
        };
        step(&mut store, &input);
        assert!(store.player.attacking);
        // Steering suppressed: velocity decayed instead of being driven.
        assert!(store.player.velocity.z.abs() < 1e-4);

        // 0.4s total elapses on the fourth frame.
        step(&mut store, &input);
        step(&mut store, &input);
        assert!(store.player.attacking);
        step(&mut store, &input);
        assert!(!store.player.attacking);
    }

    #[test]
    fn held_attack_chains_into_a_new_swing() {
        let mut store = playing_store();
        settle(&mut store);
        let input = InputSnapshot {
            attack: true,
            ..Default::default()
        };
        for _ in 0..4 {
            step(&mut store, &input);
        }
        assert!(!store.player.attacking);
        step(&mut store, &input);
        assert!(store.player.attacking);
    }

    #[test]
    fn roll_displaces_exactly_speed_times_duration() {
        let mut store = playing_store();
        settle(&mut store);

        // Trigger with a forward intent; displacement starts next frame.
        let trigger = InputSnapshot {
            roll: true,
            move_forward: true,
            ..Default::default()
        };
        step(&mut store, &trigger);
        assert!(store.player.rolling);
        let start_z = store.player.position.z;

        for _ in 0..5 {
            step(&mut store, &InputSnapshot::default());
        }
        assert!(!store.player.rolling);
        let rolled = start_z - store.player.position.z;
        assert!((rolled - ROLL_SPEED * ROLL_DURATION).abs() < 1e-3);
    }

    #[test]
    fn roll_ignores_gravity_and_other_actions() {
        let mut store = playing_store();
        settle(&mut store);
        step(
            &mut store,
            &InputSnapshot {
                roll: true,
                move_right: true,
                ..Default::default()
            },
        );
        assert!(store.player.rolling);

        // Attack intent during the roll is swallowed whole.
        let mid_roll = InputSnapshot {
            attack: true,
            ..Default::default()
        };
        step(&mut store, &mid_roll);
        assert!(store.player.rolling);
        assert!(!store.player.attacking);
        assert_eq!(store.player.position.y, GROUND_HEIGHT);
    }

    #[test]
    fn roll_without_direction_uses_current_facing() {
        let mut store = playing_store();
        settle(&mut store);
        store.player.rotation.y = std::f32::consts::FRAC_PI_2;

        step(
            &mut store,
            &InputSnapshot {
                roll: true,
                ..Default::default()
            },
        );
        assert!(store.player.rolling);
        assert!((store.player.roll_direction.x - 1.0).abs() < 1e-4);
        assert!(store.player.roll_direction.z.abs() < 1e-4);
    }

    #[test]
    fn airborne_roll_is_refused() {
        let mut store = playing_store();
        settle(&mut store);
        step(
            &mut store,
            &InputSnapshot {
                jump: true,
                ..Default::default()
            },
        );
        step(
            &mut store,
            &InputSnapshot {
                roll: true,
                ..Default::default()
            },
        );
        assert!(!store.player.rolling);
    }

    #[test]
    fn attacking_blocks_a_new_roll() {
        let mut store = playing_store();
        settle(&mut store);
        let both = InputSnapshot {
            attack: true,
            roll: true,
            ..Default::default()
        };
        step(&mut store, &both);
        assert!(store.player.attacking);
        assert!(!store.player.rolling);
    }

    #[test]
    fn defend_mirrors_input_each_frame() {
        let mut store = playing_store();
        settle(&mut store);
        step(
            &mut store,
            &InputSnapshot {
                defend: true,
                ..Default::default()
            },
        );
        assert!(store.player.defending);
        step(&mut store, &InputSnapshot::default());
        assert!(!store.player.defending);
    }

    #[test]
    fn position_stays_inside_level_bounds() {
        let mut store = playing_store();
        settle(&mut store);
        store.player.position.x = BOUNDS - 0.1;
        let input = InputSnapshot {
            move_right: true,
            ..Default::default()
        };
        for _ in 0..10 {
            step(&mut store, &input);
        }
        assert_eq!(store.player.position.x, BOUNDS);
    }

    #[test]
    fn invincibility_window_expires_after_duration() {
        let mut store = playing_store();
        settle(&mut store);

        store.take_damage(2.0);
        assert_eq!(store.player.health, PLAYER_MAX_HEALTH - 2.0);

        // Ten frames in (1.0s) the window still holds.
        for _ in 0..10 {
            step(&mut store, &InputSnapshot::default());
        }
        store.take_damage(2.0);
        assert_eq!(store.player.health, PLAYER_MAX_HEALTH - 2.0);

        // Five more frames pass 1.5s; the next hit lands.
        for _ in 0..5 {
            step(&mut store, &InputSnapshot::default());
        }
        assert!(!store.player.invincible);
        store.take_damage(2.0);
        assert_eq!(store.player.health, PLAYER_MAX_HEALTH - 4.0);
    }

    #[test]
    fn quick_slot_equips_owned_gear_in_stable_order() {
        let mut app = App::new();
        app.init_resource::<InputEdges>();
        let mut store = playing_store();
        store.add_item(ItemId::Bow, 1);
        app.insert_resource(store);
        app.add_systems(Update, select_equipment_slot);

        // Owned equipable gear sorts as [Sword, Shield, Bow].
        app.world_mut().resource_mut::<InputEdges>().item_slot_selected = Some(2);
        app.update();
        assert_eq!(
            app.world().resource::<GameStore>().player.equipped_item,
            Some(ItemId::Bow)
        );

        // A slot past the owned list changes nothing.
        app.world_mut().resource_mut::<InputEdges>().item_slot_selected = Some(4);
        app.update();
        assert_eq!(
            app.world().resource::<GameStore>().player.equipped_item,
            Some(ItemId::Bow)
        );
    }
}
