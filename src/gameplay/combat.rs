//! Shared combat rules: damage windows, hit debounce, and knockback.
//!
//! The player side of damage application lives on the store
//! (`GameStore::take_damage`); the enemy side lives with the enemy
//! systems. Both draw their thresholds and geometry from here.

use bevy::prelude::*;

// === Constants ===

/// Seconds the player ignores damage after taking a hit.
pub const INVINCIBILITY_DURATION: f32 = 1.5;

/// Seconds after a registered hit during which an enemy ignores the same
/// swing. Stops one held attack from landing every frame.
pub const HIT_DEBOUNCE: f32 = 0.2;

/// Instantaneous displacement applied to a struck enemy.
pub const KNOCKBACK_DISTANCE: f32 = 0.5;

pub const PLAYER_ATTACK_DAMAGE: f32 = 2.0;

pub const PLAYER_ATTACK_RANGE: f32 = 3.5;

// === Helpers ===

/// Displacement pushing `target` directly away from `attacker`. Zero when
/// the two positions coincide.
#[must_use]
pub fn knockback_offset(target: Vec3, attacker: Vec3) -> Vec3 {
    (target - attacker).normalize_or_zero() * KNOCKBACK_DISTANCE
}

/// Whether an enemy of the given body size can be clipped by the player's
/// swing from `player`.
#[must_use]
pub fn in_player_attack_reach(player: Vec3, enemy: Vec3, enemy_size: f32) -> bool {
    player.distance(enemy) < PLAYER_ATTACK_RANGE + enemy_size
}
