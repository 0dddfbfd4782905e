//! The authoritative game state and its mutation surface.
//!
//! Every gameplay system reads and writes through [`GameStore`]. Each
//! mutation touches only the fields it names, all numeric inputs are
//! clamped rather than rejected, and none of the operations can fail.

use std::collections::{HashMap, HashSet};

use bevy::prelude::*;

use crate::gameplay::combat::INVINCIBILITY_DURATION;
use crate::gameplay::items::{INITIAL_INVENTORY, ItemId, item_info};
use crate::gameplay::level::LevelId;
use crate::gameplay::time::INITIAL_TIME_OF_DAY;

// === Constants ===

/// Three hearts, two hit points each.
pub const PLAYER_MAX_HEALTH: f32 = 6.0;

pub const PLAYER_MAX_MAGIC: f32 = 100.0;

/// Where the player stands when a level begins.
pub const PLAYER_SPAWN: Vec3 = Vec3::new(0.0, 1.0, 0.0);

// === Phase ===

/// Top-level mode of the session. Gameplay systems only run in
/// [`GamePhase::Playing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GamePhase {
    #[default]
    Title,
    Playing,
    Paused,
    Dialogue,
    GameOver,
    Loading,
}

// === State Aggregates ===

/// Everything that describes the player for a single instant.
#[derive(Debug, Clone)]
pub struct PlayerState {
    pub position: Vec3,
    /// Euler angles; only yaw (y) is steered by gameplay.
    pub rotation: Vec3,
    pub velocity: Vec3,
    pub health: f32,
    pub max_health: f32,
    pub magic: f32,
    pub max_magic: f32,
    pub grounded: bool,
    pub attacking: bool,
    pub defending: bool,
    pub rolling: bool,
    pub invincible: bool,
    pub target_locked: bool,
    pub target_enemy: Option<String>,
    pub inventory: HashMap<ItemId, u32>,
    pub equipped_item: Option<ItemId>,
    pub rupees: u32,

    // Countdown/accumulator fields backing the action flags. Advanced by
    // the player systems each frame so behavior is reproducible under a
    // controlled clock.
    pub attack_elapsed: f32,
    pub roll_elapsed: f32,
    pub roll_direction: Vec3,
    pub invincibility_remaining: f32,
}

impl PlayerState {
    /// State for a fresh game.
    #[must_use]
    pub fn initial() -> Self {
        Self {
            position: PLAYER_SPAWN,
            rotation: Vec3::ZERO,
            velocity: Vec3::ZERO,
            health: PLAYER_MAX_HEALTH,
            max_health: PLAYER_MAX_HEALTH,
            magic: PLAYER_MAX_MAGIC,
            max_magic: PLAYER_MAX_MAGIC,
            grounded: false,
            attacking: false,
            defending: false,
            rolling: false,
            invincible: false,
            target_locked: false,
            target_enemy: None,
            inventory: INITIAL_INVENTORY.iter().copied().collect(),
            equipped_item: Some(ItemId::Sword),
            rupees: 0,
            attack_elapsed: 0.0,
            roll_elapsed: 0.0,
            roll_direction: Vec3::ZERO,
            invincibility_remaining: 0.0,
        }
    }
}

/// Persistent facts about the world, independent of live entities.
#[derive(Debug, Clone)]
pub struct WorldState {
    pub current_level: LevelId,
    /// Cyclic clock in `[0, 1)`; 0 = midnight, 0.5 = noon.
    pub time_of_day: f32,
    pub enemies_defeated: HashSet<String>,
    pub chests_opened: HashSet<String>,
    pub flags: HashMap<String, bool>,
    pub npcs_interacted: HashSet<String>,
}

impl WorldState {
    #[must_use]
    pub fn initial() -> Self {
        Self {
            current_level: LevelId::MainField,
            time_of_day: INITIAL_TIME_OF_DAY,
            enemies_defeated: HashSet::new(),
            chests_opened: HashSet::new(),
            flags: HashMap::new(),
            npcs_interacted: HashSet::new(),
        }
    }
}

// === Store ===

/// The single shared aggregate of player, world, and transient UI state.
#[derive(Resource, Debug, Clone)]
pub struct GameStore {
    /// Kept private so every transition funnels through [`Self::set_phase`],
    /// which cancels in-flight player actions when play halts.
    phase: GamePhase,
    pub player: PlayerState,
    pub world: WorldState,
    pub show_menu: bool,
    pub dialogue_lines: Vec<String>,
    pub dialogue_index: usize,
    pub save_slot: u32,
    /// Seconds spent in [`GamePhase::Playing`] this session.
    pub play_time: f32,
}

impl Default for GameStore {
    fn default() -> Self {
        Self {
            phase: GamePhase::Title,
            player: PlayerState::initial(),
            world: WorldState::initial(),
            show_menu: false,
            dialogue_lines: Vec::new(),
            dialogue_index: 0,
            save_slot: 0,
            play_time: 0.0,
        }
    }
}

impl GameStore {
    #[must_use]
    pub const fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Switches phase. Leaving [`GamePhase::Playing`] cancels any in-flight
    /// player action instead of letting its timer expire off-screen.
    pub fn set_phase(&mut self, phase: GamePhase) {
        if self.phase == phase {
            return;
        }
        if self.phase == GamePhase::Playing && phase != GamePhase::Playing {
            self.halt_player_actions();
        }
        info!("Game phase: {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }

    fn halt_player_actions(&mut self) {
        self.player.attacking = false;
        self.player.defending = false;
        self.player.rolling = false;
        self.player.invincible = false;
        self.player.attack_elapsed = 0.0;
        self.player.roll_elapsed = 0.0;
        self.player.invincibility_remaining = 0.0;
    }

    // === Player ===

    pub fn set_player_position(&mut self, position: Vec3) {
        self.player.position = position;
    }

    pub fn set_player_rotation(&mut self, rotation: Vec3) {
        self.player.rotation = rotation;
    }

    pub fn set_player_velocity(&mut self, velocity: Vec3) {
        self.player.velocity = velocity;
    }

    /// Clamps to `[0, max_health]`. Reaching zero ends the game in the
    /// same call; callers never observe a dead player still playing.
    pub fn set_player_health(&mut self, health: f32) {
        self.player.health = health.clamp(0.0, self.player.max_health);
        if self.player.health <= 0.0 {
            self.set_phase(GamePhase::GameOver);
        }
    }

    pub fn set_player_magic(&mut self, magic: f32) {
        self.player.magic = magic.clamp(0.0, self.player.max_magic);
    }

    pub fn set_player_grounded(&mut self, grounded: bool) {
        self.player.grounded = grounded;
    }

    pub fn set_player_attacking(&mut self, attacking: bool) {
        self.player.attacking = attacking;
    }

    pub fn set_player_defending(&mut self, defending: bool) {
        self.player.defending = defending;
    }

    pub fn set_player_rolling(&mut self, rolling: bool) {
        self.player.rolling = rolling;
    }

    pub fn set_player_invincible(&mut self, invincible: bool) {
        self.player.invincible = invincible;
    }

    /// Locks or clears the camera target. The enemy id is only retained
    /// while locked.
    pub fn set_target_locked(&mut self, locked: bool, enemy: Option<String>) {
        self.player.target_locked = locked;
        self.player.target_enemy = if locked { enemy } else { None };
    }

    /// Merges into the inventory, capping at the item's stack limit.
    pub fn add_item(&mut self, item: ItemId, quantity: u32) {
        if quantity == 0 {
            return;
        }
        let limit = item_info(item).max_stack;
        let entry = self.player.inventory.entry(item).or_insert(0);
        *entry = entry.saturating_add(quantity).min(limit);
    }

    /// Removes up to `quantity`; entries that reach zero are pruned so the
    /// inventory never holds empty stacks.
    pub fn remove_item(&mut self, item: ItemId, quantity: u32) {
        if let Some(count) = self.player.inventory.get_mut(&item) {
            *count = count.saturating_sub(quantity);
            if *count == 0 {
                self.player.inventory.remove(&item);
            }
        }
    }

    pub fn set_equipped_item(&mut self, item: Option<ItemId>) {
        self.player.equipped_item = item;
    }

    pub fn add_rupees(&mut self, amount: u32) {
        self.player.rupees = self.player.rupees.saturating_add(amount);
    }

    /// Applies damage unless the player is invincible or defending.
    /// A successful hit opens the invincibility window; lethal damage
    /// transitions to [`GamePhase::GameOver`] in the same call.
    pub fn take_damage(&mut self, amount: f32) {
        if self.player.invincible || self.player.defending {
            return;
        }
        self.player.health = (self.player.health - amount).max(0.0);
        self.player.invincible = true;
        self.player.invincibility_remaining = INVINCIBILITY_DURATION;
        if self.player.health <= 0.0 {
            self.set_phase(GamePhase::GameOver);
        }
    }

    pub fn heal(&mut self, amount: f32) {
        self.player.health = (self.player.health + amount).min(self.player.max_health);
    }

    // === World ===

    pub fn set_current_level(&mut self, level: LevelId) {
        self.world.current_level = level;
    }

    /// Advances the clock by a fraction of a day, wrapping modulo 1.
    pub fn advance_time(&mut self, delta_fraction: f32) {
        self.world.time_of_day = (self.world.time_of_day + delta_fraction).rem_euclid(1.0);
    }

    /// Records a defeat. Idempotent; the defeated set only grows.
    pub fn defeat_enemy(&mut self, enemy_id: &str) {
        if self.world.enemies_defeated.insert(enemy_id.to_string()) {
            debug!("Enemy defeated: {enemy_id}");
        }
    }

    pub fn open_chest(&mut self, chest_id: &str) {
        self.world.chests_opened.insert(chest_id.to_string());
    }

    pub fn set_flag(&mut self, flag: &str, value: bool) {
        self.world.flags.insert(flag.to_string(), value);
    }

    pub fn interact_with_npc(&mut self, npc_id: &str) {
        self.world.npcs_interacted.insert(npc_id.to_string());
    }

    // === Dialogue and Menu ===

    pub fn toggle_menu(&mut self) {
        self.show_menu = !self.show_menu;
    }

    /// Opens a dialogue box and suspends play until it is closed.
    pub fn set_dialogue(&mut self, lines: Vec<String>) {
        self.dialogue_lines = lines;
        self.dialogue_index = 0;
        self.set_phase(GamePhase::Dialogue);
    }

    /// Shows the next line, or closes the dialogue after the last one.
    pub fn advance_dialogue(&mut self) {
        if self.dialogue_index + 1 < self.dialogue_lines.len() {
            self.dialogue_index += 1;
        } else {
            self.close_dialogue();
        }
    }

    pub fn close_dialogue(&mut self) {
        self.dialogue_lines.clear();
        self.dialogue_index = 0;
        self.set_phase(GamePhase::Playing);
    }

    pub fn set_save_slot(&mut self, slot: u32) {
        self.save_slot = slot;
    }

    /// Replaces player and world state with fresh values and drops all
    /// transient UI state. Used for new-game and continue-after-game-over.
    pub fn reset(&mut self) {
        self.player = PlayerState::initial();
        self.world = WorldState::initial();
        self.show_menu = false;
        self.dialogue_lines.clear();
        self.dialogue_index = 0;
        self.play_time = 0.0;
        self.set_phase(GamePhase::Playing);
    }
}
