//! Per-enemy simulation: stat tables, the AI state machine, and the enemy
//! side of combat resolution.
//!
//! Each live enemy is one entity carrying an [`Enemy`] aggregate. Every
//! frame the player's swing is resolved against the enemy first, then the
//! enemy runs its own behavior, with attack taking priority over chase,
//! chase over patrol, and patrol over idle. Enemies are processed in id
//! order so a session replays identically.

use bevy::prelude::*;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::gameplay::combat::{
    HIT_DEBOUNCE, PLAYER_ATTACK_DAMAGE, in_player_attack_reach, knockback_offset,
};
use crate::gameplay::items::ItemId;
use crate::gameplay::level::{EnemySpawn, LevelEntity};
use crate::gameplay::store::GameStore;
use crate::gameplay::time::is_daytime;
use crate::{GameRng, GameSet, simulation_running};

// === Constants ===

/// Patrolling enemies amble at half their chase speed.
pub const PATROL_SPEED_FACTOR: f32 = 0.5;

/// Distance at which a waypoint counts as reached.
pub const WAYPOINT_THRESHOLD: f32 = 0.5;

// === Enemy Kinds ===

/// Every enemy species in the bestiary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    Slime,
    Skeleton,
    Lizalfos,
    Stalfos,
    Keese,
    /// Only walks the world at night.
    Ghost,
    DekuBaba,
    Frizzard,
}

impl EnemyKind {
    /// All kinds, for iteration.
    pub const ALL: &[Self] = &[
        Self::Slime,
        Self::Skeleton,
        Self::Lizalfos,
        Self::Stalfos,
        Self::Keese,
        Self::Ghost,
        Self::DekuBaba,
        Self::Frizzard,
    ];

    /// Parses the type string used by level data. `None` for unknown
    /// types; the caller logs and skips the spawn.
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "slime" => Some(Self::Slime),
            "skeleton" => Some(Self::Skeleton),
            "lizalfos" => Some(Self::Lizalfos),
            "stalfos" => Some(Self::Stalfos),
            "keese" => Some(Self::Keese),
            "ghost" => Some(Self::Ghost),
            "deku_baba" => Some(Self::DekuBaba),
            "frizzard" => Some(Self::Frizzard),
            _ => None,
        }
    }

    /// Human-readable display name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Slime => "Slime",
            Self::Skeleton => "Skeleton",
            Self::Lizalfos => "Lizalfos",
            Self::Stalfos => "Stalfos",
            Self::Keese => "Keese",
            Self::Ghost => "Ghost",
            Self::DekuBaba => "Deku Baba",
            Self::Frizzard => "Frizzard",
        }
    }
}

/// Stats for an enemy kind. All values are compile-time constants.
#[derive(Debug, Clone, Copy)]
pub struct EnemyStats {
    pub health: f32,
    pub damage: f32,
    pub speed: f32,
    pub detection_range: f32,
    pub attack_range: f32,
    pub attack_cooldown: f32,
    /// Body radius, added to the player's reach when checking hits.
    pub size: f32,
    /// Rupees credited on defeat.
    pub rupee_reward: u32,
}

/// Look up stats for an enemy kind.
#[must_use]
pub const fn enemy_stats(kind: EnemyKind) -> EnemyStats {
    match kind {
        EnemyKind::Slime => EnemyStats {
            health: 2.0,
            damage: 1.0,
            speed: 1.5,
            detection_range: 8.0,
            attack_range: 1.5,
            attack_cooldown: 2.0,
            size: 0.4,
            rupee_reward: 1,
        },
        EnemyKind::Skeleton => EnemyStats {
            health: 3.0,
            damage: 1.0,
            speed: 2.5,
            detection_range: 10.0,
            attack_range: 2.0,
            attack_cooldown: 1.5,
            size: 0.5,
            rupee_reward: 5,
        },
        EnemyKind::Lizalfos => EnemyStats {
            health: 4.0,
            damage: 1.0,
            speed: 3.0,
            detection_range: 10.0,
            attack_range: 1.8,
            attack_cooldown: 1.2,
            size: 0.5,
            rupee_reward: 10,
        },
        EnemyKind::Stalfos => EnemyStats {
            health: 5.0,
            damage: 2.0,
            speed: 2.0,
            detection_range: 12.0,
            attack_range: 2.0,
            attack_cooldown: 1.5,
            size: 0.6,
            rupee_reward: 20,
        },
        EnemyKind::Keese => EnemyStats {
            health: 1.0,
            damage: 1.0,
            speed: 3.5,
            detection_range: 9.0,
            attack_range: 1.2,
            attack_cooldown: 2.0,
            size: 0.3,
            rupee_reward: 1,
        },
        EnemyKind::Ghost => EnemyStats {
            health: 3.0,
            damage: 2.0,
            speed: 1.8,
            detection_range: 12.0,
            attack_range: 1.5,
            attack_cooldown: 1.8,
            size: 0.5,
            rupee_reward: 15,
        },
        EnemyKind::DekuBaba => EnemyStats {
            health: 2.0,
            damage: 1.0,
            speed: 0.8,
            detection_range: 6.0,
            attack_range: 2.0,
            attack_cooldown: 1.5,
            size: 0.4,
            rupee_reward: 5,
        },
        EnemyKind::Frizzard => EnemyStats {
            health: 3.0,
            damage: 2.0,
            speed: 1.2,
            detection_range: 9.0,
            attack_range: 2.5,
            attack_cooldown: 2.0,
            size: 0.5,
            rupee_reward: 10,
        },
    }
}

// === Drops ===

/// One row of an enemy's drop table.
#[derive(Debug, Clone, Copy)]
pub struct ItemDrop {
    pub item: ItemId,
    /// Probability in `[0, 1]`.
    pub chance: f64,
    pub min_quantity: u32,
    pub max_quantity: u32,
}

/// Item drops rolled on defeat, in addition to the rupee reward.
#[must_use]
pub const fn drop_table(kind: EnemyKind) -> &'static [ItemDrop] {
    match kind {
        EnemyKind::Slime => &[ItemDrop {
            item: ItemId::MagicJar,
            chance: 0.1,
            min_quantity: 1,
            max_quantity: 1,
        }],
        EnemyKind::Skeleton => &[ItemDrop {
            item: ItemId::Bomb,
            chance: 0.2,
            min_quantity: 1,
            max_quantity: 3,
        }],
        _ => &[],
    }
}

// === Components ===

/// Behavior states, re-evaluated from scratch every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AiState {
    #[default]
    Idle,
    Patrol,
    Chase,
    Attack,
}

/// One live enemy. The whole per-entity aggregate lives in a single
/// component so the frame logic is a plain function over it.
#[derive(Component, Debug, Clone)]
pub struct Enemy {
    /// Stable spawn id, recorded in the defeated set on death.
    pub id: String,
    pub kind: EnemyKind,
    pub position: Vec3,
    pub health: f32,
    pub alive: bool,
    pub state: AiState,
    /// Seconds left before the player's swing can land again.
    pub hit_debounce: f32,
    /// Seconds left before this enemy may strike again.
    pub attack_cooldown: f32,
    /// Cyclic waypoint route; empty means the enemy stands still.
    pub patrol: Vec<Vec3>,
    pub patrol_index: usize,
    /// Participates only while the clock says night.
    pub night_only: bool,
}

/// Instantiates a spawn descriptor as a live entity. Unknown type strings
/// are logged and skipped; the caller has already filtered defeated ids.
pub fn spawn_enemy(commands: &mut Commands, spawn: &EnemySpawn) -> Option<Entity> {
    let Some(kind) = EnemyKind::from_id(spawn.kind) else {
        warn!(
            "Unknown enemy type {:?} for spawn {}; skipping",
            spawn.kind, spawn.id
        );
        return None;
    };
    let stats = enemy_stats(kind);
    let entity = commands
        .spawn((
            Name::new(format!("{} ({})", kind.display_name(), spawn.id)),
            LevelEntity,
            Enemy {
                id: spawn.id.to_string(),
                kind,
                position: spawn.position,
                health: stats.health,
                alive: true,
                state: AiState::Idle,
                hit_debounce: 0.0,
                attack_cooldown: 0.0,
                patrol: spawn.patrol.to_vec(),
                patrol_index: 0,
                night_only: spawn.night_only,
            },
        ))
        .id();
    Some(entity)
}

// === Frame Logic ===

/// Advances one enemy by one frame: hit resolution against the player's
/// swing first, then AI with attack > chase > patrol > idle.
pub(crate) fn advance_enemy(
    store: &mut GameStore,
    rng: &mut ChaCha8Rng,
    enemy: &mut Enemy,
    delta: f32,
) {
    if !enemy.alive {
        return;
    }
    // Night-restricted enemies sit the day out entirely.
    if enemy.night_only && is_daytime(store.world.time_of_day) {
        return;
    }

    let stats = enemy_stats(enemy.kind);
    if enemy.attack_cooldown > 0.0 {
        enemy.attack_cooldown -= delta;
    }
    if enemy.hit_debounce > 0.0 {
        enemy.hit_debounce -= delta;
    }

    let player_pos = store.player.position;
    let distance = enemy.position.distance(player_pos);

    if store.player.attacking
        && in_player_attack_reach(player_pos, enemy.position, stats.size)
        && enemy.hit_debounce <= 0.0
    {
        enemy.health -= PLAYER_ATTACK_DAMAGE;
        enemy.hit_debounce = HIT_DEBOUNCE;
        enemy.position += knockback_offset(enemy.position, player_pos);
        if enemy.health <= 0.0 {
            enemy.alive = false;
            store.defeat_enemy(&enemy.id);
            award_spoils(store, rng, enemy.kind);
            return;
        }
    }

    if distance <= stats.attack_range {
        enemy.state = AiState::Attack;
        if enemy.attack_cooldown <= 0.0 {
            store.take_damage(stats.damage);
            enemy.attack_cooldown = stats.attack_cooldown;
        }
    } else if distance <= stats.detection_range {
        enemy.state = AiState::Chase;
        let mut direction = player_pos - enemy.position;
        direction.y = 0.0;
        enemy.position += direction.normalize_or_zero() * stats.speed * delta;
    } else if !enemy.patrol.is_empty() {
        enemy.state = AiState::Patrol;
        let target = enemy.patrol[enemy.patrol_index];
        let to_target = target - enemy.position;
        if to_target.length() < WAYPOINT_THRESHOLD {
            enemy.patrol_index = (enemy.patrol_index + 1) % enemy.patrol.len();
        } else {
            enemy.position += to_target.normalize() * stats.speed * PATROL_SPEED_FACTOR * delta;
        }
    } else {
        enemy.state = AiState::Idle;
    }
}

/// Rupees plus drop-table rolls for a fresh defeat.
fn award_spoils(store: &mut GameStore, rng: &mut ChaCha8Rng, kind: EnemyKind) {
    let stats = enemy_stats(kind);
    if stats.rupee_reward > 0 {
        store.add_rupees(stats.rupee_reward);
    }
    for drop in drop_table(kind) {
        if rng.random_bool(drop.chance) {
            let quantity = rng.random_range(drop.min_quantity..=drop.max_quantity);
            store.add_item(drop.item, quantity);
        }
    }
}

// === Systems ===

/// Advances every live enemy in id order. Runs in `GameSet::Enemies`.
fn advance_enemies(
    time: Res<Time>,
    mut store: ResMut<GameStore>,
    mut rng: ResMut<GameRng>,
    mut query: Query<&mut Enemy>,
) {
    let delta = time.delta_secs();
    let mut enemies: Vec<_> = query.iter_mut().collect();
    enemies.sort_unstable_by(|a, b| a.id.cmp(&b.id));
    for enemy in &mut enemies {
        advance_enemy(&mut store, &mut rng.0, enemy, delta);
    }
}

/// Removes defeated enemies from the live set. Runs in `GameSet::Despawn`.
fn despawn_defeated(mut commands: Commands, query: Query<(Entity, &Enemy)>) {
    for (entity, enemy) in &query {
        if !enemy.alive {
            commands.entity(entity).despawn();
        }
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.add_systems(
        Update,
        (
            advance_enemies
                .in_set(GameSet::Enemies)
                .run_if(simulation_running),
            despawn_defeated
                .in_set(GameSet::Despawn)
                .run_if(simulation_running),
        ),
    );
}


#[cfg(test)]
mod integration_tests {
    use super::*;
    use crate::gameplay::level::EnemySpawn;
    use crate::testing;

    #[test]
    fn unknown_spawn_type_is_skipped() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);

        let spawn = EnemySpawn {
            id: "mystery_1",
            kind: "moblin",
            position: Vec3::ZERO,
            patrol: &[],
            respawn: false,
            night_only: false,
        };
        let spawned = {
            let mut commands = app.world_mut().commands();
            spawn_enemy(&mut commands, &spawn)
        };
        app.world_mut().flush();
        assert!(spawned.is_none());
        assert_eq!(app.world_mut().query::<&Enemy>().iter(app.world()).count(), 0);
    }

    #[test]
    fn despawn_pass_removes_the_defeated() {
        let mut app = testing::create_test_app();
        testing::start_playing(&mut app, crate::gameplay::level::LevelId::Dungeon1);

        let mut enemies: Vec<Entity> = app
            .world_mut()
            .query_filtered::<Entity, With<Enemy>>()
            .iter(app.world())
            .collect();
        assert_eq!(enemies.len(), 2);

        let doomed = enemies.pop().unwrap();
        app.world_mut().get_mut::<Enemy>(doomed).unwrap().alive = false;
        app.update();
        assert_eq!(
            app.world_mut()
                .query::<&Enemy>()
                .iter(app.world())
                .count(),
            1
        );
    }
}
