//! Level data contract: spawn descriptors, the built-in level tables, and
//! the loader that turns a table into live entities.
//!
//! Levels are static data. Loading one despawns everything the previous
//! level spawned, then instantiates the new roster, skipping enemy ids
//! already in the defeated set and chest ids already opened.

use bevy::prelude::*;

use crate::GameSet;
use crate::gameplay::chests::Chest;
use crate::gameplay::enemies::spawn_enemy;
use crate::gameplay::items::ItemId;
use crate::gameplay::npcs::Npc;
use crate::gameplay::store::GameStore;

// === Level Ids ===

/// The built-in levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LevelId {
    MainField,
    Dungeon1,
    WaterTemple,
}

impl LevelId {
    /// Stable id string, used by save files and level data.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::MainField => "main_field",
            Self::Dungeon1 => "dungeon_1",
            Self::WaterTemple => "water_temple",
        }
    }

    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "main_field" => Some(Self::MainField),
            "dungeon_1" => Some(Self::Dungeon1),
            "water_temple" => Some(Self::WaterTemple),
            _ => None,
        }
    }

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::MainField => "Hyrule Field",
            Self::Dungeon1 => "Cave of Beginnings",
            Self::WaterTemple => "Water Temple",
        }
    }

    /// Half-extent of the walkable square; the player clamps to it.
    #[must_use]
    pub const fn bounds(self) -> f32 {
        match self {
            Self::MainField => 48.0,
            Self::Dungeon1 => 20.0,
            Self::WaterTemple => 40.0,
        }
    }
}

// === Descriptors ===

/// One enemy spawn in a level table.
#[derive(Debug, Clone, Copy)]
pub struct EnemySpawn {
    pub id: &'static str,
    /// Type string; unknown types are skipped with a warning.
    pub kind: &'static str,
    pub position: Vec3,
    /// Cyclic waypoint route; empty means no patrol.
    pub patrol: &'static [Vec3],
    /// Authored in the level data but not consulted by any update logic;
    /// timed-respawn semantics are undecided.
    pub respawn: bool,
    pub night_only: bool,
}

/// One NPC in a level table.
#[derive(Debug, Clone, Copy)]
pub struct NpcSpawn {
    pub id: &'static str,
    pub name: &'static str,
    pub position: Vec3,
    pub dialogue: &'static [&'static str],
}

/// One chest in a level table.
#[derive(Debug, Clone, Copy)]
pub struct ChestSpawn {
    pub id: &'static str,
    pub position: Vec3,
    pub item: ItemId,
    pub quantity: u32,
}

/// Everything needed to instantiate a level.
#[derive(Debug, Clone, Copy)]
pub struct LevelData {
    pub id: LevelId,
    pub spawn_point: Vec3,
    pub enemies: &'static [EnemySpawn],
    pub npcs: &'static [NpcSpawn],
    pub chests: &'static [ChestSpawn],
}

// === Built-in Levels ===

const NO_PATROL: &[Vec3] = &[];

static MAIN_FIELD: LevelData = LevelData {
    id: LevelId::MainField,
    spawn_point: Vec3::new(0.0, 1.0, 0.0),
    enemies: &[
        EnemySpawn {
            id: "enemy_1",
            kind: "slime",
            position: Vec3::new(10.0, 0.5, 10.0),
            patrol: NO_PATROL,
            respawn: true,
            night_only: false,
        },
        EnemySpawn {
            id: "enemy_2",
            kind: "slime",
            position: Vec3::new(-5.0, 0.5, 8.0),
            patrol: NO_PATROL,
            respawn: true,
            night_only: false,
        },
        EnemySpawn {
            id: "enemy_3",
            kind: "skeleton",
            position: Vec3::new(20.0, 0.5, -10.0),
            patrol: &[
                Vec3::new(20.0, 0.5, -10.0),
                Vec3::new(25.0, 0.5, -5.0),
                Vec3::new(20.0, 0.5, 0.0),
            ],
            respawn: true,
            night_only: false,
        },
        EnemySpawn {
            id: "enemy_lizalfos_1",
            kind: "lizalfos",
            position: Vec3::new(-25.0, 0.5, 20.0),
            patrol: &[
                Vec3::new(-25.0, 0.5, 20.0),
                Vec3::new(-30.0, 0.5, 25.0),
                Vec3::new(-20.0, 0.5, 22.0),
            ],
            respawn: true,
            night_only: false,
        },
        EnemySpawn {
            id: "enemy_lizalfos_2",
            kind: "lizalfos",
            position: Vec3::new(30.0, 0.5, -25.0),
            patrol: NO_PATROL,
            respawn: true,
            night_only: false,
        },
        EnemySpawn {
            id: "enemy_stalfos_1",
            kind: "stalfos",
            position: Vec3::new(-35.0, 0.5, -30.0),
            patrol: &[Vec3::new(-35.0, 0.5, -30.0), Vec3::new(-30.0, 0.5, -25.0)],
            respawn: true,
            night_only: false,
        },
        EnemySpawn {
            id: "enemy_keese_1",
            kind: "keese",
            position: Vec3::new(15.0, 2.0, -20.0),
            patrol: NO_PATROL,
            respawn: true,
            night_only: false,
        },
        EnemySpawn {
            id: "enemy_keese_2",
            kind: "keese",
            position: Vec3::new(-15.0, 2.0, 25.0),
            patrol: NO_PATROL,
            respawn: true,
            night_only: false,
        },
        EnemySpawn {
            id: "enemy_keese_3",
            kind: "keese",
            position: Vec3::new(28.0, 2.0, 15.0),
            patrol: NO_PATROL,
            respawn: true,
            night_only: false,
        },
        EnemySpawn {
            id: "enemy_ghost_1",
            kind: "ghost",
            position: Vec3::new(0.0, 1.0, -30.0),
            patrol: NO_PATROL,
            respawn: true,
            night_only: true,
        },
        EnemySpawn {
            id: "enemy_ghost_2",
            kind: "ghost",
            position: Vec3::new(-30.0, 1.0, 0.0),
            patrol: NO_PATROL,
            respawn: true,
            night_only: true,
        },
        EnemySpawn {
            id: "enemy_ghost_3",
            kind: "ghost",
            position: Vec3::new(35.0, 1.0, 28.0),
            patrol: NO_PATROL,
            respawn: true,
            night_only: true,
        },
        EnemySpawn {
            id: "enemy_deku_baba_1",
            kind: "deku_baba",
            position: Vec3::new(22.0, 0.5, 30.0),
            patrol: NO_PATROL,
            respawn: true,
            night_only: false,
        },
        EnemySpawn {
            id: "enemy_deku_baba_2",
            kind: "deku_baba",
            position: Vec3::new(-32.0, 0.5, 15.0),
            patrol: NO_PATROL,
            respawn: true,
            night_only: false,
        },
        EnemySpawn {
            id: "enemy_frizzard_1",
            kind: "frizzard",
            position: Vec3::new(-40.0, 0.5, -35.0),
            patrol: NO_PATROL,
            respawn: true,
            night_only: false,
        },
    ],
    npcs: &[
        NpcSpawn {
            id: "npc_elder",
            name: "Village Elder",
            position: Vec3::new(-25.0, 0.0, -22.0),
            dialogue: &[
                "Ah, hero! You have come at last.",
                "Monsters have been raiding our village of late.",
                "They say their leader nests in the cave to the east.",
                "Please, save our village!",
            ],
        },
        NpcSpawn {
            id: "npc_merchant",
            name: "Merchant",
            position: Vec3::new(-30.0, 0.0, -17.0),
            dialogue: &[
                "Welcome! Looking for something?",
                "All sold out, I'm afraid. Come back later.",
            ],
        },
    ],
    chests: &[ChestSpawn {
        id: "chest_1",
        position: Vec3::new(10.0, 0.5, -15.0),
        item: ItemId::Bomb,
        quantity: 5,
    }],
};

static DUNGEON_1: LevelData = LevelData {
    id: LevelId::Dungeon1,
    spawn_point: Vec3::new(0.0, 1.0, 0.0),
    enemies: &[
        EnemySpawn {
            id: "dungeon_enemy_1",
            kind: "skeleton",
            position: Vec3::new(5.0, 0.5, 0.0),
            patrol: NO_PATROL,
            respawn: false,
            night_only: false,
        },
        EnemySpawn {
            id: "dungeon_enemy_2",
            kind: "skeleton",
            position: Vec3::new(-5.0, 0.5, -5.0),
            patrol: NO_PATROL,
            respawn: false,
            night_only: false,
        },
    ],
    npcs: &[],
    chests: &[ChestSpawn {
        id: "dungeon_chest_1",
        position: Vec3::new(8.0, 0.5, -8.0),
        item: ItemId::Key,
        quantity: 1,
    }],
};

static WATER_TEMPLE: LevelData = LevelData {
    id: LevelId::WaterTemple,
    spawn_point: Vec3::new(0.0, 1.0, 25.0),
    enemies: &[
        EnemySpawn {
            id: "water_frizzard_1",
            kind: "frizzard",
            position: Vec3::new(-10.0, 0.5, -10.0),
            patrol: NO_PATROL,
            respawn: false,
            night_only: false,
        },
        EnemySpawn {
            id: "water_frizzard_2",
            kind: "frizzard",
            position: Vec3::new(10.0, 0.5, -10.0),
            patrol: NO_PATROL,
            respawn: false,
            night_only: false,
        },
        EnemySpawn {
            id: "water_frizzard_3",
            kind: "frizzard",
            position: Vec3::new(0.0, 0.5, 10.0),
            patrol: NO_PATROL,
            respawn: false,
            night_only: false,
        },
        EnemySpawn {
            id: "water_lizalfos_1",
            kind: "lizalfos",
            position: Vec3::new(-22.0, 0.5, 15.0),
            patrol: &[Vec3::new(-22.0, 0.5, 15.0), Vec3::new(-22.0, 0.5, -15.0)],
            respawn: false,
            night_only: false,
        },
        EnemySpawn {
            id: "water_lizalfos_2",
            kind: "lizalfos",
            position: Vec3::new(22.0, 0.5, -15.0),
            patrol: &[Vec3::new(22.0, 0.5, -15.0), Vec3::new(22.0, 0.5, 15.0)],
            respawn: false,
            night_only: false,
        },
        EnemySpawn {
            id: "water_keese_1",
            kind: "keese",
            position: Vec3::new(-12.0, 3.0, 8.0),
            patrol: NO_PATROL,
            respawn: false,
            night_only: false,
        },
        EnemySpawn {
            id: "water_keese_2",
            kind: "keese",
            position: Vec3::new(12.0, 3.0, 8.0),
            patrol: NO_PATROL,
            respawn: false,
            night_only: false,
        },
        EnemySpawn {
            id: "water_keese_3",
            kind: "keese",
            position: Vec3::new(0.0, 3.0, -18.0),
            patrol: NO_PATROL,
            respawn: false,
            night_only: false,
        },
        EnemySpawn {
            id: "water_skeleton_1",
            kind: "skeleton",
            position: Vec3::new(0.0, 0.5, -22.0),
            patrol: NO_PATROL,
            respawn: false,
            night_only: false,
        },
    ],
    npcs: &[],
    chests: &[
        ChestSpawn {
            id: "water_chest_boss_key",
            position: Vec3::new(0.0, 0.5, -25.0),
            item: ItemId::Key,
            quantity: 1,
        },
        ChestSpawn {
            id: "water_chest_bombs",
            position: Vec3::new(-25.0, 0.5, 10.0),
            item: ItemId::Bomb,
            quantity: 10,
        },
    ],
};

/// The level table for an id.
#[must_use]
pub const fn level_data(level: LevelId) -> &'static LevelData {
    match level {
        LevelId::MainField => &MAIN_FIELD,
        LevelId::Dungeon1 => &DUNGEON_1,
        LevelId::WaterTemple => &WATER_TEMPLE,
    }
}

// === Loading ===

/// Marker for everything a level load spawned; the next load despawns it.
#[derive(Component, Debug, Clone, Copy)]
pub struct LevelEntity;

/// Request to tear down the current level and instantiate another.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadLevel(pub LevelId);

/// Instantiates the most recently requested level. Runs in
/// `GameSet::Spawn` so the new roster exists before this frame's enemy
/// pass.
fn load_level(
    mut loads: MessageReader<LoadLevel>,
    mut store: ResMut<GameStore>,
    existing: Query<Entity, With<LevelEntity>>,
    mut commands: Commands,
) {
    let Some(&LoadLevel(level)) = loads.read().last() else {
        return;
    };

    for entity in &existing {
        commands.entity(entity).despawn();
    }

    let data = level_data(level);
    store.set_current_level(level);
    store.set_player_position(data.spawn_point);
    store.set_player_velocity(Vec3::ZERO);

    let mut spawned = 0_usize;
    let mut skipped = 0_usize;
    for spawn in data.enemies {
        if store.world.enemies_defeated.contains(spawn.id) {
            skipped += 1;
            continue;
        }
        if spawn_enemy(&mut commands, spawn).is_some() {
            spawned += 1;
        } else {
            skipped += 1;
        }
    }

    for npc in data.npcs {
        commands.spawn((
            Name::new(format!("NPC {}", npc.id)),
            LevelEntity,
            Npc {
                id: npc.id.to_string(),
                name: npc.name.to_string(),
                position: npc.position,
                dialogue: npc.dialogue.iter().map(ToString::to_string).collect(),
            },
        ));
    }

    for chest in data.chests {
        if store.world.chests_opened.contains(chest.id) {
            continue;
        }
        commands.spawn((
            Name::new(format!("Chest {}", chest.id)),
            LevelEntity,
            Chest {
                id: chest.id.to_string(),
                position: chest.position,
                item: chest.item,
                quantity: chest.quantity,
            },
        ));
    }

    info!(
        "Loaded {} ({}): {spawned} enemies spawned, {skipped} skipped",
        level.id(),
        level.name(),
    );
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.add_message::<LoadLevel>();
    app.add_systems(Update, load_level.in_set(GameSet::Spawn));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gameplay::enemies::EnemyKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn level_ids_round_trip() {
        for level in [LevelId::MainField, LevelId::Dungeon1, LevelId::WaterTemple] {
            assert_eq!(LevelId::from_id(level.id()), Some(level));
        }
        assert_eq!(LevelId::from_id("boss_room"), None);
    }

    #[test]
    fn every_authored_enemy_kind_is_known() {
        for level in [LevelId::MainField, LevelId::Dungeon1, LevelId::WaterTemple] {
            for spawn in level_data(level).enemies {
                assert!(
                    EnemyKind::from_id(spawn.kind).is_some(),
                    "{} references unknown kind {}",
                    spawn.id,
                    spawn.kind
                );
            }
        }
    }

    #[test]
    fn spawn_ids_are_unique_within_a_level() {
        for level in [LevelId::MainField, LevelId::Dungeon1, LevelId::WaterTemple] {
            let data = level_data(level);
            let mut ids: Vec<&str> = data.enemies.iter().map(|e| e.id).collect();
            ids.extend(data.npcs.iter().map(|n| n.id));
            ids.extend(data.chests.iter().map(|c| c.id));
            let total = ids.len();
            ids.sort_unstable();
            ids.dedup();
            assert_eq!(ids.len(), total, "duplicate ids in {level:?}");
        }
    }

    #[test]
    fn authored_positions_sit_inside_bounds() {
        for level in [LevelId::MainField, LevelId::Dungeon1, LevelId::WaterTemple] {
            let data = level_data(level);
            let bounds = level.bounds();
            for spawn in data.enemies {
                assert!(spawn.position.x.abs() <= bounds, "{} out of bounds", spawn.id);
                assert!(spawn.position.z.abs() <= bounds, "{} out of bounds", spawn.id);
            }
        }
    }

    #[test]
    fn only_ghosts_are_night_only() {
        for spawn in level_data(LevelId::MainField).enemies {
            assert_eq!(spawn.night_only, spawn.kind == "ghost", "{}", spawn.id);
        }
    }
}
