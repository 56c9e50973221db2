/// Compile-time bounds and runtime-tunable engine parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameConfig;

impl GameConfig {
    // ===== compile-time constants used as type parameters =====
    pub const MAX_OCCUPANTS_PER_TILE: usize = 4;
    pub const MAX_STATUS_EFFECTS: usize = 8;
}

/// Runtime-tunable engine parameters, exposed through the tables oracle so
/// hosts can load them from data files. Omitted fields keep their compiled
/// defaults.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineTables {
    /// Projectile speed in tiles per second on the real-time clock.
    pub projectile_speed: f32,
    /// Flight distance after which a projectile expires, in tiles.
    pub projectile_max_range: f32,
    /// Seconds an impact particle lingers.
    pub particle_duration: f32,
    /// When set, ranged attacks launch continuous-clock projectiles instead
    /// of resolving within the discrete turn. Hosts without a real-time loop
    /// leave this off.
    pub ranged_spawns_projectiles: bool,
    pub scoring: ScoreTable,
}

impl Default for EngineTables {
    fn default() -> Self {
        Self {
            projectile_speed: 8.0,
            projectile_max_range: 12.0,
            particle_duration: 0.4,
            ranged_spawns_projectiles: false,
            scoring: ScoreTable::default(),
        }
    }
}

/// Balance parameters for the scoring module.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScoreTable {
    /// Fixed points for completing the puzzle.
    pub base_points: u32,
    /// Awarded when heroes-used is at or under par.
    pub character_bonus: u32,
    /// Awarded when turns-used is at or under par.
    pub turn_bonus: u32,
    /// Scaled by lives remaining over maximum lives.
    pub lives_bonus_max: u32,
    /// Point floor for a silver rank when only one par is met.
    pub silver_points: u32,
}

impl Default for ScoreTable {
    fn default() -> Self {
        Self {
            base_points: 100,
            character_bonus: 50,
            turn_bonus: 50,
            lives_bonus_max: 30,
            silver_points: 150,
        }
    }
}
