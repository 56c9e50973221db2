//! Static puzzle definitions.
//!
//! A [`Puzzle`] is the read-only input to the engine: grid layout, enemy and
//! collectible placements, win conditions, side quests, and par values.
//! Gameplay-time tile state (cadence phase, damage-once bookkeeping, toggled
//! walls) lives in [`crate::state::TileRuntime`], never here.

use std::collections::BTreeMap;

use crate::state::{
    CollectibleId, Facing, Position, Side, SideQuestId, TeleportLink, TemplateId, TriggerGroupId,
};

/// Complete declarative puzzle definition.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Puzzle {
    pub dimensions: GridDimensions,
    /// Tiles that differ from plain floor. Absent positions inside the grid
    /// are plain floor.
    pub tiles: BTreeMap<Position, TileSpec>,
    pub enemies: Vec<EnemyPlacement>,
    pub collectibles: Vec<CollectiblePlacement>,
    /// All conditions must hold simultaneously for victory.
    pub win_conditions: Vec<WinCondition>,
    pub side_quests: Vec<SideQuest>,
    pub lives: u32,
    /// Defeat triggers once the turn counter exceeds this without victory.
    pub turn_limit: u32,
    pub par_heroes: u32,
    pub par_turns: u32,
    /// Hero placement cap during setup.
    pub max_heroes: u32,
}

impl Puzzle {
    /// Static spec for a tile, or `None` for plain floor inside the grid.
    pub fn tile(&self, position: Position) -> Option<&TileSpec> {
        self.tiles.get(&position)
    }

    pub fn contains(&self, position: Position) -> bool {
        self.dimensions.contains(position)
    }

    /// Base terrain at a position; positions off the grid report as void.
    pub fn terrain(&self, position: Position) -> TerrainKind {
        if !self.contains(position) {
            return TerrainKind::Void;
        }
        self.tile(position)
            .map(|t| t.terrain)
            .unwrap_or(TerrainKind::Floor)
    }

    /// The partner tile of a teleport link, excluding `from`.
    pub fn teleport_exit(&self, link: TeleportLink, from: Position) -> Option<Position> {
        self.tiles
            .iter()
            .find(|(position, spec)| {
                **position != from
                    && matches!(
                        spec.behavior,
                        Some(TileBehavior::Teleport { link: l, .. }) if l == link
                    )
            })
            .map(|(position, _)| *position)
    }

    /// Positions of every tile in a trigger group.
    pub fn trigger_group_members(&self, group: TriggerGroupId) -> Vec<Position> {
        self.tiles
            .iter()
            .filter(|(_, spec)| spec.trigger_group == Some(group))
            .map(|(position, _)| *position)
            .collect()
    }
}

/// Width and height of the puzzle grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridDimensions {
    pub width: u32,
    pub height: u32,
}

impl GridDimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && position.x < self.width as i32
            && position.y < self.height as i32
    }
}

/// Canonical terrain classes for static tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TerrainKind {
    Floor,
    Wall,
    Void,
}

impl TerrainKind {
    /// Walls and void block movement unconditionally, independent of any
    /// custom behavior layered on the tile.
    pub fn is_passable(self) -> bool {
        matches!(self, TerrainKind::Floor)
    }
}

/// Static descriptor for a tile that differs from plain floor.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileSpec {
    pub terrain: TerrainKind,
    pub behavior: Option<TileBehavior>,
    pub cadence: Option<CadenceSpec>,
    pub trigger_group: Option<TriggerGroupId>,
    /// Blocks hero placement during setup; never re-checked while running.
    pub prevent_placement: bool,
}

impl TileSpec {
    pub fn floor() -> Self {
        Self {
            terrain: TerrainKind::Floor,
            behavior: None,
            cadence: None,
            trigger_group: None,
            prevent_placement: false,
        }
    }

    pub fn wall() -> Self {
        Self {
            terrain: TerrainKind::Wall,
            ..Self::floor()
        }
    }

    pub fn with_behavior(mut self, behavior: TileBehavior) -> Self {
        self.behavior = Some(behavior);
        self
    }

    pub fn with_cadence(mut self, cadence: CadenceSpec) -> Self {
        self.cadence = Some(cadence);
        self
    }

    pub fn with_trigger_group(mut self, group: TriggerGroupId) -> Self {
        self.trigger_group = Some(group);
        self
    }
}

/// Custom behavior a floor tile performs when an entity comes to rest on it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TileBehavior {
    /// Applies damage on entry. With `once` set, each entity is damaged at
    /// most once by this tile across any number of re-entries.
    Damage { amount: u32, once: bool },
    /// Relocates the entity to the linked partner tile. Entry behaviors do
    /// not re-fire on arrival. `active: false` tiles wait for a pressure
    /// plate's `trigger_teleport` to switch them on.
    Teleport { link: TeleportLink, active: bool },
    /// Overrides the entity's facing on entry.
    DirectionChange { facing: Facing },
    /// The entity keeps sliding one cell at a time in its movement direction
    /// until blocked, within the same turn.
    Ice,
    /// Fires its effect list on entry.
    PressurePlate { effects: Vec<PlateEffect> },
}

/// Effects a pressure plate can fire.
///
/// Multiple effects on one plate fire in a fixed priority order:
/// `ToggleWall`, `SpawnEnemy`, `DespawnEnemy`, `TriggerTeleport`,
/// `ToggleTriggerGroup` (declaration order within each bucket), so spawns
/// and teleports always observe the post-toggle wall geometry.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlateEffect {
    /// Flips the wall state of the target tile.
    ToggleWall { target: Position },
    /// Adds an enemy from the template at the given position.
    SpawnEnemy { template: TemplateId, at: Position },
    /// Removes the enemy standing at the given position.
    DespawnEnemy { at: Position },
    /// Activates an inactive teleport link.
    TriggerTeleport { link: TeleportLink },
    /// Flips the on/off phase of every tile sharing the trigger group.
    ToggleTriggerGroup { group: TriggerGroupId },
}

impl PlateEffect {
    /// Priority bucket for the fixed firing order; lower fires first.
    pub fn priority(&self) -> u8 {
        match self {
            PlateEffect::ToggleWall { .. } => 0,
            PlateEffect::SpawnEnemy { .. } => 1,
            PlateEffect::DespawnEnemy { .. } => 2,
            PlateEffect::TriggerTeleport { .. } => 3,
            PlateEffect::ToggleTriggerGroup { .. } => 4,
        }
    }
}

/// Scheduled on/off timeline for a tile's behaviors.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CadenceSpec {
    pub pattern: CadencePattern,
    /// Seeds the phase before the first turn resolves.
    pub start_on: bool,
}

/// How the phase evolves as turns pass.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CadencePattern {
    /// Flips every turn.
    Alternating,
    /// On for `on_turns`, off for `off_turns`, cycling.
    Interval { on_turns: u32, off_turns: u32 },
    /// Explicit boolean sequence, cycling. An empty sequence pins the phase
    /// to `start_on`.
    Custom(Vec<bool>),
}

/// Where an enemy starts and what it is.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyPlacement {
    pub template: TemplateId,
    pub position: Position,
    pub facing: Facing,
}

/// Where a collectible starts and who may pick it up.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CollectiblePlacement {
    pub definition: CollectibleId,
    pub position: Position,
    /// Side permitted to collect; `None` allows both.
    pub permitted: Option<Side>,
    /// Blocks hero placement on this cell during setup.
    pub prevent_placement: bool,
}

/// Terminal conditions. All configured conditions AND together for victory.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WinCondition {
    /// No living non-ghost enemies remain.
    DefeatAllEnemies,
    /// Every boss-flagged enemy is dead.
    DefeatBoss,
    /// No uncollected collectibles remain.
    CollectAll,
    /// No uncollected key-flagged collectibles remain.
    CollectKeys,
    /// A living hero occupies the goal tile.
    ReachGoal { goal: Position },
    /// The turn count is reached with at least one hero alive.
    SurviveTurns { turns: u32 },
    /// Victory must land on or before this turn.
    WinInTurns { turns: u32 },
    /// Placed-hero count stays at or below the threshold.
    MaxCharacters { count: u32 },
    /// At least this many heroes are alive at evaluation.
    CharactersAlive { count: u32 },
}

/// Optional objective sharing the win-condition vocabulary. Side quests only
/// award bonus points; they never gate victory.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SideQuest {
    pub id: SideQuestId,
    pub conditions: Vec<WinCondition>,
    pub bonus_points: u32,
}
