use crate::script::Action;
use crate::state::types::status::StatusEffects;

use super::{EntityId, Facing, Position, Side, TemplateId};

/// Aggregate roster for every entity in the simulation.
///
/// Resolution order is fixed: heroes by placement order, then enemies by
/// roster order. Both phases of a turn walk this ordering.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntitiesState {
    pub heroes: Vec<EntityState>,
    pub enemies: Vec<EntityState>,
}

impl EntitiesState {
    pub fn empty() -> Self {
        Self {
            heroes: Vec::new(),
            enemies: Vec::new(),
        }
    }

    /// Returns a reference to an entity by ID (hero or enemy).
    pub fn entity(&self, id: EntityId) -> Option<&EntityState> {
        self.all().find(|e| e.id == id)
    }

    /// Returns a mutable reference to an entity by ID (hero or enemy).
    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut EntityState> {
        self.heroes
            .iter_mut()
            .chain(self.enemies.iter_mut())
            .find(|e| e.id == id)
    }

    /// All entities in resolution order.
    pub fn all(&self) -> impl Iterator<Item = &EntityState> {
        self.heroes.iter().chain(self.enemies.iter())
    }

    /// Resolution-ordered ids, captured up front so rosters can mutate
    /// mid-turn (spawns, despawns) without invalidating iteration.
    pub fn resolution_order(&self) -> Vec<EntityId> {
        self.all().map(|e| e.id).collect()
    }

    /// Living entities on the given side.
    pub fn living_on(&self, side: Side) -> impl Iterator<Item = &EntityState> {
        self.all().filter(move |e| e.alive && e.side == side)
    }

    /// The living entity occupying `position`, if any. Ghosts are included;
    /// callers that care about occupancy must filter them out.
    pub fn living_at(&self, position: Position) -> Option<&EntityState> {
        self.all().find(|e| e.alive && e.position == position)
    }

    /// Removes a despawned enemy from the roster. Heroes are never removed,
    /// only marked dead.
    pub fn remove_enemy(&mut self, id: EntityId) -> bool {
        let before = self.enemies.len();
        self.enemies.retain(|e| e.id != id);
        self.enemies.len() != before
    }
}

/// State for one hero or enemy.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityState {
    pub id: EntityId,
    pub side: Side,
    pub template: TemplateId,
    pub position: Position,
    pub facing: Facing,
    pub health: u32,
    pub max_health: u32,
    /// Base damage dealt by this entity's attacks.
    pub attack_damage: u32,
    /// Index of the next script entry to resolve.
    pub cursor: usize,
    pub alive: bool,
    /// Ghosts are exempt from occupancy and collision checks.
    pub ghost: bool,
    /// Boss enemies gate the `defeat_boss` win condition.
    pub boss: bool,
    pub script: Vec<Action>,
    pub statuses: StatusEffects,
}

impl EntityState {
    pub fn new(
        id: EntityId,
        side: Side,
        template: TemplateId,
        position: Position,
        facing: Facing,
        max_health: u32,
        attack_damage: u32,
        script: Vec<Action>,
    ) -> Self {
        Self {
            id,
            side,
            template,
            position,
            facing,
            health: max_health,
            max_health,
            attack_damage,
            cursor: 0,
            alive: true,
            ghost: false,
            boss: false,
            script,
            statuses: StatusEffects::empty(),
        }
    }

    pub fn with_ghost(mut self, ghost: bool) -> Self {
        self.ghost = ghost;
        self
    }

    pub fn with_boss(mut self, boss: bool) -> Self {
        self.boss = boss;
        self
    }

    /// Entities with an empty script are passive and never act.
    pub fn is_passive(&self) -> bool {
        self.script.is_empty()
    }

    /// Advances the cursor past `resolved_index`, wrapping so the script
    /// loops and the cursor invariant `0 <= cursor < len` holds.
    pub fn advance_cursor(&mut self, resolved_index: usize) {
        debug_assert!(!self.script.is_empty());
        self.cursor = (resolved_index + 1) % self.script.len();
    }
}
