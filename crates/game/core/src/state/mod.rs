//! Authoritative simulation state.
//!
//! This module owns the data structures describing entities, tile runtime,
//! collectibles, and continuous-clock effects. Hosts clone or query this
//! state but mutate it exclusively through the engine, which swaps in a
//! fully resolved successor snapshot per turn.

mod error;
pub mod types;

pub use error::PlacementError;
pub use types::{
    ActionCategory, AttackPayload, CollectibleDefinition, CollectibleEffect, CollectibleId,
    CollectibleState, ContinuousState, EffectId, EntitiesState, EntityId, EntityState, Facing,
    Particle, PendingHit, PeriodicEffect, Position, Projectile, Restrictions, Side, SideQuestId,
    SpellId, StackingPolicy, StatusEffectDefinition, StatusEffectInstance, StatusEffects,
    StatusKind, TeleportLink, TemplateId, TileMap, TileRuntime, TriggerGroupId, Vec2,
};

use std::collections::BTreeSet;

use crate::env::{ActorTemplate, GameEnv};
use crate::puzzle::{Puzzle, TerrainKind};

/// Terminal/lifecycle status of a simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameStatus {
    /// Heroes are being placed; no turns resolve.
    Setup,
    Running,
    Victory,
    Defeat(DefeatCause),
}

/// Why a run was lost. The two causes are distinguishable to the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DefeatCause {
    /// Every hero is dead.
    HeroesDefeated,
    /// The turn counter exceeded the puzzle's limit without victory.
    TurnLimitReached,
}

/// Canonical snapshot of the simulation.
///
/// The puzzle definition is never stored here; it is passed read-only into
/// every engine call, so a snapshot clones cheaply and carries only runtime
/// data.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameState {
    /// Sequential entity ID allocator (monotonically increasing, never
    /// reused).
    next_entity_id: u32,

    /// Completed discrete turns. The first resolved turn reports as 1.
    pub turn: u32,
    pub status: GameStatus,
    pub entities: EntitiesState,
    pub tiles: TileRuntime,
    pub occupancy: TileMap,
    pub collectibles: Vec<CollectibleState>,
    pub continuous: ContinuousState,
    /// Side quests satisfied at any point while running.
    pub completed_side_quests: BTreeSet<SideQuestId>,
    /// Suppresses win/loss evaluation while a test run is in flight.
    pub test_mode: bool,
}

impl GameState {
    /// Builds the setup-phase state for a puzzle: enemies and collectibles
    /// placed, cadences seeded, no heroes yet.
    ///
    /// Unknown enemy templates degrade to passive bystanders rather than
    /// failing the build.
    pub fn from_puzzle(puzzle: &Puzzle, env: &GameEnv<'_>) -> Self {
        let mut state = Self {
            next_entity_id: 0,
            turn: 0,
            status: GameStatus::Setup,
            entities: EntitiesState::empty(),
            tiles: TileRuntime::new(),
            occupancy: TileMap::default(),
            collectibles: Vec::new(),
            continuous: ContinuousState::default(),
            completed_side_quests: BTreeSet::new(),
            test_mode: false,
        };

        for (position, spec) in &puzzle.tiles {
            if let Some(cadence) = &spec.cadence {
                state.tiles.seed_cadence(*position, cadence);
            }
        }

        for placement in &puzzle.enemies {
            let template = resolve_template(env, placement.template);
            let _ = state.spawn_enemy(placement.template, &template, placement.position, placement.facing);
        }

        for placement in &puzzle.collectibles {
            state
                .collectibles
                .push(CollectibleState::from_placement(placement));
        }

        state
    }

    /// Allocates a new unique EntityId.
    pub fn allocate_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_entity_id);
        self.next_entity_id += 1;
        id
    }

    /// Places a hero during setup, enforcing placement legality.
    pub fn place_hero(
        &mut self,
        puzzle: &Puzzle,
        template_id: TemplateId,
        template: &ActorTemplate,
        position: Position,
        facing: Facing,
    ) -> Result<EntityId, PlacementError> {
        if self.status != GameStatus::Setup {
            return Err(PlacementError::NotInSetup);
        }
        if self.entities.heroes.len() as u32 >= puzzle.max_heroes {
            return Err(PlacementError::HeroLimitReached {
                limit: puzzle.max_heroes,
            });
        }
        if !puzzle.contains(position) {
            return Err(PlacementError::OutOfBounds(position));
        }
        if self.is_wall_like(puzzle, position) {
            return Err(PlacementError::Impassable(position));
        }
        if !template.ghost && self.blocking_occupant(position).is_some() {
            return Err(PlacementError::Occupied(position));
        }

        let tile_prevents = puzzle
            .tile(position)
            .map(|t| t.prevent_placement)
            .unwrap_or(false);
        let collectible_prevents = self
            .collectibles
            .iter()
            .any(|c| !c.collected && c.position == position && c.prevent_placement);
        if tile_prevents || collectible_prevents {
            return Err(PlacementError::PlacementPrevented(position));
        }

        let id = self.allocate_entity_id();
        let hero = EntityState::new(
            id,
            Side::Hero,
            template_id,
            position,
            facing,
            template.max_health,
            template.attack_damage,
            template.behavior.clone(),
        )
        .with_ghost(template.ghost);
        let _ = self.occupancy.add_occupant(position, id);
        self.entities.heroes.push(hero);
        Ok(id)
    }

    /// Adds an enemy to the roster; used at setup and by pressure-plate
    /// spawns.
    pub fn spawn_enemy(
        &mut self,
        template_id: TemplateId,
        template: &ActorTemplate,
        position: Position,
        facing: Facing,
    ) -> EntityId {
        let id = self.allocate_entity_id();
        let enemy = EntityState::new(
            id,
            Side::Enemy,
            template_id,
            position,
            facing,
            template.max_health,
            template.attack_damage,
            template.behavior.clone(),
        )
        .with_ghost(template.ghost)
        .with_boss(template.boss);
        let _ = self.occupancy.add_occupant(position, id);
        self.entities.enemies.push(enemy);
        id
    }

    /// Transitions from setup to running.
    pub fn begin(&mut self) {
        if self.status == GameStatus::Setup {
            self.status = GameStatus::Running;
        }
    }

    /// The living non-ghost entity occupying `position`, if any.
    pub fn blocking_occupant(&self, position: Position) -> Option<&EntityState> {
        self.occupancy
            .occupants(&position)
            .into_iter()
            .flatten()
            .filter_map(|id| self.entities.entity(*id))
            .find(|e| e.alive && !e.ghost)
    }

    /// Whether the tile behaves as a wall right now: base wall or void
    /// terrain, or a floor tile whose wall state a pressure plate toggled
    /// on (and vice versa for toggled-off walls).
    pub fn is_wall_like(&self, puzzle: &Puzzle, position: Position) -> bool {
        let base_wall = match puzzle.terrain(position) {
            TerrainKind::Wall => true,
            TerrainKind::Void => return true,
            TerrainKind::Floor => false,
        };
        base_wall != self.tiles.wall_toggled(position)
    }

    /// Movement legality for one step: off-grid, wall-like, and occupied
    /// (non-ghost) destinations block.
    pub fn is_move_blocked(&self, puzzle: &Puzzle, destination: Position, mover_ghost: bool) -> bool {
        if !puzzle.contains(destination) {
            return true;
        }
        if self.is_wall_like(puzzle, destination) {
            return true;
        }
        !mover_ghost && self.blocking_occupant(destination).is_some()
    }
}

/// Resolves an actor template, degrading to a passive bystander when the
/// oracle or the id is missing.
pub(crate) fn resolve_template(env: &GameEnv<'_>, id: TemplateId) -> ActorTemplate {
    match env.actors().map(|o| o.template(id)) {
        Ok(Some(template)) => template,
        Ok(None) => {
            tracing::warn!(template = id.0, "unknown actor template; using passive fallback");
            ActorTemplate::passive()
        }
        Err(error) => {
            tracing::warn!(%error, "actor oracle unavailable; using passive fallback");
            ActorTemplate::passive()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::{GridDimensions, TileSpec};
    use std::collections::BTreeMap;

    fn open_puzzle(width: u32, height: u32) -> Puzzle {
        Puzzle {
            dimensions: GridDimensions::new(width, height),
            tiles: BTreeMap::new(),
            enemies: Vec::new(),
            collectibles: Vec::new(),
            win_conditions: Vec::new(),
            side_quests: Vec::new(),
            lives: 3,
            turn_limit: 20,
            par_heroes: 2,
            par_turns: 10,
            max_heroes: 2,
        }
    }

    #[test]
    fn hero_placement_respects_limits_and_occupancy() {
        let puzzle = open_puzzle(4, 4);
        let env = GameEnv::empty();
        let mut state = GameState::from_puzzle(&puzzle, &env);
        let template = ActorTemplate::new(10, 1, Vec::new());

        let first = state
            .place_hero(&puzzle, TemplateId(1), &template, Position::new(0, 0), Facing::East)
            .unwrap();
        assert_eq!(
            state
                .place_hero(&puzzle, TemplateId(1), &template, Position::new(0, 0), Facing::East)
                .unwrap_err(),
            PlacementError::Occupied(Position::new(0, 0))
        );

        let _second = state
            .place_hero(&puzzle, TemplateId(1), &template, Position::new(1, 0), Facing::East)
            .unwrap();
        assert_eq!(
            state
                .place_hero(&puzzle, TemplateId(1), &template, Position::new(2, 0), Facing::East)
                .unwrap_err(),
            PlacementError::HeroLimitReached { limit: 2 }
        );

        assert!(state.entities.entity(first).is_some());
    }

    #[test]
    fn prevent_placement_tile_rejects_heroes() {
        let mut puzzle = open_puzzle(4, 4);
        let mut spec = TileSpec::floor();
        spec.prevent_placement = true;
        puzzle.tiles.insert(Position::new(1, 1), spec);

        let env = GameEnv::empty();
        let mut state = GameState::from_puzzle(&puzzle, &env);
        let template = ActorTemplate::new(10, 1, Vec::new());

        assert_eq!(
            state
                .place_hero(&puzzle, TemplateId(0), &template, Position::new(1, 1), Facing::North)
                .unwrap_err(),
            PlacementError::PlacementPrevented(Position::new(1, 1))
        );
    }

    #[test]
    fn ghosts_do_not_block_placement() {
        let puzzle = open_puzzle(4, 4);
        let env = GameEnv::empty();
        let mut state = GameState::from_puzzle(&puzzle, &env);

        let ghost = ActorTemplate::new(5, 1, Vec::new()).with_ghost(true);
        let normal = ActorTemplate::new(5, 1, Vec::new());

        state
            .place_hero(&puzzle, TemplateId(0), &ghost, Position::new(2, 2), Facing::North)
            .unwrap();
        state
            .place_hero(&puzzle, TemplateId(1), &normal, Position::new(2, 2), Facing::North)
            .unwrap();
    }

    #[test]
    fn unknown_enemy_template_degrades_to_passive() {
        let mut puzzle = open_puzzle(4, 4);
        puzzle.enemies.push(crate::puzzle::EnemyPlacement {
            template: TemplateId(99),
            position: Position::new(3, 3),
            facing: Facing::South,
        });

        let env = GameEnv::empty();
        let state = GameState::from_puzzle(&puzzle, &env);

        let enemy = &state.entities.enemies[0];
        assert!(enemy.is_passive());
        assert_eq!(enemy.health, 1);
    }
}
