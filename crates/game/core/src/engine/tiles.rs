//! Tile entry behaviors, pressure plates, and cadence advancement.
//!
//! Entry behaviors fire when an entity comes to rest on a tile whose phase
//! is on. Ice resolves first: the entity keeps sliding in its movement
//! direction until blocked or off the ice, and only the final cell fires
//! behaviors and pickups. Teleport arrival never re-fires entry behaviors,
//! which also rules out teleport cycles.

use crate::env::GameEnv;
use crate::puzzle::{PlateEffect, Puzzle, TileBehavior};
use crate::state::{EntityId, Facing, GameState, Position, Side};

use super::combat;
use super::events::GameEvent;
use super::pickup;

/// Moves an entity between cells, keeping the occupancy map in sync.
pub(super) fn relocate(state: &mut GameState, id: EntityId, from: Position, to: Position) {
    let _ = state.occupancy.remove_occupant(&from, id);
    let _ = state.occupancy.add_occupant(to, id);
    if let Some(entity) = state.entities.entity_mut(id) {
        entity.position = to;
    }
}

/// Resolves everything that happens after an entity steps onto a cell:
/// ice slides, the final cell's entry behavior, and pickups.
pub(super) fn resolve_entry(
    state: &mut GameState,
    puzzle: &Puzzle,
    env: &GameEnv<'_>,
    id: EntityId,
    move_facing: Facing,
    events: &mut Vec<GameEvent>,
) {
    slide_on_ice(state, puzzle, id, move_facing, events);

    let Some(position) = state
        .entities
        .entity(id)
        .filter(|e| e.alive)
        .map(|e| e.position)
    else {
        return;
    };
    fire_behavior(state, puzzle, env, id, position, events);

    // The behavior may have teleported or killed the entity; collect at
    // wherever it actually stands now.
    if let Some(rest) = state
        .entities
        .entity(id)
        .filter(|e| e.alive)
        .map(|e| e.position)
    {
        pickup::collect_at(state, env, id, rest, events);
    }
}

fn slide_on_ice(
    state: &mut GameState,
    puzzle: &Puzzle,
    id: EntityId,
    move_facing: Facing,
    events: &mut Vec<GameEvent>,
) {
    loop {
        let Some((position, ghost)) = state
            .entities
            .entity(id)
            .filter(|e| e.alive)
            .map(|e| (e.position, e.ghost))
        else {
            return;
        };
        if !matches!(active_behavior(state, puzzle, position), Some(TileBehavior::Ice)) {
            return;
        }
        let next = position.step(move_facing);
        if state.is_move_blocked(puzzle, next, ghost) {
            return;
        }
        relocate(state, id, position, next);
        events.push(GameEvent::EntityMoved {
            entity: id,
            from: position,
            to: next,
        });
    }
}

/// The tile's behavior if its phase is currently on.
fn active_behavior<'p>(
    state: &GameState,
    puzzle: &'p Puzzle,
    position: Position,
) -> Option<&'p TileBehavior> {
    if !state.tiles.phase_on(position) {
        return None;
    }
    puzzle.tile(position).and_then(|t| t.behavior.as_ref())
}

fn fire_behavior(
    state: &mut GameState,
    puzzle: &Puzzle,
    env: &GameEnv<'_>,
    id: EntityId,
    position: Position,
    events: &mut Vec<GameEvent>,
) {
    let Some(behavior) = active_behavior(state, puzzle, position).cloned() else {
        return;
    };

    match behavior {
        TileBehavior::Damage { amount, once } => {
            if once && !state.tiles.mark_damaged_once(position, id) {
                return;
            }
            let _ = combat::apply_damage(state, env, id, amount, None, events);
        }
        TileBehavior::Teleport { link, active } => {
            if !(active || state.tiles.link_activated(link)) {
                return;
            }
            let Some(exit) = puzzle.teleport_exit(link, position) else {
                tracing::warn!(link = link.0, %position, "teleport tile has no partner");
                return;
            };
            let ghost = state.entities.entity(id).map(|e| e.ghost).unwrap_or(false);
            if state.is_move_blocked(puzzle, exit, ghost) {
                return;
            }
            relocate(state, id, position, exit);
            events.push(GameEvent::Teleported {
                entity: id,
                from: position,
                to: exit,
            });
        }
        TileBehavior::DirectionChange { facing } => {
            if let Some(entity) = state.entities.entity_mut(id) {
                entity.facing = facing;
            }
        }
        // A slide that ends blocked while still on ice fires nothing.
        TileBehavior::Ice => {}
        TileBehavior::PressurePlate { effects } => {
            fire_plate(state, puzzle, env, position, &effects, events);
        }
    }
}

/// Fires a plate's effects in their fixed priority order; declaration order
/// breaks ties within a bucket.
fn fire_plate(
    state: &mut GameState,
    puzzle: &Puzzle,
    env: &GameEnv<'_>,
    position: Position,
    effects: &[PlateEffect],
    events: &mut Vec<GameEvent>,
) {
    events.push(GameEvent::PlateTriggered { position });

    let mut ordered: Vec<&PlateEffect> = effects.iter().collect();
    ordered.sort_by_key(|e| e.priority());

    for effect in ordered {
        match effect {
            PlateEffect::ToggleWall { target } => {
                state.tiles.toggle_wall(*target);
            }
            PlateEffect::SpawnEnemy { template, at } => {
                if state.is_move_blocked(puzzle, *at, false) {
                    tracing::warn!(%at, "spawn cell blocked; plate spawn skipped");
                    continue;
                }
                let resolved = crate::state::resolve_template(env, *template);
                let spawned = state.spawn_enemy(*template, &resolved, *at, Facing::South);
                events.push(GameEvent::EnemySpawned {
                    entity: spawned,
                    position: *at,
                });
            }
            PlateEffect::DespawnEnemy { at } => {
                let target = state
                    .entities
                    .all()
                    .find(|e| e.alive && e.side == Side::Enemy && e.position == *at)
                    .map(|e| e.id);
                if let Some(target) = target {
                    let _ = state.occupancy.remove_occupant(at, target);
                    let _ = state.entities.remove_enemy(target);
                    events.push(GameEvent::EnemyDespawned { entity: target });
                }
            }
            PlateEffect::TriggerTeleport { link } => {
                state.tiles.activate_link(*link);
            }
            PlateEffect::ToggleTriggerGroup { group } => {
                for member in puzzle.trigger_group_members(*group) {
                    state.tiles.toggle_phase(member);
                }
            }
        }
    }
}

/// Advances every cadenced tile by one turn.
pub(super) fn advance_cadences(state: &mut GameState, puzzle: &Puzzle) {
    for (position, spec) in &puzzle.tiles {
        if let Some(cadence) = &spec.cadence {
            state.tiles.advance_cadence(*position, cadence);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::{GridDimensions, TileSpec};
    use crate::state::{EntityState, TeleportLink, TemplateId, TriggerGroupId};
    use std::collections::BTreeMap;

    fn puzzle_with_tiles(tiles: BTreeMap<Position, TileSpec>) -> Puzzle {
        Puzzle {
            dimensions: GridDimensions::new(8, 8),
            tiles,
            enemies: Vec::new(),
            collectibles: Vec::new(),
            win_conditions: Vec::new(),
            side_quests: Vec::new(),
            lives: 3,
            turn_limit: 20,
            par_heroes: 1,
            par_turns: 10,
            max_heroes: 4,
        }
    }

    fn hero_at(state: &mut GameState, id: u32, position: Position) {
        let hero = EntityState::new(
            EntityId(id),
            Side::Hero,
            TemplateId(0),
            position,
            Facing::East,
            10,
            1,
            Vec::new(),
        );
        let _ = state.occupancy.add_occupant(position, EntityId(id));
        state.entities.heroes.push(hero);
    }

    #[test]
    fn damage_once_tile_hits_a_single_time() {
        let mut tiles = BTreeMap::new();
        tiles.insert(
            Position::new(1, 0),
            TileSpec::floor().with_behavior(TileBehavior::Damage { amount: 5, once: true }),
        );
        let puzzle = puzzle_with_tiles(tiles);
        let mut state = GameState::from_puzzle(&puzzle, &GameEnv::empty());
        hero_at(&mut state, 0, Position::new(1, 0));

        let mut events = Vec::new();
        resolve_entry(&mut state, &puzzle, &GameEnv::empty(), EntityId(0), Facing::East, &mut events);
        resolve_entry(&mut state, &puzzle, &GameEnv::empty(), EntityId(0), Facing::East, &mut events);

        assert_eq!(state.entities.entity(EntityId(0)).unwrap().health, 5);
    }

    #[test]
    fn ice_slides_until_the_wall() {
        let mut tiles = BTreeMap::new();
        for x in 1..=3 {
            tiles.insert(
                Position::new(x, 0),
                TileSpec::floor().with_behavior(TileBehavior::Ice),
            );
        }
        tiles.insert(Position::new(5, 0), TileSpec::wall());
        let puzzle = puzzle_with_tiles(tiles);
        let mut state = GameState::from_puzzle(&puzzle, &GameEnv::empty());
        hero_at(&mut state, 0, Position::new(1, 0));

        let mut events = Vec::new();
        resolve_entry(&mut state, &puzzle, &GameEnv::empty(), EntityId(0), Facing::East, &mut events);

        // Slides off the ice onto (4, 0) and stops on plain floor.
        assert_eq!(
            state.entities.entity(EntityId(0)).unwrap().position,
            Position::new(4, 0)
        );
    }

    #[test]
    fn teleport_arrival_does_not_refire() {
        let link = TeleportLink(1);
        let mut tiles = BTreeMap::new();
        tiles.insert(
            Position::new(0, 0),
            TileSpec::floor().with_behavior(TileBehavior::Teleport { link, active: true }),
        );
        tiles.insert(
            Position::new(4, 4),
            TileSpec::floor().with_behavior(TileBehavior::Teleport { link, active: true }),
        );
        let puzzle = puzzle_with_tiles(tiles);
        let mut state = GameState::from_puzzle(&puzzle, &GameEnv::empty());
        hero_at(&mut state, 0, Position::new(0, 0));

        let mut events = Vec::new();
        resolve_entry(&mut state, &puzzle, &GameEnv::empty(), EntityId(0), Facing::East, &mut events);

        assert_eq!(
            state.entities.entity(EntityId(0)).unwrap().position,
            Position::new(4, 4)
        );
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, GameEvent::Teleported { .. }))
                .count(),
            1
        );
    }

    #[test]
    fn inactive_teleport_waits_for_activation() {
        let link = TeleportLink(2);
        let mut tiles = BTreeMap::new();
        tiles.insert(
            Position::new(0, 0),
            TileSpec::floor().with_behavior(TileBehavior::Teleport { link, active: false }),
        );
        tiles.insert(
            Position::new(3, 3),
            TileSpec::floor().with_behavior(TileBehavior::Teleport { link, active: false }),
        );
        let puzzle = puzzle_with_tiles(tiles);
        let mut state = GameState::from_puzzle(&puzzle, &GameEnv::empty());
        hero_at(&mut state, 0, Position::new(0, 0));

        let mut events = Vec::new();
        resolve_entry(&mut state, &puzzle, &GameEnv::empty(), EntityId(0), Facing::East, &mut events);
        assert_eq!(
            state.entities.entity(EntityId(0)).unwrap().position,
            Position::new(0, 0)
        );

        state.tiles.activate_link(link);
        resolve_entry(&mut state, &puzzle, &GameEnv::empty(), EntityId(0), Facing::East, &mut events);
        assert_eq!(
            state.entities.entity(EntityId(0)).unwrap().position,
            Position::new(3, 3)
        );
    }

    #[test]
    fn plate_toggles_wall_before_spawning() {
        let mut tiles = BTreeMap::new();
        tiles.insert(Position::new(3, 0), TileSpec::wall());
        tiles.insert(
            Position::new(1, 0),
            TileSpec::floor().with_behavior(TileBehavior::PressurePlate {
                effects: vec![
                    // Declared out of order on purpose; the spawn still sees
                    // the opened wall.
                    PlateEffect::SpawnEnemy {
                        template: TemplateId(7),
                        at: Position::new(3, 0),
                    },
                    PlateEffect::ToggleWall {
                        target: Position::new(3, 0),
                    },
                ],
            }),
        );
        let puzzle = puzzle_with_tiles(tiles);
        let mut state = GameState::from_puzzle(&puzzle, &GameEnv::empty());
        hero_at(&mut state, 0, Position::new(1, 0));

        let mut events = Vec::new();
        resolve_entry(&mut state, &puzzle, &GameEnv::empty(), EntityId(0), Facing::East, &mut events);

        assert!(!state.is_wall_like(&puzzle, Position::new(3, 0)));
        assert!(events.iter().any(|e| matches!(e, GameEvent::EnemySpawned { .. })));
        assert_eq!(state.entities.enemies.len(), 1);
    }

    #[test]
    fn trigger_group_toggle_turns_behaviors_off() {
        let group = TriggerGroupId(1);
        let mut tiles = BTreeMap::new();
        tiles.insert(
            Position::new(4, 0),
            TileSpec::floor()
                .with_behavior(TileBehavior::Damage { amount: 3, once: false })
                .with_trigger_group(group),
        );
        tiles.insert(
            Position::new(1, 0),
            TileSpec::floor().with_behavior(TileBehavior::PressurePlate {
                effects: vec![PlateEffect::ToggleTriggerGroup { group }],
            }),
        );
        let puzzle = puzzle_with_tiles(tiles);
        let mut state = GameState::from_puzzle(&puzzle, &GameEnv::empty());
        hero_at(&mut state, 0, Position::new(1, 0));
        hero_at(&mut state, 1, Position::new(4, 0));

        let mut events = Vec::new();
        // Plate flips the group off, then the second hero rests on the
        // damage tile unharmed.
        resolve_entry(&mut state, &puzzle, &GameEnv::empty(), EntityId(0), Facing::East, &mut events);
        resolve_entry(&mut state, &puzzle, &GameEnv::empty(), EntityId(1), Facing::East, &mut events);

        assert_eq!(state.entities.entity(EntityId(1)).unwrap().health, 10);
    }

    #[test]
    fn cadence_gates_entry_damage() {
        let mut tiles = BTreeMap::new();
        tiles.insert(
            Position::new(2, 0),
            TileSpec::floor()
                .with_behavior(TileBehavior::Damage { amount: 2, once: false })
                .with_cadence(crate::puzzle::CadenceSpec {
                    pattern: crate::puzzle::CadencePattern::Alternating,
                    start_on: false,
                }),
        );
        let puzzle = puzzle_with_tiles(tiles);
        let mut state = GameState::from_puzzle(&puzzle, &GameEnv::empty());
        hero_at(&mut state, 0, Position::new(2, 0));

        let mut events = Vec::new();
        resolve_entry(&mut state, &puzzle, &GameEnv::empty(), EntityId(0), Facing::East, &mut events);
        assert_eq!(state.entities.entity(EntityId(0)).unwrap().health, 10);

        advance_cadences(&mut state, &puzzle);
        resolve_entry(&mut state, &puzzle, &GameEnv::empty(), EntityId(0), Facing::East, &mut events);
        assert_eq!(state.entities.entity(EntityId(0)).unwrap().health, 8);
    }
}
