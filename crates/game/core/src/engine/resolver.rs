//! Discrete turn resolution.
//!
//! A turn resolves in two passes over the same fixed ordering (heroes by
//! placement order, then enemies): a movement phase where each entity
//! ticks its statuses and resolves its script entry, and an attack phase
//! where the attack-class actions gathered in pass one execute against the
//! post-movement board. Attackers therefore strike where targets ended up,
//! not where they started.

use crate::env::GameEnv;
use crate::puzzle::Puzzle;
use crate::script::{Action, AttackPattern, Predicate};
use crate::state::{ActionCategory, EntityId, EntityState, Facing, GameState, StatusKind};

use super::combat;
use super::events::GameEvent;
use super::status;
use super::tiles;

/// An attack-class action carried from the movement phase to the attack
/// phase.
pub(super) struct DeferredAttack {
    pub entity: EntityId,
    pub action: Action,
}

/// Applies every projectile contact queued by the continuous subsystem
/// since the last turn. This is the only place pending hits are drained.
pub(super) fn drain_pending_hits(
    state: &mut GameState,
    env: &GameEnv<'_>,
    events: &mut Vec<GameEvent>,
) {
    while let Some(hit) = state.continuous.pending_hits.pop_front() {
        let outcome = combat::apply_damage(
            state,
            env,
            hit.target,
            hit.payload.damage,
            Some(hit.payload.source),
            events,
        );
        if !outcome.negated {
            if let Some(effect) = hit.payload.applies {
                status::apply_effect(state, env, hit.target, effect, events);
            }
        }
    }
}

/// Pass one: status ticks and movement-class actions. Attack-class actions
/// are deferred and returned for the attack phase.
pub(super) fn movement_phase(
    state: &mut GameState,
    puzzle: &Puzzle,
    env: &GameEnv<'_>,
    events: &mut Vec<GameEvent>,
) -> Vec<DeferredAttack> {
    let mut deferred = Vec::new();

    // Order is captured up front; entities spawned mid-turn act next turn.
    for id in state.entities.resolution_order() {
        status::tick_entity(state, env, id, events);

        let Some(entity) = state.entities.entity(id) else {
            continue;
        };
        if !entity.alive || entity.is_passive() {
            continue;
        }
        if entity.statuses.prevents_all() {
            // Stun and sleep freeze the script; the cursor resumes where it
            // stopped once the effect runs out.
            continue;
        }

        let Some((index, action)) = select_action(state, puzzle, id) else {
            continue;
        };

        if action.is_attack_class() {
            deferred.push(DeferredAttack { entity: id, action });
            advance(state, id, index);
            continue;
        }

        match action {
            Action::Move(facing) => {
                if movement_prevented(state, id) {
                    // A gated move is not consumed; the entity retries the
                    // same entry next turn.
                    continue;
                }
                step_entity(state, puzzle, env, id, facing, events);
                if is_hasted(state, id) && !movement_prevented(state, id) {
                    step_entity(state, puzzle, env, id, facing, events);
                }
                advance(state, id, index);
            }
            Action::TurnBy(steps) => {
                if let Some(entity) = state.entities.entity_mut(id) {
                    entity.facing = entity.facing.rotated(steps);
                }
                advance(state, id, index);
            }
            Action::Wait => advance(state, id, index),
            // Attack-class entries were deferred above; select_action only
            // yields concrete actions.
            _ => {}
        }
    }

    deferred
}

/// Pass two: the deferred attacks, in the same ordering they were gathered.
pub(super) fn attack_phase(
    state: &mut GameState,
    env: &GameEnv<'_>,
    deferred: Vec<DeferredAttack>,
    events: &mut Vec<GameEvent>,
) {
    for DeferredAttack { entity: id, action } in deferred {
        let Some(entity) = state.entities.entity(id) else {
            continue;
        };
        if !entity.alive || entity.statuses.prevents_all() {
            continue;
        }
        match action {
            Action::Attack(pattern) => execute_attack(state, env, id, &pattern, events),
            Action::CastSpell(spell) => execute_spell(state, env, id, spell, events),
            _ => {}
        }
    }
}

/// Resolves the script entry at the cursor into a concrete action.
///
/// `Repeat` rewinds and resolves the first entry in the same turn. A
/// conditional whose predicate fails falls through to the next entry. The
/// walk is bounded so a script of nothing but redirections degrades to a
/// wait instead of spinning.
fn select_action(state: &GameState, puzzle: &Puzzle, id: EntityId) -> Option<(usize, Action)> {
    let entity = state.entities.entity(id)?;
    let script = &entity.script;
    if script.is_empty() {
        return None;
    }

    let mut index = entity.cursor.min(script.len() - 1);
    for _ in 0..script.len() * 2 {
        match &script[index] {
            Action::Repeat => {
                if matches!(script[0], Action::Repeat) {
                    return Some((0, Action::Wait));
                }
                index = 0;
            }
            Action::Conditional { predicate, then } => {
                if predicate_holds(state, puzzle, entity, *predicate) {
                    return Some((index, resolve_branch(state, puzzle, entity, then)));
                }
                index = (index + 1) % script.len();
            }
            action => return Some((index, action.clone())),
        }
    }
    Some((index, Action::Wait))
}

/// Unwraps nested conditionals inside a branch. A failed nested predicate
/// consumes the turn as a wait rather than falling through again.
fn resolve_branch(
    state: &GameState,
    puzzle: &Puzzle,
    entity: &EntityState,
    action: &Action,
) -> Action {
    match action {
        Action::Conditional { predicate, then } => {
            if predicate_holds(state, puzzle, entity, *predicate) {
                resolve_branch(state, puzzle, entity, then)
            } else {
                Action::Wait
            }
        }
        Action::Repeat => Action::Wait,
        other => other.clone(),
    }
}

fn predicate_holds(
    state: &GameState,
    puzzle: &Puzzle,
    entity: &EntityState,
    predicate: Predicate,
) -> bool {
    let ahead = entity.position.step(entity.facing);
    match predicate {
        Predicate::IfWall => !puzzle.contains(ahead) || state.is_wall_like(puzzle, ahead),
        Predicate::IfEnemy => state
            .entities
            .living_at(ahead)
            .is_some_and(|other| other.side == entity.side.opponent()),
    }
}

fn movement_prevented(state: &mut GameState, id: EntityId) -> bool {
    state
        .entities
        .entity_mut(id)
        .map(|e| e.statuses.is_action_prevented(ActionCategory::Movement))
        .unwrap_or(true)
}

fn is_hasted(state: &GameState, id: EntityId) -> bool {
    state
        .entities
        .entity(id)
        .is_some_and(|e| e.alive && e.statuses.has(StatusKind::Haste))
}

/// Executes one step: turn to face, then move if the destination is open.
/// A blocked step only turns (wall lookahead) but still consumes the action.
fn step_entity(
    state: &mut GameState,
    puzzle: &Puzzle,
    env: &GameEnv<'_>,
    id: EntityId,
    facing: Facing,
    events: &mut Vec<GameEvent>,
) {
    let Some((from, ghost)) = state.entities.entity(id).map(|e| (e.position, e.ghost)) else {
        return;
    };
    if let Some(entity) = state.entities.entity_mut(id) {
        entity.facing = facing;
    }

    let destination = from.step(facing);
    if state.is_move_blocked(puzzle, destination, ghost) {
        events.push(GameEvent::MoveBlocked { entity: id, facing });
        return;
    }

    tiles::relocate(state, id, from, destination);
    events.push(GameEvent::EntityMoved {
        entity: id,
        from,
        to: destination,
    });
    tiles::resolve_entry(state, puzzle, env, id, facing, events);
}

fn advance(state: &mut GameState, id: EntityId, resolved_index: usize) {
    if let Some(entity) = state.entities.entity_mut(id) {
        if !entity.script.is_empty() {
            entity.advance_cursor(resolved_index);
        }
    }
}

fn execute_attack(
    state: &mut GameState,
    env: &GameEnv<'_>,
    id: EntityId,
    pattern: &AttackPattern,
    events: &mut Vec<GameEvent>,
) {
    let category = if pattern.is_ranged_class() {
        ActionCategory::Ranged
    } else {
        ActionCategory::Melee
    };
    let prevented = match state.entities.entity_mut(id) {
        Some(entity) => entity.statuses.is_action_prevented(category),
        None => return,
    };
    if prevented {
        return;
    }

    let Some(entity) = state.entities.entity(id) else {
        return;
    };
    let (origin, facing, side, damage) = (
        entity.position,
        entity.facing,
        entity.side,
        entity.attack_damage,
    );

    if matches!(pattern, AttackPattern::Ranged { .. }) {
        let tables = super::engine_tables(env);
        if tables.ranged_spawns_projectiles {
            combat::launch_projectile(
                state,
                id,
                origin,
                facing,
                damage,
                tables.projectile_max_range,
                events,
            );
            return;
        }
    }

    let cells = combat::pattern_cells(origin, facing, pattern);
    for target in combat::targets_in_cells(state, side, &cells) {
        let _ = combat::apply_damage(state, env, target, damage, Some(id), events);
    }
}

fn execute_spell(
    state: &mut GameState,
    env: &GameEnv<'_>,
    id: EntityId,
    spell: crate::state::SpellId,
    events: &mut Vec<GameEvent>,
) {
    let prevented = match state.entities.entity_mut(id) {
        Some(entity) => entity.statuses.is_action_prevented(ActionCategory::Spell),
        None => return,
    };
    if prevented {
        return;
    }

    let definition = match env.spells().map(|o| o.spell(spell)) {
        Ok(Some(definition)) => definition,
        Ok(None) => {
            tracing::warn!(spell = spell.0, "unknown spell; cast fizzles");
            return;
        }
        Err(error) => {
            tracing::warn!(%error, "spell oracle unavailable; cast fizzles");
            return;
        }
    };

    let Some(entity) = state.entities.entity(id) else {
        return;
    };
    let (origin, facing, side) = (entity.position, entity.facing, entity.side);
    let cells = combat::pattern_cells(origin, facing, &definition.pattern);

    if definition.damage > 0 || !definition.applies.is_empty() {
        for target in combat::targets_in_cells(state, side, &cells) {
            let outcome =
                combat::apply_damage(state, env, target, definition.damage, Some(id), events);
            if !outcome.negated {
                for effect in &definition.applies {
                    status::apply_effect(state, env, target, *effect, events);
                }
            }
        }
    }
    if definition.heal > 0 {
        for ally in combat::allies_in_cells(state, side, &cells) {
            combat::heal(state, ally, definition.heal, events);
        }
    }
}
