//! Damage, healing, and attack pattern resolution.
//!
//! Every damage packet in the engine funnels through [`apply_damage`], so
//! deflect, invulnerability, shield absorption, wake-on-damage, and death
//! handling behave identically whether the source is an attack, a hazard
//! tile, a periodic status effect, or a drained projectile hit.

use crate::env::GameEnv;
use crate::script::AttackPattern;
use crate::state::{
    AttackPayload, EntityId, Facing, GameState, Position, Projectile, Side, StatusKind,
};

use super::events::GameEvent;
use super::pickup;

/// Result of routing one damage packet at a target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DamageOutcome {
    /// Damage that reached health.
    pub applied: u32,
    /// Damage soaked by a shield.
    pub absorbed: u32,
    /// Whole packet negated by deflect or invulnerability.
    pub negated: bool,
    pub died: bool,
}

/// Applies a damage packet to a living entity.
///
/// Order: deflect (consumed), invulnerability, shield absorption, health.
/// Effects flagged removed-on-damage break unless the packet was fully
/// negated. Death marks the entity dead, frees its occupancy slot, and
/// spawns its configured drop.
pub(super) fn apply_damage(
    state: &mut GameState,
    env: &GameEnv<'_>,
    target: EntityId,
    amount: u32,
    source: Option<EntityId>,
    events: &mut Vec<GameEvent>,
) -> DamageOutcome {
    let mut outcome = DamageOutcome::default();
    if amount == 0 {
        return outcome;
    }

    let Some(entity) = state.entities.entity_mut(target) else {
        return outcome;
    };
    if !entity.alive {
        return outcome;
    }

    if entity.statuses.consume_deflect() {
        events.push(GameEvent::EffectRemoved {
            entity: target,
            kind: StatusKind::Deflect,
        });
        outcome.negated = true;
        return outcome;
    }
    if entity.statuses.has(StatusKind::Invulnerable) {
        outcome.negated = true;
        return outcome;
    }

    let leftover = entity.statuses.absorb_with_shield(amount);
    outcome.absorbed = amount - leftover;
    if outcome.absorbed > 0 {
        events.push(GameEvent::ShieldAbsorbed {
            entity: target,
            amount: outcome.absorbed,
        });
    }

    if leftover > 0 {
        entity.health = entity.health.saturating_sub(leftover);
        outcome.applied = leftover;
        events.push(GameEvent::DamageTaken {
            entity: target,
            amount: leftover,
            health_after: entity.health,
            source,
        });
    }

    // The packet connected; sleep and friends break even if a shield soaked
    // it all.
    for kind in entity.statuses.on_damage_taken() {
        events.push(GameEvent::EffectRemoved {
            entity: target,
            kind,
        });
    }

    if entity.health == 0 {
        entity.alive = false;
        let position = entity.position;
        let template = entity.template;
        let _ = state.occupancy.remove_occupant(&position, target);
        events.push(GameEvent::EntityDied {
            entity: target,
            position,
        });
        pickup::spawn_drop(state, env, template, position);
        outcome.died = true;
    }

    outcome
}

/// Heals a living entity up to its maximum health.
pub(super) fn heal(state: &mut GameState, target: EntityId, amount: u32, events: &mut Vec<GameEvent>) {
    let Some(entity) = state.entities.entity_mut(target) else {
        return;
    };
    if !entity.alive || amount == 0 {
        return;
    }
    let healed = (entity.health + amount).min(entity.max_health) - entity.health;
    if healed > 0 {
        entity.health += healed;
        events.push(GameEvent::Healed {
            entity: target,
            amount: healed,
        });
    }
}

/// Computes the cells an attack pattern touches from an origin and facing.
///
/// Custom patterns are authored facing North and rotate with the attacker
/// in quarter turns; diagonal facings round down to the preceding cardinal.
pub(super) fn pattern_cells(origin: Position, facing: Facing, pattern: &AttackPattern) -> Vec<Position> {
    match pattern {
        AttackPattern::Melee => vec![origin.step(facing)],
        AttackPattern::Ranged { range } => {
            let (dx, dy) = facing.delta();
            (1..=*range as i32)
                .map(|k| Position::new(origin.x + dx * k, origin.y + dy * k))
                .collect()
        }
        AttackPattern::Area { radius } => {
            let r = *radius as i32;
            let mut cells = Vec::new();
            for dy in -r..=r {
                for dx in -r..=r {
                    if dx == 0 && dy == 0 {
                        continue;
                    }
                    cells.push(Position::new(origin.x + dx, origin.y + dy));
                }
            }
            cells
        }
        AttackPattern::Custom { cells } => {
            let quarter_turns = quarter_turns_for(facing);
            cells
                .iter()
                .map(|&(dx, dy)| {
                    let (rx, ry) = rotate_quarter((dx as i32, dy as i32), quarter_turns);
                    Position::new(origin.x + rx, origin.y + ry)
                })
                .collect()
        }
    }
}

fn quarter_turns_for(facing: Facing) -> u8 {
    match facing {
        Facing::North | Facing::NorthEast => 0,
        Facing::East | Facing::SouthEast => 1,
        Facing::South | Facing::SouthWest => 2,
        Facing::West | Facing::NorthWest => 3,
    }
}

fn rotate_quarter((mut x, mut y): (i32, i32), turns: u8) -> (i32, i32) {
    for _ in 0..turns {
        // Clockwise quarter turn with north as +y.
        let (nx, ny) = (y, -x);
        x = nx;
        y = ny;
    }
    (x, y)
}

/// Living opposing entities standing in the affected cells, skipping
/// stealthed targets (scripted attacks are automatic targeting).
pub(super) fn targets_in_cells(
    state: &GameState,
    attacker_side: Side,
    cells: &[Position],
) -> Vec<EntityId> {
    state
        .entities
        .all()
        .filter(|e| {
            e.alive
                && e.side == attacker_side.opponent()
                && !e.statuses.has(StatusKind::Stealth)
                && cells.contains(&e.position)
        })
        .map(|e| e.id)
        .collect()
}

/// Same-side living entities in the affected cells, for spell healing.
pub(super) fn allies_in_cells(
    state: &GameState,
    attacker_side: Side,
    cells: &[Position],
) -> Vec<EntityId> {
    state
        .entities
        .all()
        .filter(|e| e.alive && e.side == attacker_side && cells.contains(&e.position))
        .map(|e| e.id)
        .collect()
}

/// Launches a projectile for a ranged attack routed through the continuous
/// subsystem.
pub(super) fn launch_projectile(
    state: &mut GameState,
    attacker: EntityId,
    origin: Position,
    facing: Facing,
    damage: u32,
    max_range: f32,
    events: &mut Vec<GameEvent>,
) {
    state.continuous.projectiles.push(Projectile::launch(
        origin,
        facing,
        AttackPayload {
            source: attacker,
            damage,
            applies: None,
        },
        max_range,
    ));
    events.push(GameEvent::ProjectileLaunched {
        source: attacker,
        position: origin,
    });
}
