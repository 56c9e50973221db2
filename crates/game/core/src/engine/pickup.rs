//! Collectible pickup and death drops.
//!
//! Pickup happens when an entity comes to rest on a cell with an
//! uncollected collectible its side is permitted to take. Definitions
//! resolve through the item oracle; score and key effects carry no runtime
//! behavior and are read back at grading and win-check time.

use crate::env::GameEnv;
use crate::state::{
    CollectibleEffect, CollectibleId, CollectibleState, EntityId, GameState, Position, TemplateId,
};

use super::combat;
use super::events::GameEvent;
use super::status;

/// Collects everything at `position` the entity is permitted to take.
pub(super) fn collect_at(
    state: &mut GameState,
    env: &GameEnv<'_>,
    id: EntityId,
    position: Position,
    events: &mut Vec<GameEvent>,
) {
    let Some(side) = state
        .entities
        .entity(id)
        .filter(|e| e.alive)
        .map(|e| e.side)
    else {
        return;
    };

    let picked: Vec<(usize, CollectibleId)> = state
        .collectibles
        .iter()
        .enumerate()
        .filter(|(_, c)| !c.collected && c.position == position && c.permits(side))
        .map(|(index, c)| (index, c.definition))
        .collect();

    for (index, definition) in picked {
        state.collectibles[index].collected = true;
        events.push(GameEvent::Collected {
            entity: id,
            collectible: definition,
            position,
        });
        apply_collectible(state, env, id, definition, events);
    }
}

fn apply_collectible(
    state: &mut GameState,
    env: &GameEnv<'_>,
    id: EntityId,
    definition: CollectibleId,
    events: &mut Vec<GameEvent>,
) {
    let resolved = match env.items().map(|o| o.collectible(definition)) {
        Ok(Some(resolved)) => resolved,
        Ok(None) => {
            tracing::warn!(collectible = definition.0, "unknown collectible; treated as inert");
            return;
        }
        Err(error) => {
            tracing::warn!(%error, "item oracle unavailable; collectible treated as inert");
            return;
        }
    };

    for effect in &resolved.effects {
        match effect {
            CollectibleEffect::Heal(amount) => combat::heal(state, id, *amount, events),
            CollectibleEffect::Damage(amount) => {
                let _ = combat::apply_damage(state, env, id, *amount, None, events);
            }
            CollectibleEffect::ApplyEffect(effect_id) => {
                status::apply_effect(state, env, id, *effect_id, events);
            }
            // Score deltas are summed at grading time; keys are read by the
            // collect_keys win check.
            CollectibleEffect::Score(_) | CollectibleEffect::Key => {}
        }
    }
}

/// Places a dead entity's configured drop at its death position.
pub(super) fn spawn_drop(
    state: &mut GameState,
    env: &GameEnv<'_>,
    template: TemplateId,
    position: Position,
) {
    let Ok(oracle) = env.actors() else {
        return;
    };
    let Some(resolved) = oracle.template(template) else {
        return;
    };
    if let Some(drop) = resolved.drop {
        state.collectibles.push(CollectibleState::dropped(drop, position));
    }
}
