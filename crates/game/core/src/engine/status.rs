//! Status effect application and turn-start processing.
//!
//! Definitions resolve through the effect oracle at application time;
//! entities only ever store live instances. Periodic damage is routed
//! through the damage pipeline so shields, deflects, and wake-on-damage
//! apply to poison ticks exactly as they do to attacks.

use crate::env::GameEnv;
use crate::state::{EffectId, EntityId, GameState, PeriodicEffect};

use super::combat;
use super::events::GameEvent;

/// Applies a status effect by id to a living entity.
///
/// Unknown ids and a missing oracle degrade to a warning rather than an
/// error; a scripted effect that cannot resolve simply does nothing.
pub(super) fn apply_effect(
    state: &mut GameState,
    env: &GameEnv<'_>,
    target: EntityId,
    effect_id: EffectId,
    events: &mut Vec<GameEvent>,
) {
    let definition = match env.effects().map(|o| o.effect(effect_id)) {
        Ok(Some(definition)) => definition,
        Ok(None) => {
            tracing::warn!(effect = effect_id.0, "unknown status effect; ignoring");
            return;
        }
        Err(error) => {
            tracing::warn!(%error, "effect oracle unavailable; ignoring application");
            return;
        }
    };

    let Some(entity) = state.entities.entity_mut(target) else {
        return;
    };
    if !entity.alive {
        return;
    }

    if entity.statuses.apply(&definition) {
        events.push(GameEvent::EffectApplied {
            entity: target,
            kind: definition.kind,
        });
    } else {
        tracing::warn!(entity = %target, kind = %definition.kind, "status set full; application dropped");
    }
}

/// Runs one entity's turn-start status processing: periodic packets fire
/// through the damage pipeline, durations count down, expired effects drop.
pub(super) fn tick_entity(
    state: &mut GameState,
    env: &GameEnv<'_>,
    id: EntityId,
    events: &mut Vec<GameEvent>,
) {
    let Some(entity) = state.entities.entity_mut(id) else {
        return;
    };
    if !entity.alive {
        return;
    }

    let (periodic, expired) = entity.statuses.tick_turn_start();
    for kind in expired {
        events.push(GameEvent::EffectRemoved { entity: id, kind });
    }
    for effect in periodic {
        match effect {
            PeriodicEffect::Damage { amount, .. } => {
                let _ = combat::apply_damage(state, env, id, amount, None, events);
            }
            PeriodicEffect::Heal { amount, .. } => {
                combat::heal(state, id, amount, events);
            }
        }
    }
}
