//! High-level events emitted while resolving turns.
//!
//! Presentation layers consume these to drive animation, sound, and early
//! victory detection outside the tick boundary. Events describe what
//! happened; they never carry authority over state.

use crate::state::{
    CollectibleId, DefeatCause, EntityId, Facing, Position, SideQuestId, StatusKind,
};

/// Events emitted by the engine during simulation.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameEvent {
    /// An entity moved to a new position.
    EntityMoved {
        entity: EntityId,
        from: Position,
        to: Position,
    },

    /// A move was blocked; the entity turned to face the attempted
    /// direction instead ("wall lookahead"). Distinguishable downstream
    /// from a normal move: facing changed, position did not.
    MoveBlocked { entity: EntityId, facing: Facing },

    /// An entity was relocated by a teleport tile.
    Teleported {
        entity: EntityId,
        from: Position,
        to: Position,
    },

    /// An entity took damage after shields and negation.
    DamageTaken {
        entity: EntityId,
        amount: u32,
        health_after: u32,
        source: Option<EntityId>,
    },

    /// A shield absorbed incoming damage.
    ShieldAbsorbed { entity: EntityId, amount: u32 },

    /// An entity was healed.
    Healed { entity: EntityId, amount: u32 },

    /// A status effect was applied or merged.
    EffectApplied { entity: EntityId, kind: StatusKind },

    /// A status effect ran out or was broken.
    EffectRemoved { entity: EntityId, kind: StatusKind },

    /// An entity died.
    EntityDied { entity: EntityId, position: Position },

    /// An entity picked up a collectible.
    Collected {
        entity: EntityId,
        collectible: CollectibleId,
        position: Position,
    },

    /// A pressure plate fired.
    PlateTriggered { position: Position },

    /// A pressure plate spawned an enemy.
    EnemySpawned { entity: EntityId, position: Position },

    /// A pressure plate despawned an enemy.
    EnemyDespawned { entity: EntityId },

    /// A projectile was launched into the continuous subsystem.
    ProjectileLaunched { source: EntityId, position: Position },

    /// The continuous subsystem detected a projectile contact. Damage is
    /// applied when the discrete resolver drains the hit queue, not here.
    ProjectileHit { target: EntityId, damage: u32 },

    /// A side quest's conditions were satisfied.
    SideQuestCompleted { quest: SideQuestId },

    /// The run ended in victory.
    Victory,

    /// The run ended in defeat.
    Defeated { cause: DefeatCause },
}
