mod collectible;
mod common;
mod entity;
mod projectile;
mod status;
mod tiles;

pub use collectible::{CollectibleDefinition, CollectibleEffect, CollectibleState};
pub use common::{
    CollectibleId, EffectId, EntityId, Facing, Position, Side, SideQuestId, SpellId, TeleportLink,
    TemplateId, TriggerGroupId,
};
pub use entity::{EntitiesState, EntityState};
pub use projectile::{AttackPayload, ContinuousState, Particle, PendingHit, Projectile, Vec2};
pub use status::{
    ActionCategory, PeriodicEffect, Restrictions, StackingPolicy, StatusEffectDefinition,
    StatusEffectInstance, StatusEffects, StatusKind,
};
pub use tiles::{TileMap, TileRuntime};
