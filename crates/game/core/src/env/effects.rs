use crate::state::{EffectId, StatusEffectDefinition};

/// Definition lookup for status effects.
pub trait EffectOracle: Send + Sync {
    fn effect(&self, id: EffectId) -> Option<StatusEffectDefinition>;
}
