use crate::script::AttackPattern;
use crate::state::{EffectId, SpellId};

/// Definition lookup for spells referenced by `CastSpell` script entries.
pub trait SpellOracle: Send + Sync {
    fn spell(&self, id: SpellId) -> Option<SpellDefinition>;
}

/// Full definition of a castable spell.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpellDefinition {
    pub pattern: AttackPattern,
    /// Applied to opposing entities in the affected cells.
    pub damage: u32,
    /// Applied to same-side entities in the affected cells.
    pub heal: u32,
    /// Status effects applied to every opposing entity hit.
    pub applies: Vec<EffectId>,
}
