use crate::puzzle::CollectiblePlacement;

use super::{CollectibleId, Position, Side};

/// Runtime state of one placed collectible.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CollectibleState {
    pub definition: CollectibleId,
    pub position: Position,
    pub collected: bool,
    /// Side permitted to collect; `None` allows both.
    pub permitted: Option<Side>,
    pub prevent_placement: bool,
}

impl CollectibleState {
    pub fn from_placement(placement: &CollectiblePlacement) -> Self {
        Self {
            definition: placement.definition,
            position: placement.position,
            collected: false,
            permitted: placement.permitted,
            prevent_placement: placement.prevent_placement,
        }
    }

    /// Drops (from dead entities) are collectible by anyone and never block
    /// placement.
    pub fn dropped(definition: CollectibleId, position: Position) -> Self {
        Self {
            definition,
            position,
            collected: false,
            permitted: None,
            prevent_placement: false,
        }
    }

    pub fn permits(&self, side: Side) -> bool {
        self.permitted.is_none_or(|p| p == side)
    }
}

/// What picking up a collectible does. Definitions resolve through the item
/// oracle; one definition may carry several effects.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CollectibleEffect {
    /// Score delta applied at grading time.
    Score(i32),
    Heal(u32),
    Damage(u32),
    ApplyEffect(super::EffectId),
    /// Counts toward `collect_keys` win checks.
    Key,
}

/// Full collectible definition, resolved through the item oracle.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CollectibleDefinition {
    pub effects: Vec<CollectibleEffect>,
}

impl CollectibleDefinition {
    pub fn is_key(&self) -> bool {
        self.effects.iter().any(|e| matches!(e, CollectibleEffect::Key))
    }

    pub fn score_delta(&self) -> i32 {
        self.effects
            .iter()
            .map(|e| match e {
                CollectibleEffect::Score(delta) => *delta,
                _ => 0,
            })
            .sum()
    }
}
