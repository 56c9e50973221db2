use crate::script::Action;
use crate::state::{CollectibleId, TemplateId};

/// Definition lookup for hero and enemy templates.
pub trait ActorOracle: Send + Sync {
    fn template(&self, id: TemplateId) -> Option<ActorTemplate>;
}

/// Full definition of a character or enemy type.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorTemplate {
    pub max_health: u32,
    /// Base damage dealt by this actor's attacks.
    pub attack_damage: u32,
    pub behavior: Vec<Action>,
    pub ghost: bool,
    pub boss: bool,
    /// Collectible dropped on death, if any.
    pub drop: Option<CollectibleId>,
}

impl ActorTemplate {
    pub fn new(max_health: u32, attack_damage: u32, behavior: Vec<Action>) -> Self {
        Self {
            max_health,
            attack_damage,
            behavior,
            ghost: false,
            boss: false,
            drop: None,
        }
    }

    /// Fallback for unknown template ids: a passive 1 HP bystander.
    pub fn passive() -> Self {
        Self::new(1, 0, Vec::new())
    }

    pub fn with_ghost(mut self, ghost: bool) -> Self {
        self.ghost = ghost;
        self
    }

    pub fn with_boss(mut self, boss: bool) -> Self {
        self.boss = boss;
        self
    }

    pub fn with_drop(mut self, drop: CollectibleId) -> Self {
        self.drop = Some(drop);
        self
    }
}
