//! In-memory catalogs implementing the core oracle traits.
//!
//! A catalog is a plain id-to-definition map. Hosts either build them in
//! code or fill them from data files via the loaders.

use std::collections::HashMap;

use tactics_core::env::{
    ActorOracle, ActorTemplate, EffectOracle, ItemOracle, SpellDefinition, SpellOracle,
};
use tactics_core::state::{
    CollectibleDefinition, CollectibleId, EffectId, SpellId, StatusEffectDefinition, TemplateId,
};

/// Catalog of hero and enemy templates.
#[derive(Clone, Debug, Default)]
pub struct ActorCatalog {
    templates: HashMap<TemplateId, ActorTemplate>,
}

impl ActorCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: TemplateId, template: ActorTemplate) {
        let _ = self.templates.insert(id, template);
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (TemplateId, ActorTemplate)>) -> Self {
        Self {
            templates: entries.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl ActorOracle for ActorCatalog {
    fn template(&self, id: TemplateId) -> Option<ActorTemplate> {
        self.templates.get(&id).cloned()
    }
}

/// Catalog of spell definitions.
#[derive(Clone, Debug, Default)]
pub struct SpellCatalog {
    spells: HashMap<SpellId, SpellDefinition>,
}

impl SpellCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: SpellId, spell: SpellDefinition) {
        let _ = self.spells.insert(id, spell);
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (SpellId, SpellDefinition)>) -> Self {
        Self {
            spells: entries.into_iter().collect(),
        }
    }
}

impl SpellOracle for SpellCatalog {
    fn spell(&self, id: SpellId) -> Option<SpellDefinition> {
        self.spells.get(&id).cloned()
    }
}

/// Catalog of status effect definitions.
#[derive(Clone, Debug, Default)]
pub struct EffectCatalog {
    effects: HashMap<EffectId, StatusEffectDefinition>,
}

impl EffectCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: EffectId, effect: StatusEffectDefinition) {
        let _ = self.effects.insert(id, effect);
    }

    pub fn from_entries(
        entries: impl IntoIterator<Item = (EffectId, StatusEffectDefinition)>,
    ) -> Self {
        Self {
            effects: entries.into_iter().collect(),
        }
    }
}

impl EffectOracle for EffectCatalog {
    fn effect(&self, id: EffectId) -> Option<StatusEffectDefinition> {
        self.effects.get(&id).cloned()
    }
}

/// Catalog of collectible definitions.
#[derive(Clone, Debug, Default)]
pub struct ItemCatalog {
    items: HashMap<CollectibleId, CollectibleDefinition>,
}

impl ItemCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: CollectibleId, item: CollectibleDefinition) {
        let _ = self.items.insert(id, item);
    }

    pub fn from_entries(
        entries: impl IntoIterator<Item = (CollectibleId, CollectibleDefinition)>,
    ) -> Self {
        Self {
            items: entries.into_iter().collect(),
        }
    }
}

impl ItemOracle for ItemCatalog {
    fn collectible(&self, id: CollectibleId) -> Option<CollectibleDefinition> {
        self.items.get(&id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actor_catalog_resolves_known_ids_only() {
        let catalog = ActorCatalog::from_entries([(
            TemplateId(1),
            ActorTemplate::new(10, 2, Vec::new()),
        )]);

        assert!(catalog.template(TemplateId(1)).is_some());
        assert!(catalog.template(TemplateId(2)).is_none());
    }

    #[test]
    fn insert_replaces_existing_definitions() {
        let mut catalog = ActorCatalog::new();
        catalog.insert(TemplateId(1), ActorTemplate::new(5, 1, Vec::new()));
        catalog.insert(TemplateId(1), ActorTemplate::new(9, 1, Vec::new()));

        assert_eq!(catalog.template(TemplateId(1)).unwrap().max_health, 9);
        assert_eq!(catalog.len(), 1);
    }
}
