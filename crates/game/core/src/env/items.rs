use crate::state::{CollectibleDefinition, CollectibleId};

/// Definition lookup for collectibles.
pub trait ItemOracle: Send + Sync {
    fn collectible(&self, id: CollectibleId) -> Option<CollectibleDefinition>;
}
