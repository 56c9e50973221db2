//! Collectible catalog loader.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tactics_core::state::{CollectibleDefinition, CollectibleId};

use crate::catalog::ItemCatalog;
use crate::loaders::{LoadResult, from_ron, read_file};

/// Collectible catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemCatalogFile {
    pub items: Vec<(CollectibleId, CollectibleDefinition)>,
}

/// Loader for collectible definitions from RON files.
pub struct ItemLoader;

impl ItemLoader {
    /// Load a collectible catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<ItemCatalog> {
        let content = read_file(path)?;
        let file: ItemCatalogFile = from_ron(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse item catalog RON: {}", e))?;

        Ok(ItemCatalog::from_entries(file.items))
    }
}
