//! Spell catalog loader.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tactics_core::env::SpellDefinition;
use tactics_core::state::SpellId;

use crate::catalog::SpellCatalog;
use crate::loaders::{LoadResult, from_ron, read_file};

/// Spell catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpellCatalogFile {
    pub spells: Vec<(SpellId, SpellDefinition)>,
}

/// Loader for spell definitions from RON files.
pub struct SpellLoader;

impl SpellLoader {
    /// Load a spell catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<SpellCatalog> {
        let content = read_file(path)?;
        let file: SpellCatalogFile = from_ron(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse spell catalog RON: {}", e))?;

        Ok(SpellCatalog::from_entries(file.spells))
    }
}
