//! Status effect catalog loader.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tactics_core::state::{EffectId, StatusEffectDefinition};

use crate::catalog::EffectCatalog;
use crate::loaders::{LoadResult, from_ron, read_file};

/// Effect catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectCatalogFile {
    pub effects: Vec<(EffectId, StatusEffectDefinition)>,
}

/// Loader for status effect definitions from RON files.
pub struct EffectLoader;

impl EffectLoader {
    /// Load an effect catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<EffectCatalog> {
        let content = read_file(path)?;
        let file: EffectCatalogFile = from_ron(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse effect catalog RON: {}", e))?;

        Ok(EffectCatalog::from_entries(file.effects))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tactics_core::env::EffectOracle;
    use tactics_core::state::{StackingPolicy, StatusKind};

    #[test]
    fn loads_effect_catalog_from_ron() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"(
    effects: [
        (1, (
            kind: Poison,
            duration: 3,
            magnitude: 2,
            stacking: Stack,
            max_stacks: 3,
        )),
        (2, (
            kind: Shield,
            duration: 5,
            magnitude: 8,
            stacking: Highest,
            max_stacks: 1,
        )),
    ],
)"#
        )
        .unwrap();

        let catalog = EffectLoader::load(file.path()).unwrap();

        let poison = catalog.effect(EffectId(1)).unwrap();
        assert_eq!(poison.kind, StatusKind::Poison);
        assert_eq!(poison.stacking, StackingPolicy::Stack);

        let shield = catalog.effect(EffectId(2)).unwrap();
        assert_eq!(shield.magnitude, 8);
    }
}
