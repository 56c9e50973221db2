//! Actor catalog loader.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tactics_core::env::ActorTemplate;
use tactics_core::state::TemplateId;

use crate::catalog::ActorCatalog;
use crate::loaders::{LoadResult, from_ron, read_file};

/// Actor catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorCatalogFile {
    pub actors: Vec<(TemplateId, ActorTemplate)>,
}

/// Loader for actor templates from RON files.
pub struct ActorLoader;

impl ActorLoader {
    /// Load an actor catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<ActorCatalog> {
        let content = read_file(path)?;
        let file: ActorCatalogFile = from_ron(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse actor catalog RON: {}", e))?;

        Ok(ActorCatalog::from_entries(file.actors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tactics_core::env::ActorOracle;

    #[test]
    fn loads_actor_catalog_from_ron() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"(
    actors: [
        (1, (
            max_health: 12,
            attack_damage: 3,
            behavior: [Move(East), Attack(Melee), Repeat],
            ghost: false,
            boss: false,
            drop: None,
        )),
        (2, (
            max_health: 30,
            attack_damage: 5,
            behavior: [Wait],
            ghost: false,
            boss: true,
            drop: Some(4),
        )),
    ],
)"#
        )
        .unwrap();

        let catalog = ActorLoader::load(file.path()).unwrap();

        let walker = catalog.template(TemplateId(1)).unwrap();
        assert_eq!(walker.max_health, 12);
        assert_eq!(walker.behavior.len(), 3);

        let boss = catalog.template(TemplateId(2)).unwrap();
        assert!(boss.boss);
        assert_eq!(boss.drop, Some(tactics_core::state::CollectibleId(4)));
    }

    #[test]
    fn rejects_malformed_ron() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "(actors: [(1, nope)])").unwrap();

        assert!(ActorLoader::load(file.path()).is_err());
    }
}
