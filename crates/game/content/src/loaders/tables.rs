//! Balance tables loader.

use std::path::Path;

use tactics_core::EngineTables;

use crate::loaders::{LoadResult, read_file};

/// Loader for engine balance tables from TOML files.
///
/// Fields omitted from the file keep their compiled defaults.
pub struct TablesLoader;

impl TablesLoader {
    /// Load balance tables from a TOML file.
    pub fn load(path: &Path) -> LoadResult<EngineTables> {
        let content = read_file(path)?;
        let tables: EngineTables = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse tables TOML: {}", e))?;

        Ok(tables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_partial_tables_over_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
projectile_speed = 10.0
ranged_spawns_projectiles = true

[scoring]
base_points = 200
"#
        )
        .unwrap();

        let tables = TablesLoader::load(file.path()).unwrap();

        assert_eq!(tables.projectile_speed, 10.0);
        assert!(tables.ranged_spawns_projectiles);
        assert_eq!(tables.scoring.base_points, 200);
        // Untouched fields keep their defaults.
        assert_eq!(tables.projectile_max_range, 12.0);
        assert_eq!(tables.scoring.turn_bonus, 50);
    }
}
