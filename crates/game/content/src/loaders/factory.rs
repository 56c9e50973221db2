//! Content factory for building a full oracle environment from data files.

use std::path::{Path, PathBuf};

use tactics_core::EngineTables;
use tactics_core::env::{Env, GameEnv};
use tactics_core::puzzle::Puzzle;

use crate::catalog::{ActorCatalog, EffectCatalog, ItemCatalog, SpellCatalog};
use crate::loaders::{
    ActorLoader, EffectLoader, ItemLoader, LoadResult, PuzzleLoader, SpellLoader, TablesLoader,
};

/// Loads every catalog a running game needs from one data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── actors.ron
/// ├── spells.ron
/// ├── effects.ron
/// ├── items.ron
/// ├── tables.toml
/// └── puzzles/
///     ├── tutorial_01.ron
///     └── ...
/// ```
///
/// Missing catalog files load as empty catalogs and a missing `tables.toml`
/// falls back to compiled defaults, so a data directory only has to carry
/// the content it actually uses.
pub struct ContentFactory {
    data_dir: PathBuf,
    actors: ActorCatalog,
    spells: SpellCatalog,
    effects: EffectCatalog,
    items: ItemCatalog,
    tables: EngineTables,
}

impl ContentFactory {
    /// Loads all catalogs from a data directory.
    pub fn load_dir(data_dir: impl Into<PathBuf>) -> LoadResult<Self> {
        let data_dir = data_dir.into();

        let actors = load_or_default(&data_dir.join("actors.ron"), ActorLoader::load)?;
        let spells = load_or_default(&data_dir.join("spells.ron"), SpellLoader::load)?;
        let effects = load_or_default(&data_dir.join("effects.ron"), EffectLoader::load)?;
        let items = load_or_default(&data_dir.join("items.ron"), ItemLoader::load)?;
        let tables = load_or_default(&data_dir.join("tables.toml"), TablesLoader::load)?;

        Ok(Self {
            data_dir,
            actors,
            spells,
            effects,
            items,
            tables,
        })
    }

    /// Load one puzzle from `puzzles/<name>.ron`.
    pub fn load_puzzle(&self, name: &str) -> LoadResult<Puzzle> {
        let path = self.data_dir.join("puzzles").join(format!("{name}.ron"));
        PuzzleLoader::load(&path)
    }

    pub fn actors(&self) -> &ActorCatalog {
        &self.actors
    }

    pub fn spells(&self) -> &SpellCatalog {
        &self.spells
    }

    pub fn effects(&self) -> &EffectCatalog {
        &self.effects
    }

    pub fn items(&self) -> &ItemCatalog {
        &self.items
    }

    pub fn tables(&self) -> &EngineTables {
        &self.tables
    }

    /// Bundles the loaded catalogs into the trait-object environment the
    /// engine consumes.
    pub fn env(&self) -> GameEnv<'_> {
        Env::with_all(
            &self.actors,
            &self.spells,
            &self.effects,
            &self.items,
            &self.tables,
        )
        .as_game_env()
    }
}

/// A missing file is not an error; everything else is.
fn load_or_default<T: Default>(
    path: &Path,
    loader: impl FnOnce(&Path) -> LoadResult<T>,
) -> LoadResult<T> {
    if path.exists() {
        loader(path)
    } else {
        Ok(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tactics_core::state::TemplateId;

    #[test]
    fn loads_a_data_directory_and_builds_an_env() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("actors.ron"),
            r#"(
    actors: [
        (1, (
            max_health: 10,
            attack_damage: 2,
            behavior: [Move(North), Repeat],
            ghost: false,
            boss: false,
            drop: None,
        )),
    ],
)"#,
        )
        .unwrap();
        fs::write(dir.path().join("tables.toml"), "projectile_speed = 6.0\n").unwrap();
        fs::create_dir(dir.path().join("puzzles")).unwrap();
        fs::write(
            dir.path().join("puzzles").join("test.ron"),
            r#"(
    dimensions: (width: 4, height: 4),
    tiles: {},
    enemies: [],
    collectibles: [],
    win_conditions: [DefeatAllEnemies],
    side_quests: [],
    lives: 3,
    turn_limit: 20,
    par_heroes: 1,
    par_turns: 10,
    max_heroes: 2,
)"#,
        )
        .unwrap();

        let factory = ContentFactory::load_dir(dir.path()).unwrap();

        assert_eq!(factory.actors().len(), 1);
        assert_eq!(factory.tables().projectile_speed, 6.0);

        let puzzle = factory.load_puzzle("test").unwrap();
        assert_eq!(puzzle.max_heroes, 2);

        // The env resolves through the loaded catalogs.
        let env = factory.env();
        let template = env.actors().unwrap().template(TemplateId(1)).unwrap();
        assert_eq!(template.max_health, 10);
    }

    #[test]
    fn missing_catalogs_load_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let factory = ContentFactory::load_dir(dir.path()).unwrap();

        assert!(factory.actors().is_empty());
        assert_eq!(factory.tables(), &EngineTables::default());
    }
}
