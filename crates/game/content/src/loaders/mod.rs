//! Content loaders for reading game data from files.
//!
//! Loaders convert RON catalogs and TOML tables into the in-memory
//! [`crate::catalog`] types and [`tactics_core::EngineTables`].

pub mod actors;
pub mod effects;
pub mod factory;
pub mod items;
pub mod puzzle;
pub mod spells;
pub mod tables;

pub use actors::ActorLoader;
pub use effects::EffectLoader;
pub use factory::ContentFactory;
pub use items::ItemLoader;
pub use puzzle::PuzzleLoader;
pub use spells::SpellLoader;
pub use tables::TablesLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

/// Shared RON entry point for every catalog and puzzle loader.
///
/// Ids are newtype structs in core but are written as bare values in data
/// files (`template: 1`, `drop: Some(4)`), so deserialization runs with the
/// `unwrap_newtypes` extension enabled by default.
pub(crate) fn from_ron<T: serde::de::DeserializeOwned>(
    content: &str,
) -> ron::error::SpannedResult<T> {
    ron::Options::default()
        .with_default_extension(ron::extensions::Extensions::UNWRAP_NEWTYPES)
        .from_str(content)
}
