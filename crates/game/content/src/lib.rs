//! Data-driven content catalogs and loaders.
//!
//! This crate houses the oracle implementations the engine resolves ids
//! through, plus loaders for RON/TOML data files:
//! - Actor templates (data-driven via RON)
//! - Spell definitions (data-driven via RON)
//! - Status effect definitions (data-driven via RON)
//! - Collectible definitions (data-driven via RON)
//! - Puzzle layouts (data-driven via RON)
//! - Balance tables (data-driven via TOML)
//!
//! Content is consumed through the oracle traits and never appears in game
//! state. All loaders deserialize tactics-core types directly with serde.

pub mod catalog;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use catalog::{ActorCatalog, EffectCatalog, ItemCatalog, SpellCatalog};

#[cfg(feature = "loaders")]
pub use loaders::{
    ActorLoader, ContentFactory, EffectLoader, ItemLoader, PuzzleLoader, SpellLoader, TablesLoader,
};
