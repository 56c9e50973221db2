//! Traits describing read-only definition data.
//!
//! Oracles resolve character/enemy templates, spells, status effects,
//! collectibles, and balance tables to their full definitions. The [`Env`]
//! aggregate bundles them so the engine can reach everything it needs
//! without hard coupling to concrete catalogs, and without any ambient
//! global registry.

mod actors;
mod effects;
mod error;
mod items;
mod spells;
mod tables;

pub use actors::{ActorOracle, ActorTemplate};
pub use effects::EffectOracle;
pub use error::LookupError;
pub use items::ItemOracle;
pub use spells::{SpellDefinition, SpellOracle};
pub use tables::TablesOracle;

/// Aggregates the read-only oracles required by the resolver.
#[derive(Clone, Copy, Debug)]
pub struct Env<'a, A, S, E, I, T>
where
    A: ActorOracle + ?Sized,
    S: SpellOracle + ?Sized,
    E: EffectOracle + ?Sized,
    I: ItemOracle + ?Sized,
    T: TablesOracle + ?Sized,
{
    actors: Option<&'a A>,
    spells: Option<&'a S>,
    effects: Option<&'a E>,
    items: Option<&'a I>,
    tables: Option<&'a T>,
}

pub type GameEnv<'a> = Env<
    'a,
    dyn ActorOracle + 'a,
    dyn SpellOracle + 'a,
    dyn EffectOracle + 'a,
    dyn ItemOracle + 'a,
    dyn TablesOracle + 'a,
>;

impl<'a, A, S, E, I, T> Env<'a, A, S, E, I, T>
where
    A: ActorOracle + ?Sized,
    S: SpellOracle + ?Sized,
    E: EffectOracle + ?Sized,
    I: ItemOracle + ?Sized,
    T: TablesOracle + ?Sized,
{
    pub fn new(
        actors: Option<&'a A>,
        spells: Option<&'a S>,
        effects: Option<&'a E>,
        items: Option<&'a I>,
        tables: Option<&'a T>,
    ) -> Self {
        Self {
            actors,
            spells,
            effects,
            items,
            tables,
        }
    }

    pub fn with_all(actors: &'a A, spells: &'a S, effects: &'a E, items: &'a I, tables: &'a T) -> Self {
        Self::new(
            Some(actors),
            Some(spells),
            Some(effects),
            Some(items),
            Some(tables),
        )
    }

    pub fn empty() -> Self {
        Self {
            actors: None,
            spells: None,
            effects: None,
            items: None,
            tables: None,
        }
    }

    /// Returns the ActorOracle, or an error if not available.
    pub fn actors(&self) -> Result<&'a A, LookupError> {
        self.actors.ok_or(LookupError::ActorsNotAvailable)
    }

    /// Returns the SpellOracle, or an error if not available.
    pub fn spells(&self) -> Result<&'a S, LookupError> {
        self.spells.ok_or(LookupError::SpellsNotAvailable)
    }

    /// Returns the EffectOracle, or an error if not available.
    pub fn effects(&self) -> Result<&'a E, LookupError> {
        self.effects.ok_or(LookupError::EffectsNotAvailable)
    }

    /// Returns the ItemOracle, or an error if not available.
    pub fn items(&self) -> Result<&'a I, LookupError> {
        self.items.ok_or(LookupError::ItemsNotAvailable)
    }

    /// Returns the TablesOracle, or an error if not available.
    pub fn tables(&self) -> Result<&'a T, LookupError> {
        self.tables.ok_or(LookupError::TablesNotAvailable)
    }
}

impl<'a, A, S, E, I, T> Env<'a, A, S, E, I, T>
where
    A: ActorOracle + 'a,
    S: SpellOracle + 'a,
    E: EffectOracle + 'a,
    I: ItemOracle + 'a,
    T: TablesOracle + 'a,
{
    /// Converts this environment into a trait-object based `GameEnv`.
    pub fn as_game_env(&self) -> GameEnv<'a> {
        let actors: Option<&'a dyn ActorOracle> = self.actors.map(|a| a as _);
        let spells: Option<&'a dyn SpellOracle> = self.spells.map(|s| s as _);
        let effects: Option<&'a dyn EffectOracle> = self.effects.map(|e| e as _);
        let items: Option<&'a dyn ItemOracle> = self.items.map(|i| i as _);
        let tables: Option<&'a dyn TablesOracle> = self.tables.map(|t| t as _);
        Env::new(actors, spells, effects, items, tables)
    }
}
