/// Errors surfaced when an oracle is not wired into the environment.
///
/// Callers inside the engine treat these as degradation signals, not fatal
/// conditions: the affected entity or effect falls back to a safe default.
/// Ids an available oracle cannot resolve come back as `None` from the
/// oracle itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("actor oracle not available")]
    ActorsNotAvailable,

    #[error("spell oracle not available")]
    SpellsNotAvailable,

    #[error("effect oracle not available")]
    EffectsNotAvailable,

    #[error("item oracle not available")]
    ItemsNotAvailable,

    #[error("tables oracle not available")]
    TablesNotAvailable,
}
