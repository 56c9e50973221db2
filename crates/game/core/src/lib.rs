//! Deterministic turn-based tactics simulation engine.
//!
//! The crate is split along the same seams the data flows through:
//!
//! - [`puzzle`]: static, declarative puzzle definitions (grid, placements,
//!   win conditions, pars). Never mutated at runtime.
//! - [`state`]: the authoritative runtime snapshot (entities, tile runtime,
//!   collectibles, continuous-clock state). Cheap to clone, atomic to swap.
//! - [`script`]: the behavior vocabulary entities replay each turn.
//! - [`env`]: oracle traits resolving ids to full definitions, so the
//!   engine stays decoupled from however content is stored.
//! - [`engine`]: the reducer. Resolves discrete turns against a cloned
//!   snapshot, advances the real-time projectile subsystem, grades runs.
//!
//! Everything is synchronous and allocation-light; hosts own the clock and
//! the content.

pub mod config;
pub mod engine;
pub mod env;
pub mod puzzle;
pub mod script;
pub mod state;

pub use config::{EngineTables, GameConfig, ScoreTable};
pub use engine::{
    GameEngine, GameEvent, Rank, ScoreReport, TestReport, TurnError, TurnOutcome, calculate_score,
    check_side_quests,
};
pub use env::{
    ActorOracle, ActorTemplate, EffectOracle, Env, GameEnv, ItemOracle, LookupError,
    SpellDefinition, SpellOracle, TablesOracle,
};
pub use puzzle::Puzzle;
pub use state::{DefeatCause, GameState, GameStatus, PlacementError};
