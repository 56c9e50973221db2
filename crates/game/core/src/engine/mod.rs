//! Deterministic simulation engine.
//!
//! [`GameEngine`] borrows the authoritative [`GameState`] and is the only
//! component allowed to mutate it. Discrete turns resolve against a clone
//! and swap in atomically, so observers never see a half-resolved turn and
//! a failed resolution leaves the previous snapshot untouched.

mod combat;
mod continuous;
mod errors;
mod events;
mod pickup;
mod resolver;
mod scoring;
mod status;
mod tiles;
mod victory;

pub use errors::TurnError;
pub use events::GameEvent;
pub use scoring::{Rank, ScoreReport, calculate_score};
pub use victory::check_side_quests;

use crate::config::EngineTables;
use crate::env::GameEnv;
use crate::puzzle::Puzzle;
use crate::state::{GameState, GameStatus};

/// Result of resolving one discrete turn.
#[derive(Clone, Debug, PartialEq)]
pub struct TurnOutcome {
    /// Turn counter after resolution.
    pub turn: u32,
    pub status: GameStatus,
    pub events: Vec<GameEvent>,
}

/// Result of a test-mode preview run. The live state is untouched.
#[derive(Clone, Debug, PartialEq)]
pub struct TestReport {
    pub turns_resolved: u32,
    pub events: Vec<GameEvent>,
    /// The state the run would have reached, for inspection.
    pub preview: GameState,
}

/// The simulation engine, scoped to one borrowed state.
pub struct GameEngine<'a> {
    state: &'a mut GameState,
}

impl<'a> GameEngine<'a> {
    pub fn new(state: &'a mut GameState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &GameState {
        self.state
    }

    /// Resolves one discrete turn.
    ///
    /// Pipeline: drain queued projectile hits, bump the turn counter, run
    /// the movement phase (status ticks plus movement-class actions), run
    /// the attack phase on the post-movement board, advance tile cadences,
    /// then evaluate win/loss. The successor snapshot replaces the live
    /// state only once the whole pipeline has run.
    pub fn resolve_turn(
        &mut self,
        puzzle: &Puzzle,
        env: &GameEnv<'_>,
    ) -> Result<TurnOutcome, TurnError> {
        if self.state.status != GameStatus::Running {
            return Err(TurnError::NotRunning(self.state.status));
        }

        let mut next = self.state.clone();
        let mut events = Vec::new();

        resolver::drain_pending_hits(&mut next, env, &mut events);
        next.turn += 1;

        let deferred = resolver::movement_phase(&mut next, puzzle, env, &mut events);
        resolver::attack_phase(&mut next, env, deferred, &mut events);
        tiles::advance_cadences(&mut next, puzzle);
        victory::evaluate(&mut next, puzzle, env, &mut events);

        let outcome = TurnOutcome {
            turn: next.turn,
            status: next.status,
            events,
        };
        *self.state = next;
        Ok(outcome)
    }

    /// Advances the continuous-clock subsystem by `dt` seconds.
    ///
    /// Safe to call at any frame rate between turns; contacts are queued
    /// and applied by the next `resolve_turn`.
    pub fn advance_continuous(
        &mut self,
        puzzle: &Puzzle,
        env: &GameEnv<'_>,
        dt: f32,
    ) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.state.status == GameStatus::Running && dt > 0.0 {
            continuous::advance(self.state, puzzle, env, dt, &mut events);
        }
        events
    }

    /// Previews up to `turns` turns without committing anything.
    ///
    /// Win/loss evaluation is suppressed during the preview and the live
    /// state is restored afterwards, so hosts can let players rehearse a
    /// plan without consuming the real run.
    pub fn run_test(
        &mut self,
        puzzle: &Puzzle,
        env: &GameEnv<'_>,
        turns: u32,
    ) -> Result<TestReport, TurnError> {
        if self.state.status != GameStatus::Running {
            return Err(TurnError::TestNotRunning(self.state.status));
        }

        let snapshot = self.state.clone();
        self.state.test_mode = true;

        let mut events = Vec::new();
        let mut resolved = 0;
        for _ in 0..turns {
            match self.resolve_turn(puzzle, env) {
                Ok(outcome) => {
                    events.extend(outcome.events);
                    resolved += 1;
                }
                Err(_) => break,
            }
        }

        let mut preview = self.state.clone();
        preview.test_mode = false;
        *self.state = snapshot;

        Ok(TestReport {
            turns_resolved: resolved,
            events,
            preview,
        })
    }
}

/// Balance tables, falling back to compiled defaults when the oracle is
/// absent.
pub(crate) fn engine_tables(env: &GameEnv<'_>) -> EngineTables {
    match env.tables() {
        Ok(oracle) => oracle.tables().clone(),
        Err(_) => EngineTables::default(),
    }
}
