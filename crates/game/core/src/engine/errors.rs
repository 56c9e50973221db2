use crate::state::GameStatus;

/// Errors that can occur while resolving discrete turns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TurnError {
    #[error("turns only resolve while running (status is {0:?})")]
    NotRunning(GameStatus),

    #[error("test runs only start while running (status is {0:?})")]
    TestNotRunning(GameStatus),
}
