use crate::state::Position;

/// Errors raised while placing heroes during setup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PlacementError {
    #[error("placement is only allowed during setup")]
    NotInSetup,

    #[error("position {0} is outside the grid")]
    OutOfBounds(Position),

    #[error("position {0} is not placeable terrain")]
    Impassable(Position),

    #[error("position {0} is occupied")]
    Occupied(Position),

    #[error("placement on {0} is prevented by the puzzle")]
    PlacementPrevented(Position),

    #[error("hero limit of {limit} reached")]
    HeroLimitReached { limit: u32 },
}
