use std::fmt;

/// Unique identifier for any entity tracked in the state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Reference to a character/enemy template resolved through the actor oracle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TemplateId(pub u16);

/// Reference to a spell definition resolved through the spell oracle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpellId(pub u16);

/// Reference to a status-effect definition resolved through the effect oracle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectId(pub u16);

/// Reference to a collectible definition resolved through the item oracle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CollectibleId(pub u16);

/// Pairs two teleport tiles; entering one relocates to the other.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TeleportLink(pub u16);

/// Groups tiles whose on/off phase is driven by pressure plates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TriggerGroupId(pub u16);

/// Identifier of a side quest within a puzzle definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SideQuestId(pub u16);

/// Discrete grid position expressed in tile coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the neighbouring position one step in `facing`.
    pub fn step(self, facing: Facing) -> Self {
        let (dx, dy) = facing.delta();
        Self::new(self.x + dx, self.y + dy)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Eight compass directions an entity can face.
///
/// Ordered clockwise from North so `rotated` can step in 45-degree
/// increments.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Facing {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Facing {
    const CLOCKWISE: [Facing; 8] = [
        Facing::North,
        Facing::NorthEast,
        Facing::East,
        Facing::SouthEast,
        Facing::South,
        Facing::SouthWest,
        Facing::West,
        Facing::NorthWest,
    ];

    /// Unit grid delta for a single step in this direction.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Facing::North => (0, 1),
            Facing::NorthEast => (1, 1),
            Facing::East => (1, 0),
            Facing::SouthEast => (1, -1),
            Facing::South => (0, -1),
            Facing::SouthWest => (-1, -1),
            Facing::West => (-1, 0),
            Facing::NorthWest => (-1, 1),
        }
    }

    fn clockwise_index(self) -> i32 {
        match self {
            Facing::North => 0,
            Facing::NorthEast => 1,
            Facing::East => 2,
            Facing::SouthEast => 3,
            Facing::South => 4,
            Facing::SouthWest => 5,
            Facing::West => 6,
            Facing::NorthWest => 7,
        }
    }

    /// Rotates by `steps` 45-degree increments; positive is clockwise.
    pub fn rotated(self, steps: i8) -> Facing {
        let rotated = (self.clockwise_index() + steps as i32).rem_euclid(8) as usize;
        Self::CLOCKWISE[rotated]
    }
}

/// Which roster an entity belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Side {
    Hero,
    Enemy,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Hero => Side::Enemy,
            Side::Enemy => Side::Hero,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_wraps_in_both_directions() {
        assert_eq!(Facing::North.rotated(1), Facing::NorthEast);
        assert_eq!(Facing::North.rotated(-1), Facing::NorthWest);
        assert_eq!(Facing::West.rotated(4), Facing::East);
        assert_eq!(Facing::North.rotated(8), Facing::North);
        assert_eq!(Facing::SouthEast.rotated(-16), Facing::SouthEast);
    }

    #[test]
    fn step_follows_delta() {
        let origin = Position::ORIGIN;
        assert_eq!(origin.step(Facing::East), Position::new(1, 0));
        assert_eq!(origin.step(Facing::SouthWest), Position::new(-1, -1));
    }
}
