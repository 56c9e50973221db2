//! Continuous-time projectile and particle state.
//!
//! These advance on the host's real-time clock, never the turn clock.
//! Projectiles detect hits but never apply them; a [`PendingHit`] is queued
//! and drained exclusively by the discrete resolver at the next turn
//! boundary, so health and status state see no cross-clock writes.

use std::collections::VecDeque;

use super::{EffectId, EntityId, Facing, Position};

/// Fractional grid position for continuous motion.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn from_position(position: Position) -> Self {
        Self::new(position.x as f32, position.y as f32)
    }

    /// Grid cell this point currently occupies.
    pub fn cell(self) -> Position {
        Position::new(self.x.round() as i32, self.y.round() as i32)
    }
}

/// Damage packet carried by a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackPayload {
    pub source: EntityId,
    pub damage: u32,
    pub applies: Option<EffectId>,
}

/// An in-flight projectile.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Projectile {
    pub position: Vec2,
    pub facing: Facing,
    pub payload: AttackPayload,
    pub active: bool,
    /// Distance covered so far, in tiles.
    pub traveled: f32,
    pub max_range: f32,
}

impl Projectile {
    pub fn launch(origin: Position, facing: Facing, payload: AttackPayload, max_range: f32) -> Self {
        Self {
            position: Vec2::from_position(origin),
            facing,
            payload,
            active: true,
            traveled: 0.0,
            max_range,
        }
    }
}

/// Cosmetic effect that fades with elapsed time and never touches gameplay
/// state.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Particle {
    pub position: Vec2,
    /// Seconds left before the particle is dropped.
    pub remaining: f32,
    pub duration: f32,
}

impl Particle {
    pub fn new(position: Vec2, duration: f32) -> Self {
        Self {
            position,
            remaining: duration,
            duration,
        }
    }
}

/// A projectile contact awaiting application by the discrete resolver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PendingHit {
    pub target: EntityId,
    pub payload: AttackPayload,
}

/// All continuous-clock state, cloned with the snapshot.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContinuousState {
    pub projectiles: Vec<Projectile>,
    pub particles: Vec<Particle>,
    pub pending_hits: VecDeque<PendingHit>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec2_rounds_to_nearest_cell() {
        assert_eq!(Vec2::new(1.4, 2.6).cell(), Position::new(1, 3));
        assert_eq!(Vec2::new(-0.4, 0.0).cell(), Position::new(0, 0));
    }
}
