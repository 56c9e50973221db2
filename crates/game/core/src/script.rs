//! Scripted behavior vocabulary.
//!
//! Every entity carries an ordered list of [`Action`] entries and a cursor.
//! The resolver replays the list one entry per turn; `Repeat` rewinds the
//! cursor and `Conditional` picks a branch against the live environment.

use crate::state::{Facing, SpellId};

/// One entry in an entity's behavior script.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Action {
    /// Step one tile in the given direction, turning to face it.
    Move(Facing),
    /// Rotate in place by 45-degree steps (positive is clockwise).
    TurnBy(i8),
    /// Consume the turn with no effect.
    Wait,
    /// Rewind the cursor to the start of the script.
    Repeat,
    /// Strike cells derived from the current facing and pattern.
    Attack(AttackPattern),
    /// Cast a spell definition resolved through the spell oracle.
    CastSpell(SpellId),
    /// Evaluate the predicate at resolution time; on success run the branch
    /// action, otherwise fall through to the next script entry.
    Conditional {
        predicate: Predicate,
        then: Box<Action>,
    },
}

/// Cells affected by an attack, relative to the attacker.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackPattern {
    /// The single cell directly ahead.
    Melee,
    /// A straight line ahead, up to `range` cells.
    Ranged { range: u8 },
    /// Every cell within Chebyshev `radius`, excluding the attacker's own.
    Area { radius: u8 },
    /// Explicit offsets, authored facing North and rotated with the attacker.
    Custom { cells: Vec<(i8, i8)> },
}

impl AttackPattern {
    /// Ranged and area strikes share the ranged prevention category.
    pub fn is_ranged_class(&self) -> bool {
        matches!(
            self,
            AttackPattern::Ranged { .. } | AttackPattern::Area { .. }
        )
    }
}

/// Environment tests available to conditional script entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Predicate {
    /// The cell directly ahead blocks movement.
    IfWall,
    /// A living opposing entity stands directly ahead.
    IfEnemy,
}

impl Action {
    /// Returns true for entries resolved in the attack phase rather than
    /// the movement phase.
    ///
    /// Conditionals are classified once their branch is selected, so they
    /// report false here; the resolver classifies the chosen branch.
    pub fn is_attack_class(&self) -> bool {
        matches!(self, Action::Attack(_) | Action::CastSpell(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attack_and_spell_are_attack_class() {
        assert!(Action::Attack(AttackPattern::Melee).is_attack_class());
        assert!(Action::CastSpell(SpellId(3)).is_attack_class());
        assert!(!Action::Move(Facing::North).is_attack_class());
        assert!(!Action::Wait.is_attack_class());
    }

    #[test]
    fn scripts_support_full_equality() {
        // Entity snapshots compare with `Eq`, so the script vocabulary has
        // to as well.
        fn assert_full_eq<T: Eq>() {}
        assert_full_eq::<Action>();
        assert_full_eq::<AttackPattern>();
    }

    #[test]
    fn area_counts_as_ranged_class() {
        assert!(AttackPattern::Area { radius: 2 }.is_ranged_class());
        assert!(AttackPattern::Ranged { range: 4 }.is_ranged_class());
        assert!(!AttackPattern::Melee.is_ranged_class());
        assert!(!AttackPattern::Custom { cells: vec![(0, 1)] }.is_ranged_class());
    }
}
