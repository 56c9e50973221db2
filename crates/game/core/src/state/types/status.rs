//! Status effect storage for entities.
//!
//! Effects count down in whole turns and are processed at the start of the
//! owner's action resolution. Restriction flags are derived from the effect
//! kind, never stored, so a kind can never disagree with its own rules.

use arrayvec::ArrayVec;

use crate::config::GameConfig;

/// Types of status effects.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StatusKind {
    // ========================================================================
    // Damage / healing over time (processed at turn start)
    // ========================================================================
    /// HP loss over time.
    Poison,
    /// Fire damage over time.
    Burn,
    /// Physical damage over time.
    Bleed,
    /// HP recovery over time.
    Regen,

    // ========================================================================
    // Crowd control (restricts actions)
    // ========================================================================
    /// Cannot act at all.
    Stun,
    /// Cannot act at all; broken the instant the owner takes damage.
    Sleep,
    /// Movement lands only every other attempt.
    Slow,
    /// Cannot cast spells.
    Silenced,
    /// Cannot make melee attacks.
    Disarmed,
    /// Cannot attack or cast, but may still move.
    Polymorph,

    // ========================================================================
    // Protection and concealment
    // ========================================================================
    /// Absorbs incoming damage up to its magnitude; magnitude 0 absorbs all.
    Shield,
    /// Negates the next incoming damage packet, then is removed.
    Deflect,
    /// Ignores all incoming damage while present.
    Invulnerable,
    /// Excluded from automatic targeting by the opposing side.
    Stealth,

    // ========================================================================
    // Tempo
    // ========================================================================
    /// Movement-class actions resolve twice in the same turn.
    Haste,
}

bitflags::bitflags! {
    /// Behavior rules derived from a [`StatusKind`].
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Restrictions: u8 {
        const PREVENTS_MELEE    = 1 << 0;
        const PREVENTS_RANGED   = 1 << 1;
        const PREVENTS_MOVEMENT = 1 << 2;
        const PREVENTS_SPELL    = 1 << 3;
        const PREVENTS_ALL      = 1 << 4;
        const PROCESS_AT_TURN_START = 1 << 5;
        const REMOVED_ON_DAMAGE = 1 << 6;
    }
}

impl StatusKind {
    /// Derived restriction flags for this kind.
    pub fn restrictions(self) -> Restrictions {
        match self {
            StatusKind::Poison | StatusKind::Burn | StatusKind::Bleed | StatusKind::Regen => {
                Restrictions::PROCESS_AT_TURN_START
            }
            StatusKind::Stun => Restrictions::PREVENTS_ALL,
            StatusKind::Sleep => Restrictions::PREVENTS_ALL | Restrictions::REMOVED_ON_DAMAGE,
            StatusKind::Slow => Restrictions::PREVENTS_MOVEMENT,
            StatusKind::Silenced => Restrictions::PREVENTS_SPELL,
            StatusKind::Disarmed => Restrictions::PREVENTS_MELEE,
            StatusKind::Polymorph => {
                Restrictions::PREVENTS_MELEE
                    | Restrictions::PREVENTS_RANGED
                    | Restrictions::PREVENTS_SPELL
            }
            StatusKind::Shield
            | StatusKind::Deflect
            | StatusKind::Invulnerable
            | StatusKind::Stealth
            | StatusKind::Haste => Restrictions::empty(),
        }
    }

    /// Periodic magnitude heals instead of damaging.
    pub fn heals_over_time(self) -> bool {
        matches!(self, StatusKind::Regen)
    }
}

/// How a fresh application merges with an existing instance of the same kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StackingPolicy {
    /// Reset the existing instance's duration.
    Refresh,
    /// Increment stacks up to the configured maximum and refresh duration.
    Stack,
    /// Discard the existing instance and install the new one.
    Replace,
    /// Keep whichever of the two has the larger magnitude, then duration.
    Highest,
}

/// Full definition of a status effect, resolved through the effect oracle.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffectDefinition {
    pub kind: StatusKind,
    /// Whole turns the effect lasts.
    pub duration: u32,
    /// Damage, heal, or absorption amount depending on the kind.
    pub magnitude: u32,
    pub stacking: StackingPolicy,
    pub max_stacks: u32,
}

/// A live effect on an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffectInstance {
    pub kind: StatusKind,
    /// Turns left; the instance is removed when this reaches zero.
    pub remaining: u32,
    pub magnitude: u32,
    pub stacks: u32,
    /// Parity gate for `PREVENTS_MOVEMENT`: blocks every other attempt.
    slow_gate: bool,
}

impl StatusEffectInstance {
    fn from_definition(definition: &StatusEffectDefinition) -> Self {
        Self {
            kind: definition.kind,
            remaining: definition.duration,
            magnitude: definition.magnitude,
            stacks: 1,
            slow_gate: false,
        }
    }
}

/// Category of an action for prevention queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionCategory {
    Movement,
    Melee,
    Ranged,
    Spell,
}

/// Outcome of running one effect through its turn-start processing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PeriodicEffect {
    Damage { kind: StatusKind, amount: u32 },
    Heal { kind: StatusKind, amount: u32 },
}

/// Active status effects on an entity.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffects {
    effects: ArrayVec<StatusEffectInstance, { GameConfig::MAX_STATUS_EFFECTS }>,
}

impl StatusEffects {
    pub fn empty() -> Self {
        Self {
            effects: ArrayVec::new(),
        }
    }

    pub fn has(&self, kind: StatusKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    pub fn get(&self, kind: StatusKind) -> Option<&StatusEffectInstance> {
        self.effects.iter().find(|e| e.kind == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffectInstance> {
        self.effects.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Applies a definition, merging with an existing instance of the same
    /// kind according to the definition's stacking policy.
    ///
    /// Returns true if the set changed (a full set drops new kinds).
    pub fn apply(&mut self, definition: &StatusEffectDefinition) -> bool {
        if let Some(existing) = self
            .effects
            .iter_mut()
            .find(|e| e.kind == definition.kind)
        {
            match definition.stacking {
                StackingPolicy::Refresh => {
                    existing.remaining = definition.duration;
                }
                StackingPolicy::Stack => {
                    existing.stacks = (existing.stacks + 1).min(definition.max_stacks.max(1));
                    existing.remaining = existing.remaining.max(definition.duration);
                }
                StackingPolicy::Replace => {
                    *existing = StatusEffectInstance::from_definition(definition);
                }
                StackingPolicy::Highest => {
                    let incoming = StatusEffectInstance::from_definition(definition);
                    let keep_incoming = (incoming.magnitude, incoming.remaining)
                        > (existing.magnitude, existing.remaining);
                    if keep_incoming {
                        *existing = incoming;
                    }
                }
            }
            return true;
        }

        if self.effects.is_full() {
            return false;
        }
        self.effects
            .push(StatusEffectInstance::from_definition(definition));
        true
    }

    pub fn remove(&mut self, kind: StatusKind) {
        self.effects.retain(|e| e.kind != kind);
    }

    /// Runs turn-start processing: periodic magnitudes fire, then every
    /// effect's duration counts down and expired instances drop out.
    ///
    /// Returns the periodic damage/heal packets (scaled by stacks) plus the
    /// kinds that expired this turn. The caller routes the packets through
    /// the damage pipeline so shields and wake-ups behave consistently.
    pub fn tick_turn_start(&mut self) -> (Vec<PeriodicEffect>, Vec<StatusKind>) {
        let mut periodic = Vec::new();
        for effect in &self.effects {
            if !effect
                .kind
                .restrictions()
                .contains(Restrictions::PROCESS_AT_TURN_START)
            {
                continue;
            }
            let amount = effect.magnitude.saturating_mul(effect.stacks.max(1));
            if amount == 0 {
                continue;
            }
            if effect.kind.heals_over_time() {
                periodic.push(PeriodicEffect::Heal {
                    kind: effect.kind,
                    amount,
                });
            } else {
                periodic.push(PeriodicEffect::Damage {
                    kind: effect.kind,
                    amount,
                });
            }
        }

        let mut expired = Vec::new();
        for effect in &mut self.effects {
            effect.remaining = effect.remaining.saturating_sub(1);
            if effect.remaining == 0 {
                expired.push(effect.kind);
            }
        }
        self.effects.retain(|e| e.remaining > 0);

        (periodic, expired)
    }

    /// Clears effects flagged `REMOVED_ON_DAMAGE`; call when the owner takes
    /// damage. Returns the kinds removed.
    pub fn on_damage_taken(&mut self) -> Vec<StatusKind> {
        let removed: Vec<StatusKind> = self
            .effects
            .iter()
            .filter(|e| {
                e.kind
                    .restrictions()
                    .contains(Restrictions::REMOVED_ON_DAMAGE)
            })
            .map(|e| e.kind)
            .collect();
        self.effects.retain(|e| {
            !e.kind
                .restrictions()
                .contains(Restrictions::REMOVED_ON_DAMAGE)
        });
        removed
    }

    /// Answers "is this action category prevented right now".
    ///
    /// Movement checks are stateful: `PREVENTS_MOVEMENT` blocks every other
    /// attempt via a parity gate, so callers must only invoke the movement
    /// branch once per attempted move.
    pub fn is_action_prevented(&mut self, category: ActionCategory) -> bool {
        if self.prevents_all() {
            return true;
        }
        match category {
            ActionCategory::Movement => {
                if let Some(slow) = self
                    .effects
                    .iter_mut()
                    .find(|e| e.kind.restrictions().contains(Restrictions::PREVENTS_MOVEMENT))
                {
                    slow.slow_gate = !slow.slow_gate;
                    // Gate starts closed: the first attempt after application
                    // is blocked, the next lands.
                    return slow.slow_gate;
                }
                false
            }
            ActionCategory::Melee => self.any_restriction(Restrictions::PREVENTS_MELEE),
            ActionCategory::Ranged => self.any_restriction(Restrictions::PREVENTS_RANGED),
            ActionCategory::Spell => self.any_restriction(Restrictions::PREVENTS_SPELL),
        }
    }

    /// True while a `PREVENTS_ALL` effect (stun, sleep) is active.
    pub fn prevents_all(&self) -> bool {
        self.any_restriction(Restrictions::PREVENTS_ALL)
    }

    fn any_restriction(&self, flag: Restrictions) -> bool {
        self.effects
            .iter()
            .any(|e| e.kind.restrictions().contains(flag))
    }

    /// Absorbs incoming damage into the active shield, if any.
    ///
    /// Returns the damage left over for health. A shield with magnitude 0 is
    /// the unlimited-absorption sentinel; a finite shield whose magnitude
    /// reaches zero is removed.
    pub fn absorb_with_shield(&mut self, damage: u32) -> u32 {
        let Some(index) = self.effects.iter().position(|e| e.kind == StatusKind::Shield)
        else {
            return damage;
        };

        let shield = &mut self.effects[index];
        if shield.magnitude == 0 {
            return 0;
        }

        if shield.magnitude > damage {
            shield.magnitude -= damage;
            0
        } else {
            let leftover = damage - shield.magnitude;
            let _ = self.effects.swap_remove(index);
            leftover
        }
    }

    /// Consumes an active deflect, negating one damage packet.
    pub fn consume_deflect(&mut self) -> bool {
        if let Some(index) = self
            .effects
            .iter()
            .position(|e| e.kind == StatusKind::Deflect)
        {
            let _ = self.effects.swap_remove(index);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition(kind: StatusKind, duration: u32, magnitude: u32) -> StatusEffectDefinition {
        StatusEffectDefinition {
            kind,
            duration,
            magnitude,
            stacking: StackingPolicy::Refresh,
            max_stacks: 1,
        }
    }

    #[test]
    fn stacking_caps_at_max_stacks() {
        let mut effects = StatusEffects::empty();
        let poison = StatusEffectDefinition {
            kind: StatusKind::Poison,
            duration: 3,
            magnitude: 2,
            stacking: StackingPolicy::Stack,
            max_stacks: 3,
        };

        for _ in 0..4 {
            assert!(effects.apply(&poison));
        }

        let instance = effects.get(StatusKind::Poison).unwrap();
        assert_eq!(instance.stacks, 3);
    }

    #[test]
    fn refresh_resets_duration_without_stacking() {
        let mut effects = StatusEffects::empty();
        effects.apply(&definition(StatusKind::Burn, 3, 1));
        let _ = effects.tick_turn_start();
        assert_eq!(effects.get(StatusKind::Burn).unwrap().remaining, 2);

        effects.apply(&definition(StatusKind::Burn, 3, 1));
        let instance = effects.get(StatusKind::Burn).unwrap();
        assert_eq!(instance.remaining, 3);
        assert_eq!(instance.stacks, 1);
    }

    #[test]
    fn replace_discards_existing_instance() {
        let mut effects = StatusEffects::empty();
        effects.apply(&StatusEffectDefinition {
            stacking: StackingPolicy::Stack,
            max_stacks: 5,
            ..definition(StatusKind::Bleed, 4, 2)
        });
        effects.apply(&StatusEffectDefinition {
            stacking: StackingPolicy::Stack,
            max_stacks: 5,
            ..definition(StatusKind::Bleed, 4, 2)
        });

        effects.apply(&StatusEffectDefinition {
            stacking: StackingPolicy::Replace,
            ..definition(StatusKind::Bleed, 2, 7)
        });

        let instance = effects.get(StatusKind::Bleed).unwrap();
        assert_eq!(instance.magnitude, 7);
        assert_eq!(instance.stacks, 1);
        assert_eq!(instance.remaining, 2);
    }

    #[test]
    fn highest_keeps_larger_magnitude() {
        let mut effects = StatusEffects::empty();
        effects.apply(&StatusEffectDefinition {
            stacking: StackingPolicy::Highest,
            ..definition(StatusKind::Shield, 5, 8)
        });
        effects.apply(&StatusEffectDefinition {
            stacking: StackingPolicy::Highest,
            ..definition(StatusKind::Shield, 9, 3)
        });

        assert_eq!(effects.get(StatusKind::Shield).unwrap().magnitude, 8);
    }

    #[test]
    fn finite_shield_absorbs_then_breaks() {
        let mut effects = StatusEffects::empty();
        effects.apply(&definition(StatusKind::Shield, 5, 5));

        let leftover = effects.absorb_with_shield(8);
        assert_eq!(leftover, 3);
        assert!(!effects.has(StatusKind::Shield));
    }

    #[test]
    fn zero_magnitude_shield_blocks_everything() {
        let mut effects = StatusEffects::empty();
        effects.apply(&definition(StatusKind::Shield, 5, 0));

        assert_eq!(effects.absorb_with_shield(999), 0);
        assert!(effects.has(StatusKind::Shield));
    }

    #[test]
    fn shield_magnitude_never_rises() {
        let mut effects = StatusEffects::empty();
        effects.apply(&definition(StatusKind::Shield, 5, 6));

        let mut last = effects.get(StatusKind::Shield).unwrap().magnitude;
        for _ in 0..3 {
            let _ = effects.absorb_with_shield(2);
            if let Some(shield) = effects.get(StatusKind::Shield) {
                assert!(shield.magnitude <= last);
                last = shield.magnitude;
            }
        }
    }

    #[test]
    fn sleep_breaks_on_damage() {
        let mut effects = StatusEffects::empty();
        effects.apply(&definition(StatusKind::Sleep, 4, 0));
        assert!(effects.prevents_all());

        let removed = effects.on_damage_taken();
        assert_eq!(removed, vec![StatusKind::Sleep]);
        assert!(!effects.prevents_all());
    }

    #[test]
    fn slow_blocks_every_other_movement() {
        let mut effects = StatusEffects::empty();
        effects.apply(&definition(StatusKind::Slow, 10, 0));

        assert!(effects.is_action_prevented(ActionCategory::Movement));
        assert!(!effects.is_action_prevented(ActionCategory::Movement));
        assert!(effects.is_action_prevented(ActionCategory::Movement));
    }

    #[test]
    fn periodic_effects_fire_then_expire() {
        let mut effects = StatusEffects::empty();
        effects.apply(&definition(StatusKind::Poison, 2, 3));
        effects.apply(&definition(StatusKind::Regen, 1, 2));

        let (periodic, expired) = effects.tick_turn_start();
        assert!(periodic.contains(&PeriodicEffect::Damage {
            kind: StatusKind::Poison,
            amount: 3
        }));
        assert!(periodic.contains(&PeriodicEffect::Heal {
            kind: StatusKind::Regen,
            amount: 2
        }));
        assert_eq!(expired, vec![StatusKind::Regen]);
        assert!(effects.has(StatusKind::Poison));
        assert!(!effects.has(StatusKind::Regen));

        let (_, expired) = effects.tick_turn_start();
        assert_eq!(expired, vec![StatusKind::Poison]);
        assert!(effects.is_empty());
    }

    #[test]
    fn disarmed_blocks_melee_only() {
        let mut effects = StatusEffects::empty();
        effects.apply(&definition(StatusKind::Disarmed, 3, 0));

        assert!(effects.is_action_prevented(ActionCategory::Melee));
        assert!(!effects.is_action_prevented(ActionCategory::Ranged));
        assert!(!effects.is_action_prevented(ActionCategory::Spell));
    }
}
