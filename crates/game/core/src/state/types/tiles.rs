//! Runtime tile state layered on top of the static puzzle definition.
//!
//! The static [`crate::puzzle::Puzzle`] never changes; everything that can
//! move at runtime (cadence phases, damage-once bookkeeping, plate-toggled
//! walls, activated teleport links, occupancy) lives here and clones with
//! the snapshot.

use std::collections::{BTreeMap, BTreeSet};

use arrayvec::ArrayVec;

use crate::config::GameConfig;
use crate::puzzle::{CadencePattern, CadenceSpec};

use super::{EntityId, Position, TeleportLink};

type OccupantSlots = ArrayVec<EntityId, { GameConfig::MAX_OCCUPANTS_PER_TILE }>;

/// Per-tile runtime state for the whole grid.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileRuntime {
    tiles: BTreeMap<Position, TileState>,
    /// Teleport links switched on by `trigger_teleport` plate effects.
    activated_links: BTreeSet<TeleportLink>,
}

impl TileRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the phase and cadence step for a tile with a cadence spec.
    pub fn seed_cadence(&mut self, position: Position, spec: &CadenceSpec) {
        let state = self.tiles.entry(position).or_default();
        state.phase_on = spec.start_on;
        state.cadence_step = 0;
    }

    /// Whether the tile's behaviors are currently in their "on" phase.
    /// Tiles without runtime state default to on.
    pub fn phase_on(&self, position: Position) -> bool {
        self.tiles.get(&position).map(|t| t.phase_on).unwrap_or(true)
    }

    /// Flips the phase, used by `toggle_trigger_group` plate effects.
    pub fn toggle_phase(&mut self, position: Position) {
        let state = self.tiles.entry(position).or_default();
        state.phase_on = !state.phase_on;
    }

    /// Advances a tile's cadence by one turn.
    pub fn advance_cadence(&mut self, position: Position, spec: &CadenceSpec) {
        let state = self.tiles.entry(position).or_default();
        state.cadence_step += 1;
        state.phase_on = match &spec.pattern {
            CadencePattern::Alternating => {
                let flipped = state.cadence_step % 2 == 1;
                spec.start_on != flipped
            }
            CadencePattern::Interval {
                on_turns,
                off_turns,
            } => {
                let cycle = on_turns.saturating_add(*off_turns).max(1);
                let offset = state.cadence_step % cycle;
                if spec.start_on {
                    offset < *on_turns
                } else {
                    offset >= *off_turns
                }
            }
            CadencePattern::Custom(sequence) => {
                if sequence.is_empty() {
                    spec.start_on
                } else {
                    sequence[(state.cadence_step as usize) % sequence.len()]
                }
            }
        };
    }

    /// Whether a plate toggle has flipped this tile's wall state.
    pub fn wall_toggled(&self, position: Position) -> bool {
        self.tiles
            .get(&position)
            .map(|t| t.wall_toggled)
            .unwrap_or(false)
    }

    pub fn toggle_wall(&mut self, position: Position) {
        let state = self.tiles.entry(position).or_default();
        state.wall_toggled = !state.wall_toggled;
    }

    /// Records a damage-once hit; returns false if the entity was already
    /// damaged by this tile.
    pub fn mark_damaged_once(&mut self, position: Position, entity: EntityId) -> bool {
        let state = self.tiles.entry(position).or_default();
        state.damaged.insert(entity)
    }

    pub fn activate_link(&mut self, link: TeleportLink) {
        let _ = self.activated_links.insert(link);
    }

    pub fn link_activated(&self, link: TeleportLink) -> bool {
        self.activated_links.contains(&link)
    }
}

/// Runtime state for a single tile.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct TileState {
    phase_on: bool,
    cadence_step: u32,
    wall_toggled: bool,
    /// Entities already hit by this tile's damage-once behavior.
    damaged: BTreeSet<EntityId>,
}

impl Default for TileState {
    fn default() -> Self {
        Self {
            phase_on: true,
            cadence_step: 0,
            wall_toggled: false,
            damaged: BTreeSet::new(),
        }
    }
}

/// Occupancy map keyed by position.
///
/// Ghost entities are tracked like everyone else; blocking queries filter
/// them out at the call site.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileMap {
    occupancy: BTreeMap<Position, OccupantSlots>,
}

impl TileMap {
    pub fn occupants(&self, position: &Position) -> Option<&OccupantSlots> {
        self.occupancy.get(position)
    }

    pub fn add_occupant(&mut self, position: Position, entity: EntityId) -> bool {
        let slot = self.occupancy.entry(position).or_default();
        if slot.contains(&entity) {
            return true;
        }
        slot.try_push(entity).is_ok()
    }

    pub fn remove_occupant(&mut self, position: &Position, entity: EntityId) -> bool {
        if let Some(slot) = self.occupancy.get_mut(position) {
            if let Some(index) = slot.iter().position(|occupant| *occupant == entity) {
                let _ = slot.swap_remove(index);
                if slot.is_empty() {
                    let _ = self.occupancy.remove(position);
                }
                return true;
            }
        }
        false
    }
}
