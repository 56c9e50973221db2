//! Scoring and ranking for completed runs.
//!
//! Grading is pure: it reads a final state and the puzzle definition and
//! never mutates either, so hosts can grade the same snapshot repeatedly.
//! Point values come from the balance tables oracle.

use crate::env::GameEnv;
use crate::puzzle::Puzzle;
use crate::state::{GameState, SideQuestId};

/// Medal awarded for a completed run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Rank {
    /// Both par targets met.
    Gold,
    /// One par met, or the point floor reached.
    Silver,
    Bronze,
}

/// Full grading breakdown for a run.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoreReport {
    pub total_points: i32,
    pub base_points: u32,
    pub character_bonus: u32,
    pub turn_bonus: u32,
    pub lives_bonus: u32,
    /// Net score deltas from collected collectibles; may be negative.
    pub collectible_points: i32,
    pub side_quest_bonus: u32,
    pub heroes_par_met: bool,
    pub turns_par_met: bool,
    pub rank: Rank,
    pub completed_side_quests: Vec<SideQuestId>,
}

/// Grades a finished (or in-flight) run against the puzzle's par values.
pub fn calculate_score(state: &GameState, puzzle: &Puzzle, env: &GameEnv<'_>) -> ScoreReport {
    let tables = super::engine_tables(env).scoring;

    let heroes_used = state.entities.heroes.len() as u32;
    let heroes_par_met = heroes_used <= puzzle.par_heroes;
    let turns_par_met = state.turn <= puzzle.par_turns;

    let character_bonus = if heroes_par_met { tables.character_bonus } else { 0 };
    let turn_bonus = if turns_par_met { tables.turn_bonus } else { 0 };

    let heroes_lost = state.entities.heroes.iter().filter(|h| !h.alive).count() as u32;
    let lives_remaining = puzzle.lives.saturating_sub(heroes_lost);
    let lives_bonus = if puzzle.lives == 0 {
        0
    } else {
        tables.lives_bonus_max * lives_remaining / puzzle.lives
    };

    let collectible_points: i32 = state
        .collectibles
        .iter()
        .filter(|c| c.collected)
        .map(|c| score_delta(env, c.definition))
        .sum();

    let completed_side_quests: Vec<SideQuestId> =
        state.completed_side_quests.iter().copied().collect();
    let side_quest_bonus: u32 = puzzle
        .side_quests
        .iter()
        .filter(|q| state.completed_side_quests.contains(&q.id))
        .map(|q| q.bonus_points)
        .sum();

    let total_points = tables.base_points as i32
        + character_bonus as i32
        + turn_bonus as i32
        + lives_bonus as i32
        + collectible_points
        + side_quest_bonus as i32;

    let rank = if heroes_par_met && turns_par_met {
        Rank::Gold
    } else if heroes_par_met || turns_par_met || total_points >= tables.silver_points as i32 {
        Rank::Silver
    } else {
        Rank::Bronze
    };

    ScoreReport {
        total_points,
        base_points: tables.base_points,
        character_bonus,
        turn_bonus,
        lives_bonus,
        collectible_points,
        side_quest_bonus,
        heroes_par_met,
        turns_par_met,
        rank,
        completed_side_quests,
    }
}

fn score_delta(env: &GameEnv<'_>, definition: crate::state::CollectibleId) -> i32 {
    match env.items().map(|o| o.collectible(definition)) {
        Ok(Some(resolved)) => resolved.score_delta(),
        _ => 0,
    }
}
