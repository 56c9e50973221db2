//! Win and loss evaluation.
//!
//! Runs once per turn after the attack phase. Every configured win
//! condition must hold simultaneously; victory takes precedence over
//! defeat in the turn both would trigger. A puzzle with no win conditions
//! never reports victory.

use std::collections::BTreeSet;

use crate::env::GameEnv;
use crate::puzzle::{Puzzle, WinCondition};
use crate::state::{DefeatCause, GameState, GameStatus, Side, SideQuestId};

use super::events::GameEvent;

pub(super) fn evaluate(
    state: &mut GameState,
    puzzle: &Puzzle,
    env: &GameEnv<'_>,
    events: &mut Vec<GameEvent>,
) {
    if state.test_mode {
        return;
    }

    // Side quests are graded against the same vocabulary but never gate
    // victory; once satisfied they stay completed.
    for quest in &puzzle.side_quests {
        if state.completed_side_quests.contains(&quest.id) {
            continue;
        }
        if !quest.conditions.is_empty()
            && quest
                .conditions
                .iter()
                .all(|c| condition_holds(state, env, c))
        {
            let _ = state.completed_side_quests.insert(quest.id);
            events.push(GameEvent::SideQuestCompleted { quest: quest.id });
        }
    }

    let won = !puzzle.win_conditions.is_empty()
        && puzzle
            .win_conditions
            .iter()
            .all(|c| condition_holds(state, env, c));
    if won {
        state.status = GameStatus::Victory;
        events.push(GameEvent::Victory);
        return;
    }

    let heroes_wiped =
        !state.entities.heroes.is_empty() && state.entities.heroes.iter().all(|h| !h.alive);
    if heroes_wiped {
        state.status = GameStatus::Defeat(DefeatCause::HeroesDefeated);
        events.push(GameEvent::Defeated {
            cause: DefeatCause::HeroesDefeated,
        });
        return;
    }

    if puzzle.turn_limit > 0 && state.turn >= puzzle.turn_limit {
        state.status = GameStatus::Defeat(DefeatCause::TurnLimitReached);
        events.push(GameEvent::Defeated {
            cause: DefeatCause::TurnLimitReached,
        });
    }
}

/// Returns the side quests whose conditions hold right now, regardless of
/// whether the run has already recorded them as completed.
///
/// Presentation layers poll this between turns; the run itself only cares
/// about the sticky set the evaluator maintains.
pub fn check_side_quests(
    state: &GameState,
    puzzle: &Puzzle,
    env: &GameEnv<'_>,
) -> BTreeSet<SideQuestId> {
    puzzle
        .side_quests
        .iter()
        .filter(|quest| {
            !quest.conditions.is_empty()
                && quest
                    .conditions
                    .iter()
                    .all(|c| condition_holds(state, env, c))
        })
        .map(|quest| quest.id)
        .collect()
}

/// Evaluates one win condition against the current state.
pub(super) fn condition_holds(
    state: &GameState,
    env: &GameEnv<'_>,
    condition: &WinCondition,
) -> bool {
    match condition {
        WinCondition::DefeatAllEnemies => {
            !state.entities.living_on(Side::Enemy).any(|e| !e.ghost)
        }
        WinCondition::DefeatBoss => !state.entities.living_on(Side::Enemy).any(|e| e.boss),
        WinCondition::CollectAll => state.collectibles.iter().all(|c| c.collected),
        WinCondition::CollectKeys => state
            .collectibles
            .iter()
            .filter(|c| !c.collected)
            .all(|c| !is_key(env, c.definition)),
        WinCondition::ReachGoal { goal } => state
            .entities
            .living_on(Side::Hero)
            .any(|h| h.position == *goal),
        WinCondition::SurviveTurns { turns } => {
            state.turn >= *turns && state.entities.living_on(Side::Hero).next().is_some()
        }
        WinCondition::WinInTurns { turns } => state.turn <= *turns,
        WinCondition::MaxCharacters { count } => state.entities.heroes.len() as u32 <= *count,
        WinCondition::CharactersAlive { count } => {
            state.entities.living_on(Side::Hero).count() as u32 >= *count
        }
    }
}

/// A collectible that cannot resolve counts as a non-key, consistent with
/// unknown collectibles being inert on pickup.
fn is_key(env: &GameEnv<'_>, definition: crate::state::CollectibleId) -> bool {
    match env.items().map(|o| o.collectible(definition)) {
        Ok(Some(resolved)) => resolved.is_key(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::GridDimensions;
    use crate::state::{
        CollectibleState, EntityId, EntityState, Facing, Position, Side, TemplateId,
    };
    use std::collections::BTreeMap;

    fn puzzle_with(win_conditions: Vec<WinCondition>) -> Puzzle {
        Puzzle {
            dimensions: GridDimensions::new(6, 6),
            tiles: BTreeMap::new(),
            enemies: Vec::new(),
            collectibles: Vec::new(),
            win_conditions,
            side_quests: Vec::new(),
            lives: 3,
            turn_limit: 20,
            par_heroes: 1,
            par_turns: 10,
            max_heroes: 4,
        }
    }

    fn entity(id: u32, side: Side, position: Position) -> EntityState {
        EntityState::new(
            EntityId(id),
            side,
            TemplateId(0),
            position,
            Facing::North,
            10,
            1,
            Vec::new(),
        )
    }

    fn running_state(puzzle: &Puzzle) -> GameState {
        let mut state = GameState::from_puzzle(puzzle, &GameEnv::empty());
        state.begin();
        state
    }

    #[test]
    fn victory_requires_all_conditions() {
        let puzzle = puzzle_with(vec![
            WinCondition::DefeatAllEnemies,
            WinCondition::CollectAll,
        ]);
        let mut state = running_state(&puzzle);
        state.turn = 3;
        state.entities.heroes.push(entity(0, Side::Hero, Position::ORIGIN));
        state
            .collectibles
            .push(CollectibleState::dropped(crate::state::CollectibleId(1), Position::new(2, 2)));

        let mut events = Vec::new();
        evaluate(&mut state, &puzzle, &GameEnv::empty(), &mut events);
        assert_eq!(state.status, GameStatus::Running);

        state.collectibles[0].collected = true;
        evaluate(&mut state, &puzzle, &GameEnv::empty(), &mut events);
        assert_eq!(state.status, GameStatus::Victory);
    }

    #[test]
    fn victory_beats_defeat_on_the_same_turn() {
        let puzzle = puzzle_with(vec![WinCondition::DefeatAllEnemies]);
        let mut state = running_state(&puzzle);
        state.turn = 5;
        let mut hero = entity(0, Side::Hero, Position::ORIGIN);
        hero.alive = false;
        hero.health = 0;
        state.entities.heroes.push(hero);

        let mut events = Vec::new();
        evaluate(&mut state, &puzzle, &GameEnv::empty(), &mut events);

        assert_eq!(state.status, GameStatus::Victory);
    }

    #[test]
    fn turn_limit_defeat_is_distinguishable() {
        let puzzle = puzzle_with(vec![WinCondition::DefeatAllEnemies]);
        let mut state = running_state(&puzzle);
        state.entities.heroes.push(entity(0, Side::Hero, Position::ORIGIN));
        state.entities.enemies.push(entity(1, Side::Enemy, Position::new(3, 3)));
        state.turn = 20;

        let mut events = Vec::new();
        evaluate(&mut state, &puzzle, &GameEnv::empty(), &mut events);

        assert_eq!(
            state.status,
            GameStatus::Defeat(DefeatCause::TurnLimitReached)
        );
    }

    #[test]
    fn hero_wipe_defeat_names_its_cause() {
        let puzzle = puzzle_with(vec![WinCondition::ReachGoal {
            goal: Position::new(5, 5),
        }]);
        let mut state = running_state(&puzzle);
        let mut hero = entity(0, Side::Hero, Position::ORIGIN);
        hero.alive = false;
        state.entities.heroes.push(hero);
        state.turn = 2;

        let mut events = Vec::new();
        evaluate(&mut state, &puzzle, &GameEnv::empty(), &mut events);

        assert_eq!(state.status, GameStatus::Defeat(DefeatCause::HeroesDefeated));
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::Defeated { cause: DefeatCause::HeroesDefeated }
        )));
    }

    #[test]
    fn no_conditions_means_no_victory() {
        let puzzle = puzzle_with(Vec::new());
        let mut state = running_state(&puzzle);
        state.entities.heroes.push(entity(0, Side::Hero, Position::ORIGIN));
        state.turn = 1;

        let mut events = Vec::new();
        evaluate(&mut state, &puzzle, &GameEnv::empty(), &mut events);

        assert_eq!(state.status, GameStatus::Running);
    }

    #[test]
    fn ghost_enemies_do_not_block_defeat_all() {
        let puzzle = puzzle_with(vec![WinCondition::DefeatAllEnemies]);
        let mut state = running_state(&puzzle);
        state.turn = 1;
        state.entities.heroes.push(entity(0, Side::Hero, Position::ORIGIN));
        let ghost = entity(1, Side::Enemy, Position::new(2, 2)).with_ghost(true);
        state.entities.enemies.push(ghost);

        let mut events = Vec::new();
        evaluate(&mut state, &puzzle, &GameEnv::empty(), &mut events);

        assert_eq!(state.status, GameStatus::Victory);
    }

    #[test]
    fn side_quest_completion_sticks() {
        let quest = crate::puzzle::SideQuest {
            id: crate::state::SideQuestId(1),
            conditions: vec![WinCondition::ReachGoal {
                goal: Position::new(2, 0),
            }],
            bonus_points: 40,
        };
        let mut puzzle = puzzle_with(Vec::new());
        puzzle.side_quests.push(quest);
        let mut state = running_state(&puzzle);
        state.turn = 1;
        state.entities.heroes.push(entity(0, Side::Hero, Position::new(2, 0)));

        let mut events = Vec::new();
        evaluate(&mut state, &puzzle, &GameEnv::empty(), &mut events);
        assert!(state.completed_side_quests.contains(&crate::state::SideQuestId(1)));

        // Hero walks off the goal; completion persists.
        state.entities.entity_mut(EntityId(0)).unwrap().position = Position::ORIGIN;
        evaluate(&mut state, &puzzle, &GameEnv::empty(), &mut events);
        assert!(state.completed_side_quests.contains(&crate::state::SideQuestId(1)));
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, GameEvent::SideQuestCompleted { .. }))
                .count(),
            1
        );
    }

    #[test]
    fn check_side_quests_reports_momentary_satisfaction() {
        let quest = crate::puzzle::SideQuest {
            id: crate::state::SideQuestId(7),
            conditions: vec![WinCondition::ReachGoal {
                goal: Position::new(1, 1),
            }],
            bonus_points: 10,
        };
        let mut puzzle = puzzle_with(Vec::new());
        puzzle.side_quests.push(quest);
        let mut state = running_state(&puzzle);
        state.entities.heroes.push(entity(0, Side::Hero, Position::ORIGIN));

        assert!(check_side_quests(&state, &puzzle, &GameEnv::empty()).is_empty());

        state.entities.entity_mut(EntityId(0)).unwrap().position = Position::new(1, 1);
        let satisfied = check_side_quests(&state, &puzzle, &GameEnv::empty());
        assert!(satisfied.contains(&crate::state::SideQuestId(7)));

        // Unlike the evaluator's sticky set, the answer tracks the board.
        state.entities.entity_mut(EntityId(0)).unwrap().position = Position::ORIGIN;
        assert!(check_side_quests(&state, &puzzle, &GameEnv::empty()).is_empty());
    }
}
