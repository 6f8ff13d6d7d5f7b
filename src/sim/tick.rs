//! One simulation step
//!
//! [`advance`] is the only place game rules are decided. It is a pure
//! function of the snapshot and the random source.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::direction::Direction;
use super::rules::{hits_self, hits_wall, place_food};
use super::state::{GameState, Point};
use crate::rng::RandomSource;

/// What ended the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Collision {
    Wall,
    SelfHit,
}

/// Notable outcome of a single step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepEvent {
    /// Head landed on food; `score` is the new total
    Ate { at: Point, score: u32 },
    /// Run ended on this step
    GameOver { cause: Collision, score: u32 },
}

/// New snapshot plus what happened producing it
#[derive(Debug, Clone)]
pub struct Transition {
    pub state: Arc<GameState>,
    pub event: Option<StepEvent>,
}

/// Take the pending heading unless it would reverse onto the neck
pub fn resolve_direction(current: Direction, pending: Option<Direction>) -> Direction {
    match pending {
        Some(dir) if !dir.is_opposite(current) => dir,
        _ => current,
    }
}

#[inline]
pub fn next_head(head: Point, dir: Direction) -> Point {
    head + dir.to_vec()
}

/// Wall or self collision at `p` for a body about to move.
///
/// The tail is left out of the self check since it vacates its cell on an
/// ordinary move.
pub fn collision_at(p: Point, state: &GameState) -> Option<Collision> {
    if hits_wall(p, &state.grid) {
        return Some(Collision::Wall);
    }
    let without_tail = &state.body[..state.body.len().saturating_sub(1)];
    if hits_self(p, without_tail) {
        return Some(Collision::SelfHit);
    }
    None
}

/// Advance the snapshot by one step.
///
/// A terminal snapshot comes back as the same `Arc` (check with
/// [`Arc::ptr_eq`]).
pub fn advance<R: RandomSource + ?Sized>(state: &Arc<GameState>, rng: &mut R) -> Arc<GameState> {
    advance_detailed(state, rng).state
}

/// [`advance`] that also reports eating and game over
pub fn advance_detailed<R: RandomSource + ?Sized>(state: &Arc<GameState>, rng: &mut R) -> Transition {
    if state.terminal {
        return Transition {
            state: Arc::clone(state),
            event: None,
        };
    }

    let dir = resolve_direction(state.direction, state.pending_direction);
    let next = next_head(state.head(), dir);

    if let Some(cause) = collision_at(next, state) {
        let over = GameState {
            direction: dir,
            pending_direction: None,
            terminal: true,
            ..GameState::clone(state)
        };
        return Transition {
            state: Arc::new(over),
            event: Some(StepEvent::GameOver {
                cause,
                score: state.score,
            }),
        };
    }

    let ate = next == state.food;
    let mut body = Vec::with_capacity(state.body.len() + 1);
    body.push(next);
    body.extend_from_slice(&state.body);
    if !ate {
        body.pop();
    }

    let score = if ate { state.score + 1 } else { state.score };
    let food = if ate {
        place_food(&body, &state.grid, rng)
    } else {
        state.food
    };

    Transition {
        state: Arc::new(GameState {
            grid: state.grid,
            direction: dir,
            pending_direction: None,
            body,
            food,
            score,
            terminal: false,
        }),
        event: ate.then_some(StepEvent::Ate { at: next, score }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{SeededRandom, SequenceRandom};
    use crate::sim::state::GridConfig;
    use glam::IVec2;
    use proptest::prelude::*;

    const GRID: GridConfig = GridConfig { cols: 6, rows: 6 };

    fn make_state() -> GameState {
        GameState {
            grid: GRID,
            direction: Direction::Right,
            pending_direction: None,
            body: vec![IVec2::new(2, 3), IVec2::new(1, 3), IVec2::new(0, 3)],
            food: IVec2::new(4, 3),
            score: 0,
            terminal: false,
        }
    }

    #[test]
    fn test_basic_move_shifts_body() {
        let mut rng = SequenceRandom::new([0.0]);
        let s = advance(&Arc::new(make_state()), &mut rng);
        assert_eq!(s.head(), IVec2::new(3, 3));
        assert_eq!(s.len(), 3);
        assert_eq!(s.score, 0);
        assert_eq!(s.body, vec![IVec2::new(3, 3), IVec2::new(2, 3), IVec2::new(1, 3)]);
        assert_eq!(s.food, IVec2::new(4, 3));
    }

    #[test]
    fn test_reversal_ignored_then_turn_applies() {
        let mut rng = SequenceRandom::new([0.0]);
        let s = make_state().with_pending_direction(Some(Direction::Left));
        let s = advance(&Arc::new(s), &mut rng);
        assert_eq!(s.direction, Direction::Right);
        assert_eq!(s.pending_direction, None);
        assert_eq!(s.head(), IVec2::new(3, 3));

        let s = advance(&Arc::new(s.with_pending_direction(Some(Direction::Down))), &mut rng);
        assert_eq!(s.direction, Direction::Down);
        assert_eq!(s.head(), IVec2::new(3, 4));
    }

    #[test]
    fn test_eating_grows_and_scores() {
        let mut rng = SequenceRandom::new([0.0]);
        let s = GameState {
            food: IVec2::new(3, 3),
            ..make_state()
        };
        let t = advance_detailed(&Arc::new(s), &mut rng);
        let s = &t.state;
        assert_eq!(s.len(), 4);
        assert_eq!(s.score, 1);
        assert!(!s.occupies(s.food));
        // First free cell in row-major order
        assert_eq!(s.food, IVec2::new(0, 0));
        assert_eq!(
            t.event,
            Some(StepEvent::Ate {
                at: IVec2::new(3, 3),
                score: 1
            })
        );
    }

    #[test]
    fn test_wall_collision_freezes_state() {
        let mut rng = SequenceRandom::new([0.0]);
        let mut s = Arc::new(make_state());
        s = advance(&s, &mut rng); // (3,3)
        s = advance(&s, &mut rng); // (4,3), eats
        s = advance(&s, &mut rng); // (5,3)
        assert!(!s.terminal);
        assert_eq!(s.head(), IVec2::new(5, 3));

        let t = advance_detailed(&s, &mut rng);
        assert!(t.state.terminal);
        assert_eq!(
            t.event,
            Some(StepEvent::GameOver {
                cause: Collision::Wall,
                score: 1
            })
        );
        // Colliding move is not applied
        assert_eq!(t.state.body, s.body);

        let frozen = advance(&t.state, &mut rng);
        assert!(Arc::ptr_eq(&frozen, &t.state));
        let again = advance_detailed(&frozen, &mut rng);
        assert!(Arc::ptr_eq(&again.state, &frozen));
        assert_eq!(again.event, None);
    }

    #[test]
    fn test_self_collision_with_inner_segment() {
        let mut rng = SequenceRandom::new([0.0]);
        // Heading up from (2,2) runs into (2,1), which is not the tail
        let s = GameState {
            grid: GRID,
            direction: Direction::Up,
            pending_direction: None,
            body: vec![
                IVec2::new(2, 2),
                IVec2::new(3, 2),
                IVec2::new(3, 1),
                IVec2::new(2, 1),
                IVec2::new(1, 1),
                IVec2::new(1, 2),
            ],
            food: IVec2::new(0, 0),
            score: 2,
            terminal: false,
        };
        let t = advance_detailed(&Arc::new(s.clone()), &mut rng);
        assert!(t.state.terminal);
        assert_eq!(t.state.body, s.body);
        assert_eq!(t.state.score, 2);
        assert_eq!(
            t.event,
            Some(StepEvent::GameOver {
                cause: Collision::SelfHit,
                score: 2
            })
        );
    }

    #[test]
    fn test_moving_into_vacating_tail_is_legal() {
        let mut rng = SequenceRandom::new([0.0]);
        // 2x2 loop: head (1,1) heading up into the tail cell (1,0)
        let s = GameState {
            grid: GRID,
            direction: Direction::Up,
            pending_direction: None,
            body: vec![
                IVec2::new(1, 1),
                IVec2::new(0, 1),
                IVec2::new(0, 0),
                IVec2::new(1, 0),
            ],
            food: IVec2::new(5, 5),
            score: 0,
            terminal: false,
        };
        let s = advance(&Arc::new(s), &mut rng);
        assert!(!s.terminal);
        assert_eq!(s.head(), IVec2::new(1, 0));
        assert_eq!(s.len(), 4);
    }

    #[test]
    fn test_collision_records_resolved_direction() {
        let mut rng = SequenceRandom::new([0.0]);
        let s = GameState {
            body: vec![IVec2::new(2, 0), IVec2::new(1, 0), IVec2::new(0, 0)],
            pending_direction: Some(Direction::Up),
            ..make_state()
        };
        let s = advance(&Arc::new(s), &mut rng);
        assert!(s.terminal);
        assert_eq!(s.direction, Direction::Up);
        assert_eq!(s.pending_direction, None);
        assert_eq!(s.head(), IVec2::new(2, 0));
    }

    fn any_direction() -> impl Strategy<Value = Option<Direction>> {
        prop_oneof![
            Just(None),
            Just(Some(Direction::Up)),
            Just(Some(Direction::Down)),
            Just(Some(Direction::Left)),
            Just(Some(Direction::Right)),
        ]
    }

    proptest! {
        #[test]
        fn prop_random_play_keeps_invariants(
            seed in any::<u64>(),
            inputs in prop::collection::vec(any_direction(), 1..200),
        ) {
            let mut rng = SeededRandom::new(seed);
            let mut state = Arc::new(GameState::initial(
                &crate::sim::GameConfig { grid: GRID, ..Default::default() },
                &mut rng,
            ));

            for input in inputs {
                let before = Arc::new(state.with_pending_direction(input));
                let after = advance(&before, &mut rng);

                if before.terminal {
                    prop_assert!(Arc::ptr_eq(&before, &after));
                    continue;
                }

                let resolved = resolve_direction(before.direction, input);
                prop_assert_eq!(after.direction, resolved);
                if let Some(req) = input {
                    if req.is_opposite(before.direction) {
                        prop_assert_eq!(after.direction, before.direction);
                    }
                }

                if after.terminal {
                    prop_assert_eq!(&after.body, &before.body);
                    prop_assert_eq!(after.score, before.score);
                } else {
                    // Exactly one unit step in the resolved direction
                    prop_assert_eq!(after.head() - before.head(), resolved.to_vec());

                    let ate = after.head() == before.food;
                    if ate {
                        prop_assert_eq!(after.score, before.score + 1);
                        prop_assert_eq!(after.len(), before.len() + 1);
                    } else {
                        prop_assert_eq!(after.score, before.score);
                        prop_assert_eq!(after.len(), before.len());
                    }

                    prop_assert!(!after.occupies(after.food));
                    let mut cells = after.body.clone();
                    cells.sort_by_key(|p| (p.y, p.x));
                    cells.dedup();
                    prop_assert_eq!(cells.len(), after.len());
                }

                state = after;
            }
        }
    }
}
