//! Deterministic simulation module
//!
//! All game rules live here. This module must stay pure and deterministic:
//! - One call to [`advance`] per fixed step
//! - Randomness only through an injected [`RandomSource`](crate::rng::RandomSource)
//! - Food placement enumerates free cells in row-major order
//! - No rendering, input or platform dependencies

pub mod direction;
pub mod rules;
pub mod state;
pub mod tick;

pub use direction::Direction;
pub use rules::{FULL_BOARD_FOOD, hits_self, hits_wall, place_food};
pub use state::{
    DEFAULT_COLS, DEFAULT_ROWS, GameConfig, GameState, GridConfig, Point, START_DIRECTION,
    START_LEN, create_initial_state,
};
pub use tick::{
    Collision, StepEvent, Transition, advance, advance_detailed, collision_at, next_head,
    resolve_direction,
};
