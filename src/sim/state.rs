//! Game state and core simulation types
//!
//! A [`GameState`] is a snapshot: transitions build a new one and share it
//! behind an `Arc`, they never edit one in place.

use std::sync::Arc;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::direction::Direction;
use super::rules::place_food;
use crate::error::ConfigError;
use crate::rng::RandomSource;

/// Grid cell coordinate (column, row)
pub type Point = IVec2;

/// Default board width in cells
pub const DEFAULT_COLS: i32 = 20;
/// Default board height in cells
pub const DEFAULT_ROWS: i32 = 20;
/// Body length at the start of a run
pub const START_LEN: usize = 3;
/// Heading at the start of a run
pub const START_DIRECTION: Direction = Direction::Right;

/// Board dimensions, fixed for the lifetime of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    pub cols: i32,
    pub rows: i32,
}

impl GridConfig {
    pub fn new(cols: i32, rows: i32) -> Result<Self, ConfigError> {
        let grid = Self { cols, rows };
        grid.validate()?;
        Ok(grid)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cols <= 0 || self.rows <= 0 {
            return Err(ConfigError::EmptyGrid {
                cols: self.cols,
                rows: self.rows,
            });
        }
        Ok(())
    }

    /// True if `p` lies on the board
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= 0 && p.y >= 0 && p.x < self.cols && p.y < self.rows
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cols.max(0) as usize * self.rows.max(0) as usize
    }

    /// Row-major index of an on-board cell
    #[inline]
    pub fn index(&self, p: Point) -> usize {
        p.y as usize * self.cols as usize + p.x as usize
    }

    /// Centre cell (rounded down)
    pub fn center(&self) -> Point {
        IVec2::new(self.cols / 2, self.rows / 2)
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cols: DEFAULT_COLS,
            rows: DEFAULT_ROWS,
        }
    }
}

/// Parameters for building the first snapshot of a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub grid: GridConfig,
    pub start_len: usize,
    pub start_direction: Direction,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            start_len: START_LEN,
            start_direction: START_DIRECTION,
        }
    }
}

impl GameConfig {
    /// Check the grid and that the starting body fits on it
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.grid.validate()?;
        let misfit = ConfigError::BodyDoesNotFit {
            len: self.start_len,
            cols: self.grid.cols,
            rows: self.grid.rows,
        };
        if self.start_len == 0 {
            return Err(misfit);
        }
        let Ok(back) = i32::try_from(self.start_len - 1) else {
            return Err(misfit);
        };
        let center = self.grid.center();
        let trail = self.start_direction.opposite().to_vec();
        let reach = |c: i32, d: i32| d.checked_mul(back).and_then(|o| c.checked_add(o));
        let (Some(x), Some(y)) = (reach(center.x, trail.x), reach(center.y, trail.y)) else {
            return Err(misfit);
        };
        if !self.grid.contains(IVec2::new(x, y)) {
            return Err(misfit);
        }
        Ok(())
    }

    /// Starting body: head on the centre cell, trailing away from the heading
    pub fn starting_body(&self) -> Vec<Point> {
        let head = self.grid.center();
        let back = self.start_direction.opposite().to_vec();
        (0..self.start_len as i32).map(|i| head + back * i).collect()
    }
}

/// Complete snapshot of one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub grid: GridConfig,
    /// Heading applied on the last step
    pub direction: Direction,
    /// Requested heading, resolved and cleared on the next step
    pub pending_direction: Option<Direction>,
    /// Segments, head first
    pub body: Vec<Point>,
    pub food: Point,
    pub score: u32,
    /// Game over; an absorbing state
    pub terminal: bool,
}

impl GameState {
    /// First snapshot of a run. `config` must have passed
    /// [`GameConfig::validate`].
    pub fn initial<R: RandomSource + ?Sized>(config: &GameConfig, rng: &mut R) -> Self {
        let body = config.starting_body();
        let food = place_food(&body, &config.grid, rng);
        Self {
            grid: config.grid,
            direction: config.start_direction,
            pending_direction: None,
            body,
            food,
            score: 0,
            terminal: false,
        }
    }

    #[inline]
    pub fn head(&self) -> Point {
        self.body[0]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Copy of this snapshot with a direction request queued
    pub fn with_pending_direction(&self, dir: Option<Direction>) -> Self {
        Self {
            pending_direction: dir,
            ..self.clone()
        }
    }

    /// True if any segment covers `p`
    pub fn occupies(&self, p: Point) -> bool {
        self.body.contains(&p)
    }
}

/// Initial snapshot on the default 20x20 board heading right
pub fn create_initial_state<R: RandomSource + ?Sized>(rng: &mut R) -> Arc<GameState> {
    Arc::new(GameState::initial(&GameConfig::default(), rng))
}
