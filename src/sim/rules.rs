//! Board rules: walls, self-overlap and food placement

use glam::IVec2;

use super::state::{GridConfig, Point};
use crate::rng::{RandomSource, random_int};

/// Cell used for food when the body covers the whole board
pub const FULL_BOARD_FOOD: Point = IVec2::ZERO;

#[inline]
pub fn hits_wall(p: Point, grid: &GridConfig) -> bool {
    !grid.contains(p)
}

#[inline]
pub fn hits_self(p: Point, segments: &[Point]) -> bool {
    segments.contains(&p)
}

/// Pick a free cell uniformly at random.
///
/// Free cells are enumerated row by row (y outer, x inner) and one index is
/// drawn with [`random_int`]; replays depend on this order. A full board
/// yields [`FULL_BOARD_FOOD`] without drawing.
pub fn place_food<R: RandomSource + ?Sized>(body: &[Point], grid: &GridConfig, rng: &mut R) -> Point {
    let mut occupied = vec![false; grid.cell_count()];
    for seg in body.iter().filter(|seg| grid.contains(**seg)) {
        occupied[grid.index(*seg)] = true;
    }

    let free: Vec<Point> = (0..grid.rows)
        .flat_map(|y| (0..grid.cols).map(move |x| IVec2::new(x, y)))
        .filter(|p| !occupied[grid.index(*p)])
        .collect();

    if free.is_empty() {
        return FULL_BOARD_FOOD;
    }
    free[random_int(rng, free.len())]
}
