//! Pointer swipe reader
//!
//! Measures the straight-line delta from pointer down to pointer up. Short
//! gestures are taps and are left for whoever handles taps.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::{DirectionReader, RawInput};
use crate::sim::Direction;

/// Default minimum swipe length in CSS pixels (before pixel-ratio scaling)
pub const DEFAULT_SWIPE_MIN_DISTANCE: f32 = 24.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwipeOptions {
    pub min_distance: f32,
    /// Multiply `min_distance` by `device_pixel_ratio` (rounded)
    pub scale_with_dpr: bool,
    pub device_pixel_ratio: f32,
}

impl Default for SwipeOptions {
    fn default() -> Self {
        Self {
            min_distance: DEFAULT_SWIPE_MIN_DISTANCE,
            scale_with_dpr: true,
            device_pixel_ratio: 1.0,
        }
    }
}

impl SwipeOptions {
    /// Threshold actually applied to pointer deltas
    pub fn effective_min_distance(&self) -> f32 {
        if self.scale_with_dpr {
            (self.min_distance * self.device_pixel_ratio).round()
        } else {
            self.min_distance
        }
    }
}

/// Direction of a pointer delta, or `None` for a tap.
///
/// The larger axis must reach `min_distance`. Equal axes count as
/// horizontal. A non-finite delta is a tap.
pub fn classify_swipe(delta: Vec2, min_distance: f32) -> Option<Direction> {
    if !delta.is_finite() {
        return None;
    }
    let abs = delta.abs();
    let reach = abs.max_element();
    if reach == 0.0 || reach < min_distance {
        return None;
    }
    if abs.x >= abs.y {
        Some(if delta.x > 0.0 {
            Direction::Right
        } else {
            Direction::Left
        })
    } else {
        Some(if delta.y > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        })
    }
}

#[derive(Debug, Clone, Copy)]
struct PointerStart {
    id: u32,
    pos: Vec2,
    time_ms: f64,
}

/// Edge-triggered swipe detection; each swipe is read exactly once
#[derive(Debug, Clone)]
pub struct SwipeReader {
    min_distance: f32,
    start: Option<PointerStart>,
    pending: Option<Direction>,
}

impl SwipeReader {
    pub fn new(options: &SwipeOptions) -> Self {
        Self {
            min_distance: options.effective_min_distance(),
            start: None,
            pending: None,
        }
    }

    pub fn min_distance(&self) -> f32 {
        self.min_distance
    }

    fn pointer_up(&mut self, id: u32, pos: Vec2, time_ms: f64) {
        let Some(start) = self.start else {
            return;
        };
        if start.id != id {
            return;
        }
        self.start = None;

        let delta = pos - start.pos;
        match classify_swipe(delta, self.min_distance) {
            Some(dir) => {
                log::trace!(
                    "swipe {} ({:.0},{:.0}) in {:.0}ms",
                    dir.as_str(),
                    delta.x,
                    delta.y,
                    time_ms - start.time_ms
                );
                self.pending = Some(dir);
            }
            None => log::trace!("pointer tap ignored by swipe reader"),
        }
    }
}

impl Default for SwipeReader {
    fn default() -> Self {
        Self::new(&SwipeOptions::default())
    }
}

impl DirectionReader for SwipeReader {
    fn name(&self) -> &'static str {
        "swipe"
    }

    fn handle(&mut self, input: &RawInput) {
        match *input {
            RawInput::PointerDown { id, pos, time_ms } => {
                self.start = Some(PointerStart { id, pos, time_ms });
            }
            RawInput::PointerUp { id, pos, time_ms } => self.pointer_up(id, pos, time_ms),
            RawInput::FocusLost => self.start = None,
            _ => {}
        }
    }

    fn read(&mut self) -> Option<Direction> {
        self.pending.take()
    }

    fn reset(&mut self) {
        self.start = None;
        self.pending = None;
    }
}
