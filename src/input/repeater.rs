//! Held-direction repeat policy

use serde::{Deserialize, Serialize};

use crate::sim::Direction;

/// Default pacing between a press and its first repeat (ms)
pub const DEFAULT_THROTTLE_MS: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Emit once per press
    Edge,
    /// Emit on press, then periodically while held
    #[default]
    Repeat,
}

/// Turns a continuous "currently asked for" reading into discrete events
#[derive(Debug, Clone)]
pub struct Repeater {
    mode: RepeatMode,
    throttle_ms: f64,
    repeat_every_ms: f64,
    held: Option<Direction>,
    next_repeat_at: f64,
}

impl Repeater {
    /// `repeat_every_ms` falls back to `throttle_ms`
    pub fn new(mode: RepeatMode, throttle_ms: f64, repeat_every_ms: Option<f64>) -> Self {
        Self {
            mode,
            throttle_ms,
            repeat_every_ms: repeat_every_ms.unwrap_or(throttle_ms),
            held: None,
            next_repeat_at: 0.0,
        }
    }

    /// Feed this poll's reading; returns the direction to emit, if any
    pub fn update(&mut self, now_ms: f64, reading: Option<Direction>) -> Option<Direction> {
        if reading != self.held {
            self.held = reading;
            self.next_repeat_at = now_ms + self.throttle_ms;
            return reading;
        }

        let dir = reading?;
        if self.mode == RepeatMode::Edge || now_ms < self.next_repeat_at {
            return None;
        }

        self.next_repeat_at += self.repeat_every_ms;
        // After a stall, restart the cadence instead of emitting a burst
        if self.next_repeat_at <= now_ms {
            self.next_repeat_at = now_ms + self.repeat_every_ms;
        }
        Some(dir)
    }

    pub fn reset(&mut self) {
        self.held = None;
        self.next_repeat_at = 0.0;
    }

    pub fn held(&self) -> Option<Direction> {
        self.held
    }

    pub fn mode(&self) -> RepeatMode {
        self.mode
    }

    pub fn next_repeat_at(&self) -> f64 {
        self.next_repeat_at
    }
}

impl Default for Repeater {
    fn default() -> Self {
        Self::new(RepeatMode::default(), DEFAULT_THROTTLE_MS, None)
    }
}
