//! Fixed-timestep scheduler
//!
//! Converts variable frame deltas into a whole number of fixed simulation
//! steps. Work per call is capped so a long stall makes the simulation fall
//! behind real time instead of spiralling into ever larger catch-up bursts.

use crate::error::ConfigError;

/// Default simulation rate (steps per second)
pub const DEFAULT_HZ: f64 = 60.0;
/// Default maximum steps executed by one `tick`
pub const DEFAULT_MAX_CATCH_UP: u32 = 5;

/// Accumulator-driven fixed step runner
#[derive(Debug, Clone)]
pub struct FixedStepScheduler {
    step_ms: f64,
    max_catch_up: u32,
    accumulator: f64,
}

impl FixedStepScheduler {
    /// Scheduler running `hz` steps per second, at most `max_catch_up` per tick
    pub fn new(hz: f64, max_catch_up: u32) -> Result<Self, ConfigError> {
        if !hz.is_finite() || hz <= 0.0 {
            return Err(ConfigError::InvalidStepRate(hz));
        }
        if max_catch_up == 0 {
            return Err(ConfigError::ZeroCatchUp);
        }
        Ok(Self {
            step_ms: 1000.0 / hz,
            max_catch_up,
            accumulator: 0.0,
        })
    }

    /// Scheduler from a step period.
    ///
    /// The rate is the whole number of steps that fit in a second (at least
    /// one), so a 150 ms period runs at 6 Hz.
    pub fn from_step_ms(step_ms: f64, max_catch_up: u32) -> Result<Self, ConfigError> {
        if !step_ms.is_finite() || step_ms <= 0.0 {
            return Err(ConfigError::InvalidStepRate(step_ms));
        }
        let hz = (1000.0 / step_ms).floor().max(1.0);
        Self::new(hz, max_catch_up)
    }

    /// Add `elapsed_ms` and run as many whole steps as allowed.
    ///
    /// Negative or non-finite deltas count as zero. Returns the number of
    /// times `step_fn` ran.
    pub fn tick(&mut self, elapsed_ms: f64, mut step_fn: impl FnMut(f64)) -> u32 {
        let elapsed_ms = if elapsed_ms.is_finite() && elapsed_ms > 0.0 {
            elapsed_ms
        } else {
            0.0
        };
        self.accumulator += elapsed_ms;

        let mut steps = 0;
        while self.accumulator >= self.step_ms && steps < self.max_catch_up {
            step_fn(self.step_ms);
            self.accumulator -= self.step_ms;
            steps += 1;
        }

        // Cap reached with whole steps still owed: drop them, keep the remainder
        if self.accumulator >= self.step_ms {
            let dropped = self.accumulator - self.accumulator % self.step_ms;
            log::debug!(
                "fixed step: dropping {:.1}ms of backlog after {} steps",
                dropped,
                steps
            );
            self.accumulator %= self.step_ms;
        }

        steps
    }

    /// Discard unconsumed time
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }

    #[inline]
    pub fn step_ms(&self) -> f64 {
        self.step_ms
    }

    #[inline]
    pub fn max_catch_up(&self) -> u32 {
        self.max_catch_up
    }

    /// Unconsumed time carried to the next tick
    #[inline]
    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    /// Fraction of a step carried over, in `[0, 1)`; renderers may
    /// interpolate with it
    pub fn alpha(&self) -> f64 {
        self.accumulator / self.step_ms
    }
}

impl Default for FixedStepScheduler {
    fn default() -> Self {
        Self {
            step_ms: 1000.0 / DEFAULT_HZ,
            max_catch_up: DEFAULT_MAX_CATCH_UP,
            accumulator: 0.0,
        }
    }
}
