//! Run settings
//!
//! One JSON document configures the board, the step rate and the input
//! policy. Missing fields fall back to the defaults below, so hosts only
//! need to write what they change.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::input::{DirectionSink, InputFusionController, InputOptions, SwipeOptions};
use crate::schedule::{DEFAULT_MAX_CATCH_UP, FixedStepScheduler};
use crate::sim::GameConfig;

/// Simulation step period for the game (ms)
pub const DEFAULT_STEP_MS: f64 = 150.0;
/// Swipe threshold tuned for a small board on phones
pub const GAME_SWIPE_MIN_DISTANCE: f32 = 12.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Board size and starting body
    pub game: GameConfig,
    /// Step period; the scheduler runs `floor(1000 / step_ms)` steps a second
    pub step_ms: f64,
    /// Maximum steps per frame
    pub max_catch_up: u32,
    pub input: InputOptions,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            step_ms: DEFAULT_STEP_MS,
            max_catch_up: DEFAULT_MAX_CATCH_UP,
            input: InputOptions {
                swipe: SwipeOptions {
                    min_distance: GAME_SWIPE_MIN_DISTANCE,
                    ..SwipeOptions::default()
                },
                ..InputOptions::default()
            },
        }
    }
}

impl Settings {
    /// Parse and validate a settings document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.game.validate()?;
        self.input.validate()?;
        // Surfaces step rate and catch-up errors
        self.scheduler()?;
        Ok(())
    }

    /// Fresh scheduler for these settings
    pub fn scheduler(&self) -> Result<FixedStepScheduler, ConfigError> {
        FixedStepScheduler::from_step_ms(self.step_ms, self.max_catch_up)
    }

    /// Detached input controller for these settings
    pub fn controller<S: DirectionSink>(&self, sink: S) -> InputFusionController<S> {
        InputFusionController::new(self.input.clone(), sink)
    }
}
