//! Tile Snake - a fixed-step snake core on a tile grid
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid, body, food, step rules)
//! - `schedule`: Fixed-timestep scheduler with a catch-up cap
//! - `rng`: Injected random sources (ambient, seeded, scripted)
//! - `input`: Keyboard, swipe, gamepad and button fusion with repeat policy
//! - `settings`: JSON-backed run configuration
//! - `game`: Per-frame glue tying the above into one run
//!
//! Rendering, audio and persistence are left to the host.

pub mod error;
pub mod game;
pub mod input;
pub mod rng;
pub mod schedule;
pub mod settings;
pub mod sim;

pub use error::ConfigError;
pub use game::{FrameReport, GameRun};
pub use input::{DirectionSink, InputFusionController, InputOptions, RawInput, RepeatMode};
pub use rng::{AmbientRandom, RandomSource, SeededRandom, SequenceRandom, random_int};
pub use schedule::FixedStepScheduler;
pub use settings::Settings;
pub use sim::{Direction, GameState, advance, create_initial_state};
