//! Directional input fusion
//!
//! Raw device input is pushed in by the host as [`RawInput`] values. Each
//! device has a [`DirectionReader`] that turns its raw state into "which way
//! is being asked for right now". The [`InputFusionController`] picks one
//! reading per poll and the [`Repeater`] turns that continuous reading into
//! discrete direction events delivered to a [`DirectionSink`].

pub mod controller;
pub mod gamepad;
pub mod keyboard;
pub mod repeater;
pub mod swipe;

use glam::Vec2;

use crate::sim::Direction;

pub use controller::{DirectionSink, InputFusionController, InputOptions};
pub use gamepad::{GamepadReader, GamepadState};
pub use keyboard::{KeyBindings, KeyboardReader};
pub use repeater::{RepeatMode, Repeater};
pub use swipe::{SwipeOptions, SwipeReader, classify_swipe};

/// Raw device input as delivered by the host platform
#[derive(Debug, Clone, PartialEq)]
pub enum RawInput {
    /// Key pressed, identified by its physical code (`"ArrowUp"`, `"KeyW"`)
    KeyDown(String),
    KeyUp(String),
    PointerDown { id: u32, pos: Vec2, time_ms: f64 },
    PointerUp { id: u32, pos: Vec2, time_ms: f64 },
    /// Latest snapshot of one gamepad
    Gamepad(GamepadState),
    GamepadDisconnected { index: usize },
    /// On-screen d-pad press; delivered immediately, never repeated
    Button(Direction),
    /// Window lost focus; anything held is treated as released
    FocusLost,
}

/// One input device reduced to an optional direction
pub trait DirectionReader {
    /// Short device name for logs
    fn name(&self) -> &'static str;

    /// Update raw state; input meant for other devices is ignored
    fn handle(&mut self, input: &RawInput);

    /// Direction currently asked for, if any
    fn read(&mut self) -> Option<Direction>;

    /// Forget everything held or pending
    fn reset(&mut self);
}
