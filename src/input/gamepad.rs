//! Gamepad reader (standard mapping)

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::{DirectionReader, RawInput};
use crate::sim::Direction;

/// Stick deflection ignored around the rest position
pub const DEFAULT_DEADZONE: f32 = 0.25;

/// Standard-mapping d-pad buttons, in resolution order
const DPAD: [(usize, Direction); 4] = [
    (14, Direction::Left),
    (15, Direction::Right),
    (12, Direction::Up),
    (13, Direction::Down),
];

/// Snapshot of one pad as reported by the platform
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GamepadState {
    pub index: usize,
    pub connected: bool,
    /// Pressed flag per button index
    pub buttons: Vec<bool>,
    /// Axis values in `[-1, 1]`; 0/1 are the primary stick
    pub axes: Vec<f32>,
}

impl GamepadState {
    pub fn is_button_down(&self, button: usize) -> bool {
        self.buttons.get(button).copied().unwrap_or(false)
    }

    /// Primary stick (axes 0 and 1); missing or non-finite axes read as
    /// centred
    pub fn stick(&self) -> Vec2 {
        let axis = |i: usize| {
            self.axes
                .get(i)
                .copied()
                .filter(|v| v.is_finite())
                .unwrap_or(0.0)
        };
        Vec2::new(axis(0), axis(1))
    }
}

/// Reads the first connected pad: d-pad first, stick as fallback
#[derive(Debug, Clone)]
pub struct GamepadReader {
    deadzone: f32,
    pads: Vec<GamepadState>,
}

impl GamepadReader {
    pub fn new(deadzone: f32) -> Self {
        Self {
            deadzone,
            pads: Vec::new(),
        }
    }

    pub fn deadzone(&self) -> f32 {
        self.deadzone
    }

    /// First connected pad by index
    pub fn active_pad(&self) -> Option<&GamepadState> {
        self.pads.iter().find(|p| p.connected)
    }

    fn update(&mut self, state: &GamepadState) {
        match self.pads.iter_mut().find(|p| p.index == state.index) {
            Some(slot) => *slot = state.clone(),
            None => {
                log::debug!("gamepad {} seen", state.index);
                self.pads.push(state.clone());
                self.pads.sort_by_key(|p| p.index);
            }
        }
    }

    fn stick_direction(&self, stick: Vec2) -> Option<Direction> {
        let abs = stick.abs();
        if abs.x < self.deadzone && abs.y < self.deadzone {
            return None;
        }
        // Equal deflection resolves vertically
        if abs.x > abs.y {
            Some(if stick.x < 0.0 {
                Direction::Left
            } else {
                Direction::Right
            })
        } else {
            Some(if stick.y < 0.0 {
                Direction::Up
            } else {
                Direction::Down
            })
        }
    }
}

impl Default for GamepadReader {
    fn default() -> Self {
        Self::new(DEFAULT_DEADZONE)
    }
}

impl DirectionReader for GamepadReader {
    fn name(&self) -> &'static str {
        "gamepad"
    }

    fn handle(&mut self, input: &RawInput) {
        match input {
            RawInput::Gamepad(state) => self.update(state),
            RawInput::GamepadDisconnected { index } => {
                log::debug!("gamepad {} disconnected", index);
                self.pads.retain(|p| p.index != *index);
            }
            _ => {}
        }
    }

    fn read(&mut self) -> Option<Direction> {
        let pad = self.active_pad()?;
        DPAD.iter()
            .find(|(button, _)| pad.is_button_down(*button))
            .map(|(_, dir)| *dir)
            .or_else(|| self.stick_direction(pad.stick()))
    }

    fn reset(&mut self) {
        self.pads.clear();
    }
}
