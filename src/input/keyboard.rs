//! Keyboard reader

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{DirectionReader, RawInput};
use crate::sim::Direction;

/// Resolution order when several directions are held at once
const PRIORITY: [Direction; 4] = [
    Direction::Left,
    Direction::Right,
    Direction::Up,
    Direction::Down,
];

/// Key codes bound to each direction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub up: Vec<String>,
    pub down: Vec<String>,
    pub left: Vec<String>,
    pub right: Vec<String>,
}

impl Default for KeyBindings {
    /// Arrow keys plus WASD
    fn default() -> Self {
        Self {
            up: vec!["ArrowUp".into(), "KeyW".into()],
            down: vec!["ArrowDown".into(), "KeyS".into()],
            left: vec!["ArrowLeft".into(), "KeyA".into()],
            right: vec!["ArrowRight".into(), "KeyD".into()],
        }
    }
}

impl KeyBindings {
    pub fn arrows_only() -> Self {
        Self {
            up: vec!["ArrowUp".into()],
            down: vec!["ArrowDown".into()],
            left: vec!["ArrowLeft".into()],
            right: vec!["ArrowRight".into()],
        }
    }

    pub fn keys(&self, dir: Direction) -> &[String] {
        match dir {
            Direction::Up => &self.up,
            Direction::Down => &self.down,
            Direction::Left => &self.left,
            Direction::Right => &self.right,
        }
    }
}

/// Tracks held keys and reports the highest-priority held direction
#[derive(Debug, Clone, Default)]
pub struct KeyboardReader {
    bindings: KeyBindings,
    pressed: HashSet<String>,
}

impl KeyboardReader {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            pressed: HashSet::new(),
        }
    }

    pub fn is_down(&self, code: &str) -> bool {
        self.pressed.contains(code)
    }

    fn any_down(&self, dir: Direction) -> bool {
        self.bindings
            .keys(dir)
            .iter()
            .any(|code| self.pressed.contains(code))
    }
}

impl DirectionReader for KeyboardReader {
    fn name(&self) -> &'static str {
        "keyboard"
    }

    fn handle(&mut self, input: &RawInput) {
        match input {
            RawInput::KeyDown(code) => {
                self.pressed.insert(code.clone());
            }
            RawInput::KeyUp(code) => {
                self.pressed.remove(code);
            }
            RawInput::FocusLost => self.pressed.clear(),
            _ => {}
        }
    }

    fn read(&mut self) -> Option<Direction> {
        PRIORITY.into_iter().find(|dir| self.any_down(*dir))
    }

    fn reset(&mut self) {
        self.pressed.clear();
    }
}
