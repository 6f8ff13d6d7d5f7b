//! Device fusion controller
//!
//! Lifecycle mirrors a scene: [`attach`](InputFusionController::attach) once,
//! [`poll`](InputFusionController::poll) every frame before the simulation
//! steps, [`destroy`](InputFusionController::destroy) on shutdown.

use std::sync::mpsc::Sender;

use serde::{Deserialize, Serialize};

use super::gamepad::{DEFAULT_DEADZONE, GamepadReader};
use super::keyboard::{KeyBindings, KeyboardReader};
use super::repeater::{DEFAULT_THROTTLE_MS, RepeatMode, Repeater};
use super::swipe::{SwipeOptions, SwipeReader};
use super::{DirectionReader, RawInput};
use crate::error::ConfigError;
use crate::sim::Direction;

/// Receiver of emitted direction events
pub trait DirectionSink {
    fn emit(&mut self, dir: Direction);
}

impl<F: FnMut(Direction)> DirectionSink for F {
    fn emit(&mut self, dir: Direction) {
        self(dir)
    }
}

impl DirectionSink for Sender<Direction> {
    fn emit(&mut self, dir: Direction) {
        if self.send(dir).is_err() {
            log::trace!("direction {} dropped: receiver gone", dir.as_str());
        }
    }
}

/// Device toggles and repeat policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputOptions {
    pub allow_keyboard: bool,
    pub allow_swipe: bool,
    pub allow_gamepad: bool,
    /// On-screen d-pad buttons
    pub allow_buttons: bool,
    pub bindings: KeyBindings,
    pub repeat_mode: RepeatMode,
    pub throttle_ms: f64,
    /// Interval between repeats; `None` uses `throttle_ms`
    pub repeat_every_ms: Option<f64>,
    pub swipe: SwipeOptions,
    pub deadzone: f32,
}

impl Default for InputOptions {
    fn default() -> Self {
        Self {
            allow_keyboard: true,
            allow_swipe: true,
            allow_gamepad: true,
            allow_buttons: true,
            bindings: KeyBindings::default(),
            repeat_mode: RepeatMode::Repeat,
            throttle_ms: DEFAULT_THROTTLE_MS,
            repeat_every_ms: None,
            swipe: SwipeOptions::default(),
            deadzone: DEFAULT_DEADZONE,
        }
    }
}

impl InputOptions {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field, reason: &str| {
            Err(ConfigError::InvalidInput {
                field,
                reason: reason.to_string(),
            })
        };
        if !self.throttle_ms.is_finite() || self.throttle_ms < 0.0 {
            return invalid("throttle_ms", "must be a finite value >= 0");
        }
        if let Some(every) = self.repeat_every_ms {
            if !every.is_finite() || every < 0.0 {
                return invalid("repeat_every_ms", "must be a finite value >= 0");
            }
        }
        if !(0.0..1.0).contains(&self.deadzone) {
            return invalid("deadzone", "must be in [0, 1)");
        }
        if !self.swipe.min_distance.is_finite() || self.swipe.min_distance < 0.0 {
            return invalid("swipe.min_distance", "must be a finite value >= 0");
        }
        if !self.swipe.device_pixel_ratio.is_finite() || self.swipe.device_pixel_ratio <= 0.0 {
            return invalid("swipe.device_pixel_ratio", "must be positive");
        }
        Ok(())
    }

    fn repeater(&self) -> Repeater {
        Repeater::new(self.repeat_mode, self.throttle_ms, self.repeat_every_ms)
    }
}

/// Fuses device readers into one direction stream
pub struct InputFusionController<S: DirectionSink> {
    options: InputOptions,
    /// Built-in devices, in fusion order: first non-empty reading wins
    readers: Vec<Box<dyn DirectionReader>>,
    /// Host-supplied devices, read after the built-in ones. Kept across
    /// `destroy` so a later `attach` brings them back.
    extra: Vec<Box<dyn DirectionReader>>,
    repeater: Repeater,
    sink: S,
    attached: bool,
}

impl<S: DirectionSink> InputFusionController<S> {
    pub fn new(options: InputOptions, sink: S) -> Self {
        let repeater = options.repeater();
        Self {
            options,
            readers: Vec::new(),
            extra: Vec::new(),
            repeater,
            sink,
            attached: false,
        }
    }

    /// Register an additional device, consulted after the built-in ones.
    /// It only sees input while attached and is reset by `destroy`.
    pub fn with_reader(mut self, reader: Box<dyn DirectionReader>) -> Self {
        self.extra.push(reader);
        self
    }

    /// Build the enabled device readers. Calling again is a no-op.
    pub fn attach(&mut self) {
        if self.attached {
            return;
        }
        let opts = &self.options;
        if opts.allow_swipe {
            self.readers.push(Box::new(SwipeReader::new(&opts.swipe)));
        }
        if opts.allow_keyboard {
            self.readers
                .push(Box::new(KeyboardReader::new(opts.bindings.clone())));
        }
        if opts.allow_gamepad {
            self.readers.push(Box::new(GamepadReader::new(opts.deadzone)));
        }
        self.repeater = self.options.repeater();
        self.attached = true;

        log::debug!(
            "input attached: [{}], {:?} mode",
            self.readers
                .iter()
                .chain(&self.extra)
                .map(|r| r.name())
                .collect::<Vec<_>>()
                .join(", "),
            self.options.repeat_mode
        );
    }

    /// Feed raw device input. Ignored while detached.
    pub fn handle(&mut self, input: &RawInput) {
        if !self.attached {
            return;
        }
        match input {
            RawInput::Button(dir) => {
                if self.options.allow_buttons {
                    self.sink.emit(*dir);
                }
            }
            RawInput::FocusLost => self.clear_held(),
            other => {
                for reader in self.readers.iter_mut().chain(&mut self.extra) {
                    reader.handle(other);
                }
            }
        }
    }

    /// First non-empty reading in fusion order, without repeat handling
    pub fn read_fused(&mut self) -> Option<Direction> {
        self.readers
            .iter_mut()
            .chain(&mut self.extra)
            .find_map(|r| r.read())
    }

    /// Read devices once and emit through the repeat policy.
    ///
    /// Returns the emitted direction, if any. `now_ms` is a monotonic clock.
    pub fn poll(&mut self, now_ms: f64) -> Option<Direction> {
        if !self.attached {
            return None;
        }
        let fused = self.read_fused();
        let emitted = self.repeater.update(now_ms, fused);
        if let Some(dir) = emitted {
            log::trace!("input: {} at {:.0}ms", dir.as_str(), now_ms);
            self.sink.emit(dir);
        }
        emitted
    }

    /// Drop all readers and held state. Safe to call repeatedly or before
    /// `attach`.
    pub fn destroy(&mut self) {
        if !self.attached {
            return;
        }
        self.readers.clear();
        for reader in &mut self.extra {
            reader.reset();
        }
        self.repeater.reset();
        self.attached = false;
        log::debug!("input detached");
    }

    /// Forget held and pending input without detaching
    pub fn clear_held(&mut self) {
        for reader in self.readers.iter_mut().chain(&mut self.extra) {
            reader.reset();
        }
        self.repeater.reset();
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn options(&self) -> &InputOptions {
        &self.options
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}
