//! Host-loop glue for one run
//!
//! Each rendered frame polls input, then runs however many fixed steps the
//! elapsed time buys. The snapshot handed back is shared, so a renderer can
//! keep drawing it while the run moves on.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};

use crate::error::ConfigError;
use crate::input::{InputFusionController, RawInput};
use crate::rng::{AmbientRandom, RandomSource};
use crate::schedule::FixedStepScheduler;
use crate::settings::Settings;
use crate::sim::{Direction, GameConfig, GameState, StepEvent, advance_detailed};

/// What one call to [`GameRun::frame`] did
#[derive(Debug, Clone)]
pub struct FrameReport {
    /// Simulation steps executed this frame
    pub steps: u32,
    pub events: Vec<StepEvent>,
    /// Latest snapshot
    pub state: Arc<GameState>,
}

pub struct GameRun<R: RandomSource = AmbientRandom> {
    config: GameConfig,
    state: Arc<GameState>,
    rng: R,
    scheduler: FixedStepScheduler,
    input: InputFusionController<Sender<Direction>>,
    directions: Receiver<Direction>,
    queued: Option<Direction>,
    paused: bool,
}

impl<R: RandomSource> GameRun<R> {
    /// Validate `settings`, build the first snapshot and attach input
    pub fn new(settings: &Settings, mut rng: R) -> Result<Self, ConfigError> {
        settings.validate()?;
        let scheduler = settings.scheduler()?;
        let (tx, directions) = mpsc::channel();
        let mut input = settings.controller(tx);
        input.attach();

        let state = Arc::new(GameState::initial(&settings.game, &mut rng));
        log::info!(
            "run started: {}x{} grid, {:.0}ms steps, food at ({}, {})",
            state.grid.cols,
            state.grid.rows,
            scheduler.step_ms(),
            state.food.x,
            state.food.y
        );

        Ok(Self {
            config: settings.game,
            state,
            rng,
            scheduler,
            input,
            directions,
            queued: None,
            paused: false,
        })
    }

    /// Forward raw device input to the controller
    pub fn handle_input(&mut self, input: &RawInput) {
        self.input.handle(input);
    }

    /// Advance by one rendered frame.
    ///
    /// `now_ms` is a monotonic clock; `elapsed_ms` is the time since the
    /// previous frame.
    pub fn frame(&mut self, now_ms: f64, elapsed_ms: f64) -> FrameReport {
        if !self.is_running() || self.paused {
            self.drain_directions();
            return self.report(0, Vec::new());
        }

        self.input.poll(now_ms);
        self.drain_directions();

        let Self {
            state,
            rng,
            scheduler,
            queued,
            ..
        } = self;
        let mut events = Vec::new();
        let steps = scheduler.tick(elapsed_ms, |_dt| {
            if state.terminal {
                return;
            }
            let next = Arc::new(state.with_pending_direction(queued.take()));
            let transition = advance_detailed(&next, &mut *rng);
            match transition.event {
                Some(StepEvent::Ate { at, score }) => {
                    log::debug!("ate at ({}, {}), score {}", at.x, at.y, score);
                }
                Some(StepEvent::GameOver { cause, score }) => {
                    log::info!("game over: {:?}, score {}", cause, score);
                }
                None => {}
            }
            events.extend(transition.event);
            *state = transition.state;
        });

        self.report(steps, events)
    }

    /// Pausing stops stepping and forgets partial time and held input
    pub fn set_paused(&mut self, paused: bool) {
        if self.paused == paused {
            return;
        }
        self.paused = paused;
        self.scheduler.reset();
        self.input.clear_held();
        self.queued = None;
        log::info!("run {}", if paused { "paused" } else { "resumed" });
    }

    /// Start over on the same board with a fresh snapshot. Also resumes a
    /// stopped run.
    pub fn restart(&mut self) {
        self.input.attach();
        self.state = Arc::new(GameState::initial(&self.config, &mut self.rng));
        self.scheduler.reset();
        self.input.clear_held();
        self.drain_directions();
        self.queued = None;
        self.paused = false;
        log::info!("run restarted");
    }

    /// Detach input and discard pending time. No further steps run until
    /// [`restart`](Self::restart); the last snapshot stays readable.
    pub fn stop(&mut self) {
        self.input.destroy();
        self.scheduler.reset();
        self.drain_directions();
        self.queued = None;
        log::info!("run stopped at score {}", self.state.score);
    }

    pub fn state(&self) -> &Arc<GameState> {
        &self.state
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_running(&self) -> bool {
        self.input.is_attached() && !self.state.terminal
    }

    pub fn queued_direction(&self) -> Option<Direction> {
        self.queued
    }

    /// Fraction of a step accumulated since the last one, for interpolation
    pub fn alpha(&self) -> f64 {
        self.scheduler.alpha()
    }

    fn drain_directions(&mut self) {
        let current = self.state.direction;
        let accepting = self.is_running() && !self.paused;
        for dir in self.directions.try_iter() {
            if !accepting {
                continue;
            }
            if dir.is_opposite(current) {
                log::trace!("dropped reversal {}", dir.as_str());
                continue;
            }
            self.queued = Some(dir);
        }
    }

    fn report(&self, steps: u32, events: Vec<StepEvent>) -> FrameReport {
        FrameReport {
            steps,
            events,
            state: Arc::clone(&self.state),
        }
    }
}
