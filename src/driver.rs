//! Simulation loop driver
//!
//! The host owns an `Engine` and calls `frame(dt)` from its display-refresh
//! callback. The engine turns elapsed time into fixed ticks, applies the
//! directions currently held, and forwards progress to a `SessionObserver`.
//! Everything runs on the caller's thread; a tick always completes before
//! `frame`, `step` or `stop` returns.

use serde::Serialize;

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::scene::Scene;
use crate::sim::{GameEvent, GameState, SessionReport, TickInput, TickOutcome, tick};
use crate::tuning::{Tuning, TuningError};

/// Host-facing directional intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Progress callbacks. Implementations receive data only and cannot reach
/// back into the engine, so they cannot re-enter the loop.
pub trait SessionObserver {
    fn on_score_changed(&mut self, _score: u64) {}

    fn on_level_complete(&mut self, _level: u32) {}

    /// Every simulation event, including the ones with dedicated callbacks
    fn on_event(&mut self, _event: &GameEvent) {}

    /// Called exactly once per started session
    fn on_session_end(&mut self, report: &SessionReport);
}

/// Observer that ignores everything
impl SessionObserver for () {
    fn on_session_end(&mut self, _report: &SessionReport) {}
}

/// Lifecycle status of the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunStatus {
    /// No session started yet
    Idle,
    Running,
    Paused,
    /// Session finished (game over or stopped); state is kept for inspection
    Ended,
}

/// Read-only HUD view of the current session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub tick: u64,
    pub score: u64,
    pub lives: u32,
    pub energy: u32,
    pub combo: u32,
    pub level: u32,
    pub game_speed: f32,
    pub invulnerable: bool,
    pub status: RunStatus,
}

/// Owns one session at a time and drives it tick by tick
pub struct Engine<O: SessionObserver> {
    tuning: Tuning,
    seed: u64,
    observer: O,
    state: Option<GameState>,
    scene: Scene,
    input: TickInput,
    status: RunStatus,
    accumulator: f32,
    /// Whether the current session's end has been reported
    reported: bool,
}

impl<O: SessionObserver> Engine<O> {
    /// Create an idle engine. The tuning is validated once here; the
    /// simulation only ever runs with values that passed `Tuning::validate`.
    pub fn new(tuning: Tuning, seed: u64, observer: O) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self {
            tuning,
            seed,
            observer,
            state: None,
            scene: Scene::new(),
            input: TickInput::default(),
            status: RunStatus::Idle,
            accumulator: 0.0,
            reported: false,
        })
    }

    /// Start a fresh session with the engine's seed. A session still in
    /// progress is stopped (and reported) first.
    pub fn start(&mut self) {
        if matches!(self.status, RunStatus::Running | RunStatus::Paused) {
            log::info!("Restarting: ending the current session first");
            self.stop();
        }

        let state = GameState::new(self.seed, self.tuning.clone());
        self.scene.rebuild(&state);
        self.state = Some(state);
        self.input = TickInput::default();
        self.accumulator = 0.0;
        self.reported = false;
        self.status = RunStatus::Running;
        log::info!("Session started with seed {}", self.seed);
    }

    /// Start a fresh session with a new seed
    pub fn start_with_seed(&mut self, seed: u64) {
        self.seed = seed;
        self.start();
    }

    /// Stop scheduling ticks without touching state
    pub fn pause(&mut self) -> bool {
        if self.status != RunStatus::Running {
            log::warn!("pause() ignored while {:?}", self.status);
            return false;
        }
        self.status = RunStatus::Paused;
        self.accumulator = 0.0;
        log::info!("Paused at tick {}", self.tick_count());
        true
    }

    /// Resume scheduling; time spent paused is never simulated
    pub fn resume(&mut self) -> bool {
        if self.status != RunStatus::Paused {
            log::warn!("resume() ignored while {:?}", self.status);
            return false;
        }
        self.status = RunStatus::Running;
        self.accumulator = 0.0;
        log::info!("Resumed at tick {}", self.tick_count());
        true
    }

    /// End the session and report it. Idempotent: returns false when there
    /// is nothing left to stop.
    pub fn stop(&mut self) -> bool {
        match self.status {
            RunStatus::Running | RunStatus::Paused => {
                log::info!("Session stopped at tick {}", self.tick_count());
                self.finish();
                true
            }
            RunStatus::Idle | RunStatus::Ended => false,
        }
    }

    /// Begin holding a direction
    pub fn press(&mut self, direction: Direction) {
        self.set_held(direction, true);
    }

    /// Stop holding a direction
    pub fn release(&mut self, direction: Direction) {
        self.set_held(direction, false);
    }

    pub fn release_all(&mut self) {
        self.input = TickInput::default();
    }

    fn set_held(&mut self, direction: Direction, held: bool) {
        match direction {
            Direction::Up => self.input.up = held,
            Direction::Down => self.input.down = held,
            Direction::Left => self.input.left = held,
            Direction::Right => self.input.right = held,
        }
    }

    /// Advance by `dt` seconds of host time. Returns the number of ticks run.
    pub fn frame(&mut self, dt: f32) -> u32 {
        if self.status != RunStatus::Running {
            return 0;
        }

        let dt = if dt.is_finite() { dt.clamp(0.0, MAX_FRAME_DT) } else { 0.0 };
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            substeps += 1;
            if self.run_tick() == TickOutcome::GameOver {
                break;
            }
        }
        substeps
    }

    /// Run exactly one tick if a session is running
    pub fn step(&mut self) -> bool {
        if self.status != RunStatus::Running {
            return false;
        }
        let _ = self.run_tick();
        true
    }

    fn run_tick(&mut self) -> TickOutcome {
        let Some(state) = self.state.as_mut() else {
            return TickOutcome::GameOver;
        };

        let outcome = tick(state, &self.input, &mut self.scene);
        for event in state.drain_events() {
            self.observer.on_event(&event);
            match event {
                GameEvent::ScoreChanged { score } => self.observer.on_score_changed(score),
                GameEvent::LevelComplete { level } => self.observer.on_level_complete(level),
                _ => {}
            }
        }

        if outcome == TickOutcome::GameOver {
            self.finish();
        }
        outcome
    }

    /// Single exit path: report once, then stop scheduling
    fn finish(&mut self) {
        self.status = RunStatus::Ended;
        self.accumulator = 0.0;
        if self.reported {
            return;
        }
        self.reported = true;

        if let Some(state) = &self.state {
            let report = state.report();
            log::info!(
                "Session ended: score {}, level {}, achievements {:?}",
                report.final_score,
                report.level,
                report.achievement_ids()
            );
            self.observer.on_session_end(&report);
        }
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Scene assembled by the most recent tick
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Simulation state of the current (or last) session
    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    pub fn snapshot(&self) -> Option<Snapshot> {
        self.state.as_ref().map(|state| Snapshot {
            tick: state.time_ticks,
            score: state.score,
            lives: state.player.lives,
            energy: state.player.energy,
            combo: state.player.combo,
            level: state.level,
            game_speed: state.game_speed,
            invulnerable: state.player.invulnerable,
            status: self.status,
        })
    }

    fn tick_count(&self) -> u64 {
        self.state.as_ref().map_or(0, |s| s.time_ticks)
    }
}
