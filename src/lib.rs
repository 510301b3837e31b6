//! Nebula Dash - a side-scrolling arcade simulation engine
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, spawning, collisions, progression)
//! - `scene`: Per-tick drawable scene description for an external renderer
//! - `driver`: Host-facing loop driver (start/pause/resume/stop, input, callbacks)
//! - `tuning`: Data-driven game balance

pub mod driver;
pub mod scene;
pub mod sim;
pub mod tuning;

pub use driver::{Direction, Engine, RunStatus, SessionObserver, Snapshot};
pub use scene::{Scene, SceneItem};
pub use sim::{Achievement, GameEvent, GamePhase, GameState, SessionReport};
pub use tuning::{Difficulty, SpeedRampPolicy, Tuning, TuningError};

/// Engine configuration constants
pub mod consts {
    /// Ticks per simulated second
    pub const TICK_RATE: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TICK_RATE as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta the driver will accumulate (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;
}
