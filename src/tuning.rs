//! Game balance and tuning
//!
//! Every gameplay constant lives here so hosts can ship balance changes as
//! JSON without touching the simulation.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating a tuning document
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Difficulty presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Casual,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Casual => "casual",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "casual" | "easy" => Some(Difficulty::Casual),
            "normal" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Multiplier on obstacle spawn intervals (larger = calmer)
    fn interval_scale(&self) -> f32 {
        match self {
            Difficulty::Casual => 1.4,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 0.7,
        }
    }

    /// Multiplier on base and maximum game speed
    fn speed_scale(&self) -> f32 {
        match self {
            Difficulty::Casual => 0.8,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 1.25,
        }
    }
}

/// How the difficulty ramp reacts when score skips past several thresholds in one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SpeedRampPolicy {
    /// One increment per ramp check that observes a new band, however many bands were skipped
    #[default]
    OncePerCheck,
    /// One increment for every threshold band crossed
    PerBandCrossed,
}

/// Data-driven gameplay constants. Distances are pixels, speeds are pixels per tick,
/// durations are ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Play-field ===
    pub field_width: f32,
    pub field_height: f32,

    // === Player ===
    pub player_x: f32,
    pub player_size: f32,
    pub player_speed: f32,
    pub start_lives: u32,
    pub max_energy: u32,
    pub obstacle_energy_damage: u32,
    pub invulnerability_ticks: u32,

    // === Scoring ===
    pub currency_value: u32,
    /// Bonus points per combo step (policy: value + step * combo)
    pub combo_bonus_step: u32,
    pub combo_window_ticks: u32,
    pub energy_restore: u32,
    pub points_per_level: u64,

    // === Difficulty ramp ===
    pub base_speed: f32,
    pub speed_increment: f32,
    pub speed_threshold: u64,
    pub max_speed: f32,
    pub ramp_policy: SpeedRampPolicy,

    // === Spawner ===
    pub obstacle_base_interval: u32,
    pub obstacle_interval_per_level: u32,
    pub obstacle_min_interval: u32,
    pub obstacle_min_size: f32,
    pub obstacle_max_size: f32,
    pub obstacle_speed_jitter: f32,
    pub obstacle_level_speed_bonus: f32,
    pub spawn_margin: f32,
    pub safety_zone: f32,
    pub collectible_chance: f64,
    pub energy_share: f64,
    pub collectible_size: f32,

    // === Particles ===
    pub particle_gravity: f32,
    pub particle_drag: f32,
    pub particle_decay: f32,
    pub trail_chance: f64,
    pub trail_life: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            field_width: 800.0,
            field_height: 600.0,

            player_x: 80.0,
            player_size: 40.0,
            player_speed: 5.0,
            start_lives: 3,
            max_energy: 100,
            obstacle_energy_damage: 25,
            invulnerability_ticks: 120,

            currency_value: 10,
            combo_bonus_step: 2,
            combo_window_ticks: 300, // 5 seconds at 60 Hz
            energy_restore: 20,
            points_per_level: 500,

            base_speed: 2.0,
            speed_increment: 0.05,
            speed_threshold: 100,
            max_speed: 6.0,
            ramp_policy: SpeedRampPolicy::OncePerCheck,

            obstacle_base_interval: 90,
            obstacle_interval_per_level: 6,
            obstacle_min_interval: 24,
            obstacle_min_size: 30.0,
            obstacle_max_size: 60.0,
            obstacle_speed_jitter: 1.0,
            obstacle_level_speed_bonus: 0.1,
            spawn_margin: 10.0,
            safety_zone: 60.0,
            collectible_chance: 0.02,
            energy_share: 0.3,
            collectible_size: 24.0,

            particle_gravity: 0.15,
            particle_drag: 0.98,
            particle_decay: 0.02,
            trail_chance: 0.1,
            trail_life: 0.3,
        }
    }
}

impl Tuning {
    /// Create tuning from a difficulty preset
    pub fn from_preset(preset: Difficulty) -> Self {
        let mut tuning = Self::default();
        tuning.apply_preset(preset);
        tuning
    }

    /// Scale spawn pacing and speeds for a preset (applied on top of current values)
    pub fn apply_preset(&mut self, preset: Difficulty) {
        let interval = |ticks: u32| ((ticks as f32) * preset.interval_scale()).round() as u32;
        self.obstacle_base_interval = interval(self.obstacle_base_interval);
        self.obstacle_min_interval = interval(self.obstacle_min_interval).max(1);
        self.base_speed *= preset.speed_scale();
        self.max_speed *= preset.speed_scale();
    }

    /// Parse a (possibly partial) JSON document and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load and validate a JSON tuning file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning overrides");
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), TuningError> {
            Err(TuningError::Invalid { field, reason })
        }

        let positive = [
            ("field_width", self.field_width),
            ("field_height", self.field_height),
            ("player_size", self.player_size),
            ("player_speed", self.player_speed),
            ("base_speed", self.base_speed),
            ("obstacle_min_size", self.obstacle_min_size),
            ("collectible_size", self.collectible_size),
            ("particle_decay", self.particle_decay),
            ("trail_life", self.trail_life),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return invalid(field, "must be positive");
            }
        }

        let finite = [
            ("field_width", self.field_width),
            ("field_height", self.field_height),
            ("player_x", self.player_x),
            ("player_size", self.player_size),
            ("player_speed", self.player_speed),
            ("base_speed", self.base_speed),
            ("speed_increment", self.speed_increment),
            ("max_speed", self.max_speed),
            ("obstacle_min_size", self.obstacle_min_size),
            ("obstacle_max_size", self.obstacle_max_size),
            ("obstacle_speed_jitter", self.obstacle_speed_jitter),
            ("obstacle_level_speed_bonus", self.obstacle_level_speed_bonus),
            ("spawn_margin", self.spawn_margin),
            ("safety_zone", self.safety_zone),
            ("collectible_size", self.collectible_size),
            ("particle_gravity", self.particle_gravity),
            ("particle_drag", self.particle_drag),
            ("particle_decay", self.particle_decay),
            ("trail_life", self.trail_life),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return invalid(field, "must be finite");
            }
        }

        let non_negative = [
            ("player_x", self.player_x),
            ("speed_increment", self.speed_increment),
            ("obstacle_speed_jitter", self.obstacle_speed_jitter),
            ("obstacle_level_speed_bonus", self.obstacle_level_speed_bonus),
            ("spawn_margin", self.spawn_margin),
            ("safety_zone", self.safety_zone),
        ];
        for (field, value) in non_negative {
            if value < 0.0 {
                return invalid(field, "must not be negative");
            }
        }

        if self.max_energy == 0 {
            return invalid("max_energy", "must be at least 1");
        }
        if self.start_lives == 0 {
            return invalid("start_lives", "must be at least 1");
        }
        if self.max_speed < self.base_speed {
            return invalid("max_speed", "must not be below base_speed");
        }
        if self.obstacle_max_size < self.obstacle_min_size {
            return invalid("obstacle_max_size", "must not be below obstacle_min_size");
        }
        if self.invulnerability_ticks == 0 {
            return invalid("invulnerability_ticks", "must be at least 1");
        }
        if self.combo_window_ticks == 0 {
            return invalid("combo_window_ticks", "must be at least 1");
        }
        if self.speed_threshold == 0 {
            return invalid("speed_threshold", "must be at least 1");
        }
        if self.points_per_level == 0 {
            return invalid("points_per_level", "must be at least 1");
        }
        if self.obstacle_min_interval == 0 {
            return invalid("obstacle_min_interval", "must be at least 1");
        }
        if !(0.0..1.0).contains(&self.particle_drag) {
            return invalid("particle_drag", "must be in [0, 1)");
        }
        for (field, p) in [
            ("collectible_chance", self.collectible_chance),
            ("energy_share", self.energy_share),
            ("trail_chance", self.trail_chance),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return invalid(field, "probability must be in [0, 1]");
            }
        }
        // Obstacles must fit vertically inside the spawn band
        if self.obstacle_max_size + 2.0 * self.spawn_margin > self.field_height {
            return invalid("obstacle_max_size", "does not fit inside the play-field");
        }
        if self.collectible_size + 2.0 * self.spawn_margin > self.field_height {
            return invalid("collectible_size", "does not fit inside the play-field");
        }
        if self.player_size > self.field_height || self.player_x + self.player_size > self.field_width {
            return invalid("player_size", "player does not fit inside the play-field");
        }

        Ok(())
    }

    /// Obstacle spawn interval (ticks) at a given level; shrinks with level down to the floor
    pub fn obstacle_interval(&self, level: u32) -> u32 {
        let reduction = self
            .obstacle_interval_per_level
            .saturating_mul(level.saturating_sub(1));
        self.obstacle_base_interval
            .saturating_sub(reduction)
            .max(self.obstacle_min_interval)
    }

    /// Points for a currency pickup worth `base` given the combo before the pickup
    pub fn combo_points(&self, base: u32, combo: u32) -> u64 {
        base as u64 + self.combo_bonus_step as u64 * combo as u64
    }
}
