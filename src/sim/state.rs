//! Game state and core simulation types
//!
//! One owned struct holds everything a session mutates. Hosts never touch it
//! directly while the loop runs; they read snapshots and queue input.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Collectible, CollectibleKind, Obstacle, Player};
use super::particles::ParticleSystem;
use super::progression::{self, Achievement};
use super::spawner::Spawner;
use crate::tuning::Tuning;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Ticks are being simulated
    Playing,
    /// Lives exhausted; no further ticks mutate state
    GameOver,
}

/// Things that happened during a tick, drained by the driver after each tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ScoreChanged { score: u64 },
    LevelComplete { level: u32 },
    SpeedIncreased { speed: f32 },
    ObstacleHit { obstacle_id: u32, lives_left: u32 },
    CollectiblePicked { collectible_id: u32, kind: CollectibleKind },
    EnergyRestored { energy: u32 },
    GameOver { score: u64 },
}

/// Running counters used for achievements and the final report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub max_combo: u32,
    pub obstacles_hit: u32,
    pub collectibles_gathered: u32,
}

/// Final result handed to the session-end callback
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionReport {
    pub final_score: u64,
    pub level: u32,
    pub max_combo: u32,
    pub ticks: u64,
    pub obstacles_hit: u32,
    pub collectibles_gathered: u32,
    pub achievements: Vec<Achievement>,
}

impl SessionReport {
    /// Stable achievement identifiers, in award order
    pub fn achievement_ids(&self) -> Vec<&'static str> {
        self.achievements.iter().map(Achievement::id).collect()
    }
}

/// Complete simulation state (deterministic for a given seed and input script)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Session seed for reproducibility
    pub seed: u64,
    /// Balance constants this session runs with
    pub tuning: Tuning,
    /// Seeded source for every random decision
    pub rng: Pcg32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub player: Player,
    /// Live obstacles in spawn (= id) order
    pub obstacles: Vec<Obstacle>,
    /// Live collectibles in spawn (= id) order
    pub collectibles: Vec<Collectible>,
    /// Visual particles (not gameplay-affecting)
    pub particles: ParticleSystem,
    pub score: u64,
    /// Base scroll speed in pixels per tick
    pub game_speed: f32,
    /// 1-based level derived from score
    pub level: u32,
    /// Highest score band (score / speed threshold) the ramp has acted on
    pub speed_band: u64,
    pub spawner: Spawner,
    pub stats: SessionStats,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a fresh session with the given seed. `tuning` is expected to have
    /// passed `Tuning::validate`; `Engine::new` enforces this for hosts.
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        // Id 1 is always the player
        let player = Player::new(1, &tuning);
        let game_speed = tuning.base_speed;
        Self {
            seed,
            tuning,
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
            phase: GamePhase::Playing,
            player,
            obstacles: Vec::new(),
            collectibles: Vec::new(),
            particles: ParticleSystem::new(),
            score: 0,
            game_speed,
            level: 1,
            speed_band: 0,
            spawner: Spawner::default(),
            stats: SessionStats::default(),
            events: Vec::new(),
            next_id: 2,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Play-field extent as a vector
    #[inline]
    pub fn field(&self) -> Vec2 {
        Vec2::new(self.tuning.field_width, self.tuning.field_height)
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Queue an event for the driver
    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Drop every retired obstacle and collectible
    pub fn purge_inactive(&mut self) {
        self.obstacles.retain(|o| o.body.active);
        self.collectibles.retain(|c| c.body.active);
    }

    /// Number of live transient entities (obstacles + collectibles)
    pub fn entity_count(&self) -> usize {
        self.obstacles.len() + self.collectibles.len()
    }

    /// Build the end-of-session report from the current state
    pub fn report(&self) -> SessionReport {
        SessionReport {
            final_score: self.score,
            level: progression::level_for_score(self.score, &self.tuning).max(self.level),
            max_combo: self.stats.max_combo,
            ticks: self.time_ticks,
            obstacles_hit: self.stats.obstacles_hit,
            collectibles_gathered: self.stats.collectibles_gathered,
            achievements: progression::achievements(self),
        }
    }
}
