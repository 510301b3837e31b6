//! Cosmetic particle effects
//!
//! Particles never collide and never touch score or lives. They are kept
//! in the simulation only so a seeded run replays the same visuals.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Effect category, selects palette and motion ranges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleCategory {
    /// Obstacle hit
    Explosion,
    /// Any collectible picked up
    Collect,
    /// Energy restored
    Power,
    /// Player motion trail
    Trail,
}

impl ParticleCategory {
    /// Fixed RGB palette per category
    pub fn palette(&self) -> &'static [[f32; 3]] {
        match self {
            ParticleCategory::Explosion => &[[1.0, 0.27, 0.27], [1.0, 0.53, 0.0], [1.0, 0.8, 0.2]],
            ParticleCategory::Collect => &[[1.0, 0.84, 0.0], [1.0, 0.93, 0.5], [1.0, 1.0, 1.0]],
            ParticleCategory::Power => &[[0.0, 1.0, 0.53], [0.2, 0.8, 1.0], [0.6, 1.0, 0.8]],
            ParticleCategory::Trail => &[[0.0, 0.83, 1.0], [0.55, 0.36, 0.96]],
        }
    }

    /// Starting life for emissions without a tuned override
    fn default_life(&self) -> f32 {
        match self {
            ParticleCategory::Trail => 0.3,
            _ => BURST_LIFE,
        }
    }

    /// (min, max) launch speed in pixels per tick
    fn speed_range(&self) -> (f32, f32) {
        match self {
            ParticleCategory::Explosion => (1.5, 4.5),
            ParticleCategory::Collect => (0.5, 2.5),
            ParticleCategory::Power => (1.0, 3.0),
            ParticleCategory::Trail => (0.2, 0.8),
        }
    }

    /// (min, max) particle size in pixels
    fn size_range(&self) -> (f32, f32) {
        match self {
            ParticleCategory::Explosion => (3.0, 7.0),
            ParticleCategory::Collect => (2.0, 5.0),
            ParticleCategory::Power => (2.0, 6.0),
            ParticleCategory::Trail => (1.5, 3.5),
        }
    }
}

/// A particle for visual effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub category: ParticleCategory,
    pub color: [f32; 3],
    /// Remaining life, counts down to 0
    pub life: f32,
    pub max_life: f32,
}

impl Particle {
    /// Remaining life as a 0-1 fraction (drives alpha)
    pub fn life_fraction(&self) -> f32 {
        (self.life / self.max_life).clamp(0.0, 1.0)
    }
}

/// Burst life for explosion/collect/power effects
pub const BURST_LIFE: f32 = 1.0;

/// Spread of spawn positions around the emission origin
const EMIT_JITTER: f32 = 4.0;

/// Owner of all live particles
#[derive(Debug, Clone, Default)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Emit `count` particles of a burst category around `origin`
    pub fn emit<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        origin: Vec2,
        category: ParticleCategory,
        count: usize,
    ) {
        self.emit_with_life(rng, origin, category, count, category.default_life());
    }

    /// Maybe emit one trail particle behind a moving player
    pub fn emit_trail<R: Rng + ?Sized>(&mut self, rng: &mut R, origin: Vec2, tuning: &Tuning) {
        if rng.random_bool(tuning.trail_chance) {
            self.emit_with_life(rng, origin, ParticleCategory::Trail, 1, tuning.trail_life);
        }
    }

    fn emit_with_life<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        origin: Vec2,
        category: ParticleCategory,
        count: usize,
        max_life: f32,
    ) {
        let palette = category.palette();
        let (min_speed, max_speed) = category.speed_range();
        let (min_size, max_size) = category.size_range();
        self.particles.reserve(count);

        for _ in 0..count {
            let offset = Vec2::new(
                rng.random_range(-EMIT_JITTER..=EMIT_JITTER),
                rng.random_range(-EMIT_JITTER..=EMIT_JITTER),
            );
            let vel = match category {
                // Trails drift backwards, away from the direction of travel
                ParticleCategory::Trail => Vec2::new(
                    -rng.random_range(min_speed..=max_speed),
                    rng.random_range(-min_speed..=min_speed),
                ),
                _ => {
                    let angle = rng.random_range(0.0..std::f32::consts::TAU);
                    let speed = rng.random_range(min_speed..=max_speed);
                    Vec2::new(angle.cos(), angle.sin()) * speed
                }
            };
            let color = palette[rng.random_range(0..palette.len())];

            self.particles.push(Particle {
                pos: origin + offset,
                vel,
                size: rng.random_range(min_size..=max_size),
                category,
                color,
                life: max_life,
                max_life,
            });
        }
    }

    /// Integrate, apply gravity and drag, decay life and retire dead particles
    pub fn advance(&mut self, tuning: &Tuning) {
        for particle in self.particles.iter_mut() {
            particle.pos += particle.vel;
            particle.vel.y += tuning.particle_gravity;
            particle.vel.x *= tuning.particle_drag;
            particle.life -= tuning.particle_decay;
        }
        self.particles.retain(|p| p.life > 0.0);
    }
}
