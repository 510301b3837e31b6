//! Obstacle and collectible spawning
//!
//! Obstacles are time-gated: one appears once the ticks since the previous
//! obstacle exceed an interval that shrinks with level. Collectibles roll a
//! fixed chance every tick. Both enter at the right edge and never inside
//! the player's safety zone.

use glam::Vec2;
use rand::Rng;

use super::entity::{Aabb, Collectible, CollectibleKind, Obstacle};
use super::state::GameState;
use crate::tuning::Tuning;

/// Placement retries before a spawn is skipped for this tick
const SPAWN_ATTEMPTS: usize = 4;

/// Obstacle spawn gate; collectibles roll independently every tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Spawner {
    /// Tick of the most recent obstacle spawn
    pub last_obstacle_tick: u64,
}

impl Spawner {
    /// Whether the obstacle gate is open at `now` for the given level
    pub fn obstacle_due(&self, now: u64, level: u32, tuning: &Tuning) -> bool {
        now.saturating_sub(self.last_obstacle_tick) > tuning.obstacle_interval(level) as u64
    }
}

/// Run the spawn phase of a tick
pub fn spawn(state: &mut GameState) {
    let now = state.time_ticks;

    if state.spawner.obstacle_due(now, state.level, &state.tuning) {
        if let Some(id) = spawn_obstacle(state) {
            state.spawner.last_obstacle_tick = now;
            log::debug!("tick {now}: spawned obstacle {id}");
        } else {
            log::debug!("tick {now}: obstacle spawn blocked by safety zone");
        }
    }

    if state.rng.random_bool(state.tuning.collectible_chance) {
        if let Some(id) = spawn_collectible(state) {
            log::debug!("tick {now}: spawned collectible {id}");
        }
    }
}

/// Zone around the player that spawns must stay clear of
fn safety_zone(state: &GameState) -> Aabb {
    state.player.body.aabb().inflate(state.tuning.safety_zone)
}

/// Uniform top edge for an entity of `height` inside the margin band
fn random_top<R: Rng + ?Sized>(rng: &mut R, tuning: &Tuning, height: f32) -> f32 {
    let low = tuning.spawn_margin;
    let high = (tuning.field_height - height - tuning.spawn_margin).max(low);
    rng.random_range(low..=high)
}

fn spawn_obstacle(state: &mut GameState) -> Option<u32> {
    let zone = safety_zone(state);
    let tuning = &state.tuning;
    let rng = &mut state.rng;
    let level_bonus = tuning.obstacle_level_speed_bonus * state.level.saturating_sub(1) as f32;

    for _ in 0..SPAWN_ATTEMPTS {
        let size = Vec2::new(
            rng.random_range(tuning.obstacle_min_size..=tuning.obstacle_max_size),
            rng.random_range(tuning.obstacle_min_size..=tuning.obstacle_max_size),
        );
        let pos = Vec2::new(tuning.field_width, random_top(rng, tuning, size.y));
        let speed = state.game_speed + rng.random_range(0.0..=tuning.obstacle_speed_jitter) + level_bonus;

        if Aabb::new(pos, size).overlaps(&zone) {
            continue;
        }

        let id = state.next_entity_id();
        state.obstacles.push(Obstacle::new(id, pos, size, speed));
        return Some(id);
    }
    None
}

fn spawn_collectible(state: &mut GameState) -> Option<u32> {
    let zone = safety_zone(state);
    let tuning = &state.tuning;
    let rng = &mut state.rng;

    let (kind, value) = if rng.random_bool(tuning.energy_share) {
        (CollectibleKind::Energy, tuning.energy_restore)
    } else {
        (CollectibleKind::Currency, tuning.currency_value)
    };
    let size = Vec2::splat(tuning.collectible_size);

    for _ in 0..SPAWN_ATTEMPTS {
        let pos = Vec2::new(tuning.field_width, random_top(rng, tuning, size.y));
        if Aabb::new(pos, size).overlaps(&zone) {
            continue;
        }

        let speed = state.game_speed;
        let id = state.next_entity_id();
        state
            .collectibles
            .push(Collectible::new(id, kind, pos, size, speed, value));
        return Some(id);
    }
    None
}
