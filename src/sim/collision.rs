//! Collision detection and resolution
//!
//! Broad phase is a straight AABB sweep of the single player against every
//! active obstacle and collectible. Obstacles resolve before collectibles.
//! At most one obstacle can hit per tick (the first overlapping one in id
//! order); collectibles resolve independently, so several may be gathered
//! in the same tick.

use glam::Vec2;

use super::entity::CollectibleKind;
use super::particles::ParticleCategory;
use super::state::{GameEvent, GameState};

/// Particles in an obstacle-hit explosion
pub const EXPLOSION_PARTICLES: usize = 20;
/// Particles when a collectible is gathered
pub const COLLECT_PARTICLES: usize = 10;
/// Extra particles around the player when energy is restored
pub const POWER_PARTICLES: usize = 15;

/// What the collision phase resolved this tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionSummary {
    /// Id of the obstacle that hit the player, if any
    pub obstacle_hit: Option<u32>,
    /// Ids of collectibles gathered, in id order
    pub collected: Vec<u32>,
}

/// Run the collision phase: obstacles first, then collectibles, then purge retired entities
pub fn resolve_collisions(state: &mut GameState) -> CollisionSummary {
    let summary = CollisionSummary {
        obstacle_hit: resolve_obstacle_hit(state),
        collected: resolve_collectibles(state),
    };
    state.purge_inactive();
    summary
}

fn resolve_obstacle_hit(state: &mut GameState) -> Option<u32> {
    if state.player.invulnerable {
        return None;
    }

    let player_box = state.player.body.aabb();
    let obstacle = state
        .obstacles
        .iter_mut()
        .find(|o| o.body.active && o.body.aabb().overlaps(&player_box))?;
    obstacle.body.active = false;
    let obstacle_id = obstacle.body.id;
    let center = obstacle.body.center();

    let tuning = &state.tuning;
    let player = &mut state.player;
    player.lives = player.lives.saturating_sub(1);
    player.energy = player.energy.saturating_sub(tuning.obstacle_energy_damage);
    player.invulnerable = true;
    player.invulnerability_ticks = tuning.invulnerability_ticks;
    player.combo = 0;
    player.combo_ticks = 0;
    let lives_left = player.lives;

    state.stats.obstacles_hit += 1;
    state
        .particles
        .emit(&mut state.rng, center, ParticleCategory::Explosion, EXPLOSION_PARTICLES);

    log::debug!(
        "tick {}: obstacle {obstacle_id} hit player, {lives_left} lives left",
        state.time_ticks
    );
    state.emit(GameEvent::ObstacleHit {
        obstacle_id,
        lives_left,
    });
    Some(obstacle_id)
}

fn resolve_collectibles(state: &mut GameState) -> Vec<u32> {
    let player_box = state.player.body.aabb();
    let mut collected = Vec::new();

    for i in 0..state.collectibles.len() {
        let collectible = &mut state.collectibles[i];
        if !collectible.body.active || !collectible.body.aabb().overlaps(&player_box) {
            continue;
        }
        collectible.body.active = false;
        let (id, kind, value, center) = (
            collectible.body.id,
            collectible.kind(),
            collectible.value,
            collectible.body.center(),
        );

        state
            .particles
            .emit(&mut state.rng, center, ParticleCategory::Collect, COLLECT_PARTICLES);
        state.stats.collectibles_gathered += 1;
        state.emit(GameEvent::CollectiblePicked {
            collectible_id: id,
            kind,
        });

        match kind {
            CollectibleKind::Currency => collect_currency(state, value),
            CollectibleKind::Energy => {
                let player_center = state.player.body.center();
                collect_energy(state, value, player_center);
            }
        }
        collected.push(id);
    }

    collected
}

fn collect_currency(state: &mut GameState, value: u32) {
    let points = state.tuning.combo_points(value, state.player.combo);
    state.score = state.score.saturating_add(points);

    let player = &mut state.player;
    player.combo += 1;
    player.combo_ticks = state.tuning.combo_window_ticks;
    state.stats.max_combo = state.stats.max_combo.max(player.combo);

    state.emit(GameEvent::ScoreChanged { score: state.score });
}

fn collect_energy(state: &mut GameState, value: u32, player_center: Vec2) {
    let player = &mut state.player;
    player.energy = player.energy.saturating_add(value).min(state.tuning.max_energy);
    let energy = player.energy;

    state
        .particles
        .emit(&mut state.rng, player_center, ParticleCategory::Power, POWER_PARTICLES);
    state.emit(GameEvent::EnergyRestored { energy });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{Collectible, Obstacle};
    use crate::tuning::Tuning;

    fn state() -> GameState {
        GameState::new(1, Tuning::default())
    }

    /// Obstacle sitting exactly on the player
    fn obstacle_on_player(state: &mut GameState) -> u32 {
        let id = state.next_entity_id();
        let pos = state.player.body.pos;
        state.obstacles.push(Obstacle::new(id, pos, Vec2::splat(30.0), 2.0));
        id
    }

    fn collectible_on_player(state: &mut GameState, kind: CollectibleKind, value: u32) -> u32 {
        let id = state.next_entity_id();
        let pos = state.player.body.pos + Vec2::splat(5.0);
        state
            .collectibles
            .push(Collectible::new(id, kind, pos, Vec2::splat(20.0), 2.0, value));
        id
    }

    #[test]
    fn test_obstacle_hit_applies_damage() {
        let mut state = state();
        let id = obstacle_on_player(&mut state);

        let summary = resolve_collisions(&mut state);
        assert_eq!(summary.obstacle_hit, Some(id));
        assert_eq!(state.player.lives, 2);
        assert_eq!(state.player.energy, 75);
        assert_eq!(state.player.combo, 0);
        assert!(state.player.invulnerable);
        assert_eq!(state.player.invulnerability_ticks, 120);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.particles.len(), EXPLOSION_PARTICLES);
    }

    #[test]
    fn test_invulnerable_player_ignores_obstacles() {
        let mut state = state();
        state.player.invulnerable = true;
        state.player.invulnerability_ticks = 10;
        obstacle_on_player(&mut state);

        let summary = resolve_collisions(&mut state);
        assert_eq!(summary.obstacle_hit, None);
        assert_eq!(state.player.lives, 3);
        // Ignored obstacles stay on the field
        assert_eq!(state.obstacles.len(), 1);
    }

    #[test]
    fn test_only_first_obstacle_hits() {
        let mut state = state();
        let first = obstacle_on_player(&mut state);
        obstacle_on_player(&mut state);

        let summary = resolve_collisions(&mut state);
        assert_eq!(summary.obstacle_hit, Some(first));
        assert_eq!(state.player.lives, 2);
        assert_eq!(state.obstacles.len(), 1);
    }

    #[test]
    fn test_inactive_entities_are_skipped() {
        let mut state = state();
        obstacle_on_player(&mut state);
        state.obstacles[0].body.active = false;
        collectible_on_player(&mut state, CollectibleKind::Currency, 10);
        state.collectibles[0].body.active = false;

        let summary = resolve_collisions(&mut state);
        assert_eq!(summary, CollisionSummary::default());
        assert_eq!(state.player.lives, 3);
        assert_eq!(state.score, 0);
        assert_eq!(state.entity_count(), 0);
    }

    #[test]
    fn test_energy_clamped_and_lives_floor() {
        let mut state = state();
        state.player.lives = 1;
        state.player.energy = 10;
        obstacle_on_player(&mut state);
        resolve_collisions(&mut state);
        assert_eq!(state.player.lives, 0);
        assert_eq!(state.player.energy, 0);

        state.player.energy = 95;
        collectible_on_player(&mut state, CollectibleKind::Energy, 20);
        resolve_collisions(&mut state);
        assert_eq!(state.player.energy, 100);
    }

    #[test]
    fn test_multiple_collectibles_same_tick() {
        let mut state = state();
        for _ in 0..3 {
            collectible_on_player(&mut state, CollectibleKind::Currency, 10);
        }

        let summary = resolve_collisions(&mut state);
        assert_eq!(summary.collected.len(), 3);
        assert_eq!(state.score, 10 + 12 + 14);
        assert_eq!(state.player.combo, 3);
        assert_eq!(state.player.combo_ticks, state.tuning.combo_window_ticks);
        assert_eq!(state.stats.max_combo, 3);
        assert!(state.collectibles.is_empty());
    }

    #[test]
    fn test_hit_resets_combo_before_same_tick_pickup() {
        let mut state = state();
        state.player.combo = 3;
        state.player.combo_ticks = 200;
        let obstacle = obstacle_on_player(&mut state);
        let coin = collectible_on_player(&mut state, CollectibleKind::Currency, 10);

        let summary = resolve_collisions(&mut state);
        assert_eq!(summary.obstacle_hit, Some(obstacle));
        assert_eq!(summary.collected, vec![coin]);
        // Base value only: the hit cleared the x3 combo first
        assert_eq!(state.score, 10);
        assert_eq!(state.player.combo, 1);
        assert_eq!(state.player.lives, 2);

        let events = state.drain_events();
        let hit = events
            .iter()
            .position(|e| matches!(e, GameEvent::ObstacleHit { .. }));
        let scored = events
            .iter()
            .position(|e| matches!(e, GameEvent::ScoreChanged { score: 10 }));
        assert!(hit.is_some() && scored.is_some() && hit < scored);
    }

    #[test]
    fn test_collectibles_apply_while_invulnerable() {
        let mut state = state();
        state.player.invulnerable = true;
        state.player.invulnerability_ticks = 50;
        state.player.energy = 50;
        collectible_on_player(&mut state, CollectibleKind::Energy, 20);

        resolve_collisions(&mut state);
        assert_eq!(state.player.energy, 70);
        assert_eq!(state.score, 0);
        assert_eq!(state.player.combo, 0);
        assert_eq!(state.particles.len(), COLLECT_PARTICLES + POWER_PARTICLES);
        assert!(state
            .drain_events()
            .contains(&GameEvent::EnergyRestored { energy: 70 }));
    }
}
