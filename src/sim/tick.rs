//! Fixed timestep simulation tick
//!
//! Every tick runs the same phases in the same order. Reordering them changes
//! which collisions happen and what they score, so the order is part of the
//! engine's contract:
//!
//! 1. input integration: player velocity from held directions, then every
//!    entity moves one step; entities that left the field are purged
//! 2. spawn: new obstacles/collectibles enter at the right edge (they do not
//!    move until the next tick)
//! 3. timers: invulnerability, combo decay, speed ramp, level
//! 4. collisions: obstacles before collectibles; retired entities purged
//! 5. particles: integrate and retire
//! 6. scene assembly
//! 7. termination check (`lives == 0`)

use glam::Vec2;

use super::collision;
use super::progression;
use super::spawner;
use super::state::{GameEvent, GamePhase, GameState};
use crate::scene::Scene;

/// Directional intents held during a tick. Opposite directions cancel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl TickInput {
    /// Unnormalized direction, each axis in {-1, 0, 1} (y grows downward)
    pub fn direction(&self) -> Vec2 {
        let axis = |neg: bool, pos: bool| pos as i8 as f32 - neg as i8 as f32;
        Vec2::new(axis(self.left, self.right), axis(self.up, self.down))
    }
}

/// Whether the loop should schedule another tick
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    GameOver,
}

/// Advance the game state by one fixed tick and rebuild `scene`
pub fn tick(state: &mut GameState, input: &TickInput, scene: &mut Scene) -> TickOutcome {
    if state.is_over() {
        return TickOutcome::GameOver;
    }

    state.time_ticks += 1;

    integrate(state, input);
    spawner::spawn(state);
    progression::advance_timers(state);
    let collisions = collision::resolve_collisions(state);
    if !collisions.collected.is_empty() {
        log::debug!(
            "tick {}: gathered {:?}, score {}",
            state.time_ticks,
            collisions.collected,
            state.score
        );
    }
    state.particles.advance(&state.tuning);
    scene.rebuild(state);

    if state.player.lives == 0 {
        state.phase = GamePhase::GameOver;
        log::info!(
            "Game over at tick {} with score {}",
            state.time_ticks,
            state.score
        );
        state.emit(GameEvent::GameOver { score: state.score });
        return TickOutcome::GameOver;
    }

    TickOutcome::Continue
}

fn integrate(state: &mut GameState, input: &TickInput) {
    let field = state.field();

    let player = &mut state.player;
    player.body.vel = input.direction() * state.tuning.player_speed;
    player.body.integrate();
    player.clamp_to_field(field);

    // Trail leaves from the player's trailing (left) edge
    let trail_origin = Vec2::new(player.body.pos.x, player.body.center().y);
    state
        .particles
        .emit_trail(&mut state.rng, trail_origin, &state.tuning);

    for obstacle in state.obstacles.iter_mut() {
        obstacle.body.integrate();
        if obstacle.body.is_outside(field) {
            obstacle.body.active = false;
        }
    }
    for collectible in state.collectibles.iter_mut() {
        collectible.body.integrate();
        if collectible.body.is_outside(field) {
            collectible.body.active = false;
        }
    }
    state.purge_inactive();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::Obstacle;
    use crate::tuning::Tuning;

    /// Tuning with spawning switched off so tests place entities by hand
    fn manual_tuning() -> Tuning {
        Tuning {
            collectible_chance: 0.0,
            obstacle_base_interval: u32::MAX,
            obstacle_min_interval: u32::MAX,
            ..Tuning::default()
        }
    }

    #[test]
    fn test_input_direction_cancels() {
        let input = TickInput {
            left: true,
            right: true,
            down: true,
            ..Default::default()
        };
        assert_eq!(input.direction(), Vec2::new(0.0, 1.0));
    }

    #[test]
    fn test_player_moves_with_input() {
        let mut state = GameState::new(1, manual_tuning());
        let mut scene = Scene::new();
        let start = state.player.body.pos;
        let input = TickInput {
            right: true,
            up: true,
            ..Default::default()
        };

        let _ = tick(&mut state, &input, &mut scene);
        assert_eq!(state.player.body.pos, start + Vec2::new(5.0, -5.0));

        let _ = tick(&mut state, &TickInput::default(), &mut scene);
        assert_eq!(state.player.body.pos, start + Vec2::new(5.0, -5.0));
        assert_eq!(state.player.body.vel, Vec2::ZERO);
    }

    #[test]
    fn test_obstacle_moving_into_player_hits_same_tick() {
        let mut state = GameState::new(1, manual_tuning());
        let mut scene = Scene::new();
        // Right edge of the player box, one step away
        let player_right = state.player.body.pos.x + state.player.body.size.x;
        let id = state.next_entity_id();
        state.obstacles.push(Obstacle::new(
            id,
            Vec2::new(player_right + 1.0, state.player.body.pos.y),
            Vec2::splat(30.0),
            2.0,
        ));

        let _ = tick(&mut state, &TickInput::default(), &mut scene);
        assert_eq!(state.player.lives, 2);
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_offscreen_entities_purged() {
        let mut state = GameState::new(1, manual_tuning());
        let mut scene = Scene::new();
        let id = state.next_entity_id();
        state
            .obstacles
            .push(Obstacle::new(id, Vec2::new(-29.0, 10.0), Vec2::splat(30.0), 2.0));

        let _ = tick(&mut state, &TickInput::default(), &mut scene);
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_second_hit_exactly_after_window() {
        let mut state = GameState::new(1, manual_tuning());
        let mut scene = Scene::new();
        let window = state.tuning.invulnerability_ticks;
        let pos = state.player.body.pos;

        let id = state.next_entity_id();
        state.obstacles.push(Obstacle::new(id, pos, Vec2::splat(30.0), 0.0));
        let _ = tick(&mut state, &TickInput::default(), &mut scene);
        assert_eq!(state.player.lives, 2);

        // A stationary obstacle parked on the player
        let id = state.next_entity_id();
        state.obstacles.push(Obstacle::new(id, pos, Vec2::splat(30.0), 0.0));
        for _ in 1..window {
            let _ = tick(&mut state, &TickInput::default(), &mut scene);
            assert_eq!(state.player.lives, 2);
        }
        let _ = tick(&mut state, &TickInput::default(), &mut scene);
        assert_eq!(state.player.lives, 1);
    }

    #[test]
    fn test_game_over_freezes_state() {
        let mut state = GameState::new(1, manual_tuning());
        let mut scene = Scene::new();
        state.player.lives = 1;
        let id = state.next_entity_id();
        let pos = state.player.body.pos;
        state.obstacles.push(Obstacle::new(id, pos, Vec2::splat(30.0), 0.0));

        assert_eq!(
            tick(&mut state, &TickInput::default(), &mut scene),
            TickOutcome::GameOver
        );
        assert_eq!(state.phase, GamePhase::GameOver);
        let ticks = state.time_ticks;
        assert_eq!(
            tick(&mut state, &TickInput::default(), &mut scene),
            TickOutcome::GameOver
        );
        assert_eq!(state.time_ticks, ticks);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = GameState::new(99999, Tuning::default());
        let mut state2 = GameState::new(99999, Tuning::default());
        let mut scene1 = Scene::new();
        let mut scene2 = Scene::new();

        for i in 0..1500u32 {
            let input = TickInput {
                up: i % 90 < 30,
                down: i % 90 >= 60,
                right: i % 400 < 100,
                left: i % 400 >= 300,
            };
            let a = tick(&mut state1, &input, &mut scene1);
            let b = tick(&mut state2, &input, &mut scene2);
            assert_eq!(a, b);
            assert_eq!(state1.score, state2.score);
            assert_eq!(state1.player.lives, state2.player.lives);
            assert_eq!(state1.obstacles, state2.obstacles);
            assert_eq!(state1.collectibles, state2.collectibles);
            assert_eq!(scene1, scene2);
        }
        assert_eq!(state1.time_ticks, state2.time_ticks);
    }
}
