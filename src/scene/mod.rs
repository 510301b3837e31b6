//! Scene description
//!
//! Once per tick the simulation flattens every active entity and particle
//! into a list of `SceneItem`s. Drawing is left to the host.

pub mod instance;

pub use instance::{DrawKind, SceneItem, colors};

use crate::sim::GameState;
use crate::sim::entity::Body;

/// Ticks per half-period of the invulnerability blink
const BLINK_PERIOD: u32 = 8;

/// Drawable snapshot of one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    /// Tick this scene was assembled on
    pub tick: u64,
    /// Items in draw order: collectibles, obstacles, player, particles
    pub items: Vec<SceneItem>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from state, reusing the item allocation
    pub fn rebuild(&mut self, state: &GameState) {
        self.tick = state.time_ticks;
        self.items.clear();
        self.items
            .reserve(state.entity_count() + state.particles.len() + 1);

        for collectible in state.collectibles.iter().filter(|c| c.body.active) {
            let color = match DrawKind::from(collectible.body.kind) {
                DrawKind::Energy => colors::ENERGY,
                _ => colors::CURRENCY,
            };
            self.items.push(body_item(&collectible.body, color));
        }

        for obstacle in state.obstacles.iter().filter(|o| o.body.active) {
            self.items.push(body_item(&obstacle.body, colors::OBSTACLE));
        }

        let player = &state.player;
        let mut color = colors::PLAYER;
        if player.invulnerable && (player.invulnerability_ticks / BLINK_PERIOD) % 2 == 1 {
            color[3] = colors::BLINK_ALPHA;
        }
        self.items.push(body_item(&player.body, color));

        for particle in state.particles.particles() {
            let [r, g, b] = particle.color;
            let half = particle.size * 0.5;
            self.items.push(SceneItem {
                position: [particle.pos.x - half, particle.pos.y - half],
                size: [particle.size, particle.size],
                color: [r, g, b, particle.life_fraction()],
                kind: DrawKind::Particle as u32,
                category: instance::particle_category_index(particle.category),
            });
        }
    }

    /// Raw bytes for an instance buffer upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.items)
    }

    pub fn count(&self, kind: DrawKind) -> usize {
        self.items
            .iter()
            .filter(|item| item.kind == kind as u32)
            .count()
    }
}

fn body_item(body: &Body, color: [f32; 4]) -> SceneItem {
    SceneItem::new(
        DrawKind::from(body.kind),
        body.pos.to_array(),
        body.size.to_array(),
        color,
    )
}
