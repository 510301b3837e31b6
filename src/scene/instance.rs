//! Instance records for the host renderer

use bytemuck::{Pod, Zeroable};

use crate::sim::entity::EntityKind;
use crate::sim::particles::ParticleCategory;

/// What a scene item depicts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum DrawKind {
    Player = 0,
    Obstacle = 1,
    Currency = 2,
    Energy = 3,
    Particle = 4,
}

impl DrawKind {
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(DrawKind::Player),
            1 => Some(DrawKind::Obstacle),
            2 => Some(DrawKind::Currency),
            3 => Some(DrawKind::Energy),
            4 => Some(DrawKind::Particle),
            _ => None,
        }
    }
}

impl From<EntityKind> for DrawKind {
    fn from(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Player => DrawKind::Player,
            EntityKind::Obstacle => DrawKind::Obstacle,
            EntityKind::Currency => DrawKind::Currency,
            EntityKind::Energy => DrawKind::Energy,
        }
    }
}

/// Visual sub-category index stored in `SceneItem::category`
pub fn particle_category_index(category: ParticleCategory) -> u32 {
    match category {
        ParticleCategory::Explosion => 0,
        ParticleCategory::Collect => 1,
        ParticleCategory::Power => 2,
        ParticleCategory::Trail => 3,
    }
}

/// One drawable rectangle, laid out for direct upload as an instance buffer
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SceneItem {
    /// Top-left corner in play-field pixels
    pub position: [f32; 2],
    pub size: [f32; 2],
    pub color: [f32; 4],
    /// `DrawKind` discriminant
    pub kind: u32,
    /// Particle category index, 0 for entities
    pub category: u32,
}

impl SceneItem {
    pub fn new(kind: DrawKind, position: [f32; 2], size: [f32; 2], color: [f32; 4]) -> Self {
        Self {
            position,
            size,
            color,
            kind: kind as u32,
            category: 0,
        }
    }

    pub fn draw_kind(&self) -> Option<DrawKind> {
        DrawKind::from_u32(self.kind)
    }
}

/// Colors for game elements
pub mod colors {
    pub const PLAYER: [f32; 4] = [0.0, 0.83, 1.0, 1.0];
    pub const OBSTACLE: [f32; 4] = [1.0, 0.27, 0.27, 1.0];
    pub const CURRENCY: [f32; 4] = [1.0, 0.84, 0.0, 1.0];
    pub const ENERGY: [f32; 4] = [0.0, 1.0, 0.53, 1.0];
    /// Player alpha on the "off" beat of the invulnerability blink
    pub const BLINK_ALPHA: f32 = 0.35;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_layout_has_no_padding() {
        assert_eq!(std::mem::size_of::<SceneItem>(), 40);
        let item = SceneItem::new(DrawKind::Energy, [1.0, 2.0], [3.0, 4.0], colors::ENERGY);
        let bytes: &[u8] = bytemuck::bytes_of(&item);
        assert_eq!(bytes.len(), 40);
        assert_eq!(item.draw_kind(), Some(DrawKind::Energy));
    }
}
