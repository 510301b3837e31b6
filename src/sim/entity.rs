//! Entity records
//!
//! Plain data for everything that lives on the play-field. Only the owning
//! subsystem creates or retires entities of its kind; anyone may read or
//! move them.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Entity category tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Obstacle,
    Currency,
    Energy,
}

/// Axis-aligned bounding box (min corner inclusive, max corner exclusive)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    /// Strict overlap test; boxes that only share an edge do not overlap
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    /// Grow the box by `margin` on every side
    pub fn inflate(&self, margin: f32) -> Self {
        Self {
            min: self.min - Vec2::splat(margin),
            max: self.max + Vec2::splat(margin),
        }
    }
}

/// Shared kinematic shape of every entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub id: u32,
    pub kind: EntityKind,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    pub active: bool,
}

impl Body {
    pub fn new(id: u32, kind: EntityKind, pos: Vec2, size: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            size,
            vel: Vec2::ZERO,
            active: true,
        }
    }

    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Advance one tick along the current velocity
    #[inline]
    pub fn integrate(&mut self) {
        self.pos += self.vel;
    }

    /// True once the body has fully left the play-field. A body resting exactly on
    /// the right edge (where the spawner places it) is still inside.
    pub fn is_outside(&self, field: Vec2) -> bool {
        self.pos.x + self.size.x <= 0.0
            || self.pos.x > field.x
            || self.pos.y + self.size.y <= 0.0
            || self.pos.y > field.y
    }
}

/// The single player-controlled entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    pub lives: u32,
    pub energy: u32,
    pub invulnerable: bool,
    pub invulnerability_ticks: u32,
    pub combo: u32,
    pub combo_ticks: u32,
}

impl Player {
    /// Fresh player vertically centred at the tuning's start column
    pub fn new(id: u32, tuning: &Tuning) -> Self {
        let size = Vec2::splat(tuning.player_size);
        let pos = Vec2::new(tuning.player_x, (tuning.field_height - size.y) / 2.0);
        Self {
            body: Body::new(id, EntityKind::Player, pos, size),
            lives: tuning.start_lives,
            energy: tuning.max_energy,
            invulnerable: false,
            invulnerability_ticks: 0,
            combo: 0,
            combo_ticks: 0,
        }
    }

    /// Keep the player fully inside the play-field
    pub fn clamp_to_field(&mut self, field: Vec2) {
        let max = (field - self.body.size).max(Vec2::ZERO);
        self.body.pos = self.body.pos.clamp(Vec2::ZERO, max);
    }
}

/// A moving hazard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub body: Body,
    /// Leftward speed in pixels per tick
    pub speed: f32,
}

impl Obstacle {
    pub fn new(id: u32, pos: Vec2, size: Vec2, speed: f32) -> Self {
        let mut body = Body::new(id, EntityKind::Obstacle, pos, size);
        body.vel = Vec2::new(-speed, 0.0);
        Self { body, speed }
    }
}

/// Collectible categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectibleKind {
    Currency,
    Energy,
}

impl CollectibleKind {
    pub fn entity_kind(&self) -> EntityKind {
        match self {
            CollectibleKind::Currency => EntityKind::Currency,
            CollectibleKind::Energy => EntityKind::Energy,
        }
    }
}

/// A pickup drifting across the field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collectible {
    pub body: Body,
    /// Points (currency) or energy restored (energy)
    pub value: u32,
}

impl Collectible {
    pub fn new(id: u32, kind: CollectibleKind, pos: Vec2, size: Vec2, speed: f32, value: u32) -> Self {
        let mut body = Body::new(id, kind.entity_kind(), pos, size);
        body.vel = Vec2::new(-speed, 0.0);
        Self { body, value }
    }

    /// Collectible category, read from the body tag set in `new`
    pub fn kind(&self) -> CollectibleKind {
        match self.body.kind {
            EntityKind::Energy => CollectibleKind::Energy,
            _ => CollectibleKind::Currency,
        }
    }
}
