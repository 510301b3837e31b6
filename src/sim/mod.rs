//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only, time measured in ticks
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No host, rendering or platform dependencies

pub mod collision;
pub mod entity;
pub mod particles;
pub mod progression;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{CollisionSummary, resolve_collisions};
pub use entity::{Aabb, Body, Collectible, CollectibleKind, EntityKind, Obstacle, Player};
pub use particles::{Particle, ParticleCategory, ParticleSystem};
pub use progression::Achievement;
pub use spawner::Spawner;
pub use state::{GameEvent, GamePhase, GameState, SessionReport, SessionStats};
pub use tick::{TickInput, TickOutcome, tick};
