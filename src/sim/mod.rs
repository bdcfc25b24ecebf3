//! Simulation core
//!
//! All gameplay logic lives here. This module must stay platform-free:
//! - Time arrives as wall-clock milliseconds passed into `tick`
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod difficulty;
pub mod entity;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{Aabb, boxes_intersect, entities_collide, within_distance};
pub use difficulty::Difficulty;
pub use entity::{Collider, EntityId, Hsl, Obstacle, Player, Steer};
pub use spawner::Spawner;
pub use state::{GamePhase, RunSummary, SimEvent, SimulationState};
pub use tick::{TickInput, tick};
