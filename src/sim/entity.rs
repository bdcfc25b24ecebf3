//! Simulated entities: the player's ship and the falling asteroids

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::consts::*;

/// Stable identity for scene bookkeeping
pub type EntityId = u32;

/// Anything with a spatial volume that can take part in a collision test.
///
/// Bounds are always derived from the current position, never stored.
pub trait Collider {
    fn center(&self) -> Vec3;
    fn half_extents(&self) -> Vec3;

    fn bounds(&self) -> Aabb {
        Aabb::from_center(self.center(), self.half_extents())
    }
}

/// Horizontal steering intent for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Steer {
    Left,
    Right,
    #[default]
    Idle,
}

impl Steer {
    /// Resolve held directions. Left wins when both are held.
    pub fn from_held(left: bool, right: bool) -> Self {
        if left {
            Steer::Left
        } else if right {
            Steer::Right
        } else {
            Steer::Idle
        }
    }
}

/// The player's ship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: EntityId,
    pub pos: Vec3,
    /// Euler angles (radians); z carries the banking tilt
    pub rotation: Vec3,
    /// Horizontal movement per tick
    pub speed: f32,
}

impl Player {
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            pos: PLAYER_START,
            rotation: Vec3::ZERO,
            speed: PLAYER_SPEED,
        }
    }

    /// Move back to the start pose (used on reset, identity is kept)
    pub fn reposition(&mut self) {
        self.pos = PLAYER_START;
        self.rotation = Vec3::ZERO;
    }

    pub fn tilt(&self) -> f32 {
        self.rotation.z
    }

    /// Apply one tick of steering, clamp to the lane and bank the hull
    pub fn update(&mut self, steer: Steer) {
        match steer {
            Steer::Left => {
                self.pos.x -= self.speed;
                self.rotation.z = (self.rotation.z + PLAYER_TILT_STEP).min(PLAYER_MAX_TILT);
            }
            Steer::Right => {
                self.pos.x += self.speed;
                self.rotation.z = (self.rotation.z - PLAYER_TILT_STEP).max(-PLAYER_MAX_TILT);
            }
            Steer::Idle => {
                self.rotation.z *= PLAYER_TILT_DECAY;
            }
        }
        self.pos.x = self.pos.x.clamp(-PLAYER_BOUND, PLAYER_BOUND);
    }
}

impl Collider for Player {
    fn center(&self) -> Vec3 {
        self.pos
    }

    fn half_extents(&self) -> Vec3 {
        PLAYER_HALF_EXTENTS
    }
}

/// Color in HSL space (hue in degrees, saturation/lightness 0-1)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsl {
    pub hue: f32,
    pub saturation: f32,
    pub lightness: f32,
}

impl Hsl {
    pub fn new(hue: f32, saturation: f32, lightness: f32) -> Self {
        Self {
            hue,
            saturation,
            lightness,
        }
    }

    /// CSS color string, e.g. `hsl(40, 60%, 40%)`
    pub fn to_css(&self) -> String {
        format!(
            "hsl({:.0}, {:.0}%, {:.0}%)",
            self.hue,
            self.saturation * 100.0,
            self.lightness * 100.0
        )
    }
}

/// A falling asteroid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: EntityId,
    pub pos: Vec3,
    pub rotation: Vec3,
    /// Radius of the rock
    pub size: f32,
    /// Fall distance per tick at game speed 1 (fixed at creation)
    pub speed: f32,
    /// Per-axis spin per tick at game speed 1 (fixed at creation)
    pub spin: Vec3,
    pub color: Hsl,
}

impl Obstacle {
    /// Advance one tick: fall and tumble, both scaled by `speed_multiplier`
    pub fn update(&mut self, speed_multiplier: f32) {
        self.pos.y -= self.speed * speed_multiplier;
        self.rotation += self.spin * speed_multiplier;
    }

    /// True once the rock has dropped strictly below the despawn line
    pub fn is_below_field(&self) -> bool {
        self.pos.y < DESPAWN_HEIGHT
    }
}

impl Collider for Obstacle {
    fn center(&self) -> Vec3 {
        self.pos
    }

    fn half_extents(&self) -> Vec3 {
        Vec3::splat(self.size)
    }
}
