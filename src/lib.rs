//! Asteroid Dodge - steer a spaceship through a falling asteroid field
//!
//! Core modules:
//! - `sim`: Simulation core (entities, spawning, difficulty, collisions, tick)
//! - `game`: Lifecycle manager driving the tick schedule
//! - `platform`: Host collaborators (clock, scheduler, input, scene, HUD)
//! - `settings`: Player preferences and key bindings
//! - `highscores`: Local leaderboard

pub mod game;
pub mod highscores;
pub mod platform;
pub mod settings;
pub mod sim;

pub use game::Game;
pub use highscores::HighScores;
pub use settings::{KeyBindings, Settings, SettingsError};

/// Game configuration constants
pub mod consts {
    use glam::Vec3;

    /// Horizontal limit for the ship (symmetric, world units)
    pub const PLAYER_BOUND: f32 = 8.0;
    /// Horizontal ship movement per tick
    pub const PLAYER_SPEED: f32 = 0.15;
    /// Tilt added per tick while steering (radians)
    pub const PLAYER_TILT_STEP: f32 = 0.05;
    /// Maximum tilt in either direction (radians)
    pub const PLAYER_MAX_TILT: f32 = 0.3;
    /// Per-tick tilt decay factor when idle
    pub const PLAYER_TILT_DECAY: f32 = 0.9;
    /// Ship start position
    pub const PLAYER_START: Vec3 = Vec3::new(0.0, -6.0, 0.0);
    /// Ship hull half extents (width, height, length)
    pub const PLAYER_HALF_EXTENTS: Vec3 = Vec3::new(0.6, 0.3, 0.9);

    /// Spawn height for new asteroids (above the visible area)
    pub const SPAWN_HEIGHT: f32 = 15.0;
    /// Horizontal spawn range (symmetric)
    pub const SPAWN_X_RANGE: f32 = 8.0;
    /// Depth spawn range (symmetric)
    pub const SPAWN_Z_RANGE: f32 = 2.5;
    /// Asteroid radius range
    pub const ASTEROID_MIN_SIZE: f32 = 0.3;
    pub const ASTEROID_MAX_SIZE: f32 = 0.8;
    /// Asteroid fall speed range (units per tick at game speed 1)
    pub const ASTEROID_MIN_SPEED: f32 = 0.05;
    pub const ASTEROID_MAX_SPEED: f32 = 0.15;
    /// Per-axis spin range (radians per tick at game speed 1)
    pub const ASTEROID_MAX_SPIN: f32 = 0.05;
    /// Asteroid hue range in degrees (brown to orange)
    pub const ASTEROID_MIN_HUE: f32 = 20.0;
    pub const ASTEROID_MAX_HUE: f32 = 80.0;
    pub const ASTEROID_SATURATION: f32 = 0.6;
    pub const ASTEROID_LIGHTNESS: f32 = 0.4;
    /// Asteroids below this height are removed (strictly below)
    pub const DESPAWN_HEIGHT: f32 = -20.0;

    /// Milliseconds per score point
    pub const SCORE_INTERVAL_MS: f64 = 100.0;
    /// Default threshold for the center-distance collision test
    pub const DEFAULT_COLLISION_DISTANCE: f32 = 1.5;
}
