//! Asteroid spawning
//!
//! Spawns at most one asteroid per tick, once more than the current spawn
//! interval has passed since the previous one.

use std::f32::consts::PI;

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::{EntityId, Hsl, Obstacle};
use crate::consts::*;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spawner {
    /// Timestamp (ms) of the last spawn, or of the run start
    pub last_spawn_ms: f64,
}

impl Spawner {
    pub fn new(now_ms: f64) -> Self {
        Self {
            last_spawn_ms: now_ms,
        }
    }

    /// Strictly more than `interval_ms` since the last spawn
    pub fn is_due(&self, now_ms: f64, interval_ms: f64) -> bool {
        now_ms - self.last_spawn_ms > interval_ms
    }

    /// Roll a new asteroid and restart the spawn timer
    pub fn spawn<R: Rng>(&mut self, rng: &mut R, id: EntityId, now_ms: f64) -> Obstacle {
        self.last_spawn_ms = now_ms;
        roll_obstacle(rng, id)
    }
}

/// Create an asteroid above the field with randomized size, fall speed,
/// spin, position, color and initial rotation
pub fn roll_obstacle<R: Rng>(rng: &mut R, id: EntityId) -> Obstacle {
    let size = rng.random_range(ASTEROID_MIN_SIZE..=ASTEROID_MAX_SIZE);
    let speed = rng.random_range(ASTEROID_MIN_SPEED..=ASTEROID_MAX_SPEED);
    let spin = Vec3::new(
        rng.random_range(-ASTEROID_MAX_SPIN..=ASTEROID_MAX_SPIN),
        rng.random_range(-ASTEROID_MAX_SPIN..=ASTEROID_MAX_SPIN),
        rng.random_range(-ASTEROID_MAX_SPIN..=ASTEROID_MAX_SPIN),
    );
    let pos = Vec3::new(
        rng.random_range(-SPAWN_X_RANGE..=SPAWN_X_RANGE),
        SPAWN_HEIGHT,
        rng.random_range(-SPAWN_Z_RANGE..=SPAWN_Z_RANGE),
    );
    let hue = rng.random_range(ASTEROID_MIN_HUE..=ASTEROID_MAX_HUE);
    let rotation = Vec3::new(
        rng.random_range(0.0..=PI),
        rng.random_range(0.0..=PI),
        rng.random_range(0.0..=PI),
    );

    Obstacle {
        id,
        pos,
        rotation,
        size,
        speed,
        spin,
        color: Hsl::new(hue, ASTEROID_SATURATION, ASTEROID_LIGHTNESS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_due_is_strict() {
        let spawner = Spawner::new(1000.0);
        assert!(!spawner.is_due(2000.0, 1000.0));
        assert!(spawner.is_due(2000.5, 1000.0));
    }

    #[test]
    fn test_spawn_resets_timer() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut spawner = Spawner::new(0.0);
        let rock = spawner.spawn(&mut rng, 5, 1200.0);
        assert_eq!(rock.id, 5);
        assert_eq!(spawner.last_spawn_ms, 1200.0);
        assert!(!spawner.is_due(1500.0, 1000.0));
    }

    #[test]
    fn test_rolled_values_within_ranges() {
        let mut rng = Pcg32::seed_from_u64(42);
        for id in 0..500 {
            let rock = roll_obstacle(&mut rng, id);
            assert!((ASTEROID_MIN_SIZE..=ASTEROID_MAX_SIZE).contains(&rock.size));
            assert!((ASTEROID_MIN_SPEED..=ASTEROID_MAX_SPEED).contains(&rock.speed));
            assert!(rock.spin.abs().max_element() <= ASTEROID_MAX_SPIN);
            assert!(rock.pos.x.abs() <= SPAWN_X_RANGE);
            assert!(rock.pos.z.abs() <= SPAWN_Z_RANGE);
            assert_eq!(rock.pos.y, SPAWN_HEIGHT);
            assert!((ASTEROID_MIN_HUE..=ASTEROID_MAX_HUE).contains(&rock.color.hue));
            assert_eq!(rock.color.saturation, ASTEROID_SATURATION);
            assert!(rock.rotation.min_element() >= 0.0 && rock.rotation.max_element() <= PI);
        }
    }

    #[test]
    fn test_same_seed_same_rocks() {
        let mut a = Pcg32::seed_from_u64(7);
        let mut b = Pcg32::seed_from_u64(7);
        for id in 0..20 {
            assert_eq!(roll_obstacle(&mut a, id), roll_obstacle(&mut b, id));
        }
    }
}
