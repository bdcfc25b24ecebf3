//! Difficulty curve derived from elapsed run time

use serde::{Deserialize, Serialize};

/// Milliseconds for the game speed to gain +1x
const GAME_SPEED_RAMP_MS: f64 = 30_000.0;
/// Milliseconds for the obstacle speed multiplier to gain +1x
const OBSTACLE_SPEED_RAMP_MS: f64 = 60_000.0;
/// Spawn interval at the start of a run
pub const BASE_SPAWN_INTERVAL_MS: f64 = 1000.0;
/// Spawn interval never drops below this
pub const MIN_SPAWN_INTERVAL_MS: f64 = 300.0;
/// Spawn interval shrinks by 1ms every this many elapsed ms
const SPAWN_INTERVAL_DIVISOR: f64 = 50.0;

/// Difficulty parameters for a point in a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    /// Multiplier applied to obstacle fall and spin each tick
    pub game_speed: f32,
    /// Minimum gap between spawns
    pub spawn_interval_ms: f64,
    /// Slower ramp tracked alongside game speed. Obstacle motion is driven
    /// by `game_speed`; this value is exposed for presentation only.
    pub obstacle_speed_multiplier: f32,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::at(0.0)
    }
}

impl Difficulty {
    /// Difficulty after `elapsed_ms` of running time. Negative input is
    /// treated as zero.
    pub fn at(elapsed_ms: f64) -> Self {
        let t = elapsed_ms.max(0.0);
        Self {
            game_speed: (1.0 + t / GAME_SPEED_RAMP_MS) as f32,
            spawn_interval_ms: (BASE_SPAWN_INTERVAL_MS - t / SPAWN_INTERVAL_DIVISOR)
                .max(MIN_SPAWN_INTERVAL_MS),
            obstacle_speed_multiplier: (1.0 + t / OBSTACLE_SPEED_RAMP_MS) as f32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_start_of_run() {
        let d = Difficulty::at(0.0);
        assert_eq!(d.game_speed, 1.0);
        assert_eq!(d.spawn_interval_ms, 1000.0);
        assert_eq!(d.obstacle_speed_multiplier, 1.0);
        assert_eq!(Difficulty::default(), d);
    }

    #[test]
    fn test_reference_points() {
        assert_eq!(Difficulty::at(30_000.0).game_speed, 2.0);
        assert_eq!(Difficulty::at(60_000.0).game_speed, 3.0);
        assert_eq!(Difficulty::at(60_000.0).obstacle_speed_multiplier, 2.0);
        assert_eq!(Difficulty::at(35_000.0).spawn_interval_ms, 300.0);
        assert_eq!(Difficulty::at(100_000.0).spawn_interval_ms, 300.0);

        let d = Difficulty::at(35_000.0);
        assert!((d.game_speed - 2.1667).abs() < 1e-3);
    }

    #[test]
    fn test_interval_ramp() {
        assert_eq!(Difficulty::at(5_000.0).spawn_interval_ms, 900.0);
        assert_eq!(Difficulty::at(20_000.0).spawn_interval_ms, 600.0);
    }

    proptest! {
        #[test]
        fn prop_difficulty_monotonic(a in 0.0f64..1_000_000.0, b in 0.0f64..1_000_000.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let (d_lo, d_hi) = (Difficulty::at(lo), Difficulty::at(hi));
            prop_assert!(d_hi.game_speed >= d_lo.game_speed);
            prop_assert!(d_hi.obstacle_speed_multiplier >= d_lo.obstacle_speed_multiplier);
            prop_assert!(d_hi.spawn_interval_ms <= d_lo.spawn_interval_ms);
            prop_assert!(d_hi.spawn_interval_ms >= MIN_SPAWN_INTERVAL_MS);
            prop_assert!(d_lo.game_speed >= 1.0);
        }
    }
}
