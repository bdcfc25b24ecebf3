//! Collision detection between entity volumes
//!
//! Plain overlap tests: no continuous detection and no response. A hit
//! simply ends the run.

use glam::Vec3;

use super::entity::Collider;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        debug_assert!(min.is_finite() && max.is_finite(), "non-finite box");
        debug_assert!(min.cmple(max).all(), "inverted box: {min} > {max}");
        Self { min, max }
    }

    pub fn from_center(center: Vec3, half_extents: Vec3) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Overlap on all three axes. Touching faces count as a hit.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.cmple(other.max).all() && other.min.cmple(self.max).all()
    }
}

/// Box overlap test (symmetric)
pub fn boxes_intersect(a: &Aabb, b: &Aabb) -> bool {
    a.intersects(b)
}

/// Overlap test between two entities, using bounds derived from their
/// current positions
pub fn entities_collide<A: Collider, B: Collider>(a: &A, b: &B) -> bool {
    boxes_intersect(&a.bounds(), &b.bounds())
}

/// Center-distance test: true when the centers are strictly closer than
/// `threshold`. Callers wanting the stock radius pass
/// [`DEFAULT_COLLISION_DISTANCE`](crate::consts::DEFAULT_COLLISION_DISTANCE).
pub fn within_distance<A: Collider, B: Collider>(a: &A, b: &B, threshold: f32) -> bool {
    let (ca, cb) = (a.center(), b.center());
    debug_assert!(ca.is_finite() && cb.is_finite(), "non-finite entity position");
    ca.distance(cb) < threshold
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::entity::{Hsl, Obstacle, Player};
    use proptest::prelude::*;

    fn rock_at(pos: Vec3, size: f32) -> Obstacle {
        Obstacle {
            id: 2,
            pos,
            rotation: Vec3::ZERO,
            size,
            speed: 0.1,
            spin: Vec3::ZERO,
            color: Hsl::new(30.0, ASTEROID_SATURATION, ASTEROID_LIGHTNESS),
        }
    }

    #[test]
    fn test_overlap_is_symmetric() {
        let a = Aabb::from_center(Vec3::ZERO, Vec3::splat(1.0));
        let b = Aabb::from_center(Vec3::new(1.5, 0.5, -0.5), Vec3::splat(1.0));
        assert!(boxes_intersect(&a, &b));
        assert!(boxes_intersect(&b, &a));
    }

    #[test]
    fn test_touching_faces_intersect() {
        let a = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0));
        assert!(boxes_intersect(&a, &b));
        assert!(boxes_intersect(&b, &a));
    }

    #[test]
    fn test_separated_on_one_axis_misses() {
        let a = Aabb::new(Vec3::ZERO, Vec3::ONE);
        // Overlaps on x and y, clear gap on z
        let b = Aabb::new(Vec3::new(0.5, 0.5, 1.01), Vec3::new(1.5, 1.5, 2.0));
        assert!(!boxes_intersect(&a, &b));
        assert!(!boxes_intersect(&b, &a));
    }

    #[test]
    fn test_rock_on_ship_collides() {
        let player = Player::new(1);
        let rock = rock_at(player.pos, 0.3);
        assert!(entities_collide(&player, &rock));
        assert!(entities_collide(&rock, &player));

        let far = rock_at(player.pos + Vec3::new(5.0, 0.0, 0.0), 0.3);
        assert!(!entities_collide(&player, &far));
    }

    #[test]
    fn test_distance_threshold_is_strict() {
        let player = Player::new(1);
        let near = rock_at(player.pos + Vec3::new(1.0, 0.0, 0.0), 0.3);
        let edge = rock_at(player.pos + Vec3::new(1.5, 0.0, 0.0), 0.3);
        assert!(within_distance(&player, &near, DEFAULT_COLLISION_DISTANCE));
        assert!(!within_distance(&player, &edge, DEFAULT_COLLISION_DISTANCE));
        assert!(within_distance(&player, &edge, 2.0));
    }

    #[test]
    fn test_box_center() {
        let b = Aabb::new(Vec3::new(-1.0, 2.0, 0.0), Vec3::new(3.0, 4.0, 2.0));
        assert_eq!(b.center(), Vec3::new(1.0, 3.0, 1.0));
    }

    fn vec3(range: std::ops::Range<f32>) -> impl Strategy<Value = Vec3> {
        (range.clone(), range.clone(), range).prop_map(|(x, y, z)| Vec3::new(x, y, z))
    }

    proptest! {
        #[test]
        fn prop_overlap_is_symmetric(
            ca in vec3(-10.0..10.0),
            ea in vec3(0.0..3.0),
            cb in vec3(-10.0..10.0),
            eb in vec3(0.0..3.0),
        ) {
            let a = Aabb::from_center(ca, ea);
            let b = Aabb::from_center(cb, eb);
            prop_assert_eq!(boxes_intersect(&a, &b), boxes_intersect(&b, &a));
            prop_assert!(boxes_intersect(&a, &a));
        }

        #[test]
        fn prop_rock_on_ship_always_collides(
            offset in vec3(-0.5..0.5),
            size in ASTEROID_MIN_SIZE..ASTEROID_MAX_SIZE,
        ) {
            let player = Player::new(1);
            let rock = rock_at(player.pos + offset, size);
            prop_assert!(entities_collide(&player, &rock));
            prop_assert!(entities_collide(&rock, &player));
        }
    }
}
