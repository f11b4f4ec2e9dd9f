//! Contact between the two blocks
//!
//! Blocks are treated as discs of equal diameter in the X/Z plane. Contact is
//! resolved positionally in a single pass: each body gives up half the
//! penetration along the line between their centers. Velocities are left alone.

use glam::Vec3;

use crate::math::{planar_direction, planar_distance};

/// Result of an overlap check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether the discs overlap
    pub hit: bool,
    /// Unit axis from the first body toward the second (X/Z plane)
    pub normal: Vec3,
    /// Center distance minus diameter (negative while overlapping)
    pub overlap: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec3::ZERO,
            overlap: 0.0,
        }
    }
}

/// Check two equal discs centered at `a` and `b`
pub fn disc_overlap(a: Vec3, b: Vec3, diameter: f32) -> CollisionResult {
    let overlap = planar_distance(a, b) - diameter;
    if overlap < 0.0 {
        CollisionResult {
            hit: true,
            normal: planar_direction(a, b),
            overlap,
        }
    } else {
        CollisionResult {
            overlap,
            ..CollisionResult::miss()
        }
    }
}

/// New positions for `a` and `b` after symmetric separation.
///
/// Coincident centers have no separation axis; they are returned unchanged.
pub fn separate(a: Vec3, b: Vec3, contact: &CollisionResult) -> (Vec3, Vec3) {
    if !contact.hit {
        return (a, b);
    }
    let half = contact.normal * contact.overlap * 0.5;
    (a + half, b - half)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apart_is_a_miss() {
        let result = disc_overlap(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), 1.0);
        assert!(!result.hit);
        assert!((result.overlap - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_exact_touch_is_a_miss() {
        let result = disc_overlap(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0), 1.0);
        assert!(!result.hit);
    }

    #[test]
    fn test_overlap_is_split_evenly() {
        let a = Vec3::new(0.0, 0.5, 0.0);
        let b = Vec3::new(0.6, 0.5, 0.0);
        let contact = disc_overlap(a, b, 1.0);
        assert!(contact.hit);
        assert!((contact.overlap + 0.4).abs() < 1e-6);

        let (na, nb) = separate(a, b, &contact);
        assert!((na.x + 0.2).abs() < 1e-6);
        assert!((nb.x - 0.8).abs() < 1e-6);
        assert!((planar_distance(na, nb) - 1.0).abs() < 1e-6);
        // Height is untouched
        assert_eq!(na.y, 0.5);
        assert_eq!(nb.y, 0.5);
    }

    #[test]
    fn test_height_does_not_count_toward_distance() {
        let contact = disc_overlap(Vec3::ZERO, Vec3::new(0.5, 20.0, 0.0), 1.0);
        assert!(contact.hit);
    }

    #[test]
    fn test_coincident_bodies_stay_finite() {
        let p = Vec3::new(1.0, 0.5, 1.0);
        let contact = disc_overlap(p, p, 1.0);
        assert!(contact.hit);
        let (a, b) = separate(p, p, &contact);
        assert!(!a.is_nan() && !b.is_nan());
        assert_eq!(a, p);
        assert_eq!(b, p);
    }
}
