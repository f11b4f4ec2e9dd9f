//! Vector and transform helpers shared by the simulation
//!
//! Everything works on the horizontal X/Z plane unless stated otherwise.
//! Zero-length directions normalize to zero instead of NaN.

use glam::{Mat4, Quat, Vec3};

/// Canonical forward axis of a block before rotation
pub const FORWARD: Vec3 = Vec3::X;

/// Drop the vertical component
#[inline]
pub fn planar(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Distance between two points measured in the X/Z plane
#[inline]
pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    let dx = b.x - a.x;
    let dz = b.z - a.z;
    (dx * dx + dz * dz).sqrt()
}

/// Unit vector from `from` toward `to` in the X/Z plane (zero if coincident)
#[inline]
pub fn planar_direction(from: Vec3, to: Vec3) -> Vec3 {
    planar(to - from).normalize_or_zero()
}

/// Rotation about +Y that turns [`FORWARD`] toward `to` when standing at `from`.
///
/// Returns `None` when the two points share the same X/Z coordinates, in which
/// case the caller keeps whatever rotation it had.
pub fn facing_angle(from: Vec3, to: Vec3) -> Option<f32> {
    let direction = planar_direction(from, to);
    if direction == Vec3::ZERO {
        return None;
    }
    // Unsigned angle to +X, negated on the +Z side so the block turns the short way
    let angle = direction.dot(FORWARD).clamp(-1.0, 1.0).acos();
    Some(if direction.z > 0.0 { -angle } else { angle })
}

/// Model transform: unit scale, then yaw, then translation
#[inline]
pub fn model_matrix(position: Vec3, facing: f32) -> Mat4 {
    Mat4::from_scale_rotation_translation(Vec3::ONE, Quat::from_rotation_y(facing), position)
}

/// Whether a body has left the mat.
///
/// "Off the mat" is the full 3-D distance from the origin, strictly greater
/// than `radius`. Every ring-out check goes through here.
#[inline]
pub fn is_out_of_arena(position: Vec3, radius: f32) -> bool {
    position.length() > radius
}
