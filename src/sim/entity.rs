//! Simulated bodies
//!
//! An entity never owns the body it faces: `target` is an index into the
//! owning [`World`](super::World).

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::math::{facing_angle, model_matrix};

/// Index handle into the world's entity list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// What a body is, fixed at construction (picks its material)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Player,
    Opponent,
    Terrain,
}

/// Slot of a material built by the resource loader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialSlot(pub usize);

/// A positioned, optionally target-aware body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub role: Role,
    position: Vec3,
    velocity: Vec3,
    /// Yaw in radians, derived from position and target
    facing: f32,
    target: Option<EntityId>,
    /// Radius for flat terrain (floor cylinder); zero for blocks
    #[serde(default)]
    pub radius: f32,
    /// Attached when device resources finalize
    #[serde(skip)]
    pub material: Option<MaterialSlot>,
}

impl Entity {
    pub fn new(id: EntityId, role: Role, position: Vec3) -> Self {
        Self {
            id,
            role,
            position,
            velocity: Vec3::ZERO,
            facing: 0.0,
            target: None,
            radius: 0.0,
            material: None,
        }
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    #[inline]
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    #[inline]
    pub fn facing(&self) -> f32 {
        self.facing
    }

    #[inline]
    pub fn target(&self) -> Option<EntityId> {
        self.target
    }

    /// Store a position and recompute facing against the target's position.
    ///
    /// `target_position` must be the current position of `self.target()`, or
    /// `None` when there is no target. Without a target the last rotation holds.
    pub fn place(&mut self, position: Vec3, target_position: Option<Vec3>) {
        self.position = position;
        if let Some(angle) = target_position.and_then(|t| facing_angle(position, t)) {
            self.facing = angle;
        }
    }

    /// Velocity is stored verbatim
    #[inline]
    pub fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    /// Replace the target; facing is refreshed on the next position change
    #[inline]
    pub fn set_target(&mut self, target: Option<EntityId>) {
        self.target = target;
    }

    /// Explicit rotation, used by entities without a target
    #[inline]
    pub fn set_facing(&mut self, facing: f32) {
        self.facing = facing;
    }

    /// Scale(1) * RotateY(facing) * Translate(position)
    #[inline]
    pub fn model_matrix(&self) -> Mat4 {
        model_matrix(self.position, self.facing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_without_target_holds_rotation() {
        let mut e = Entity::new(EntityId(0), Role::Player, Vec3::ZERO);
        e.set_facing(0.25);
        e.place(Vec3::new(4.0, 0.0, -2.0), None);
        assert_eq!(e.position(), Vec3::new(4.0, 0.0, -2.0));
        assert_eq!(e.facing(), 0.25);
    }

    #[test]
    fn test_place_with_target_faces_it() {
        let mut e = Entity::new(EntityId(0), Role::Opponent, Vec3::ZERO);
        e.place(Vec3::new(3.0, 0.5, 0.0), Some(Vec3::new(-3.0, 0.5, 0.0)));
        assert!((e.facing() - std::f32::consts::PI).abs() < 1e-6);
    }

    #[test]
    fn test_set_target_does_not_recompute() {
        let mut e = Entity::new(EntityId(0), Role::Player, Vec3::ZERO);
        e.set_target(Some(EntityId(1)));
        assert_eq!(e.facing(), 0.0);
        assert_eq!(e.target(), Some(EntityId(1)));
    }

    #[test]
    fn test_velocity_is_stored_verbatim() {
        let mut e = Entity::new(EntityId(0), Role::Player, Vec3::ZERO);
        e.set_velocity(Vec3::new(1.0, -2.0, 3.0));
        assert_eq!(e.velocity(), Vec3::new(1.0, -2.0, 3.0));
        assert_eq!(e.position(), Vec3::ZERO);
    }
}
