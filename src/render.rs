//! Render-facing data
//!
//! The renderer itself lives outside this crate. Each frame it walks
//! [`render_list`] and uploads the [`InstanceData`] records; materials are
//! picked by [`Role`], never by inspecting entity types.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::settings::CameraParams;
use crate::sim::{Entity, MaterialSlot, Role, World};

/// Colors for game elements
pub mod colors {
    pub const PLAYER: [f32; 4] = [0.2, 0.5, 1.0, 1.0];
    pub const OPPONENT: [f32; 4] = [0.9, 0.2, 0.2, 1.0];
    pub const FLOOR: [f32; 4] = [0.85, 0.75, 0.55, 1.0];
}

/// Surface description built by the resource loader
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub role: Role,
    pub color: [f32; 4],
}

impl Material {
    pub fn for_role(role: Role) -> Self {
        let color = match role {
            Role::Player => colors::PLAYER,
            Role::Opponent => colors::OPPONENT,
            Role::Terrain => colors::FLOOR,
        };
        Self { role, color }
    }
}

/// Per-object GPU record: model matrix plus color
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct InstanceData {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

/// One drawable entry
#[derive(Debug, Clone, Copy)]
pub struct RenderObject {
    pub role: Role,
    pub model: Mat4,
    pub material: Option<MaterialSlot>,
}

impl RenderObject {
    pub fn from_entity(entity: &Entity) -> Self {
        Self {
            role: entity.role,
            model: entity.model_matrix(),
            material: entity.material,
        }
    }

    /// GPU record, or `None` until a material is attached
    pub fn instance(&self, materials: &[Material]) -> Option<InstanceData> {
        let material = materials.get(self.material?.0)?;
        Some(InstanceData {
            model: self.model.to_cols_array_2d(),
            color: material.color,
        })
    }
}

/// Everything to draw this frame, in entity order
pub fn render_list(world: &World) -> Vec<RenderObject> {
    world.entities().iter().map(RenderObject::from_entity).collect()
}

/// View parameters; the look direction follows player input during play
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub look_at: Vec3,
    pub up: Vec3,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(CameraParams::default())
    }
}

impl Camera {
    pub fn new(params: CameraParams) -> Self {
        Self {
            eye: params.eye,
            look_at: params.look_at,
            up: params.up,
        }
    }

    pub fn set_view_params(&mut self, params: CameraParams) {
        *self = Self::new(params);
    }

    pub fn params(&self) -> CameraParams {
        CameraParams {
            eye: self.eye,
            look_at: self.look_at,
            up: self.up,
        }
    }

    /// Unit direction from the eye toward the look-at point
    pub fn look_direction(&self) -> Vec3 {
        (self.look_at - self.eye).normalize_or_zero()
    }

    /// Point the camera along `direction`, keeping the eye-to-target distance
    pub fn set_look_direction(&mut self, direction: Vec3) {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            return;
        }
        let distance = (self.look_at - self.eye).length().max(1.0);
        self.look_at = self.eye + direction * distance;
    }

}
