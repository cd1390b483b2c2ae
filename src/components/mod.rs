mod character;
mod physics;

pub use character::{Chaser, Player};
pub use physics::{Collider, Static};

use glam::{Quat, Vec3};

/// Spatial transform with position and rotation (world space).
///
/// Forward is local `+Z`, up is local `+Y`.
#[derive(Debug, Clone, Copy)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Transform {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    pub fn with_yaw(mut self, yaw: f32) -> Self {
        self.rotation = Quat::from_rotation_y(yaw);
        self
    }

    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Express a world-space direction in this transform's local frame.
    pub fn inverse_transform_direction(&self, direction: Vec3) -> Vec3 {
        self.rotation.inverse() * direction
    }

    /// Yaw around world up so that forward points along `direction`.
    /// The vertical component is ignored; a vertical or zero direction
    /// leaves the rotation untouched.
    pub fn face(&mut self, direction: Vec3) {
        let flat = Vec3::new(direction.x, 0.0, direction.z);
        if flat.length_squared() > 1e-12 {
            self.rotation = Quat::from_rotation_y(flat.x.atan2(flat.z));
        }
    }
}
