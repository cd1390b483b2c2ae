use glam::Vec3;

/// Collision shape attached to an entity.
///
/// Spheres and boxes are centered on the entity's position. Capsules stand
/// upright with their base on the position, so a character's transform sits
/// at its feet.
#[derive(Debug, Clone, Copy)]
pub enum Collider {
    Sphere { radius: f32 },
    Capsule { radius: f32, height: f32 },
    Box { half_extents: Vec3 },
}

impl Collider {
    /// Core segment and radius of a round shape placed at `position`.
    /// Boxes have none.
    pub fn segment(&self, position: Vec3) -> Option<(Vec3, Vec3, f32)> {
        match *self {
            Collider::Sphere { radius } => Some((position, position, radius)),
            Collider::Capsule { radius, height } => {
                let bottom = position + Vec3::Y * radius;
                let top = position + Vec3::Y * (height - radius).max(radius);
                Some((bottom, top, radius))
            }
            Collider::Box { .. } => None,
        }
    }
}

/// Marker: entity is immovable level geometry (walls, pillars).
pub struct Static;
