use glam::Vec3;
use hecs::{Entity, World};

use crate::collab::SpatialQuery;
use crate::components::{Collider, Static, Transform};

/// Clearance kept between a candidate point and any wall.
const WALL_MARGIN: f32 = 0.3;

/// Best-candidate search over a square grid of points centered on the
/// target. Points buried in static geometry are discarded; of the rest, the
/// one closest to the target wins.
#[derive(Debug, Clone)]
pub struct ScentGrid {
    target: Entity,
    spacing: f32,
    /// Samples per side of the grid, counted from the center.
    half_count: i32,
    enabled: bool,
}

impl ScentGrid {
    pub fn new(target: Entity, spacing: f32, half_count: i32) -> Self {
        Self {
            target,
            spacing,
            half_count,
            enabled: false,
        }
    }

    fn is_free(world: &World, point: Vec3) -> bool {
        world
            .query::<(&Transform, &Collider)>()
            .with::<&Static>()
            .iter()
            .all(|(_, (t, c))| match *c {
                Collider::Box { half_extents } => {
                    let d = (point - t.position).abs() - half_extents - Vec3::splat(WALL_MARGIN);
                    d.x > 0.0 || d.z > 0.0
                }
                Collider::Sphere { radius } => {
                    let d = point - t.position;
                    Vec3::new(d.x, 0.0, d.z).length() > radius + WALL_MARGIN
                }
                Collider::Capsule { radius, .. } => {
                    let d = point - t.position;
                    Vec3::new(d.x, 0.0, d.z).length() > radius + WALL_MARGIN
                }
            })
    }
}

impl SpatialQuery for ScentGrid {
    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn best_result(&self, world: &World) -> Option<Vec3> {
        if !self.enabled {
            return None;
        }
        let center = world.get::<&Transform>(self.target).ok()?.position;

        let mut best: Option<(f32, Vec3)> = None;
        for ix in -self.half_count..=self.half_count {
            for iz in -self.half_count..=self.half_count {
                let point = center + Vec3::new(ix as f32, 0.0, iz as f32) * self.spacing;
                let score = point.distance_squared(center);
                if best.map_or(false, |(s, _)| s <= score) {
                    continue;
                }
                if Self::is_free(world, point) {
                    best = Some((score, point));
                }
            }
        }
        best.map(|(_, point)| point)
    }
}
