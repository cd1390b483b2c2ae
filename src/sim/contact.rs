use std::collections::HashSet;

use glam::Vec3;
use hecs::{Entity, World};

use crate::components::{Collider, Static, Transform};

fn closest_point_on_segment(a: Vec3, b: Vec3, p: Vec3) -> Vec3 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < 1e-12 {
        return a;
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Approximate closest points between two segments by alternating
/// projections. Exact for the parallel upright capsules used here.
fn segment_distance(a0: Vec3, a1: Vec3, b0: Vec3, b1: Vec3) -> f32 {
    let mut on_a = closest_point_on_segment(a0, a1, (b0 + b1) * 0.5);
    let mut on_b = closest_point_on_segment(b0, b1, on_a);
    for _ in 0..2 {
        on_a = closest_point_on_segment(a0, a1, on_b);
        on_b = closest_point_on_segment(b0, b1, on_a);
    }
    on_a.distance(on_b)
}

/// Whether two round colliders overlap.
pub fn overlaps(a_pos: Vec3, a: &Collider, b_pos: Vec3, b: &Collider) -> bool {
    let (Some((a0, a1, ra)), Some((b0, b1, rb))) = (a.segment(a_pos), b.segment(b_pos)) else {
        return false;
    };
    segment_distance(a0, a1, b0, b1) < ra + rb
}

/// Reports each touch between the NPC and another moving body once, when
/// the touch begins.
#[derive(Debug, Default)]
pub struct ContactTracker {
    touching: HashSet<Entity>,
}

impl ContactTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entities that started touching `subject` since the last call.
    pub fn detect(&mut self, world: &World, subject: Entity) -> Vec<Entity> {
        let (Ok(transform), Ok(collider)) = (world.get::<&Transform>(subject), world.get::<&Collider>(subject)) else {
            self.touching.clear();
            return Vec::new();
        };
        let (position, collider) = (transform.position, *collider);

        let now: HashSet<Entity> = world
            .query::<(&Transform, &Collider)>()
            .without::<&Static>()
            .iter()
            .filter(|(entity, (t, c))| *entity != subject && overlaps(position, &collider, t.position, c))
            .map(|(entity, _)| entity)
            .collect();

        let entered = now.difference(&self.touching).copied().collect();
        self.touching = now;
        entered
    }
}
