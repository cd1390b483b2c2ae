use glam::Vec3;
use hecs::{Entity, World};

use crate::collab::OcclusionQuery;
use crate::components::{Collider, Transform};

pub struct RaycastHit {
    pub entity: Entity,
    pub distance: f32,
}

/// Cast a ray against every collider in the world, returning the nearest hit.
/// `ignore` is skipped so a caster standing inside its own capsule can see out.
pub fn raycast(world: &World, origin: Vec3, direction: Vec3, ignore: Entity) -> Option<RaycastHit> {
    let dir = direction.try_normalize()?;
    let mut best: Option<RaycastHit> = None;

    for (entity, (transform, collider)) in world.query::<(&Transform, &Collider)>().iter() {
        if entity == ignore {
            continue;
        }
        let t = match *collider {
            Collider::Sphere { radius } => ray_sphere_intersection(origin, dir, transform.position, radius),
            Collider::Capsule { .. } => collider
                .segment(transform.position)
                .and_then(|(bottom, top, radius)| ray_capsule_intersection(origin, dir, bottom, top, radius)),
            Collider::Box { half_extents } => ray_aabb_intersection(origin, dir, transform.position, half_extents),
        };

        if let Some(t) = t {
            let is_closer = best.as_ref().map_or(true, |b| t < b.distance);
            if t > 0.0 && is_closer {
                best = Some(RaycastHit { entity, distance: t });
            }
        }
    }

    best
}

/// Line-of-sight queries answered from the world's colliders.
#[derive(Debug, Default, Clone, Copy)]
pub struct WorldOcclusion;

impl OcclusionQuery for WorldOcclusion {
    fn first_hit(&self, world: &World, origin: Vec3, direction: Vec3, ignore: Entity) -> Option<Entity> {
        raycast(world, origin, direction, ignore).map(|hit| hit.entity)
    }
}

/// `dir` must be unit length.
fn ray_sphere_intersection(origin: Vec3, dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let to_center = center - origin;
    let along = to_center.dot(dir);
    let miss_sq = to_center.length_squared() - along * along;
    let radius_sq = radius * radius;
    if miss_sq > radius_sq {
        return None;
    }
    let half_chord = (radius_sq - miss_sq).sqrt();
    [along - half_chord, along + half_chord].into_iter().find(|t| *t > 0.0)
}

fn ray_capsule_intersection(origin: Vec3, dir: Vec3, bottom: Vec3, top: Vec3, radius: f32) -> Option<f32> {
    // Sample spheres along the core segment; close enough for sight lines.
    let middle = (bottom + top) * 0.5;
    [bottom, middle, top, (bottom + middle) * 0.5, (middle + top) * 0.5]
        .iter()
        .filter_map(|&center| ray_sphere_intersection(origin, dir, center, radius))
        .reduce(f32::min)
}

/// Slab test against an axis-aligned box.
fn ray_aabb_intersection(origin: Vec3, dir: Vec3, center: Vec3, half: Vec3) -> Option<f32> {
    let inv = dir.recip();
    let near = (center - half - origin) * inv;
    let far = (center + half - origin) * inv;
    let enter = near.min(far).max_element();
    let exit = near.max(far).min_element();
    if exit < enter.max(0.0) {
        return None;
    }
    // Starting inside the box: the hit is on the way out.
    Some(if enter > 0.0 { enter } else { exit })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Static;

    fn capsule() -> Collider {
        Collider::Capsule { radius: 0.4, height: 1.8 }
    }

    #[test]
    fn nearest_hit_wins() {
        let mut world = World::new();
        let caster = world.spawn((Transform::new(Vec3::ZERO), capsule()));
        let far = world.spawn((Transform::new(Vec3::new(0.0, 0.0, 10.0)), capsule()));
        let wall = world.spawn((
            Transform::new(Vec3::new(0.0, 1.0, 5.0)),
            Collider::Box { half_extents: Vec3::new(2.0, 1.0, 0.25) },
            Static,
        ));

        let hit = raycast(&world, Vec3::new(0.0, 1.5, 0.0), Vec3::Z, caster).unwrap();
        assert_eq!(hit.entity, wall);
        assert!((hit.distance - 4.75).abs() < 1e-4);

        world.despawn(wall).unwrap();
        let sight = WorldOcclusion.first_hit(&world, Vec3::new(0.0, 1.5, 0.0), Vec3::new(0.0, -0.5, 10.0), caster);
        assert_eq!(sight, Some(far));
    }

    #[test]
    fn caster_is_ignored_and_misses_are_none() {
        let mut world = World::new();
        let caster = world.spawn((Transform::new(Vec3::ZERO), capsule()));
        assert!(raycast(&world, Vec3::new(0.0, 1.5, 0.0), Vec3::X, caster).is_none());
        assert!(raycast(&world, Vec3::new(0.0, 1.5, 0.0), Vec3::ZERO, caster).is_none());
    }

    #[test]
    fn ray_over_a_low_wall_sees_past_it() {
        let mut world = World::new();
        let caster = world.spawn((Transform::new(Vec3::ZERO), capsule()));
        let target = world.spawn((Transform::new(Vec3::new(0.0, 0.0, 8.0)), capsule()));
        world.spawn((
            Transform::new(Vec3::new(0.0, 0.25, 4.0)),
            Collider::Box { half_extents: Vec3::new(2.0, 0.25, 0.25) },
            Static,
        ));
        let eye = Vec3::new(0.0, 1.5, 0.0);
        let aim = Vec3::new(0.0, 1.0, 8.0);
        assert_eq!(WorldOcclusion.first_hit(&world, eye, aim - eye, caster), Some(target));
    }
}
