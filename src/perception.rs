//! NPC perception: an asymmetric view volume plus a line-of-sight ray.

use glam::Vec3;
use hecs::{Entity, World};

use crate::collab::OcclusionQuery;

/// Fraction of the escape distance the NPC notices things directly behind it.
const REAR_RANGE: f32 = 1.0 / 3.0;
/// Minimum flattened-direction dot for the NPC to turn its head (120° cone).
const LOOK_CONE_DOT: f32 = 0.5;

/// Remove the component of `v` along `up`.
fn flatten(v: Vec3, up: Vec3) -> Option<Vec3> {
    let up = up.try_normalize()?;
    Some(v - up * v.dot(up))
}

/// Whether `target` lies inside the NPC's lens-shaped view volume.
///
/// Both the direction to the target and `forward` are flattened onto the
/// plane orthogonal to `up`. Ahead (`dot >= 0`) the reach grows linearly from
/// a third of `escape_distance` at the sides to the full distance straight
/// ahead; behind it is a flat third. Degenerate vectors are never in view.
pub fn is_target_in_view(position: Vec3, forward: Vec3, up: Vec3, target: Vec3, escape_distance: f32) -> bool {
    let (Some(direction), Some(forward)) = (flatten(target - position, up), flatten(forward, up)) else {
        return false;
    };
    let (Some(dir_n), Some(fwd_n)) = (direction.try_normalize(), forward.try_normalize()) else {
        return false;
    };

    let dot = dir_n.dot(fwd_n);
    let distance = direction.length();
    if dot >= 0.0 {
        distance < (2.0 / 3.0 * dot + REAR_RANGE) * escape_distance
    } else {
        distance < REAR_RANGE * escape_distance
    }
}

/// Whether a ray from `eye` toward `aim` hits `target` before anything else.
/// A ray that hits nothing, or has no length, sees nothing.
pub fn is_target_visible(
    occlusion: &dyn OcclusionQuery,
    world: &World,
    eye: Vec3,
    aim: Vec3,
    target: Entity,
    ignore: Entity,
) -> bool {
    let direction = aim - eye;
    if direction.length_squared() < 1e-12 {
        return false;
    }
    occlusion.first_hit(world, eye, direction, ignore) == Some(target)
}

/// Whether the target is close enough to the NPC's facing to look at.
pub fn in_look_cone(forward: Vec3, up: Vec3, direction: Vec3) -> bool {
    let Some(direction) = flatten(direction, up).and_then(Vec3::try_normalize) else {
        return false;
    };
    forward.dot(direction) > LOOK_CONE_DOT
}

/// Geometry needed for one perception check.
#[derive(Debug, Clone, Copy)]
pub struct Viewpoint {
    pub position: Vec3,
    pub forward: Vec3,
    pub up: Vec3,
    pub eye_height: f32,
}

/// Combined in-view AND line-of-sight gate.
#[derive(Debug, Clone, Copy)]
pub struct PerceptionGate {
    pub escape_distance: f32,
    pub target_height: f32,
}

impl PerceptionGate {
    pub fn evaluate(
        &self,
        occlusion: &dyn OcclusionQuery,
        world: &World,
        viewer: &Viewpoint,
        viewer_entity: Entity,
        target: Entity,
        target_position: Vec3,
    ) -> bool {
        if !is_target_in_view(viewer.position, viewer.forward, viewer.up, target_position, self.escape_distance) {
            return false;
        }
        let eye = viewer.position + Vec3::Y * viewer.eye_height;
        let aim = target_position + Vec3::Y * self.target_height;
        is_target_visible(occlusion, world, eye, aim, target, viewer_entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FWD: Vec3 = Vec3::Z;
    const UP: Vec3 = Vec3::Y;

    fn in_view(target: Vec3) -> bool {
        is_target_in_view(Vec3::ZERO, FWD, UP, target, 9.0)
    }

    #[test]
    fn straight_ahead_reaches_full_escape_distance() {
        assert!(in_view(Vec3::new(0.0, 0.0, 8.9)));
        assert!(!in_view(Vec3::new(0.0, 0.0, 9.0)));
        assert!(!in_view(Vec3::new(0.0, 0.0, 9.5)));
    }

    #[test]
    fn straight_behind_reaches_a_third() {
        assert!(in_view(Vec3::new(0.0, 0.0, -2.9)));
        assert!(!in_view(Vec3::new(0.0, 0.0, -3.0)));
        assert!(!in_view(Vec3::new(0.0, 0.0, -5.0)));
    }

    #[test]
    fn side_reach_is_a_third() {
        assert!(in_view(Vec3::new(2.9, 0.0, 0.0)));
        assert!(!in_view(Vec3::new(3.1, 0.0, 0.0)));
    }

    #[test]
    fn diagonal_reach_interpolates() {
        // dot = cos 45° ≈ 0.707 → reach ≈ (0.471 + 0.333) * 9 ≈ 7.24
        let d = std::f32::consts::FRAC_1_SQRT_2;
        assert!(in_view(Vec3::new(d, 0.0, d) * 7.0));
        assert!(!in_view(Vec3::new(d, 0.0, d) * 7.5));
    }

    #[test]
    fn height_difference_is_ignored() {
        assert!(in_view(Vec3::new(0.0, 20.0, 8.0)));
    }

    #[test]
    fn tilted_forward_is_flattened() {
        let tilted = Vec3::new(0.0, 0.9, 0.1);
        assert!(is_target_in_view(Vec3::ZERO, tilted, UP, Vec3::new(0.0, 0.0, 8.0), 9.0));
    }

    #[test]
    fn degenerate_inputs_are_not_in_view() {
        // Target directly above: flattened direction has no length.
        assert!(!in_view(Vec3::new(0.0, 3.0, 0.0)));
        // Forward pointing straight up.
        assert!(!is_target_in_view(Vec3::ZERO, UP, UP, Vec3::new(0.0, 0.0, 1.0), 9.0));
        // Zero up vector.
        assert!(!is_target_in_view(Vec3::ZERO, FWD, Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0), 9.0));
    }

    struct FixedHit(Option<Entity>);

    impl OcclusionQuery for FixedHit {
        fn first_hit(&self, _: &World, _: Vec3, _: Vec3, _: Entity) -> Option<Entity> {
            self.0
        }
    }

    #[test]
    fn visible_only_when_first_hit_is_target() {
        let mut world = World::new();
        let npc = world.spawn(());
        let target = world.spawn(());
        let wall = world.spawn(());
        let eye = Vec3::ZERO;
        let aim = Vec3::new(0.0, 0.0, 5.0);

        assert!(is_target_visible(&FixedHit(Some(target)), &world, eye, aim, target, npc));
        assert!(!is_target_visible(&FixedHit(Some(wall)), &world, eye, aim, target, npc));
        assert!(!is_target_visible(&FixedHit(None), &world, eye, aim, target, npc));
        assert!(!is_target_visible(&FixedHit(Some(target)), &world, eye, eye, target, npc));
    }

    #[test]
    fn gate_requires_both_view_and_sight() {
        let mut world = World::new();
        let npc = world.spawn(());
        let target = world.spawn(());
        let gate = PerceptionGate { escape_distance: 9.0, target_height: 1.0 };
        let viewer = Viewpoint { position: Vec3::ZERO, forward: FWD, up: UP, eye_height: 1.5 };

        let near = Vec3::new(0.0, 0.0, 4.0);
        let far = Vec3::new(0.0, 0.0, 20.0);
        assert!(gate.evaluate(&FixedHit(Some(target)), &world, &viewer, npc, target, near));
        assert!(!gate.evaluate(&FixedHit(None), &world, &viewer, npc, target, near));
        assert!(!gate.evaluate(&FixedHit(Some(target)), &world, &viewer, npc, target, far));
    }

    #[test]
    fn look_cone_is_120_degrees() {
        assert!(in_look_cone(FWD, UP, Vec3::new(0.5, 0.0, 1.0)));
        assert!(!in_look_cone(FWD, UP, Vec3::new(1.0, 0.0, 0.2)));
        assert!(!in_look_cone(FWD, UP, Vec3::new(0.0, 0.0, -1.0)));
    }
}
