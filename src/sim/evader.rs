use glam::Vec3;
use hecs::{Entity, World};

use crate::components::Transform;

/// Scripted player: runs straight away from the chaser, sliding along the
/// arena edge when it gets there.
#[derive(Debug, Clone)]
pub struct Evader {
    pub speed: f32,
    pub half_extent: f32,
}

impl Evader {
    pub fn new(speed: f32, half_extent: f32) -> Self {
        Self { speed, half_extent }
    }

    pub fn step(&self, world: &mut World, player: Entity, chaser: Entity, dt: f32) {
        let Ok(chaser_pos) = world.get::<&Transform>(chaser).map(|t| t.position) else {
            return;
        };
        let Ok(mut transform) = world.get::<&mut Transform>(player) else {
            return;
        };

        let away = transform.position - chaser_pos;
        let away = Vec3::new(away.x, 0.0, away.z).try_normalize().unwrap_or(Vec3::X);

        let limit = self.half_extent;
        let mut next = transform.position + away * self.speed * dt;
        next.x = next.x.clamp(-limit, limit);
        next.z = next.z.clamp(-limit, limit);

        let step = next - transform.position;
        transform.face(step);
        transform.position = next;
    }
}
