use glam::Vec3;

use crate::collab::MovementAgent;

fn flat(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Straight-line steering on flat ground. Obstacles are not avoided.
#[derive(Debug, Clone)]
pub struct DirectAgent {
    position: Vec3,
    destination: Vec3,
    speed: f32,
    stopping_distance: f32,
}

impl DirectAgent {
    pub fn new(speed: f32, stopping_distance: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            destination: Vec3::ZERO,
            speed,
            stopping_distance,
        }
    }
}

impl MovementAgent for DirectAgent {
    fn set_destination(&mut self, point: Vec3) {
        self.destination = point;
    }

    fn destination(&self) -> Vec3 {
        self.destination
    }

    fn desired_velocity(&self) -> Vec3 {
        let offset = flat(self.destination - self.position);
        if offset.length() < self.stopping_distance {
            return Vec3::ZERO;
        }
        offset.normalize_or_zero() * self.speed
    }

    fn remaining_distance(&self) -> f32 {
        flat(self.destination - self.position).length()
    }

    fn stopping_distance(&self) -> f32 {
        self.stopping_distance
    }

    fn set_next_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn warp(&mut self, position: Vec3) {
        self.position = position;
        self.destination = position;
    }
}
