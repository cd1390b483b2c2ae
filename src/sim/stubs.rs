//! Deterministic collaborators for tests: no steering, fixed answers.

use glam::Vec3;
use hecs::{Entity, World};

use crate::collab::{MovementAgent, OcclusionQuery, SpatialQuery};

/// Agent that never steers. It only reports the distance between where the
/// root-motion callback last put it and its destination.
#[derive(Debug, Clone)]
pub struct ScriptedAgent {
    pub position: Vec3,
    pub destination: Vec3,
    pub stopping_distance: f32,
}

impl Default for ScriptedAgent {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            destination: Vec3::ZERO,
            stopping_distance: 0.5,
        }
    }
}

impl MovementAgent for ScriptedAgent {
    fn set_destination(&mut self, point: Vec3) {
        self.destination = point;
    }

    fn destination(&self) -> Vec3 {
        self.destination
    }

    fn desired_velocity(&self) -> Vec3 {
        Vec3::ZERO
    }

    fn remaining_distance(&self) -> f32 {
        self.position.distance(self.destination)
    }

    fn stopping_distance(&self) -> f32 {
        self.stopping_distance
    }

    fn set_next_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn warp(&mut self, position: Vec3) {
        self.position = position;
    }
}

/// Spatial query with a fixed answer.
#[derive(Debug, Clone)]
pub struct FixedQuery {
    best: Option<Vec3>,
    enabled: bool,
}

impl FixedQuery {
    pub fn new(best: Option<Vec3>) -> Self {
        Self { best, enabled: false }
    }
}

impl SpatialQuery for FixedQuery {
    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn best_result(&self, _world: &World) -> Option<Vec3> {
        if self.enabled {
            self.best
        } else {
            None
        }
    }
}

/// Occlusion query for an empty world: every ray hits the given entity.
#[derive(Debug, Clone, Copy)]
pub struct SeeThrough(pub Entity);

impl OcclusionQuery for SeeThrough {
    fn first_hit(&self, _world: &World, _origin: Vec3, _direction: Vec3, _ignore: Entity) -> Option<Entity> {
        Some(self.0)
    }
}
