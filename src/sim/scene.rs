use glam::Vec3;
use hecs::{Entity, World};

use crate::components::{Chaser, Collider, Player, Static, Transform};

const BODY_RADIUS: f32 = 0.4;
const BODY_HEIGHT: f32 = 1.8;

/// Entities the game loop needs to address directly.
#[derive(Debug, Clone, Copy)]
pub struct Arena {
    pub player: Entity,
    pub npc: Entity,
}

pub fn spawn_static_box(world: &mut World, center: Vec3, half_extents: Vec3) -> Entity {
    world.spawn((Transform::new(center), Collider::Box { half_extents }, Static))
}

pub fn spawn_player(world: &mut World, position: Vec3) -> Entity {
    world.spawn((
        Transform::new(position),
        Collider::Capsule { radius: BODY_RADIUS, height: BODY_HEIGHT },
        Player,
    ))
}

/// The chaser starts facing the player's side of the arena.
pub fn spawn_chaser(world: &mut World, position: Vec3) -> Entity {
    world.spawn((
        Transform::new(position),
        Collider::Capsule { radius: BODY_RADIUS, height: BODY_HEIGHT },
        Chaser,
    ))
}

/// Flat square arena with a few pillars to hide behind.
pub fn build_arena(world: &mut World) -> Arena {
    for &(x, z, h) in &[(4.0_f32, -3.0_f32, 2.0_f32), (-5.0, 2.0, 3.0), (2.0, 7.0, 2.0)] {
        spawn_static_box(world, Vec3::new(x, h / 2.0, z), Vec3::new(1.0, h / 2.0, 1.0));
    }

    let npc = spawn_chaser(world, Vec3::ZERO);
    let player = spawn_player(world, Vec3::new(0.0, 0.0, 4.0));
    Arena { player, npc }
}
