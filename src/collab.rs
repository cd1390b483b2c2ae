//! Contracts for everything the game core consumes but does not implement:
//! steering, candidate-point search, occlusion rays, presentation and input.
//!
//! Concrete implementations for the headless build live in `crate::sim`.

use glam::Vec3;
use hecs::{Entity, World};

/// Steering/pathfinding provider driving the NPC.
///
/// The agent never moves the NPC on its own: position is committed by the
/// root-motion callback and fed back through [`MovementAgent::set_next_position`].
pub trait MovementAgent {
    fn set_destination(&mut self, point: Vec3);
    fn destination(&self) -> Vec3;
    /// Velocity the agent would like to move at this tick.
    fn desired_velocity(&self) -> Vec3;
    fn remaining_distance(&self) -> f32;
    fn stopping_distance(&self) -> f32;
    fn set_next_position(&mut self, position: Vec3);
    /// Snap the agent to `position` without steering (spawn, reset).
    fn warp(&mut self, position: Vec3);
}

/// Best-candidate-point provider (scent/visibility grid and the like).
/// The core only toggles it and reads its answer.
pub trait SpatialQuery {
    fn set_enabled(&mut self, enabled: bool);
    fn enabled(&self) -> bool;
    /// Best point to move toward, or `None` while disabled or when nothing
    /// qualifies.
    fn best_result(&self, world: &World) -> Option<Vec3>;
}

/// Line-of-sight ray caster.
pub trait OcclusionQuery {
    /// First entity hit by a ray from `origin` along `direction`, skipping
    /// `ignore` (the caster itself).
    fn first_hit(&self, world: &World, origin: Vec3, direction: Vec3, ignore: Entity) -> Option<Entity>;
}

/// Voice lines the NPC can speak.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceCue {
    RoundStart(usize),
    Exit(usize),
}

/// Fire-and-forget output: text, sound and animation cues.
pub trait Presenter {
    fn show_message(&mut self, text: &str);
    fn play_voice(&mut self, cue: VoiceCue, delay: f32);
    fn start_footsteps(&mut self, delay: f32);
    fn stop_footsteps(&mut self);
    fn play_animation(&mut self, name: &str);
    /// Locomotion blend parameters derived from the NPC's local velocity.
    fn set_locomotion(&mut self, forward: f32, turn: f32);
    fn look_at(&mut self, point: Vec3);
}

/// Discrete input for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Signals {
    pub start: bool,
    pub cancel: bool,
}

impl Signals {
    pub const START: Signals = Signals { start: true, cancel: false };
    pub const CANCEL: Signals = Signals { start: false, cancel: true };
}

/// Events the NPC reports back to the session that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The NPC touched its target.
    Capture,
}

/// Everything a controller may touch during one tick.
pub struct Frame<'a> {
    pub world: &'a mut World,
    pub presenter: &'a mut dyn Presenter,
    pub dt: f32,
}
