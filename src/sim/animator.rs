use glam::Vec3;
use hecs::{Entity, World};

use crate::collab::{Presenter, VoiceCue};
use crate::components::Transform;

/// Stand-in animation system.
///
/// Wraps the real presenter, remembers the locomotion parameters the NPC set
/// last tick, and turns them into this tick's root-motion delta.
#[derive(Debug, Default)]
pub struct RootMotion<P> {
    inner: P,
    forward: f32,
}

impl<P: Presenter> RootMotion<P> {
    pub fn new(inner: P) -> Self {
        Self { inner, forward: 0.0 }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    pub fn into_inner(self) -> P {
        self.inner
    }

    /// Displacement of `entity` along its facing for this tick. Walking
    /// backwards is not animated.
    pub fn root_delta(&self, world: &World, entity: Entity, dt: f32) -> Vec3 {
        let Ok(transform) = world.get::<&Transform>(entity) else {
            return Vec3::ZERO;
        };
        transform.forward() * self.forward.max(0.0) * dt
    }
}

impl<P: Presenter> Presenter for RootMotion<P> {
    fn show_message(&mut self, text: &str) {
        self.inner.show_message(text);
    }

    fn play_voice(&mut self, cue: VoiceCue, delay: f32) {
        self.inner.play_voice(cue, delay);
    }

    fn start_footsteps(&mut self, delay: f32) {
        self.inner.start_footsteps(delay);
    }

    fn stop_footsteps(&mut self) {
        self.inner.stop_footsteps();
    }

    fn play_animation(&mut self, name: &str) {
        self.inner.play_animation(name);
    }

    fn set_locomotion(&mut self, forward: f32, turn: f32) {
        self.forward = forward;
        self.inner.set_locomotion(forward, turn);
    }

    fn look_at(&mut self, point: Vec3) {
        self.inner.look_at(point);
    }
}
