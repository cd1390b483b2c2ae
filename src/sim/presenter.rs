use glam::Vec3;
use tracing::{debug, info, trace};

use crate::collab::{Presenter, VoiceCue};

/// Presenter that narrates the game through `tracing`.
#[derive(Debug, Default)]
pub struct LogPresenter {
    last_message: String,
}

impl Presenter for LogPresenter {
    fn show_message(&mut self, text: &str) {
        if text == self.last_message {
            return;
        }
        text.clone_into(&mut self.last_message);
        // The round clock is reshown every tick.
        if text.parse::<f32>().is_ok() {
            trace!(clock = text, "message");
        } else {
            info!(message = %text.replace('\n', " | "), "message");
        }
    }

    fn play_voice(&mut self, cue: VoiceCue, delay: f32) {
        info!(?cue, delay, "voice");
    }

    fn start_footsteps(&mut self, delay: f32) {
        debug!(delay, "footsteps on");
    }

    fn stop_footsteps(&mut self) {
        debug!("footsteps off");
    }

    fn play_animation(&mut self, name: &str) {
        info!(name, "animation");
    }

    fn set_locomotion(&mut self, forward: f32, turn: f32) {
        trace!(forward, turn, "locomotion");
    }

    fn look_at(&mut self, point: Vec3) {
        trace!(?point, "look at");
    }
}

/// Presenter that keeps every cue for later inspection.
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    pub messages: Vec<String>,
    pub voices: Vec<(VoiceCue, f32)>,
    pub footsteps_started: Vec<f32>,
    pub footsteps_stopped: usize,
    pub animations: Vec<String>,
    pub locomotion: Option<(f32, f32)>,
    pub looks: usize,
}

impl RecordingPresenter {
    pub fn last_message(&self) -> Option<&str> {
        self.messages.last().map(String::as_str)
    }

    pub fn has_shown(&self, text: &str) -> bool {
        self.messages.iter().any(|m| m == text)
    }
}

impl Presenter for RecordingPresenter {
    fn show_message(&mut self, text: &str) {
        self.messages.push(text.to_owned());
    }

    fn play_voice(&mut self, cue: VoiceCue, delay: f32) {
        self.voices.push((cue, delay));
    }

    fn start_footsteps(&mut self, delay: f32) {
        self.footsteps_started.push(delay);
    }

    fn stop_footsteps(&mut self) {
        self.footsteps_stopped += 1;
    }

    fn play_animation(&mut self, name: &str) {
        self.animations.push(name.to_owned());
    }

    fn set_locomotion(&mut self, forward: f32, turn: f32) {
        self.locomotion = Some((forward, turn));
    }

    fn look_at(&mut self, _point: Vec3) {
        self.looks += 1;
    }
}
