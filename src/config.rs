//! Game configuration.
//!
//! Every table is optional in the TOML file; missing keys fall back to the
//! defaults below. Command-line flags are applied on top by `main`.

use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::error::{TagError, TagResult};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub session: SessionConfig,
    pub npc: NpcConfig,
    pub sim: SimConfig,
}

/// Game session timings, all in seconds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Length of one round of play.
    pub game_time: f32,
    /// Delay between the "3", "2", "1" countdown messages.
    pub countdown_step: f32,
    /// Pause after "Game Start" before play begins.
    pub start_hold: f32,
    /// How long the win/lose result stays up.
    pub result_delay: f32,
    /// Wait after the NPC's exit reaction before shutting down.
    pub exit_delay: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            game_time: 30.0,
            countdown_step: 1.0,
            start_hold: 1.0,
            result_delay: 5.0,
            exit_delay: 6.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NpcConfig {
    /// Detection radius straight ahead. Shrinks to a third behind the NPC.
    pub escape_distance: f32,
    /// Eye height above the NPC's origin for line-of-sight rays.
    pub eye_height: f32,
    /// Aim height above the target's origin for line-of-sight rays.
    pub target_height: f32,
    pub run_footstep_delay: f32,
    pub stop_footstep_delay: f32,
    pub voice_delay: f32,
    /// Distance in front of the player where the NPC walks to say goodbye.
    pub exit_offset: f32,
    /// Number of round-start voice variants to pick from.
    pub start_voices: usize,
    /// Relative weights of the two exit reactions.
    pub exit_weights: [u32; 2],
}

impl Default for NpcConfig {
    fn default() -> Self {
        Self {
            escape_distance: 7.0,
            eye_height: 1.5,
            target_height: 1.0,
            run_footstep_delay: 0.5,
            stop_footstep_delay: 0.5,
            voice_delay: 0.3,
            exit_offset: 2.0,
            start_voices: 3,
            exit_weights: [3, 1],
        }
    }
}

/// Settings for the headless simulation that hosts the game.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub seed: u64,
    /// Fixed tick length in seconds.
    pub dt: f32,
    /// Rounds to play before the autopilot presses cancel.
    pub rounds: u32,
    /// Hard stop for runaway simulations.
    pub max_ticks: u64,
    pub npc_speed: f32,
    pub player_speed: f32,
    pub stopping_distance: f32,
    /// Half-width of the square arena the player is confined to.
    pub arena_half_extent: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 0x7a6,
            dt: 1.0 / 60.0,
            rounds: 3,
            max_ticks: 60 * 60 * 10,
            npc_speed: 3.5,
            player_speed: 2.5,
            stopping_distance: 0.5,
            arena_half_extent: 12.0,
        }
    }
}

impl Config {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> TagResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_toml(content: &str) -> TagResult<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the game loop cannot make sense of.
    pub fn validate(&self) -> TagResult<()> {
        let positive = [
            ("session.game_time", self.session.game_time),
            ("npc.escape_distance", self.npc.escape_distance),
            ("sim.dt", self.sim.dt),
            ("sim.npc_speed", self.sim.npc_speed),
            ("sim.stopping_distance", self.sim.stopping_distance),
            ("sim.arena_half_extent", self.sim.arena_half_extent),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(TagError::Config(format!("{name} must be positive, got {value}")));
            }
        }

        let non_negative = [
            ("session.countdown_step", self.session.countdown_step),
            ("session.start_hold", self.session.start_hold),
            ("session.result_delay", self.session.result_delay),
            ("session.exit_delay", self.session.exit_delay),
            ("npc.run_footstep_delay", self.npc.run_footstep_delay),
            ("npc.stop_footstep_delay", self.npc.stop_footstep_delay),
            ("npc.voice_delay", self.npc.voice_delay),
            ("sim.player_speed", self.sim.player_speed),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0) {
                return Err(TagError::Config(format!("{name} must not be negative, got {value}")));
            }
        }

        if self.npc.start_voices == 0 {
            return Err(TagError::Config("npc.start_voices must be at least 1".into()));
        }
        if self.npc.exit_weights == [0, 0] {
            return Err(TagError::Config("npc.exit_weights must not both be zero".into()));
        }
        Ok(())
    }
}
