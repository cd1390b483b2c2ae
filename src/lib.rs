//! Core of a one-on-one tag game: an NPC that hunts the player inside a
//! timed round, and the session that runs rounds, keeps score and exits.
//!
//! Engine services (navigation, spatial queries, raycasts, audio, UI) are
//! consumed through the traits in [`collab`]; [`sim`] provides headless
//! implementations and a fixed-step loop.

pub mod collab;
pub mod components;
pub mod config;
pub mod error;
pub mod fsm;
pub mod npc;
pub mod perception;
pub mod pursuit;
pub mod sequence;
pub mod session;
pub mod sim;

pub use config::Config;
pub use error::{TagError, TagResult};
pub use npc::{Npc, NpcBuilder, NpcState};
pub use session::{GameState, Score, Session, SessionStatus};
