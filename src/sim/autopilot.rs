use crate::collab::Signals;
use crate::session::{GameState, Score};

/// Scripted input: keeps starting rounds until enough have been played,
/// then quits from the start prompt.
#[derive(Debug, Clone)]
pub struct Autopilot {
    pub rounds: u32,
}

impl Autopilot {
    pub fn new(rounds: u32) -> Self {
        Self { rounds }
    }

    pub fn signals(&self, state: GameState, score: Score) -> Signals {
        if state != GameState::Preparing {
            return Signals::default();
        }
        if score.player + score.npc >= self.rounds {
            Signals::CANCEL
        } else {
            Signals::START
        }
    }
}
