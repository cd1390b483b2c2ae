//! Turns perception into a movement destination and decides arrival
//! transitions.

use glam::Vec3;

use crate::npc::NpcState;

/// What to do with the movement agent's destination this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Steer {
    /// Head for a perceived candidate point.
    Toward(Vec3),
    /// Target lost: pin the destination where the NPC stands.
    Hold(Vec3),
    /// Target perceived but no candidate yet: leave the destination alone.
    Keep,
}

impl Steer {
    /// Destination to hand the agent, if it should change.
    pub fn destination(self) -> Option<Vec3> {
        match self {
            Steer::Toward(point) | Steer::Hold(point) => Some(point),
            Steer::Keep => None,
        }
    }

    pub fn is_chasing(self) -> bool {
        matches!(self, Steer::Toward(_))
    }
}

pub fn steer(can_perceive: bool, best_point: Option<Vec3>, position: Vec3) -> Steer {
    match (can_perceive, best_point) {
        (true, Some(point)) => Steer::Toward(point),
        (true, None) => Steer::Keep,
        (false, _) => Steer::Hold(position),
    }
}

pub fn arrived(remaining_distance: f32, stopping_distance: f32) -> bool {
    remaining_distance < stopping_distance
}

/// State change caused by reaching the destination, if any.
pub fn on_arrival(state: NpcState) -> Option<NpcState> {
    match state {
        NpcState::Run => Some(NpcState::Stop),
        NpcState::PreparingExitGame => Some(NpcState::ExitGame),
        _ => None,
    }
}
