//! Headless host: a tiny world, stand-in collaborators and the tick loop
//! that drives the session the way an engine would.

pub mod agent;
pub mod animator;
pub mod autopilot;
pub mod contact;
pub mod evader;
pub mod presenter;
pub mod query;
pub mod raycast;
pub mod scene;
pub mod stubs;

use crossbeam_channel::unbounded;
use hecs::World;
use tracing::{info, warn};

use crate::collab::{Frame, Presenter};
use crate::config::{Config, SimConfig};
use crate::error::TagResult;
use crate::npc::NpcBuilder;
use crate::session::{GameState, Score, Session, SessionStatus};

use agent::DirectAgent;
use animator::RootMotion;
use autopilot::Autopilot;
use contact::ContactTracker;
use evader::Evader;
use query::ScentGrid;
use raycast::WorldOcclusion;
use scene::Arena;

const GRID_SPACING: f32 = 0.5;
const GRID_HALF_COUNT: i32 = 4;

/// How a headless run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub score: Score,
    pub ticks: u64,
    /// False when the tick limit cut the run short.
    pub finished: bool,
}

pub struct Game<P> {
    pub world: World,
    pub session: Session,
    pub arena: Arena,
    presenter: RootMotion<P>,
    contacts: ContactTracker,
    evader: Evader,
    autopilot: Autopilot,
    sim: SimConfig,
    ticks: u64,
}

impl<P: Presenter> Game<P> {
    pub fn new(config: &Config, presenter: P) -> TagResult<Self> {
        let mut world = World::new();
        let arena = scene::build_arena(&mut world);
        let sim = config.sim.clone();

        let (sender, receiver) = unbounded();
        let npc = NpcBuilder::new(arena.npc, arena.player, config.npc.clone())
            .agent(DirectAgent::new(sim.npc_speed, sim.stopping_distance))
            .query(ScentGrid::new(arena.player, GRID_SPACING, GRID_HALF_COUNT))
            .occlusion(WorldOcclusion)
            .events(sender)
            .seed(sim.seed)
            .build(&world)?;
        let session = Session::new(config.session.clone(), npc, receiver);

        Ok(Self {
            world,
            session,
            arena,
            presenter: RootMotion::new(presenter),
            contacts: ContactTracker::new(),
            evader: Evader::new(sim.player_speed, sim.arena_half_extent),
            autopilot: Autopilot::new(sim.rounds),
            sim,
            ticks: 0,
        })
    }

    pub fn presenter(&self) -> &P {
        self.presenter.inner()
    }

    pub fn into_presenter(self) -> P {
        self.presenter.into_inner()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// One fixed step: contacts, session, NPC, then the player.
    pub fn tick(&mut self) -> SessionStatus {
        let dt = self.sim.dt;
        self.ticks += 1;
        // Last tick's locomotion drives this tick's root motion.
        let delta = self.presenter.root_delta(&self.world, self.arena.npc, dt);

        for other in self.contacts.detect(&self.world, self.arena.npc) {
            self.session.npc().on_contact(other);
        }

        let signals = self.autopilot.signals(self.session.state(), self.session.score());
        let mut frame = Frame {
            world: &mut self.world,
            presenter: &mut self.presenter,
            dt,
        };
        let status = self.session.update(&mut frame, signals);

        let npc = self.session.npc_mut();
        npc.update(&mut frame);
        npc.on_root_motion(&mut frame, delta);
        npc.on_look(&mut frame);

        if self.session.state() == GameState::Playing {
            self.evader.step(&mut self.world, self.arena.player, self.arena.npc, dt);
        }
        status
    }

    /// Tick until the session finishes or the tick limit is reached.
    pub fn run(&mut self) -> Outcome {
        let mut finished = false;
        while self.ticks < self.sim.max_ticks {
            if self.tick() == SessionStatus::Finished {
                finished = true;
                break;
            }
        }
        let outcome = Outcome {
            score: self.session.score(),
            ticks: self.ticks,
            finished,
        };
        if finished {
            info!(?outcome, "run complete");
        } else {
            warn!(max_ticks = self.sim.max_ticks, state = ?self.session.state(), "tick limit reached");
        }
        outcome
    }
}
