//! NPC behavior controller: waits, searches, chases and says goodbye.
//!
//! The controller owns its state machine and collaborators. The session
//! drives it through the trigger methods (`begin_chase`, `prepare_exit`,
//! `return_to_wait`, `announce_round_start`); everything else is decided
//! internally from perception and arrival. Per tick the host calls, in order:
//! [`Npc::update`], [`Npc::on_root_motion`], [`Npc::on_look`].

use crossbeam_channel::Sender;
use glam::Vec3;
use hecs::{Entity, World};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::collab::{Frame, MovementAgent, OcclusionQuery, Presenter, SessionEvent, SpatialQuery, VoiceCue};
use crate::components::Transform;
use crate::config::NpcConfig;
use crate::error::{TagError, TagResult};
use crate::fsm::StateMachine;
use crate::perception::{in_look_cone, PerceptionGate, Viewpoint};
use crate::pursuit;
use crate::sequence::Sequence;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NpcState {
    /// Construction sentinel. Never entered.
    None,
    Wait,
    Run,
    Stop,
    PreparingExitGame,
    ExitGame,
}

/// Deferred cue fired by a timed sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cue {
    StopFootsteps,
}

type CueSequence = Sequence<(), Cue>;

pub struct Npc {
    fsm: StateMachine<NpcState>,
    entity: Entity,
    /// Player handle, resolved against the world every time it is needed.
    target: Entity,
    agent: Box<dyn MovementAgent>,
    query: Box<dyn SpatialQuery>,
    occlusion: Box<dyn OcclusionQuery>,
    events: Sender<SessionEvent>,
    config: NpcConfig,
    rng: SmallRng,
    cue: Option<CueSequence>,
    active: bool,
}

/// Collects the NPC's collaborators and refuses to build without all of them.
pub struct NpcBuilder {
    entity: Entity,
    target: Entity,
    config: NpcConfig,
    seed: u64,
    agent: Option<Box<dyn MovementAgent>>,
    query: Option<Box<dyn SpatialQuery>>,
    occlusion: Option<Box<dyn OcclusionQuery>>,
    events: Option<Sender<SessionEvent>>,
}

impl NpcBuilder {
    pub fn new(entity: Entity, target: Entity, config: NpcConfig) -> Self {
        Self {
            entity,
            target,
            config,
            seed: 0,
            agent: None,
            query: None,
            occlusion: None,
            events: None,
        }
    }

    pub fn agent(mut self, agent: impl MovementAgent + 'static) -> Self {
        self.agent = Some(Box::new(agent));
        self
    }

    pub fn query(mut self, query: impl SpatialQuery + 'static) -> Self {
        self.query = Some(Box::new(query));
        self
    }

    pub fn occlusion(mut self, occlusion: impl OcclusionQuery + 'static) -> Self {
        self.occlusion = Some(Box::new(occlusion));
        self
    }

    /// Channel the capture event is reported on.
    pub fn events(mut self, events: Sender<SessionEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// Seed for voice and reaction picks.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Validate collaborators and entities, and queue the first `Wait`.
    pub fn build(self, world: &World) -> TagResult<Npc> {
        let mut agent = self.agent.ok_or(TagError::MissingCollaborator("movement agent"))?;
        let query = self.query.ok_or(TagError::MissingCollaborator("spatial query"))?;
        let occlusion = self.occlusion.ok_or(TagError::MissingCollaborator("occlusion query"))?;
        let events = self.events.ok_or(TagError::MissingCollaborator("session event sink"))?;

        let position = world
            .get::<&Transform>(self.entity)
            .map_err(|_| TagError::MissingEntity("npc"))?
            .position;
        if world.get::<&Transform>(self.target).is_err() {
            return Err(TagError::MissingEntity("npc target"));
        }
        agent.warp(position);

        let mut fsm = StateMachine::new(NpcState::None);
        fsm.set_next(NpcState::Wait);

        Ok(Npc {
            fsm,
            entity: self.entity,
            target: self.target,
            agent,
            query,
            occlusion,
            events,
            config: self.config,
            rng: SmallRng::seed_from_u64(self.seed),
            cue: None,
            active: true,
        })
    }
}

fn transform_of(world: &World, entity: Entity) -> Option<Transform> {
    world.get::<&Transform>(entity).ok().map(|t| *t)
}

impl Npc {
    pub fn state(&self) -> NpcState {
        self.fsm.current()
    }

    pub fn pending_state(&self) -> NpcState {
        self.fsm.next()
    }

    pub fn entity(&self) -> Entity {
        self.entity
    }

    pub fn target(&self) -> Entity {
        self.target
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn destination(&self) -> Vec3 {
        self.agent.destination()
    }

    pub fn is_searching(&self) -> bool {
        self.query.enabled()
    }

    // -----------------------------------------------------------------------
    // Triggers
    // -----------------------------------------------------------------------

    /// Leave `Wait` and start hunting. Only honored while waiting.
    pub fn begin_chase(&mut self) {
        if self.state() != NpcState::Wait {
            debug!(state = ?self.state(), "begin_chase ignored");
            return;
        }
        self.fsm.set_next(NpcState::Stop);
    }

    /// Walk over to the player for the goodbye. Ignored once already exiting.
    pub fn prepare_exit(&mut self) {
        if matches!(self.state(), NpcState::PreparingExitGame | NpcState::ExitGame) {
            debug!(state = ?self.state(), "prepare_exit ignored");
            return;
        }
        self.fsm.set_next(NpcState::PreparingExitGame);
    }

    /// Reset to `Wait` for the next round.
    pub fn return_to_wait(&mut self) {
        self.fsm.set_next(NpcState::Wait);
    }

    /// Speak one of the round-start lines. Only honored while waiting.
    pub fn announce_round_start(&mut self, presenter: &mut dyn Presenter) {
        if self.state() != NpcState::Wait {
            debug!(state = ?self.state(), "announce_round_start ignored");
            return;
        }
        presenter.stop_footsteps();
        let variant = self.rng.gen_range(0..self.config.start_voices.max(1));
        presenter.play_voice(VoiceCue::RoundStart(variant), self.config.voice_delay);
    }

    /// Physical contact with `other`. Touching the target reports a capture;
    /// whether it counts is the session's call.
    pub fn on_contact(&self, other: Entity) {
        if other != self.target {
            return;
        }
        if self.events.send(SessionEvent::Capture).is_err() {
            debug!("capture dropped: session is gone");
        }
    }

    /// Stop updating entirely. Used once the exit sequence is over.
    pub fn deactivate(&mut self) {
        self.active = false;
        self.query.set_enabled(false);
        self.cue = None;
        info!("npc deactivated");
    }

    // -----------------------------------------------------------------------
    // Per-tick
    // -----------------------------------------------------------------------

    pub fn update(&mut self, frame: &mut Frame) {
        if !self.active {
            return;
        }
        self.resume_cue(frame.presenter, frame.dt);

        while self.fsm.pending() {
            let state = self.fsm.do_transit();
            self.cue = None;
            debug!(?state, "npc entered state");
            self.enter(state, frame);
        }

        match self.state() {
            NpcState::Wait => {
                let can_perceive = self.perceive(frame.world);
                self.query.set_enabled(can_perceive);
            }
            NpcState::Run | NpcState::Stop => self.update_destination(frame.world),
            _ => {}
        }
    }

    /// Root-motion callback: the animation system reports how far the NPC
    /// moved this tick. Movement is committed only here.
    pub fn on_root_motion(&mut self, frame: &mut Frame, delta: Vec3) {
        if !self.active {
            return;
        }
        let mut velocity = self.agent.desired_velocity();
        if pursuit::arrived(self.agent.remaining_distance(), self.agent.stopping_distance()) {
            velocity = Vec3::ZERO;
            if let Some(next) = pursuit::on_arrival(self.state()) {
                self.fsm.set_next(next);
            }
        }

        let Ok(mut transform) = frame.world.get::<&mut Transform>(self.entity) else {
            warn!("npc transform missing, root motion skipped");
            return;
        };
        // The agent steers rotation; position waits for the animation delta.
        transform.face(velocity);
        let local = transform.inverse_transform_direction(velocity);
        frame.presenter.set_locomotion(local.z, local.x.atan2(local.z));

        let next = transform.position + delta;
        transform.position = next;
        self.agent.set_next_position(next);
    }

    /// Late-tick head and body facing toward the target.
    pub fn on_look(&mut self, frame: &mut Frame) {
        if !self.active {
            return;
        }
        let Some(target) = transform_of(frame.world, self.target) else {
            return;
        };
        let Ok(mut transform) = frame.world.get::<&mut Transform>(self.entity) else {
            return;
        };
        let direction = target.position - transform.position;
        match self.state() {
            NpcState::Stop | NpcState::ExitGame => {
                transform.face(direction);
                frame.presenter.look_at(target.position);
            }
            NpcState::Wait => {
                if in_look_cone(transform.forward(), transform.up(), direction) {
                    frame.presenter.look_at(target.position);
                }
            }
            _ => {}
        }
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn enter(&mut self, state: NpcState, frame: &mut Frame) {
        let Some(own) = transform_of(frame.world, self.entity) else {
            warn!(?state, "npc transform missing, entry skipped");
            return;
        };
        match state {
            NpcState::Wait => {
                self.query.set_enabled(false);
                self.agent.set_destination(own.position);
                frame.presenter.stop_footsteps();
                if let Some(target) = transform_of(frame.world, self.target) {
                    if let Ok(mut transform) = frame.world.get::<&mut Transform>(self.entity) {
                        transform.face(target.position - own.position);
                    }
                }
            }
            NpcState::Run => {
                frame.presenter.start_footsteps(self.config.run_footstep_delay);
            }
            NpcState::Stop => {
                self.query.set_enabled(false);
                self.agent.set_destination(own.position);
                self.cue = Some(
                    Sequence::new()
                        .wait(self.config.stop_footstep_delay)
                        .run(Cue::StopFootsteps),
                );
                self.resume_cue(frame.presenter, 0.0);
            }
            NpcState::PreparingExitGame => {
                self.query.set_enabled(false);
                match transform_of(frame.world, self.target) {
                    Some(target) => {
                        let spot = target.position + target.forward() * self.config.exit_offset;
                        self.agent.set_destination(spot);
                    }
                    None => {
                        warn!("target missing, saying goodbye in place");
                        self.agent.set_destination(own.position);
                    }
                }
            }
            NpcState::ExitGame => {
                frame.presenter.stop_footsteps();
                let reaction = self.pick_exit_reaction();
                frame.presenter.play_animation(&format!("ExitGame{reaction}"));
                frame.presenter.play_voice(VoiceCue::Exit(reaction), 0.0);
                info!(reaction, "npc exit reaction");
            }
            NpcState::None => {}
        }
    }

    fn resume_cue(&mut self, presenter: &mut dyn Presenter, dt: f32) {
        let Some(cue) = self.cue.as_mut() else {
            return;
        };
        cue.tick(dt);
        while let Some(action) = cue.poll(|_| true) {
            match action {
                Cue::StopFootsteps => presenter.stop_footsteps(),
            }
        }
        if cue.is_finished() {
            self.cue = None;
        }
    }

    fn perceive(&self, world: &World) -> bool {
        let (Some(own), Some(target)) = (transform_of(world, self.entity), transform_of(world, self.target)) else {
            warn!("npc or target transform missing, perception blind");
            return false;
        };
        let gate = PerceptionGate {
            escape_distance: self.config.escape_distance,
            target_height: self.config.target_height,
        };
        let viewer = Viewpoint {
            position: own.position,
            forward: own.forward(),
            up: own.up(),
            eye_height: self.config.eye_height,
        };
        gate.evaluate(self.occlusion.as_ref(), world, &viewer, self.entity, self.target, target.position)
    }

    fn update_destination(&mut self, world: &World) {
        let can_perceive = self.perceive(world);
        self.query.set_enabled(can_perceive);

        let best = if self.query.enabled() { self.query.best_result(world) } else { None };
        let position = transform_of(world, self.entity).map_or(self.agent.destination(), |t| t.position);
        let steer = pursuit::steer(can_perceive, best, position);
        if let Some(destination) = steer.destination() {
            self.agent.set_destination(destination);
        }
        if steer.is_chasing() && self.state() == NpcState::Stop {
            self.fsm.set_next(NpcState::Run);
        }
    }

    /// Reaction 0 or 1, weighted by `exit_weights` (3:1 by default).
    fn pick_exit_reaction(&mut self) -> usize {
        let [first, second] = self.config.exit_weights.map(u64::from);
        let total = first + second;
        if total == 0 {
            return 0;
        }
        if self.rng.gen_range(0..total) < first {
            0
        } else {
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::agent::DirectAgent;
    use crate::sim::presenter::RecordingPresenter;
    use crate::sim::stubs::{FixedQuery, ScriptedAgent, SeeThrough};
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};
    use crossbeam_channel::{unbounded, Receiver};

    struct Rig {
        world: World,
        npc: Npc,
        player: Entity,
        presenter: RecordingPresenter,
        captures: Receiver<SessionEvent>,
    }

    impl Rig {
        fn new(player_at: Vec3, best: Option<Vec3>) -> Self {
            Self::with_agent(player_at, best, ScriptedAgent::default())
        }

        fn with_agent(player_at: Vec3, best: Option<Vec3>, agent: impl MovementAgent + 'static) -> Self {
            let mut world = World::new();
            let npc_entity = world.spawn((Transform::new(Vec3::ZERO),));
            let player = world.spawn((Transform::new(player_at),));
            let (tx, rx) = unbounded();
            let npc = NpcBuilder::new(npc_entity, player, NpcConfig::default())
                .agent(agent)
                .query(FixedQuery::new(best))
                .occlusion(SeeThrough(player))
                .events(tx)
                .build(&world)
                .unwrap();
            Self { world, npc, player, presenter: RecordingPresenter::default(), captures: rx }
        }

        fn tick(&mut self, dt: f32) {
            let mut frame = Frame { world: &mut self.world, presenter: &mut self.presenter, dt };
            self.npc.update(&mut frame);
            self.npc.on_root_motion(&mut frame, Vec3::ZERO);
            self.npc.on_look(&mut frame);
        }

        fn root_motion(&mut self, delta: Vec3) {
            let mut frame = Frame { world: &mut self.world, presenter: &mut self.presenter, dt: 0.25 };
            self.npc.on_root_motion(&mut frame, delta);
        }

        /// Run the late look and report whether the NPC looked at the target.
        fn look(&mut self) -> bool {
            let before = self.presenter.looks;
            let mut frame = Frame { world: &mut self.world, presenter: &mut self.presenter, dt: 0.25 };
            self.npc.on_look(&mut frame);
            self.presenter.looks > before
        }

        fn npc_transform(&self) -> Transform {
            *self.world.get::<&Transform>(self.npc.entity()).unwrap()
        }

        fn turn_npc(&mut self, yaw: f32) {
            let entity = self.npc.entity();
            let mut transform = self.world.get::<&mut Transform>(entity).unwrap();
            transform.rotation = glam::Quat::from_rotation_y(yaw);
        }

        fn move_player(&mut self, to: Vec3) {
            self.world.get::<&mut Transform>(self.player).unwrap().position = to;
        }
    }

    #[test]
    fn built_npc_tracks_the_given_target() {
        let rig = Rig::new(Vec3::new(0.0, 0.0, 3.0), None);
        assert_eq!(rig.npc.target(), rig.player);
        assert_eq!(rig.npc.pending_state(), NpcState::Wait);
    }

    #[test]
    fn build_rejects_missing_collaborators() {
        let mut world = World::new();
        let a = world.spawn((Transform::new(Vec3::ZERO),));
        let b = world.spawn((Transform::new(Vec3::ONE),));
        let err = NpcBuilder::new(a, b, NpcConfig::default())
            .query(FixedQuery::new(None))
            .occlusion(SeeThrough(b))
            .events(unbounded().0)
            .build(&world)
            .err()
            .unwrap();
        assert!(matches!(err, TagError::MissingCollaborator("movement agent")));
    }

    #[test]
    fn build_rejects_unknown_target() {
        let mut world = World::new();
        let a = world.spawn((Transform::new(Vec3::ZERO),));
        let b = world.spawn(());
        let err = NpcBuilder::new(a, b, NpcConfig::default())
            .agent(ScriptedAgent::default())
            .query(FixedQuery::new(None))
            .occlusion(SeeThrough(b))
            .events(unbounded().0)
            .build(&world)
            .err()
            .unwrap();
        assert!(matches!(err, TagError::MissingEntity("npc target")));
    }

    #[test]
    fn first_tick_enters_wait_and_faces_target() {
        let mut rig = Rig::new(Vec3::new(-4.0, 0.0, 0.0), None);
        rig.tick(0.25);
        assert_eq!(rig.npc.state(), NpcState::Wait);
        let forward = rig.world.get::<&Transform>(rig.npc.entity()).unwrap().forward();
        assert!((forward - Vec3::NEG_X).length() < 1e-5);
        assert!(rig.presenter.footsteps_stopped >= 1);
    }

    #[test]
    fn wait_toggles_query_with_perception() {
        let mut rig = Rig::new(Vec3::new(0.0, 0.0, 3.0), None);
        rig.tick(0.25);
        assert!(rig.npc.is_searching());
        rig.move_player(Vec3::new(0.0, 0.0, 30.0));
        rig.tick(0.25);
        assert!(!rig.npc.is_searching());
    }

    #[test]
    fn begin_chase_only_from_wait() {
        let mut rig = Rig::new(Vec3::new(0.0, 0.0, 30.0), None);
        rig.npc.begin_chase();
        assert_eq!(rig.npc.pending_state(), NpcState::Wait);
        rig.tick(0.25);
        rig.npc.begin_chase();
        rig.tick(0.25);
        assert_eq!(rig.npc.state(), NpcState::Stop);
    }

    #[test]
    fn stop_switches_to_run_when_target_perceived() {
        let best = Vec3::new(0.0, 0.0, 2.5);
        let mut rig = Rig::new(Vec3::new(0.0, 0.0, 3.0), Some(best));
        rig.tick(0.25);
        rig.npc.begin_chase();
        rig.tick(0.25);
        assert_eq!(rig.npc.state(), NpcState::Stop);
        assert_eq!(rig.npc.destination(), best);
        rig.tick(0.25);
        assert_eq!(rig.npc.state(), NpcState::Run);
        assert_eq!(rig.presenter.footsteps_started, vec![0.5]);
    }

    #[test]
    fn lost_target_pins_destination_in_place() {
        let mut rig = Rig::new(Vec3::new(0.0, 0.0, 30.0), Some(Vec3::new(5.0, 0.0, 5.0)));
        rig.tick(0.25);
        rig.npc.begin_chase();
        for _ in 0..8 {
            rig.tick(0.25);
            assert_eq!(rig.npc.state(), NpcState::Stop);
            assert_eq!(rig.npc.destination(), Vec3::ZERO);
        }
    }

    #[test]
    fn stop_silences_footsteps_after_delay() {
        let mut rig = Rig::new(Vec3::new(0.0, 0.0, 30.0), None);
        rig.tick(0.25);
        rig.npc.begin_chase();
        rig.tick(0.25);
        let stopped = rig.presenter.footsteps_stopped;
        rig.tick(0.25);
        assert_eq!(rig.presenter.footsteps_stopped, stopped);
        rig.tick(0.25);
        assert_eq!(rig.presenter.footsteps_stopped, stopped + 1);
    }

    #[test]
    fn prepare_exit_walks_in_front_of_target_then_exits() {
        let mut rig = Rig::new(Vec3::new(0.0, 0.0, 30.0), None);
        rig.tick(0.25);
        rig.npc.prepare_exit();
        rig.tick(0.25);
        assert_eq!(rig.npc.state(), NpcState::PreparingExitGame);
        // Player faces +Z by default: goodbye spot is two units ahead of them.
        assert_eq!(rig.npc.destination(), Vec3::new(0.0, 0.0, 32.0));
        assert!(!rig.npc.is_searching());

        // ScriptedAgent reports arrival once the destination is reached.
        rig.npc.agent.warp(Vec3::new(0.0, 0.0, 32.0));
        rig.tick(0.25);
        rig.tick(0.25);
        assert_eq!(rig.npc.state(), NpcState::ExitGame);
        assert_eq!(rig.presenter.animations.len(), 1);
        assert!(rig.presenter.animations[0].starts_with("ExitGame"));
    }

    #[test]
    fn prepare_exit_is_ignored_once_exiting() {
        let mut rig = Rig::new(Vec3::new(0.0, 0.0, 30.0), None);
        rig.tick(0.25);
        rig.npc.prepare_exit();
        rig.tick(0.25);
        rig.npc.prepare_exit();
        assert_eq!(rig.npc.pending_state(), NpcState::None);
    }

    #[test]
    fn round_start_voice_only_while_waiting() {
        let mut rig = Rig::new(Vec3::new(0.0, 0.0, 30.0), None);
        rig.npc.announce_round_start(&mut rig.presenter);
        assert!(rig.presenter.voices.is_empty());
        rig.tick(0.25);
        rig.npc.announce_round_start(&mut rig.presenter);
        assert_eq!(rig.presenter.voices.len(), 1);
        let (cue, delay) = rig.presenter.voices[0];
        assert!(matches!(cue, VoiceCue::RoundStart(i) if i < 3));
        assert_eq!(delay, 0.3);
    }

    #[test]
    fn exit_reactions_follow_weights() {
        let mut rig = Rig::new(Vec3::ZERO, None);
        let picks: Vec<usize> = (0..4000).map(|_| rig.npc.pick_exit_reaction()).collect();
        let first = picks.iter().filter(|&&i| i == 0).count();
        assert!(picks.iter().all(|&i| i < 2));
        assert!((2700..3300).contains(&first), "first reaction picked {first} times");
    }

    #[test]
    fn extreme_exit_weights_do_not_overflow() {
        let mut rig = Rig::new(Vec3::ZERO, None);
        rig.npc.config.exit_weights = [u32::MAX, u32::MAX];
        assert!((0..100).map(|_| rig.npc.pick_exit_reaction()).all(|i| i < 2));
        rig.npc.config.exit_weights = [0, u32::MAX];
        assert!((0..100).all(|_| rig.npc.pick_exit_reaction() == 1));
    }

    #[test]
    fn root_motion_moves_only_by_the_animation_delta() {
        // Goodbye spot is (30, 0, 0): straight down +X from the NPC.
        let agent = DirectAgent::new(2.0, 0.5);
        let mut rig = Rig::with_agent(Vec3::new(30.0, 0.0, -2.0), None, agent);
        rig.tick(0.25);
        rig.npc.prepare_exit();
        rig.tick(0.25);
        assert_eq!(rig.npc.state(), NpcState::PreparingExitGame);
        assert_eq!(rig.npc_transform().position, Vec3::ZERO);

        let delta = Vec3::new(0.3, 0.0, 0.0);
        rig.root_motion(delta);

        let transform = rig.npc_transform();
        assert_eq!(transform.position, delta);
        assert!((rig.npc.agent.remaining_distance() - 29.7).abs() < 1e-4);
        assert!((transform.forward() - Vec3::X).length() < 1e-5);
        let (forward, turn) = rig.presenter.locomotion.unwrap();
        assert!((forward - 2.0).abs() < 1e-4, "forward {forward}");
        assert!(turn.abs() < 1e-4, "turn {turn}");
        assert_eq!(rig.npc.state(), NpcState::PreparingExitGame);
    }

    #[test]
    fn agent_velocity_sets_yaw_before_locomotion() {
        let agent = DirectAgent::new(2.0, 0.5);
        let mut rig = Rig::with_agent(Vec3::new(30.0, 0.0, -2.0), None, agent);
        rig.tick(0.25);
        rig.npc.prepare_exit();
        rig.tick(0.25);

        // Facing is rebuilt from the velocity before it is made local, so the
        // agent always reports straight-ahead motion with no turn.
        rig.turn_npc(PI);
        rig.root_motion(Vec3::ZERO);
        assert!((rig.npc_transform().forward() - Vec3::X).length() < 1e-5);
        let (forward, turn) = rig.presenter.locomotion.unwrap();
        assert!((forward - 2.0).abs() < 1e-4);
        assert!(turn.abs() < 1e-4);
        assert_eq!(rig.npc_transform().position, Vec3::ZERO);
    }

    #[test]
    fn stop_turns_to_face_the_target_and_looks() {
        let mut rig = Rig::new(Vec3::new(20.0, 0.0, 0.0), None);
        rig.tick(0.25);
        rig.npc.begin_chase();
        rig.tick(0.25);
        assert_eq!(rig.npc.state(), NpcState::Stop);

        rig.turn_npc(PI);
        assert!(rig.look());
        assert!((rig.npc_transform().forward() - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn waiting_npc_only_looks_inside_the_cone() {
        let mut rig = Rig::new(Vec3::new(0.0, 0.0, 5.0), None);
        rig.tick(0.25);
        assert_eq!(rig.npc.state(), NpcState::Wait);

        assert!(rig.look());
        rig.turn_npc(FRAC_PI_4);
        assert!(rig.look());
        rig.turn_npc(FRAC_PI_2);
        assert!(!rig.look());
        // Waiting never turns the body.
        assert!((rig.npc_transform().forward() - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn contact_with_target_reports_capture() {
        let rig = Rig::new(Vec3::ZERO, None);
        let stranger = Entity::DANGLING;
        rig.npc.on_contact(stranger);
        assert!(rig.captures.try_recv().is_err());
        rig.npc.on_contact(rig.player);
        assert_eq!(rig.captures.try_recv(), Ok(SessionEvent::Capture));
    }

    #[test]
    fn deactivated_npc_ignores_ticks() {
        let mut rig = Rig::new(Vec3::ZERO, None);
        rig.npc.deactivate();
        rig.tick(0.25);
        assert_eq!(rig.npc.state(), NpcState::None);
    }
}
