//! Game session controller: rounds, countdown, scores and shutdown.
//!
//! The session owns the NPC controller and steers its high-level mode. The
//! NPC answers with a single event, [`SessionEvent::Capture`], delivered over
//! the channel whose sender was handed to the NPC at construction.

use crossbeam_channel::Receiver;
use tracing::{debug, info};

use crate::collab::{Frame, Presenter, SessionEvent, Signals};
use crate::config::SessionConfig;
use crate::fsm::StateMachine;
use crate::npc::{Npc, NpcState};
use crate::sequence::Sequence;

const PROMPT: &str = "Press start to play.\nPress cancel to quit.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    /// Construction sentinel. Never entered.
    None,
    Preparing,
    ReadyForPlay,
    Playing,
    PlayerWin,
    PlayerLose,
    ReadyForNextGame,
    ExitGame,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Running,
    /// The exit sequence completed; the host should shut down.
    Finished,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    pub player: u32,
    pub npc: u32,
}

/// Conditions a session script can suspend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Await {
    NpcIs(NpcState),
}

/// Steps a session script hands back to the session.
#[derive(Debug, Clone, PartialEq)]
enum Action {
    Show(String),
    NpcBeginChase,
    NpcAnnounce,
    Transit(GameState),
    DeactivateNpc,
    Finish,
}

type Script = Sequence<Await, Action>;

pub struct Session {
    fsm: StateMachine<GameState>,
    npc: Npc,
    captures: Receiver<SessionEvent>,
    config: SessionConfig,
    remaining_time: f32,
    score: Score,
    script: Option<Script>,
    message: String,
    finished: bool,
}

impl Session {
    /// `captures` must be the receiving end of the channel given to `npc`.
    pub fn new(config: SessionConfig, npc: Npc, captures: Receiver<SessionEvent>) -> Self {
        let mut fsm = StateMachine::new(GameState::None);
        fsm.set_next(GameState::Preparing);
        Self {
            fsm,
            npc,
            captures,
            config,
            remaining_time: 0.0,
            score: Score::default(),
            script: None,
            message: String::new(),
            finished: false,
        }
    }

    pub fn state(&self) -> GameState {
        self.fsm.current()
    }

    pub fn score(&self) -> Score {
        self.score
    }

    /// Seconds left in the round. Only meaningful while playing.
    pub fn remaining_time(&self) -> Option<f32> {
        (self.state() == GameState::Playing).then_some(self.remaining_time)
    }

    /// Last message shown to the player.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn npc(&self) -> &Npc {
        &self.npc
    }

    pub fn npc_mut(&mut self) -> &mut Npc {
        &mut self.npc
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Advance one tick: events, running script, transitions, then the
    /// current state's update.
    pub fn update(&mut self, frame: &mut Frame, signals: Signals) -> SessionStatus {
        if self.finished {
            return SessionStatus::Finished;
        }

        let dt = frame.dt;
        self.drain_events();
        self.resume_script(frame, dt);
        if self.finished {
            return SessionStatus::Finished;
        }

        while self.fsm.pending() {
            let state = self.fsm.do_transit();
            self.script = None;
            info!(?state, score = ?self.score, "session entered state");
            self.enter(state, frame);
        }

        match self.state() {
            GameState::Preparing => {
                if signals.start {
                    self.fsm.set_next(GameState::ReadyForPlay);
                } else if signals.cancel {
                    self.prepare_to_exit(frame.presenter);
                }
            }
            GameState::Playing => {
                self.remaining_time -= dt;
                if self.remaining_time < 0.0 {
                    self.fsm.set_next(GameState::PlayerLose);
                } else {
                    let text = format!("{:.2}", self.remaining_time);
                    self.show(frame.presenter, &text);
                }
            }
            _ => {}
        }

        if self.finished {
            SessionStatus::Finished
        } else {
            SessionStatus::Running
        }
    }

    fn enter(&mut self, state: GameState, frame: &mut Frame) {
        match state {
            GameState::Preparing => self.show(frame.presenter, PROMPT),
            GameState::ReadyForPlay => {
                let step = self.config.countdown_step;
                let script = Script::new()
                    .until(Await::NpcIs(NpcState::Wait))
                    .run(Action::Show("3".into()))
                    .wait(step)
                    .run(Action::Show("2".into()))
                    .wait(step)
                    .run(Action::Show("1".into()))
                    .wait(step)
                    .run(Action::Show("Game Start".into()))
                    .run(Action::NpcBeginChase)
                    .run(Action::NpcAnnounce)
                    .wait(self.config.start_hold)
                    .run(Action::Transit(GameState::Playing));
                self.start_script(script, frame);
            }
            GameState::Playing => self.remaining_time = self.config.game_time,
            GameState::PlayerWin => {
                self.score.player += 1;
                self.show_result(frame.presenter, "You Win.");
                let script = Script::new()
                    .wait(self.config.result_delay)
                    .run(Action::Transit(GameState::ReadyForNextGame));
                self.start_script(script, frame);
            }
            GameState::PlayerLose => {
                self.score.npc += 1;
                self.show_result(frame.presenter, "You Lose.");
                let script = Script::new()
                    .wait(self.config.result_delay)
                    .run(Action::Transit(GameState::ReadyForNextGame));
                self.start_script(script, frame);
            }
            GameState::ReadyForNextGame => {
                self.npc.return_to_wait();
                self.fsm.set_next(GameState::Preparing);
            }
            GameState::ExitGame => {
                let script = Script::new()
                    .until(Await::NpcIs(NpcState::ExitGame))
                    .wait(self.config.exit_delay)
                    .run(Action::DeactivateNpc)
                    .run(Action::Finish);
                self.start_script(script, frame);
            }
            GameState::None => {}
        }
    }

    fn drain_events(&mut self) {
        for event in self.captures.try_iter() {
            match event {
                SessionEvent::Capture if self.fsm.current() == GameState::Playing => {
                    info!(remaining = self.remaining_time, "player captured");
                    self.fsm.set_next(GameState::PlayerWin);
                }
                SessionEvent::Capture => {
                    debug!(state = ?self.fsm.current(), "capture ignored");
                }
            }
        }
    }

    /// Cancel from the start prompt. Ignored anywhere else.
    fn prepare_to_exit(&mut self, presenter: &mut dyn Presenter) {
        if self.state() != GameState::Preparing {
            debug!(state = ?self.state(), "exit request ignored");
            return;
        }
        self.show(presenter, "");
        self.npc.prepare_exit();
        self.fsm.set_next(GameState::ExitGame);
    }

    fn start_script(&mut self, script: Script, frame: &mut Frame) {
        self.script = Some(script);
        self.resume_script(frame, 0.0);
    }

    fn resume_script(&mut self, frame: &mut Frame, dt: f32) {
        let Some(mut script) = self.script.take() else {
            return;
        };
        script.tick(dt);
        while let Some(action) = script.poll(|condition| self.ready(condition)) {
            self.apply(action, frame);
        }
        if !script.is_finished() {
            self.script = Some(script);
        }
    }

    fn ready(&self, condition: &Await) -> bool {
        match condition {
            Await::NpcIs(state) => self.npc.state() == *state,
        }
    }

    fn apply(&mut self, action: Action, frame: &mut Frame) {
        match action {
            Action::Show(text) => self.show(frame.presenter, &text),
            Action::NpcBeginChase => self.npc.begin_chase(),
            Action::NpcAnnounce => self.npc.announce_round_start(frame.presenter),
            Action::Transit(state) => self.fsm.set_next(state),
            Action::DeactivateNpc => self.npc.deactivate(),
            Action::Finish => {
                info!(score = ?self.score, "session finished");
                self.finished = true;
            }
        }
    }

    fn show_result(&mut self, presenter: &mut dyn Presenter, headline: &str) {
        let text = format!(
            "{headline}\nTotal Score\nYou: {}\nNPC: {}",
            self.score.player, self.score.npc
        );
        self.show(presenter, &text);
    }

    fn show(&mut self, presenter: &mut dyn Presenter, text: &str) {
        text.clone_into(&mut self.message);
        presenter.show_message(text);
    }
}
