use crate::scheduler::{ImmediateScheduler, Pause, Scheduler};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{Level, event};
use xuantuo_bot::{HeuristicPolicy, Policy, PolicyContext};
use xuantuo_core::game::error::ActionError;
use xuantuo_core::game::kou_le::KouLeResponse;
use xuantuo_core::game::serialization::SessionSnapshot;
use xuantuo_core::game::session::{Action, Outcome, Phase, Session};
use xuantuo_core::model::card::Card;
use xuantuo_core::model::legal::Candidate;
use xuantuo_core::model::player::Participant;

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error(transparent)]
    Action(#[from] ActionError),
    #[error("{0} is driven by a policy and cannot take manual input")]
    AutomatedSeat(Participant),
    #[error("policy for {0} produced no play")]
    NoDecision(Participant),
    #[error("snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// What the table is waiting for, derived from the session after every
/// transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingTask {
    /// Nothing dealt yet.
    Deal,
    /// A policy-driven seat has to play or declare.
    AutomatonTurn(Participant),
    /// A policy-driven seat has to answer the open Kou Le.
    AutomatonKouLe(Participant),
    /// The round-over pause is running.
    FinishRound,
    /// A manual seat has to play or declare.
    ManualTurn(Participant),
    /// Only manual seats still owe a Kou Le answer.
    ManualKouLe(Participant),
    /// Settlement is on screen.
    Settlement,
}

/// Owns a session and drives every policy-controlled seat after each
/// manual action, pausing through the scheduler.
pub struct GameController<S: Scheduler = ImmediateScheduler> {
    session: Session,
    policies: [Option<Box<dyn Policy>>; 3],
    declared: [bool; 3],
    scheduler: S,
}

impl GameController<ImmediateScheduler> {
    /// Player is manual; both automatons run the heuristic policy configured
    /// from the environment.
    pub fn with_seed(seed: u64) -> Self {
        Self::new(Session::with_seed(seed), ImmediateScheduler)
    }
}

impl<S: Scheduler> GameController<S> {
    pub fn new(session: Session, scheduler: S) -> Self {
        let mut seeds = StdRng::seed_from_u64(session.seed());
        let mut automaton = || -> Option<Box<dyn Policy>> {
            Some(Box::new(HeuristicPolicy::from_env(seeds.next_u64())))
        };
        let policies = [None, automaton(), automaton()];
        Self::with_policies(session, policies, scheduler)
    }

    pub fn with_policies(
        session: Session,
        policies: [Option<Box<dyn Policy>>; 3],
        scheduler: S,
    ) -> Self {
        Self {
            session,
            policies,
            declared: [false; 3],
            scheduler,
        }
    }

    pub fn set_policy(&mut self, seat: Participant, policy: Option<Box<dyn Policy>>) {
        self.policies[seat.index()] = policy;
    }

    pub fn is_automated(&self, seat: Participant) -> bool {
        self.policies[seat.index()].is_some()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    pub fn status_text(&self) -> String {
        let session = &self.session;
        let turn = session.turn();
        format!(
            "Hand {} • Phase: {} • Turn: {} • Collected: {:?}",
            session.hands_dealt(),
            session.phase(),
            session.display_name(turn),
            session.collected_counts()
        )
    }

    pub fn legal_moves(&self, seat: Participant) -> Vec<Candidate> {
        self.session.legal_options(seat)
    }

    pub fn pending_task(&self) -> PendingTask {
        let session = &self.session;
        match session.phase() {
            Phase::Waiting => PendingTask::Deal,
            Phase::Settlement => PendingTask::Settlement,
            Phase::RoundOver => PendingTask::FinishRound,
            Phase::Playing => {
                let seat = session.turn();
                if self.is_automated(seat) {
                    PendingTask::AutomatonTurn(seat)
                } else {
                    PendingTask::ManualTurn(seat)
                }
            }
            Phase::KouLeDecision => {
                let pending: Vec<Participant> = session
                    .kou_le()
                    .map(|negotiation| negotiation.pending().collect())
                    .unwrap_or_default();
                match pending.iter().copied().find(|seat| self.is_automated(*seat)) {
                    Some(seat) => PendingTask::AutomatonKouLe(seat),
                    None => pending
                        .first()
                        .copied()
                        .map(PendingTask::ManualKouLe)
                        .unwrap_or(PendingTask::Settlement),
                }
            }
        }
    }

    /// Deals a new hand and runs automatons until manual input is needed.
    pub fn deal(&mut self) -> Result<Vec<Outcome>, ControllerError> {
        self.act(Action::Deal)
    }

    pub fn play(
        &mut self,
        seat: Participant,
        cards: Vec<Card>,
        discard: bool,
    ) -> Result<Vec<Outcome>, ControllerError> {
        self.manual(seat)?;
        self.act(Action::SubmitPlay {
            participant: seat,
            cards,
            discard,
        })
    }

    pub fn declare_kou_le(&mut self, seat: Participant) -> Result<Vec<Outcome>, ControllerError> {
        self.manual(seat)?;
        self.act(Action::DeclareKouLe { participant: seat })
    }

    pub fn respond_kou_le(
        &mut self,
        seat: Participant,
        response: KouLeResponse,
    ) -> Result<Vec<Outcome>, ControllerError> {
        self.manual(seat)?;
        self.act(Action::RespondKouLe {
            participant: seat,
            response,
        })
    }

    pub fn settle_and_restart(&mut self) -> Result<Vec<Outcome>, ControllerError> {
        self.act(Action::SettleAndRestart)
    }

    /// Applies `action`, then keeps stepping policy-driven seats until the
    /// table waits on a manual seat, on settlement, or on a deal.
    pub fn act(&mut self, action: Action) -> Result<Vec<Outcome>, ControllerError> {
        let mut outcomes = vec![self.apply(action)?];
        outcomes.extend(self.pump()?);
        Ok(outcomes)
    }

    /// Runs pending automaton tasks. Each task is recomputed from the session
    /// after the previous transition.
    pub fn pump(&mut self) -> Result<Vec<Outcome>, ControllerError> {
        let mut outcomes = Vec::new();
        while let Some(outcome) = self.step()? {
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }

    /// Performs one automaton task, or returns `None` when the table is
    /// waiting on something else.
    pub fn step(&mut self) -> Result<Option<Outcome>, ControllerError> {
        let action = match self.pending_task() {
            PendingTask::AutomatonTurn(seat) => {
                self.scheduler.pause(Pause::AutomatonPlay);
                self.automaton_turn(seat)?
            }
            PendingTask::AutomatonKouLe(seat) => {
                self.scheduler.pause(Pause::KouLeResponse);
                let ctx = PolicyContext::from_session(&self.session, seat);
                let response = match self.policies[seat.index()].as_mut() {
                    Some(policy) => policy.respond_kou_le(&ctx),
                    None => return Err(ControllerError::NoDecision(seat)),
                };
                Action::RespondKouLe {
                    participant: seat,
                    response,
                }
            }
            PendingTask::FinishRound => {
                self.scheduler.pause(Pause::RoundFinish);
                Action::FinishRound
            }
            PendingTask::Deal
            | PendingTask::ManualTurn(_)
            | PendingTask::ManualKouLe(_)
            | PendingTask::Settlement => return Ok(None),
        };

        let outcome = self.apply(action)?;
        if tracing::enabled!(Level::DEBUG) {
            event!(
                target: "xuantuo_app::controller",
                Level::DEBUG,
                outcome = ?outcome,
                phase = %self.session.phase(),
                turn = %self.session.turn(),
            );
        }
        Ok(Some(outcome))
    }

    fn automaton_turn(&mut self, seat: Participant) -> Result<Action, ControllerError> {
        let ctx = PolicyContext::from_session(&self.session, seat);
        let Some(policy) = self.policies[seat.index()].as_mut() else {
            return Err(ControllerError::NoDecision(seat));
        };

        // Every opening rolls, but a challenged declarer has to play first.
        if !self.declared[seat.index()] && ctx.table.is_empty() && policy.wants_kou_le(&ctx) {
            self.declared[seat.index()] = true;
            return Ok(Action::DeclareKouLe { participant: seat });
        }

        let decision = policy
            .choose_play(&ctx)
            .ok_or(ControllerError::NoDecision(seat))?;
        self.declared[seat.index()] = false;
        Ok(decision.into_action(seat))
    }

    fn apply(&mut self, action: Action) -> Result<Outcome, ControllerError> {
        let outcome = self.session.apply(action)?;
        if matches!(outcome, Outcome::Dealt { .. }) {
            self.declared = [false; 3];
        }
        Ok(outcome)
    }

    fn manual(&self, seat: Participant) -> Result<(), ControllerError> {
        if self.is_automated(seat) {
            return Err(ControllerError::AutomatedSeat(seat));
        }
        Ok(())
    }

    /// Writes the session snapshot JSON to `path` for inspection.
    pub fn export_snapshot(&self, path: &Path) -> Result<(), ControllerError> {
        let json = SessionSnapshot::to_json(&self.session)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, json)?;
        event!(
            target: "xuantuo_app::controller",
            Level::INFO,
            path = %path.display(),
            seed = self.session.seed(),
            hands_dealt = self.session.hands_dealt(),
            "snapshot exported"
        );
        Ok(())
    }
}
