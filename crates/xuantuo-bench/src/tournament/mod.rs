mod agents;
mod summary;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use rand::{RngCore, SeedableRng, rngs::StdRng};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};
use xuantuo_app::{ControllerError, GameController, ImmediateScheduler};
use xuantuo_bot::Policy;
use xuantuo_core::game::session::{Outcome, Phase, Session};
use xuantuo_core::model::player::Participant;
use xuantuo_core::model::reward::RewardTier;
use xuantuo_core::model::score::CoinLedger;

use crate::config::{BenchmarkConfig, ResolvedOutputs};
use crate::logging::telemetry_dir;

pub use agents::AgentError;
use agents::AgentBlueprint;
pub use summary::{AgentTotals, SummaryCollector};

/// Plays configured automatons against each other, one seat each, hand
/// after hand.
pub struct TournamentRunner {
    config: BenchmarkConfig,
    outputs: ResolvedOutputs,
    agents: Vec<AgentBlueprint>,
    logging_enabled: bool,
}

/// Summary details returned after a run.
pub struct RunSummary {
    pub hands_played: usize,
    pub rows_written: usize,
    pub totals: Vec<AgentTotals>,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
    pub telemetry_path: Option<PathBuf>,
}

impl TournamentRunner {
    /// Build a runner from a validated configuration.
    pub fn new(config: BenchmarkConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        let agents = AgentBlueprint::from_configs(&config.agents)?;

        if agents.len() != Participant::LOOP.len() {
            return Err(RunnerError::SeatCount {
                found: agents.len(),
            });
        }

        Ok(Self {
            logging_enabled: config.logging.enable_structured,
            config,
            outputs,
            agents,
        })
    }

    /// Execute the tournament, streaming JSONL rows to disk.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let mut rng = StdRng::seed_from_u64(self.config.deals.seed.unwrap_or(0));
        let names: Vec<String> = self.agents.iter().map(|agent| agent.name.clone()).collect();
        let mut collector = SummaryCollector::new(&self.config.run_id, &names);
        let mut ledger = CoinLedger::new();
        let mut rows_written = 0usize;

        for hand_index in 0..self.config.deals.hands {
            let deal_seed = rng.next_u64();
            let (outcome, balances) = self.play_hand(hand_index, deal_seed, ledger)?;
            if self.config.deals.carry_balances {
                ledger = balances;
            }
            collector.record_hand(&outcome);
            rows_written += write_hand_rows(
                &mut writer,
                &self.config.run_id,
                hand_index,
                deal_seed,
                &outcome,
            )?;
        }

        writer.flush()?;
        collector.write_markdown(&self.outputs.summary_md, self.config.deals.hands)?;

        let telemetry_path = self
            .logging_enabled
            .then(|| telemetry_dir(&self.outputs).join("telemetry.jsonl"));

        Ok(RunSummary {
            hands_played: self.config.deals.hands,
            rows_written,
            totals: collector.totals().to_vec(),
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
            telemetry_path,
        })
    }

    fn play_hand(
        &self,
        hand_index: usize,
        deal_seed: u64,
        ledger: CoinLedger,
    ) -> Result<(HandOutcome, CoinLedger), RunnerError> {
        let session = Session::with_seed_and_ledger(deal_seed, ledger);
        let policies = self.spawn_policies(deal_seed);
        let mut controller = GameController::with_policies(session, policies, ImmediateScheduler);
        let outcomes = controller.deal()?;

        let session = controller.session();
        let report = match (session.phase(), session.settlement()) {
            (Phase::Settlement, Some(report)) => report,
            (phase, _) => return Err(RunnerError::Stalled { hand_index, phase }),
        };

        let mut declared = [false; 3];
        let mut deal_attempts = 1;
        for outcome in &outcomes {
            match outcome {
                Outcome::KouLeDeclared { initiator } => declared[initiator.index()] = true,
                Outcome::Dealt { attempts, .. } => deal_attempts = *attempts as usize,
                _ => {}
            }
        }

        let seats = Participant::LOOP
            .iter()
            .map(|&seat| {
                let line = report.line(seat);
                SeatResult {
                    seat,
                    agent_name: self.agents[seat.index()].name.clone(),
                    difficulty: self.agents[seat.index()].difficulty().as_str(),
                    collected: line.collected,
                    tier: line.tier,
                    net: line.net,
                    balance: session.ledger().balance(seat),
                    declared_kou_le: declared[seat.index()],
                    challenge_failed: line.challenge_failed,
                }
            })
            .collect::<Vec<_>>();

        let outcome = HandOutcome {
            deal_attempts,
            rounds: session.history().len(),
            seats,
        };

        if tracing::enabled!(Level::INFO) {
            event!(
                target: "xuantuo_bench::hand",
                Level::INFO,
                run_id = %self.config.run_id,
                hand_index,
                deal_seed,
                deal_attempts,
                rounds = outcome.rounds,
                collected = ?session.collected_counts(),
                challengers = session.challengers().len(),
            );
        }

        Ok((outcome, *session.ledger()))
    }

    fn spawn_policies(&self, deal_seed: u64) -> [Option<Box<dyn Policy>>; 3] {
        let mut seeds = StdRng::seed_from_u64(deal_seed);
        let mut spawn = |index: usize| Some(self.agents[index].spawn_policy(seeds.next_u64()));
        [spawn(0), spawn(1), spawn(2)]
    }
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

fn write_hand_rows(
    writer: &mut BufWriter<File>,
    run_id: &str,
    hand_index: usize,
    deal_seed: u64,
    outcome: &HandOutcome,
) -> Result<usize, RunnerError> {
    let mut rows_written = 0usize;
    for seat_result in &outcome.seats {
        let row = HandLogRow {
            run_id,
            hand_index,
            deal_seed,
            seat: seat_label(seat_result.seat.index()),
            bot: &seat_result.agent_name,
            difficulty: seat_result.difficulty,
            collected: seat_result.collected,
            tier: seat_result.tier,
            net: seat_result.net,
            balance: seat_result.balance,
            declared_kou_le: seat_result.declared_kou_le,
            challenge_failed: seat_result.challenge_failed,
            rounds: outcome.rounds,
        };

        serde_json::to_writer(&mut *writer, &row)?;
        writer.write_all(b"\n")?;
        rows_written += 1;
    }
    Ok(rows_written)
}

fn seat_label(index: usize) -> &'static str {
    match Participant::from_index(index) {
        Some(Participant::Player) => "player",
        Some(Participant::AiLeft) => "ai_left",
        Some(Participant::AiRight) => "ai_right",
        None => "unknown",
    }
}

pub struct HandOutcome {
    pub deal_attempts: usize,
    pub rounds: usize,
    pub seats: Vec<SeatResult>,
}

pub struct SeatResult {
    pub seat: Participant,
    pub agent_name: String,
    pub difficulty: &'static str,
    pub collected: usize,
    pub tier: RewardTier,
    pub net: i64,
    pub balance: i64,
    pub declared_kou_le: bool,
    pub challenge_failed: bool,
}

#[derive(Serialize)]
struct HandLogRow<'a> {
    run_id: &'a str,
    hand_index: usize,
    deal_seed: u64,
    seat: &'static str,
    bot: &'a str,
    difficulty: &'static str,
    collected: usize,
    tier: RewardTier,
    net: i64,
    balance: i64,
    declared_kou_le: bool,
    challenge_failed: bool,
    rounds: usize,
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("{0}")]
    Agent(#[from] AgentError),
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize log row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("game execution failed: {0}")]
    Controller(#[from] ControllerError),
    #[error("hand {hand_index} stopped in phase {phase} before settlement")]
    Stalled { hand_index: usize, phase: Phase },
    #[error("configuration requires exactly 3 agents but found {found}")]
    SeatCount { found: usize },
}
