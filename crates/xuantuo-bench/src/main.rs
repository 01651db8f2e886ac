use std::path::PathBuf;

use clap::Parser;

use xuantuo_bench::config::{BenchmarkConfig, ResolvedOutputs};
use xuantuo_bench::logging::init_logging;
use xuantuo_bench::tournament::TournamentRunner;

/// Automaton-versus-automaton harness for Xuan Tuo Tuo.
#[derive(Debug, Parser)]
#[command(
    name = "xuantuo-bench",
    author,
    version,
    about = "Deterministic Xuan Tuo Tuo bench harness"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "bench/bench.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of hands to play.
    #[arg(long, value_name = "HANDS")]
    hands: Option<usize>,

    /// Override the RNG seed for deal generation.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Start every hand from 100 coins instead of carrying balances.
    #[arg(long)]
    fresh_balances: bool,

    /// Exit after validating the configuration (no hands are played).
    #[arg(long)]
    validate_only: bool,

    /// Force structured logging on regardless of config.
    #[arg(long)]
    structured_logs: bool,
}

impl Cli {
    fn apply_overrides(&self, config: &mut BenchmarkConfig) {
        if let Some(run_id) = &self.run_id {
            config.run_id = run_id.clone();
        }
        if let Some(hands) = self.hands {
            config.deals.hands = hands;
        }
        if self.seed.is_some() {
            config.deals.seed = self.seed;
        }
        config.deals.carry_balances &= !self.fresh_balances;
        config.logging.enable_structured |= self.structured_logs;
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = BenchmarkConfig::from_path(&cli.config)?;
    cli.apply_overrides(&mut config);
    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let run_id = config.run_id.clone();
    let hands = config.deals.hands;
    let agents = config
        .agents
        .iter()
        .map(|agent| agent.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    println!("Loaded configuration '{run_id}' ({hands} hands, agents: {agents})");

    let _logging_guard = init_logging(&config.logging, &outputs, &run_id)?;
    let runner = TournamentRunner::new(config, outputs)?;

    if cli.validate_only {
        println!("Validation-only mode: no hands played.");
        return Ok(());
    }

    let summary = runner.run()?;
    println!(
        "Run complete for '{run_id}': {} hands, {} rows at {}",
        summary.hands_played,
        summary.rows_written,
        summary.jsonl_path.display()
    );
    for totals in &summary.totals {
        println!(
            "  {:<12} avg {:>5.2} cards, net {:+.2}/hand, balance {}",
            totals.name,
            totals.avg_cards(),
            totals.net_per_hand(),
            totals.final_balance
        );
    }
    println!("Summary table: {}", summary.summary_path.display());
    if let Some(telemetry_path) = summary.telemetry_path.as_ref() {
        println!("Telemetry log: {}", telemetry_path.display());
    }

    Ok(())
}
