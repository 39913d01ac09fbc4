use std::path::PathBuf;

use clap::Parser;

use dealsmith_run::config::{ResolvedOutputs, RunConfig};
use dealsmith_run::logging::init_logging;
use dealsmith_run::runner::GenerationRunner;

/// Batch generator for constrained practice deals.
#[derive(Debug, Parser)]
#[command(
    name = "dealsmith",
    author,
    version,
    about = "Deterministic constrained-deal generator"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "runs/run.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the profile document path.
    #[arg(long, value_name = "FILE")]
    profile: Option<PathBuf>,

    /// Override the number of boards to generate.
    #[arg(long, value_name = "BOARDS")]
    boards: Option<usize>,

    /// Override the RNG seed for the run.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Override the per-board attempt budget.
    #[arg(long, value_name = "COUNT")]
    max_attempts: Option<u32>,

    /// Exit after validating the configuration and profile (no boards are dealt).
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = RunConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }
    if let Some(profile) = cli.profile {
        config.profile = profile;
    }
    if let Some(boards) = cli.boards {
        config.boards.count = boards;
    }
    if let Some(seed) = cli.seed {
        config.boards.seed = Some(seed);
    }
    if let Some(max_attempts) = cli.max_attempts {
        config.boards.max_attempts = max_attempts;
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let run_id = config.run_id.clone();
    let boards = config.boards.count;
    let max_attempts = config.boards.max_attempts;

    println!(
        "Loaded configuration '{run_id}' ({boards} board{}, {max_attempts} attempts per board)",
        if boards == 1 { "" } else { "s" }
    );

    let _logging_guard = init_logging(&config.logging, &outputs, &run_id)?;
    let runner = GenerationRunner::new(config, outputs)?;

    if cli.validate_only {
        println!("Validation-only mode: profile is viable, no boards generated.");
        return Ok(());
    }

    let summary = runner.run()?;
    println!(
        "Run '{run_id}' complete: {dealt}/{requested} boards dealt ({failed} failed) → {rows} rows at {path}",
        dealt = summary.boards_dealt,
        requested = summary.boards_requested,
        failed = summary.boards_failed,
        rows = summary.rows_written,
        path = summary.jsonl_path.display()
    );
    println!("Summary table: {}", summary.summary_path.display());
    Ok(())
}
