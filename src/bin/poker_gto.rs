//! Command-line entry point.
//!
//! Usage:
//!   cargo run --release --bin poker-gto -- solve-kuhn [OPTIONS]
//!
//! Set `RUST_LOG=debug` for per-interval progress in the log.

use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};

use poker_gto::cfr::{Algorithm, CFRConfig, CFRSolver, SolverError};
use poker_gto::games::kuhn::{format_strategy_table, KuhnConfig, KuhnPoker, StrategyReport};

#[derive(Parser)]
#[command(name = "poker-gto")]
#[command(about = "Solve small poker games with CFR/CFR+")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve Kuhn Poker with CFR/CFR+
    SolveKuhn(SolveKuhnArgs),
}

#[derive(clap::Args)]
struct SolveKuhnArgs {
    /// Training iterations
    #[arg(short = 'n', long, default_value_t = 100_000)]
    iterations: u64,
    /// Algorithm variant: cfr or cfr+ (overrides --config)
    #[arg(long)]
    algo: Option<Algorithm>,
    /// Seed recorded in the report (overrides --config)
    #[arg(long)]
    seed: Option<u64>,
    /// Ante paid by each player
    #[arg(long, default_value_t = 1.0)]
    ante: f64,
    /// Size of the single bet
    #[arg(long, default_value_t = 1.0)]
    bet: f64,
    /// Solver configuration JSON file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Write the strategy report to this JSON file
    #[arg(long)]
    json: Option<PathBuf>,
    /// Compute exploitability of the final strategy
    #[arg(long)]
    exploitability: bool,
}

/// Errors surfaced by the command line.
#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Solver(#[from] SolverError),
    #[error(transparent)]
    Config(#[from] poker_gto::cfr::ConfigError),
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::SolveKuhn(args) => run_solve_kuhn(&args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn solver_config(args: &SolveKuhnArgs) -> Result<CFRConfig, CliError> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            CFRConfig::from_json_file(path)?
        }
        None => CFRConfig::default().with_seed(42),
    };

    if let Some(algorithm) = args.algo {
        config = config.with_algorithm(algorithm);
    }
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    Ok(config)
}

fn run_solve_kuhn(args: &SolveKuhnArgs) -> Result<(), CliError> {
    let game = KuhnPoker::with_config(KuhnConfig {
        ante: args.ante,
        bet: args.bet,
    })?;
    let config = solver_config(args)?;
    let mut solver = CFRSolver::new(game, config)?;

    let pb = ProgressBar::new(args.iterations);
    // Static template, parsing cannot fail
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
    {
        pb.set_style(style.progress_chars("#>-"));
    }

    let interval = (args.iterations / 100).max(1);
    solver.train_with_callback(args.iterations, interval, |stats| {
        pb.set_position(stats.iterations);
        ControlFlow::Continue(())
    })?;
    pb.finish_and_clear();

    let stats = solver.stats();
    info!(
        "{} iterations in {:.2}s ({:.0} it/s), {} info sets",
        stats.iterations, stats.elapsed_seconds, stats.iterations_per_second, stats.info_sets
    );

    println!();
    println!("Average strategy by infoset (card|history):");
    print!("{}", format_strategy_table(&solver.average_strategies()));

    if args.exploitability {
        let exploitability = solver.measure_exploitability()?;
        let value = solver.game_value()?;
        println!();
        println!("Exploitability: {:.6}", exploitability);
        println!("Game value (player 0): {:.6}", value);
    }

    if let Some(path) = &args.json {
        write_report(&solver, path)?;
    }

    Ok(())
}

fn write_report(solver: &CFRSolver<KuhnPoker>, path: &Path) -> Result<(), CliError> {
    StrategyReport::from_solver(solver)
        .save_json(path)
        .map_err(|source| CliError::Write {
            path: path.display().to_string(),
            source,
        })?;
    info!("Saved strategy report to {}", path.display());
    Ok(())
}
