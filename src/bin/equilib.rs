//! CLI entry point for the equilib rebalancer.
//!
//! Drives a paper folio through a deterministic multi-day backtest from a
//! saved state file, or inspects and seeds state files.

use std::path::{Path, PathBuf};
use std::process;

use chrono::{Duration, TimeZone, Utc};
use clap::{Parser, Subcommand};
use log::info;

use equilib::{
    EquilibriumManager, ManagerConfig, ManagerState, Mode, PaperFolio, QuoteBoard, Symbol,
    TimeRef,
};

#[derive(Parser)]
#[command(name = "equilib")]
#[command(about = "Equilibrium-seeking portfolio rebalancer")]
#[command(version)]
struct Cli {
    /// Path to a manager config.toml (defaults baked in if absent)
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a deterministic paper backtest from a saved state file
    Run {
        /// Path to state.json
        state: PathBuf,

        /// Number of daily ticks to simulate
        #[arg(long, default_value_t = 30)]
        days: u32,

        /// Starting cash in the paper folio
        #[arg(long, default_value_t = 10_000.0)]
        cash: f64,

        /// Write the final manager state back to the state file
        #[arg(long)]
        save: bool,
    },

    /// Print a saved state file
    Show {
        /// Path to state.json
        state: PathBuf,
    },

    /// Write an example state file to get started
    Init {
        /// Path to create
        state: PathBuf,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match ManagerConfig::load(path) {
            Ok(c) => Some(c),
            Err(e) => {
                eprintln!("Error loading config: {e}");
                process::exit(1);
            }
        },
        None => None,
    };

    let result = match cli.command {
        Command::Run {
            state,
            days,
            cash,
            save,
        } => run(&state, config, days, cash, save),
        Command::Show { state } => show(&state),
        Command::Init { state } => init(&state),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(
    state_path: &Path,
    config: Option<ManagerConfig>,
    days: u32,
    cash: f64,
    save: bool,
) -> equilib::Result<()> {
    let mut manager = match config {
        Some(config) => {
            let state = ManagerState::load(state_path)?;
            EquilibriumManager::new(Mode::Backtest, state.equilibrium, config)?
        }
        None => EquilibriumManager::load_json(state_path, Mode::Backtest)?,
    };

    let symbols = manager.equilibrium().symbols_sorted();
    let mut board = QuoteBoard::new();
    for (i, symbol) in symbols.iter().enumerate() {
        let (bid, ask) = quote_for(i, 0);
        board.set_quote(*symbol, bid, ask);
    }
    let mut folio = PaperFolio::new(board, cash);

    info!("{}: {days}-day paper run, {cash:.2} starting cash", manager.name());

    let start = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    for day in 0..days {
        let at = TimeRef::At(start + Duration::days(i64::from(day)));
        for (i, symbol) in symbols.iter().enumerate() {
            let (bid, ask) = quote_for(i, day);
            folio.market_mut().set_quote(*symbol, bid, ask);
        }
        manager.tick_write(&mut folio, at, true)?;
        let obs = manager.tick_read(&folio, at)?;
        print!("{obs}");
    }

    if save {
        manager.save_json(state_path)?;
        info!("{}: state saved to {}", manager.name(), state_path.display());
    }
    Ok(())
}

/// Deterministic drifting quote for symbol index `i` on day `d`.
fn quote_for(i: usize, d: u32) -> (f64, f64) {
    let base = 100.0 * (i as f64 + 1.0);
    let phase = 0.25 * (d as f64 + i as f64);
    let mid = base * (1.0 + 0.05 * phase.sin());
    (mid * 0.999, mid * 1.001)
}

fn show(state_path: &Path) -> equilib::Result<()> {
    let state = ManagerState::load(state_path)?;
    let json = serde_json::to_string_pretty(&state)?;
    println!("{json}");
    Ok(())
}

fn init(state_path: &Path) -> equilib::Result<()> {
    let equilibrium = [
        (Symbol::new("BTC-USD"), 0.25),
        (Symbol::new("ETH-USD"), 0.15),
    ]
    .into_iter()
    .collect();
    let state = ManagerState {
        equilibrium,
        params: ManagerConfig {
            name: Some("example".into()),
            ..Default::default()
        },
    };
    state.save(state_path)?;
    println!("Wrote example state to {}", state_path.display());
    Ok(())
}
