//! RevertLab CLI: run portfolio backtests and manage config files.
//!
//! Commands:
//! - `run`: load the universe, simulate every instrument, print and export results
//! - `config init`: write the default configuration as TOML

mod obs;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use revertlab_runner::{print_summary, run_backtest, save_artifacts, BacktestConfig, LoadOptions};

#[derive(Parser)]
#[command(
    name = "revertlab",
    about = "RevertLab CLI: mean-reversion portfolio backtester"
)]
struct Cli {
    /// Log level or filter directive (REVERTLAB_LOG takes precedence).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Log format: text or json.
    #[arg(long, global = true, default_value = "text")]
    log_format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Backtest every symbol of the universe and aggregate the results.
    Run(RunArgs),
    /// Configuration file commands.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Args, Debug, Default)]
struct RunArgs {
    /// Path to a TOML config file. Defaults are used without one.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding <SYMBOL>.csv files.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Comma-separated symbols, replacing the configured universe.
    #[arg(long, value_delimiter = ',')]
    symbols: Option<Vec<String>>,

    /// Starting capital per instrument.
    #[arg(long)]
    capital: Option<f64>,

    /// SMA window length.
    #[arg(long)]
    window: Option<usize>,

    /// Generate synthetic data for symbols without a CSV file.
    #[arg(long, default_value_t = false)]
    synthetic: bool,

    /// Run instruments one at a time instead of on the thread pool.
    #[arg(long, default_value_t = false)]
    sequential: bool,

    /// Output directory for artifacts.
    #[arg(long, default_value = "results")]
    output_dir: PathBuf,

    /// Print the summary only; write no artifacts.
    #[arg(long, default_value_t = false)]
    no_export: bool,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write the default configuration.
    Init {
        /// Destination file.
        #[arg(long, default_value = "revertlab.toml")]
        path: PathBuf,

        /// Overwrite an existing file.
        #[arg(long, default_value_t = false)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    obs::init_tracing(&cli.log_level, &cli.log_format)?;

    match cli.command {
        Commands::Run(args) => run_cmd(args),
        Commands::Config { action } => match action {
            ConfigAction::Init { path, force } => config_init_cmd(&path, force),
        },
    }
}

fn run_cmd(args: RunArgs) -> Result<()> {
    let config = build_config(&args)?;
    let opts = LoadOptions {
        synthetic: args.synthetic,
        ..LoadOptions::default()
    };

    let outcome = run_backtest(&config, &opts)?;
    print_summary(&outcome);

    if !args.no_export {
        let run_dir = save_artifacts(&outcome, &args.output_dir)?;
        println!("Artifacts saved to: {}", run_dir.display());
    }
    Ok(())
}

/// Config file (or defaults) with command-line overrides applied, validated.
fn build_config(args: &RunArgs) -> Result<BacktestConfig> {
    let mut config = match &args.config {
        Some(path) => BacktestConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => BacktestConfig::default(),
    };

    if let Some(dir) = &args.data_dir {
        config.universe.data_dir = dir.clone();
    }
    if let Some(symbols) = &args.symbols {
        config.universe.symbols = symbols.clone();
        config.universe.normalize_symbols();
    }
    if let Some(capital) = args.capital {
        config.backtest.initial_capital = capital;
    }
    if let Some(window) = args.window {
        config.strategy.sma_window = window;
    }
    if args.sequential {
        config.backtest.parallel = false;
    }

    config.validate().context("invalid configuration")?;
    info!(run_id = %config.run_id(), "configuration ready");
    Ok(config)
}

fn config_init_cmd(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    let toml = BacktestConfig::default().to_toml()?;
    std::fs::write(path, toml).with_context(|| format!("writing {}", path.display()))?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}
