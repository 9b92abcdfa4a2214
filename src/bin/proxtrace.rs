//! Proxtrace CLI - batch correlation runs from the command line
//!
//! Commands:
//! - run: full batch (closeness scores + beacon answers)
//! - scores: closeness scores only
//! - init: write a default config file to scaffold a deployment

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use proxtrace::{export, CorrelationEngine, EngineConfig, EngineError, PROXTRACE_VERSION};

/// Proxtrace - correlate wearable proximity logs with answer events
#[derive(Parser)]
#[command(name = "proxtrace")]
#[command(version = PROXTRACE_VERSION)]
#[command(about = "Offline correlation engine for wearable proximity logs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Full batch run: closeness scores and beacon answers
    Run {
        #[command(flatten)]
        options: RunOptions,
    },

    /// Closeness scores only (skips beacon/answer correlation output)
    Scores {
        #[command(flatten)]
        options: RunOptions,
    },

    /// Write a default config file
    Init {
        /// Where to write the config
        #[arg(short, long, default_value = "proxtrace.json")]
        path: PathBuf,
    },
}

#[derive(clap::Args)]
struct RunOptions {
    /// Config file (JSON); defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the data root directory
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Override the visit window (seconds)
    #[arg(long)]
    window: Option<u64>,

    /// Override the closeness output path
    #[arg(long)]
    closeness_output: Option<PathBuf>,

    /// Override the beacon-answers output path
    #[arg(long)]
    beacon_answers_output: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("proxtrace: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), EngineError> {
    match cli.command {
        Commands::Run { options } => {
            let config = load_config(options)?;
            let engine = CorrelationEngine::new(config);
            let results = engine.run_batch()?;
            export::write_closeness_csv(&engine.config().closeness_output, &results.closeness)?;
            export::write_beacon_answers_csv(
                &engine.config().beacon_answers_output,
                &results.beacon_answers,
            )?;
            Ok(())
        }

        Commands::Scores { options } => {
            let config = load_config(options)?;
            let engine = CorrelationEngine::new(config);
            let results = engine.run_batch()?;
            export::write_closeness_csv(&engine.config().closeness_output, &results.closeness)?;
            Ok(())
        }

        Commands::Init { path } => {
            EngineConfig::default().save(&path)?;
            println!("wrote default config to {}", path.display());
            Ok(())
        }
    }
}

fn load_config(options: RunOptions) -> Result<EngineConfig, EngineError> {
    let mut config = match options.config {
        Some(path) => EngineConfig::load(&path)?,
        None => EngineConfig::default(),
    };

    if let Some(data_dir) = options.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(window) = options.window {
        config.visit_window_secs = window;
    }
    if let Some(path) = options.closeness_output {
        config.closeness_output = path;
    }
    if let Some(path) = options.beacon_answers_output {
        config.beacon_answers_output = path;
    }

    config.validate()?;
    Ok(config)
}
