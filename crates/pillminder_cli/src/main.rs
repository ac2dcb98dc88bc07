//! `pillminder` command-line entry point.
//!
//! # Responsibility
//! - Manage medications and record doses against a local SQLite file.
//! - Run the reminder clock in the foreground with `watch`.

mod app_config;
mod commands;
mod error;
mod terminal_sink;

use app_config::AppConfig;
use clap::{Parser, Subcommand, ValueEnum};
use error::CliResult;
use pillminder_core::{init_logging, Frequency, MedicationId, TimeOfDay};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[clap(
    name = "pillminder",
    version = env!("CARGO_PKG_VERSION"),
    about = "Local medication schedule and dose reminders"
)]
struct Cli {
    /// TOML settings file.
    #[clap(long, global = true)]
    config: Option<PathBuf>,
    /// Database file; overrides `database_path` from the config file.
    #[clap(long, global = true)]
    db: Option<PathBuf>,
    /// Log level; overrides `log_level` from the config file.
    #[clap(long, global = true)]
    log_level: Option<String>,
    #[clap(subcommand)]
    command: Command,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FrequencyArg {
    Daily,
    AsNeeded,
}

impl From<FrequencyArg> for Frequency {
    fn from(value: FrequencyArg) -> Self {
        match value {
            FrequencyArg::Daily => Frequency::Daily,
            FrequencyArg::AsNeeded => Frequency::AsNeeded,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add a medication
    Add {
        name: String,
        /// Free-text dosage, e.g. "500mg".
        #[clap(long, default_value = "")]
        dosage: String,
        #[clap(long, value_enum, default_value = "daily")]
        frequency: FrequencyArg,
        /// Daily time as HH:MM; repeat for several doses.
        #[clap(long = "at")]
        times: Vec<TimeOfDay>,
        #[clap(long)]
        color: Option<String>,
    },
    /// List medications
    List,
    /// Remove a medication; dose history is kept
    Remove { id: MedicationId },
    /// Show today's schedule
    Today,
    /// Mark a dose as taken
    Take {
        id: MedicationId,
        /// Scheduled slot the dose belongs to.
        #[clap(long)]
        slot: Option<TimeOfDay>,
    },
    /// Mark a dose as skipped
    Skip {
        id: MedicationId,
        #[clap(long)]
        slot: Option<TimeOfDay>,
    },
    /// Show recorded doses, newest first
    History {
        #[clap(long)]
        medication: Option<MedicationId>,
        #[clap(long, default_value = "20")]
        limit: u32,
    },
    /// Run the reminder clock in the foreground
    Watch {
        /// Stop after this many seconds; runs until interrupted otherwise.
        #[clap(long)]
        for_secs: Option<u64>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("event=cli_exit module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CliResult<()> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(db) = cli.db {
        config.database_path = db;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    config.resolve_paths(&std::env::current_dir()?);
    init_logging(&config.log_level, &config.log_dir.to_string_lossy())?;

    match cli.command {
        Command::Add {
            name,
            dosage,
            frequency,
            times,
            color,
        } => commands::add(&config, name, dosage, frequency.into(), times, color),
        Command::List => commands::list(&config),
        Command::Remove { id } => commands::remove(&config, id),
        Command::Today => commands::today(&config),
        Command::Take { id, slot } => commands::take(&config, id, slot),
        Command::Skip { id, slot } => commands::skip(&config, id, slot),
        Command::History { medication, limit } => commands::history(&config, medication, limit),
        Command::Watch { for_secs } => commands::watch(&config, for_secs),
    }
}
