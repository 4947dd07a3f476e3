mod commands;
mod config;
mod gemini;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

use crate::commands::{
    Tracker, cmd_clear, cmd_dashboard, cmd_export, cmd_goal_clear, cmd_goal_set, cmd_goal_show,
    cmd_height_set, cmd_height_show, cmd_measure_delete, cmd_measure_history, cmd_measure_log,
    cmd_quote, cmd_stats, cmd_theme, cmd_weight_delete, cmd_weight_history, cmd_weight_log,
    cmd_weight_show,
};
use crate::config::Config;
use crate::gemini::GeminiClient;
use heft_core::db::Database;
use heft_core::models::{MeasurementField, Theme};
use heft_core::profile::Profile;

const DEFAULT_LOG_FILTER: &str = "heft=warn,heft_core=warn";

#[derive(Parser)]
#[command(
    name = "heft",
    version,
    about = "A simple weight tracker CLI",
    long_about = "\n\n  ██╗  ██╗███████╗███████╗████████╗
  ██║  ██║██╔════╝██╔════╝╚══██╔══╝
  ███████║█████╗  █████╗     ██║
  ██╔══██║██╔══╝  ██╔══╝     ██║
  ██║  ██║███████╗██║        ██║
  ╚═╝  ╚═╝╚══════╝╚═╝        ╚═╝
     one weigh-in at a time.
"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Set or show your height
    Height {
        #[command(subcommand)]
        command: HeightCommands,
    },
    /// Log and review body weight
    Weight {
        #[command(subcommand)]
        command: WeightCommands,
    },
    /// Log and review body measurements
    Measure {
        #[command(subcommand)]
        command: MeasureCommands,
    },
    /// Manage your goal weight
    Goal {
        #[command(subcommand)]
        command: GoalCommands,
    },
    /// Latest weight, BMI and goal progress at a glance
    Dashboard {
        /// Skip the motivational quote
        #[arg(long)]
        no_quote: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show height and weight statistics
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Export weight entries as CSV
    Export {
        /// Output file (default: weight_tracker_export.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Write the CSV to stdout instead of a file
        #[arg(long, conflicts_with = "output")]
        stdout: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show or set the table theme
    Theme {
        /// light or dark (omit to show the current theme)
        theme: Option<Theme>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Fetch a motivational quote
    Quote {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete all data (the theme is kept)
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum HeightCommands {
    /// Set your height in centimetres
    Set {
        /// Height in cm (51-250)
        cm: u32,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show your height
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum WeightCommands {
    /// Log a weight entry (replaces any entry on the same date)
    Log {
        /// Weight value
        value: f64,
        /// Unit: kg or lbs
        #[arg(short, long, default_value = "kg")]
        unit: String,
        /// Date (YYYY-MM-DD, today, yesterday; default: today)
        #[arg(long)]
        date: Option<String>,
        /// Edit the entry logged on this date
        #[arg(long)]
        edit: Option<String>,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the weight entry for a date
    Show {
        /// Date (YYYY-MM-DD, default: today)
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show weight history, newest first
    History {
        /// Number of entries to show (default: all)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete the weight entry for a date
    Delete {
        /// Date of the entry (YYYY-MM-DD)
        date: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum MeasureCommands {
    /// Log body measurements in cm (replaces any entry on the same date)
    Log {
        /// Waist in cm
        #[arg(long)]
        waist: Option<f64>,
        /// Arm in cm
        #[arg(long)]
        arm: Option<f64>,
        /// Thigh in cm
        #[arg(long)]
        thigh: Option<f64>,
        /// Date (YYYY-MM-DD, today, yesterday; default: today)
        #[arg(long)]
        date: Option<String>,
        /// Edit the entry logged on this date
        #[arg(long)]
        edit: Option<String>,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show measurement history, newest first
    History {
        /// Only show one measurement: waist, arm or thigh
        #[arg(short, long)]
        field: Option<MeasurementField>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete the measurement entry for a date
    Delete {
        /// Date of the entry (YYYY-MM-DD)
        date: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum GoalCommands {
    /// Set your goal weight
    Set {
        /// Goal weight value
        value: f64,
        /// Unit: kg or lbs
        #[arg(short, long, default_value = "kg")]
        unit: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show your goal and progress towards it
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove your goal weight
    Clear {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

#[allow(clippy::too_many_lines)]
async fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    tracing::debug!(data_dir = %config.data_dir.display(), "using data directory");
    let db = Database::open(&config.db_path)?;
    let mut tracker: Tracker = Profile::load(db);

    match cli.command {
        Commands::Height { command } => match command {
            HeightCommands::Set { cm, json } => cmd_height_set(&mut tracker, cm, json),
            HeightCommands::Show { json } => cmd_height_show(&tracker, json),
        },
        Commands::Weight { command } => match command {
            WeightCommands::Log {
                value,
                unit,
                date,
                edit,
                yes,
                json,
            } => cmd_weight_log(
                &mut tracker,
                value,
                &unit,
                date.as_deref(),
                edit.as_deref(),
                yes,
                json,
            ),
            WeightCommands::Show { date, json } => {
                cmd_weight_show(&tracker, date.as_deref(), json)
            }
            WeightCommands::History { limit, json } => cmd_weight_history(&tracker, limit, json),
            WeightCommands::Delete { date, yes, json } => {
                cmd_weight_delete(&mut tracker, &date, yes, json)
            }
        },
        Commands::Measure { command } => match command {
            MeasureCommands::Log {
                waist,
                arm,
                thigh,
                date,
                edit,
                yes,
                json,
            } => cmd_measure_log(
                &mut tracker,
                waist,
                arm,
                thigh,
                date.as_deref(),
                edit.as_deref(),
                yes,
                json,
            ),
            MeasureCommands::History { field, json } => {
                cmd_measure_history(&tracker, field, json)
            }
            MeasureCommands::Delete { date, yes, json } => {
                cmd_measure_delete(&mut tracker, &date, yes, json)
            }
        },
        Commands::Goal { command } => match command {
            GoalCommands::Set { value, unit, json } => {
                cmd_goal_set(&mut tracker, value, &unit, json)
            }
            GoalCommands::Show { json } => cmd_goal_show(&tracker, json),
            GoalCommands::Clear { json } => cmd_goal_clear(&mut tracker, json),
        },
        Commands::Dashboard { no_quote, json } => {
            let gemini = GeminiClient::new(config.gemini_api_key)?;
            cmd_dashboard(&tracker, &gemini, no_quote, json).await
        }
        Commands::Stats { json } => cmd_stats(&tracker, json),
        Commands::Export {
            output,
            stdout,
            json,
        } => cmd_export(&tracker, output.as_deref(), stdout, json),
        Commands::Theme { theme, json } => cmd_theme(&mut tracker, theme, json),
        Commands::Quote { json } => {
            let gemini = GeminiClient::new(config.gemini_api_key)?;
            cmd_quote(&gemini, json).await
        }
        Commands::Clear { yes, json } => cmd_clear(&mut tracker, yes, json),
    }
}
