//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "flipcounter", version, about = "Flip-counter engine CLI")]
pub struct Cli {
    /// Path to config TOML; built-in defaults when omitted
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print results and logs as JSON lines instead of text
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Count on its own for a while, printing each value as it settles
    Run {
        /// How long to run, in seconds
        #[arg(long, default_value_t = 10.0)]
        seconds: f64,
        /// Starting value (overrides config)
        #[arg(long)]
        value: Option<u64>,
        /// Amount per cycle (overrides config)
        #[arg(long)]
        increment: Option<u64>,
        /// Pace between cycles, e.g. 250, 250ms, 1.5s (overrides config)
        #[arg(long, value_parser = flip_config::parse_pace)]
        pace: Option<u64>,
        /// Simulate time instead of sleeping
        #[arg(long = "virtual", action = ArgAction::SetTrue)]
        virtual_time: bool,
    },
    /// Ramp to a target and exit once it is reached
    Ramp {
        /// Target value
        #[arg(long)]
        to: u64,
        /// Starting value (overrides config)
        #[arg(long)]
        from: Option<u64>,
        /// Land on the target within this many seconds (smart ramp)
        #[arg(long)]
        seconds: Option<f64>,
        /// Preferred pace for the ramp
        #[arg(long, value_parser = flip_config::parse_pace)]
        pace: Option<u64>,
        /// Simulate time instead of sleeping
        #[arg(long = "virtual", action = ArgAction::SetTrue)]
        virtual_time: bool,
    },
    /// Show the increment/pace a smart ramp would use
    Plan {
        /// Distance to cover
        #[arg(long)]
        diff: u64,
        /// Time budget in seconds
        #[arg(long)]
        seconds: f64,
        /// Preferred pace
        #[arg(long, value_parser = flip_config::parse_pace, default_value = "1000")]
        pace: u64,
    },
    /// List the slot edits between two values
    Diff { old: u64, new: u64 },
    /// Run a command script on simulated time
    Script {
        /// Script file, one command per line
        file: PathBuf,
        /// Write every painted frame to this CSV file
        #[arg(long, value_name = "FILE")]
        trace: Option<PathBuf>,
    },
}
