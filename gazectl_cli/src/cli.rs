//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "gazectl", version, about = "Gaze-to-cursor control loop")]
pub struct Cli {
    /// Path to config TOML; built-in defaults when omitted
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Emit JSON lines (output, logs and errors) instead of text
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace); RUST_LOG wins if set
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Drive the pointer live; key names on stdin become commands
    Run {
        /// Replay gaze samples from a trace CSV instead of the synthetic source
        #[arg(long, value_name = "FILE")]
        trace: Option<PathBuf>,
        /// Stop after this many frames
        #[arg(long, value_name = "N")]
        frames: Option<u64>,
        /// Acquire gaze on a background thread (overrides runner.mode)
        #[arg(long, action = ArgAction::SetTrue)]
        threaded: bool,
    },
    /// Replay a trace CSV offline against a simulated pointer
    Replay {
        /// Trace CSV with headers rx,ry,key
        #[arg(long, value_name = "FILE")]
        trace: PathBuf,
        /// Start with cursor control enabled
        #[arg(long, action = ArgAction::SetTrue)]
        enable: bool,
    },
    /// Validate config and build a loop against the configured pointer
    SelfCheck,
}
