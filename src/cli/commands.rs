//! Command definitions for the stream-countdown CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::types::ClockPrecision;

// ============================================================================
// CLI Structure
// ============================================================================

/// stream-countdown - A countdown overlay for live streams
#[derive(Parser, Debug)]
#[command(
    name = "stream-countdown",
    version,
    about = "Countdown timer overlay for streaming and broadcast",
    long_about = "A countdown clock with a status message for live streams.\n\
                  Frames go to stdout as text or JSON lines; the timer is controlled\n\
                  with commands on stdin (start, pause, stop, restart, set, apply, close).",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute (defaults to `run`)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path of the config file
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Overlay options, accepted with or without `run`
    #[command(flatten)]
    pub run: RunArgs,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the countdown overlay
    Run,

    /// Inspect or create the config file
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Config file subcommands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigCommand {
    /// Print the effective config file
    Show,
    /// Write the default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

// ============================================================================
// Run Command Arguments
// ============================================================================

/// Frame output format
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// One text line per visible change
    #[default]
    Text,
    /// One JSON object per frame
    Json,
}

/// Arguments for running the overlay
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Directory holding timer_finished.wav and button1.wav
    #[arg(long, global = true, value_name = "DIR")]
    pub assets: Option<PathBuf>,

    /// Clock precision
    #[arg(long, global = true, value_enum, default_value_t = ClockPrecision::Tenths)]
    pub precision: ClockPrecision,

    /// Frame output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Disable sound cues
    #[arg(long, global = true)]
    pub no_sound: bool,
}

// ============================================================================
// Tests
// ============================================================================
