//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Scouting schedule planner.
///
/// Assigns scouting members to teams from an FRC event schedule and writes
/// printable per-member and overall schedules.
#[derive(Debug, Parser)]
#[command(name = "scout", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Fetch the event schedule from the FRC Events API and cache it.
    Fetch,

    /// Show which members scout which teams.
    Assignments {
        /// Use the cached schedule if present instead of fetching.
        #[arg(long)]
        cached: bool,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Write the overall and per-member HTML schedules.
    Plan {
        /// Use the cached schedule if present instead of fetching.
        #[arg(long)]
        cached: bool,

        /// Directory for the generated reports (defaults to `output_dir`).
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}
