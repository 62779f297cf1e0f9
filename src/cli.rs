use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// File-backed project timeline CLI.
/// Storage defaults to ~/.ptl/timeline.json or a path passed via --db.
#[derive(Parser)]
#[command(name = "ptl", version, about = "Week-by-week project timeline CLI")]
pub struct Cli {
    /// Path to the JSON database file.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}
