//! CLI argument parsing for beam-tui.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "beam-tui")]
#[command(about = "Beam launcher terminal client", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable debug logging (logs to /tmp/beam-tui.log)
    #[arg(short, long)]
    pub debug: bool,

    /// Backend socket path (defaults to $XDG_RUNTIME_DIR/beam.sock)
    #[arg(long)]
    pub socket: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive TUI mode (default)
    Tui,

    /// One-shot search query (for testing)
    Query {
        /// Search query
        query: String,
    },
}
