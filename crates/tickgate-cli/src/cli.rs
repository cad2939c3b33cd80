//! CLI argument definitions for tickgate.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Tickgate - tiered validation gate for financial tick streams
///
/// Classifies incoming tick records as verified, suspect, or rejected
/// before they reach downstream storage or trading logic.
#[derive(Debug, Parser)]
#[command(
    name = "tickgate",
    author,
    version,
    about = "Tiered validation gate for financial tick streams"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Validate NDJSON tick records from a file or stdin.
    Validate(ValidateArgs),
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Input path with one JSON tick per line, or `-` for stdin.
    pub input: String,

    /// Pipeline configuration file (JSON). Defaults apply when omitted.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Pretty-print each outcome instead of one JSON object per line.
    #[arg(long, default_value_t = false)]
    pub pretty: bool,

    /// Write drained dead-letter records to this path after the run.
    #[arg(long)]
    pub dead_letters: Option<PathBuf>,

    /// Exit with code 5 when any record was rejected.
    #[arg(long, default_value_t = false)]
    pub strict: bool,
}
