use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Sky timer queries: what's happening now, and what's next.
#[derive(Parser, Debug)]
#[command(name = "skysched", version, about = "Recurring Sky event schedule queries")]
pub struct CliArgs {
    /// Path to a TOML catalog file. Overrides `SKYSCHED_CATALOG`;
    /// defaults to the built-in catalog when neither is set.
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Emit machine-readable JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the patterns in the catalog.
    List,
    /// Show a pattern's current status: occurrences, active window, countdown.
    Status {
        /// Pattern id (e.g. "shard", "geyser").
        pattern: String,
        /// Reference instant, RFC 3339 (default: now).
        #[arg(long)]
        at: Option<String>,
    },
    /// Find the next occurrence of a pattern.
    Next {
        /// Pattern id (e.g. "shard", "geyser").
        pattern: String,
        /// Variant class filter for rotating patterns: "red" or "black".
        #[arg(long)]
        filter: Option<String>,
        /// Search from this instant, RFC 3339 (default: now).
        #[arg(long)]
        from: Option<String>,
    },
}
