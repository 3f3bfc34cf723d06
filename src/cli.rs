//! Command-line surface (spec.md §6).

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "pcapgraph", about = "Project packet captures into a property-graph database")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Project an offline capture file. Defaults to full fidelity.
    File {
        path: PathBuf,
        #[command(flatten)]
        flags: CommonFlags,
    },
    /// Project a live interface. Always runs in reduced fidelity (spec.md §6),
    /// regardless of `--reduce`.
    Live {
        interface: String,
        #[command(flatten)]
        flags: CommonFlags,
    },
}

#[derive(Debug, Args, Clone)]
pub struct CommonFlags {
    /// Force reduced fidelity (no `CONNECTED` aggregate properties) even for
    /// an offline file.
    #[arg(long)]
    pub reduce: bool,
    /// Skip the pre-pass packet count, so progress telemetry has no total.
    #[arg(long = "no-count")]
    pub no_count: bool,
    /// Emit verbose per-intent tracing for one packet index.
    #[arg(long = "debug-at", value_name = "N")]
    pub debug_at: Option<u64>,
    /// Print the executor/total wall-time ratio at the end of the run.
    #[arg(long = "debug-time")]
    pub debug_time: bool,
    /// Print per-kind cache hit/miss/size statistics at the end of the run.
    #[arg(long = "debug-cache")]
    pub debug_cache: bool,
}
