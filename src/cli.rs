use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Directory holding the local record store.
    #[arg(long, global = true, env = "FLEETOPS_DATA_DIR", default_value = "fleetops-data")]
    pub data_dir: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Normalize a stored checklist payload into canonical sections.
    Normalize(NormalizeArgs),
    /// Print safety-observation statistics for a date range.
    Stats(StatsArgs),
    /// Serve JSON-lines command requests on stdin/stdout.
    Serve,
}

#[derive(Debug, Args)]
pub struct NormalizeArgs {
    /// Raw checklist JSON file (reads stdin when omitted).
    #[arg(long)]
    pub input: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct StatsArgs {
    /// First day included (YYYY-MM-DD).
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Last day included (YYYY-MM-DD).
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Also write the counts to this CSV file.
    #[arg(long)]
    pub csv: Option<PathBuf>,
}
