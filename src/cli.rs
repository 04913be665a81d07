use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// ENSO climate diagnostics.
#[derive(Parser)]
#[command(
    name = "enso",
    version,
    about = "ENSO climate diagnostics for gridded monthly data"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Compute one figure's diagnostics, or all of them.
    Run(RunArgs),
    /// List the available figures.
    List,
}

/// Arguments for the `run` subcommand.
#[derive(clap::Args)]
pub struct RunArgs {
    /// Figure identifier (see `enso list`) or `all`.
    pub figure: String,

    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "enso.toml")]
    pub config: PathBuf,

    /// Override the output directory from config.
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Override the climatology reference period from config.
    #[arg(long, num_args = 2, value_names = ["START", "END"])]
    pub reference_period: Option<Vec<i32>>,
}
