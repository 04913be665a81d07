mod cli;
mod config;
mod convert;
mod eof_cmd;
mod figure;
mod gsat_cmd;
mod index;
mod logging;
mod precip_cmd;
mod run_cmd;
mod ssh_cmd;
mod table_cmd;

use std::process;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Command};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Run(args) => run_cmd::run(args),
        Command::List => {
            run_cmd::list();
            Ok(())
        }
    }
}
