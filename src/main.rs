//! apitest - declarative API conformance testing
//!
//! Runs YAML test suites against a live API and prints a pass/fail report.

use apitest::common::{config::Config, logging, Result};
use apitest::{cli, commands::Commands};
use clap::{ArgAction, Parser};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "apitest", about = "Declarative API conformance testing")]
#[command(version, long_about = None)]
struct Cli {
    /// Configuration file (default: the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log more (-d for debug, -dd for trace)
    #[arg(short = 'd', long = "debug", action = ArgAction::Count, global = true)]
    debug: u8,

    #[command(subcommand)]
    command: Commands,
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init_cli(cli.debug);

    let result =
        load_config(cli.config.as_deref()).and_then(|config| cli::dispatch(cli.command, config));

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
