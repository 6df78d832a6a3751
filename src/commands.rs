//! CLI command definitions
//!
//! Defines the clap commands for the apitest CLI.

use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Run a test suite against the API
    Run {
        /// Path to the YAML suite file
        suite: PathBuf,

        /// Run only the test with this id
        #[arg(long)]
        id: Option<String>,

        /// Show the note tree of every test
        #[arg(long, short)]
        verbose: bool,

        /// API base URL (overrides the config file)
        #[arg(long)]
        base_url: Option<String>,

        /// Seed for fixture picks, to replay a run
        #[arg(long)]
        seed: Option<u64>,

        /// Print the results as JSON instead of the text report
        #[arg(long)]
        json: bool,
    },

    /// List the tests of a suite in run order
    #[command(alias = "ls")]
    List {
        /// Path to the YAML suite file
        suite: PathBuf,
    },

    /// Check a JSON value against an expectation
    ///
    /// Example: apitest check '["object", {"id": [">", 0]}]' '{"id": 3}'
    Check {
        /// Expectation in [type, argument] form (JSON or YAML)
        expectation: String,

        /// Value to check (JSON or YAML)
        value: String,

        /// Fixture file for object_equal expectations
        #[arg(long)]
        fixtures: Option<PathBuf>,
    },
}
