//! CLI command handling
//!
//! Loads suites and fixtures, runs the tests and prints the report.

use colored::Colorize;
use serde_json::Value;
use std::path::Path;

use crate::commands::Commands;
use crate::common::config::Config;
use crate::common::Result;
use crate::driver::HttpDriver;
use crate::fixtures::JsonFixtures;
use crate::matcher::{Checker, Expectation};
use crate::results::{Ledger, ReportOptions, RunSession};
use crate::testing::{Suite, SuiteBody, TestCatalog, TestRunner};

/// Dispatch a CLI command
///
/// Returns whether every test passed.
pub fn dispatch(command: Commands, config: Config) -> Result<bool> {
    match command {
        Commands::Run {
            suite,
            id,
            verbose,
            base_url,
            seed,
            json,
        } => {
            let mut config = config;
            if let Some(seed) = seed {
                config.fixtures.seed = Some(seed);
            }
            if let Some(base_url) = base_url {
                config.api.base_url = base_url;
            }
            if verbose {
                config.report.verbose = true;
            }
            run_suite(&suite, id.as_deref(), json, &config)
        }

        Commands::List { suite } => {
            let suite = Suite::load(&suite)?;
            println!("{}", suite.name.bold());
            for (id, test) in suite.enumerate_all() {
                println!("\t{} : {}", id, test.name);
            }
            Ok(true)
        }

        Commands::Check {
            expectation,
            value,
            fixtures,
        } => {
            let expect = Expectation::from_value(&parse_value(&expectation)?)?;
            let given = parse_value(&value)?;
            let fixtures = match fixtures {
                Some(path) => JsonFixtures::load(&path, &config.fixtures)?,
                None => JsonFixtures::default(),
            };

            let mut session = RunSession::new();
            session.start("ad-hoc check", "check");
            Checker::new(&mut session, &fixtures).check("value", &expect, &given)?;
            let ledger = session.into_ledger();

            println!(
                "{}",
                ledger.render_with(&ReportOptions {
                    verbose: true,
                    message_max_len: config.report.message_max_len,
                })
            );
            Ok(ledger.all_passed())
        }
    }
}

fn run_suite(path: &Path, id: Option<&str>, json: bool, config: &Config) -> Result<bool> {
    let suite = Suite::load(path)?;
    let fixtures = suite.fixtures(&config.fixtures)?;
    let mut body = SuiteBody::new(HttpDriver::new(&config.api)?);

    tracing::info!(suite = %suite.name, base_url = %config.api.base_url, "running suite");
    let mut runner = TestRunner::new(&suite, &fixtures);
    let outcome = match id {
        Some(id) => runner.run_by_id(id, &mut body),
        None => runner.run_all(&mut body),
    };
    let ledger = runner.into_ledger();

    if json {
        println!("{}", serde_json::to_string_pretty(&ledger)?);
    } else {
        println!(
            "{}",
            ledger.render_with(&ReportOptions {
                verbose: config.report.verbose,
                message_max_len: config.report.message_max_len,
            })
        );
    }
    print_summary(&ledger);

    outcome?;
    Ok(ledger.all_passed())
}

fn print_summary(ledger: &Ledger) {
    let passed = ledger.passed().len();
    let failed = ledger.failed().len();
    if failed == 0 {
        eprintln!(
            "\n{} {}",
            "✓".green().bold(),
            format!("{} passed", passed).green().bold()
        );
    } else {
        eprintln!(
            "\n{} {}, {}",
            "✗".red().bold(),
            format!("{} failed", failed).red().bold(),
            format!("{} passed", passed).dimmed()
        );
    }
}

/// Parse a command-line value; YAML accepts JSON as well as the shorter forms
fn parse_value(text: &str) -> Result<Value> {
    Ok(serde_yaml::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_value_json_and_yaml() {
        assert_eq!(parse_value(r#"{"id": 3}"#).unwrap(), json!({"id": 3}));
        assert_eq!(parse_value("[object, {id: ['>', 0]}]").unwrap(), json!(["object", {"id": [">", 0]}]));
        assert_eq!(parse_value("42").unwrap(), json!(42));
    }

    #[test]
    fn test_check_command() {
        let config = Config::default();
        let passed = dispatch(
            Commands::Check {
                expectation: r#"["object", {"id": [">", 0]}]"#.to_string(),
                value: r#"{"id": 3}"#.to_string(),
                fixtures: None,
            },
            config,
        )
        .unwrap();
        assert!(passed);

        let passed = dispatch(
            Commands::Check {
                expectation: r#"["array", [["==", "x"]]]"#.to_string(),
                value: "[]".to_string(),
                fixtures: None,
            },
            Config::default(),
        )
        .unwrap();
        assert!(!passed);
    }

    #[test]
    fn test_check_command_bad_expectation() {
        let result = dispatch(
            Commands::Check {
                expectation: r#"["regex", "^a"]"#.to_string(),
                value: "\"abc\"".to_string(),
                fixtures: None,
            },
            Config::default(),
        );
        assert!(result.is_err());
    }
}
