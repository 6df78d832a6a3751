//! Error types for apitest
//!
//! Only misuse of the framework itself ends up here. A response that does
//! not match its expectation is recorded as a failing note, never as an
//! `Error`.

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for apitest
#[derive(Error, Debug)]
pub enum Error {
    // === Fixture Errors ===
    #[error("data element '{key}' not found{}", fmt_fixture_path(.path))]
    FixtureNotFound { key: String, path: String },

    #[error("undefined data element: {0}")]
    UnknownShortcut(String),

    // === Collector Errors ===
    #[error("Error nesting sections - endSection without corresponding startSection")]
    SectionImbalance,

    #[error("No test is open. Call start() before recording notes")]
    NoActiveTest,

    // === Matcher Errors ===
    #[error("Invalid expectation: {0}")]
    MatcherConfig(String),

    // === Catalog Errors ===
    #[error("Test id '{0}' is defined more than once")]
    DuplicateTestId(String),

    // === Driver Errors ===
    #[error("Request failed: {0}")]
    Request(String),

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    // === IO Errors ===
    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

fn fmt_fixture_path(path: &str) -> String {
    if path.is_empty() {
        String::new()
    } else {
        format!(", log path : {}", path)
    }
}

impl Error {
    /// Create a fixture lookup error for `key`, reached after walking `consumed`
    pub fn fixture_not_found<S: AsRef<str>>(key: &str, consumed: &[S]) -> Self {
        Self::FixtureNotFound {
            key: key.to_string(),
            path: consumed
                .iter()
                .map(|s| format!("/{}", s.as_ref()))
                .collect::<String>(),
        }
    }

    /// Create a file read error
    pub fn file_read(path: &std::path::Path, error: impl std::fmt::Display) -> Self {
        Self::FileRead {
            path: path.display().to_string(),
            error: error.to_string(),
        }
    }

    /// Whether this error means the framework itself was misused
    ///
    /// Those errors abort the running test; everything else is plumbing.
    pub fn is_fatal_for_test(&self) -> bool {
        matches!(
            self,
            Error::FixtureNotFound { .. }
                | Error::UnknownShortcut(_)
                | Error::SectionImbalance
                | Error::NoActiveTest
                | Error::MatcherConfig(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_not_found_message() {
        let e = Error::fixture_not_found("email", &["users", "valid"]);
        assert_eq!(
            e.to_string(),
            "data element 'email' not found, log path : /users/valid"
        );

        let e = Error::fixture_not_found::<&str>("users", &[]);
        assert_eq!(e.to_string(), "data element 'users' not found");
    }

    #[test]
    fn test_fatal_classification() {
        assert!(Error::SectionImbalance.is_fatal_for_test());
        assert!(Error::MatcherConfig("x".into()).is_fatal_for_test());
        assert!(!Error::Request("timeout".into()).is_fatal_for_test());
    }

    #[test]
    fn test_file_read_message() {
        let e = Error::file_read(std::path::Path::new("/tmp/suite.yaml"), "No such file");
        assert_eq!(e.to_string(), "Failed to read file '/tmp/suite.yaml': No such file");
    }
}
