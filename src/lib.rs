//! apitest - declarative API conformance testing
//!
//! Test cases send requests to a live API and compare the responses with
//! declarative expectations. Every finding becomes a pass/fail note in a
//! nested report.

pub mod cli;
pub mod commands;
pub mod common;
pub mod driver;
pub mod fixtures;
pub mod matcher;
pub mod results;
pub mod testing;

// Re-export commonly used types for tests
pub use common::{Error, Result};
pub use matcher::{CompareOp, Expectation};
pub use results::{Ledger, RunSession};
