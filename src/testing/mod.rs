//! Test catalog and runner
//!
//! Suites are read from YAML files; the runner feeds each test case to a
//! test body and keeps the outcomes in a run session.

mod catalog;
mod runner;

pub use catalog::*;
pub use runner::{SuiteBody, TestBody, TestContext, TestRunner};
