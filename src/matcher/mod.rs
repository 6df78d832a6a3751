//! Expectation matching
//!
//! Compares JSON values against declarative expectations and records the
//! findings as notes in the run session.

mod check;
mod compare;
mod descriptor;

pub use check::Checker;
pub use descriptor::{CompareOp, Expectation};
