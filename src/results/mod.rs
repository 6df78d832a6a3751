//! Result collection
//!
//! Accumulates pass/fail notes for one test at a time into a nested note
//! tree and keeps finished tests in a ledger that renders as a report.

mod render;
mod session;
mod tree;

pub use render::{display_message, ReportOptions, MSG_MAXLEN};
pub use session::{Ledger, RunSession, TestRecord};
pub use tree::{Entry, Note, Section};
