//! Plain-text report rendering
//!
//! Layout:
//!
//! ```text
//! Total : 2
//! Success : 1, Fails : 1
//! Problematic:
//!     get-user : Fetch a user
//!         response body type Object
//!             - response body fails: missing fields of answer : email
//! Done:
//!     list-users : List users
//! ```
//!
//! Test lines are indented with one tab, note lines with two tabs plus one
//! per nesting level.

use std::fmt::Write;

use super::session::{Ledger, TestRecord};
use super::tree::{Entry, Section};

/// Marker appended to truncated messages
const ELLIPSIS: &str = "...";

/// Default longest message shown on one line
pub const MSG_MAXLEN: usize = 200;

/// Rendering options
#[derive(Debug, Clone, Copy)]
pub struct ReportOptions {
    /// Include note trees
    pub verbose: bool,
    /// Longest message shown, ellipsis included
    pub message_max_len: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            verbose: false,
            message_max_len: MSG_MAXLEN,
        }
    }
}

impl Ledger {
    /// Render the report with the default message length
    pub fn render(&self, verbose: bool) -> String {
        self.render_with(&ReportOptions {
            verbose,
            ..ReportOptions::default()
        })
    }

    pub fn render_with(&self, options: &ReportOptions) -> String {
        let mut out = String::new();
        let _ = write!(out, "Total : {}", self.len());
        let _ = write!(
            out,
            "\nSuccess : {}, Fails : {}",
            self.passed().len(),
            self.failed().len()
        );

        if !self.failed().is_empty() {
            out.push_str("\nProblematic:");
            for id in self.failed() {
                if let Some(record) = self.get(id) {
                    render_test(&mut out, record, options);
                }
            }
        }

        if !self.passed().is_empty() {
            out.push_str("\nDone:");
            for id in self.passed() {
                if let Some(record) = self.get(id) {
                    render_test(&mut out, record, options);
                }
            }
        }

        out
    }
}

fn render_test(out: &mut String, record: &TestRecord, options: &ReportOptions) {
    let _ = write!(out, "\n\t{} : {}", record.id, record.name);
    if options.verbose {
        render_section(out, &record.notes, record.passed, 0, options);
        out.push('\n');
    }
}

/// Render the entries of `section` at nesting `level`
///
/// Only notes agreeing with the test result are shown: a failed test lists
/// its failures, a passed test its passes. Section headers always show.
fn render_section(
    out: &mut String,
    section: &Section,
    test_passed: bool,
    level: usize,
    options: &ReportOptions,
) {
    for entry in &section.entries {
        match entry {
            Entry::Section(child) => {
                let _ = write!(out, "\n\t\t{}{}", "\t".repeat(level), child.header);
                render_section(out, child, test_passed, level + 1, options);
            }
            Entry::Note(note) if note.passed == test_passed => {
                let _ = write!(
                    out,
                    "\n\t\t{}{}{}",
                    "\t".repeat(level),
                    if note.passed { "+ " } else { "- " },
                    display_message(&note.message, options.message_max_len)
                );
            }
            Entry::Note(_) => {}
        }
    }
}

/// Fit a message on one report line
///
/// Newlines become the two characters `\n`; anything longer than `max_len`
/// characters is cut so that it ends in `...` at exactly `max_len`.
pub fn display_message(message: &str, max_len: usize) -> String {
    let escaped = message.replace('\n', "\\n");
    if escaped.chars().count() <= max_len {
        return escaped;
    }
    let keep = max_len.saturating_sub(ELLIPSIS.len());
    let mut out: String = escaped.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}
