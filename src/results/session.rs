//! Run session and results ledger
//!
//! A `RunSession` holds at most one open test record. Notes and sections
//! go into that record until it is sealed, either explicitly or by the
//! next `start`. Sealed records are kept in the `Ledger`.

use serde::Serialize;
use std::collections::BTreeMap;

use super::tree::Section;
use crate::common::{Error, Result};

/// Outcome of one test
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestRecord {
    pub id: String,
    pub name: String,
    /// AND of every note recorded under this test
    pub passed: bool,
    /// Root of the note tree
    pub notes: Section,
}

/// All sealed test records of a run
#[derive(Debug, Default, Serialize)]
pub struct Ledger {
    tests: BTreeMap<String, TestRecord>,
    passed: Vec<String>,
    failed: Vec<String>,
}

impl Ledger {
    /// Number of distinct tests recorded
    pub fn len(&self) -> usize {
        self.tests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&TestRecord> {
        self.tests.get(id)
    }

    /// Ids of passed tests, in completion order
    pub fn passed(&self) -> &[String] {
        &self.passed
    }

    /// Ids of failed tests, in completion order
    pub fn failed(&self) -> &[String] {
        &self.failed
    }

    /// Whether every recorded test passed
    pub fn all_passed(&self) -> bool {
        self.failed.is_empty()
    }

    fn insert(&mut self, record: TestRecord) {
        if self.tests.contains_key(&record.id) {
            tracing::warn!(id = %record.id, "test recorded twice, keeping the latest result");
            self.passed.retain(|id| id != &record.id);
            self.failed.retain(|id| id != &record.id);
        }
        if record.passed {
            self.passed.push(record.id.clone());
        } else {
            self.failed.push(record.id.clone());
        }
        self.tests.insert(record.id.clone(), record);
    }
}

/// The test currently being recorded
#[derive(Debug)]
struct OpenRecord {
    record: TestRecord,
    /// Entry indices from the root to the active section
    cursor: Vec<usize>,
}

impl OpenRecord {
    fn active_section(&mut self) -> Result<&mut Section> {
        self.record
            .notes
            .descend_mut(&self.cursor)
            .ok_or(Error::SectionImbalance)
    }
}

/// Collector for one test run
#[derive(Debug, Default)]
pub struct RunSession {
    ledger: Ledger,
    open: Option<OpenRecord>,
}

impl RunSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seal the open test, if any, and open a new one
    pub fn start(&mut self, name: &str, id: &str) {
        self.seal();
        tracing::debug!(id, name, "starting test");
        self.open = Some(OpenRecord {
            record: TestRecord {
                id: id.to_string(),
                name: name.to_string(),
                passed: true,
                notes: Section::default(),
            },
            cursor: Vec::new(),
        });
    }

    /// Move the open test into the ledger
    ///
    /// Sections still open are closed implicitly. Does nothing when no test
    /// is open.
    pub fn seal(&mut self) {
        if let Some(open) = self.open.take() {
            if !open.cursor.is_empty() {
                tracing::debug!(
                    id = %open.record.id,
                    depth = open.cursor.len(),
                    "sealing test with open sections"
                );
            }
            tracing::debug!(id = %open.record.id, passed = open.record.passed, "sealed test");
            self.ledger.insert(open.record);
        }
    }

    /// Seal the last test and return the finished ledger
    pub fn finish(&mut self) -> &Ledger {
        self.seal();
        &self.ledger
    }

    /// Record a check outcome in the active section
    ///
    /// A failing note fails the whole test; passing notes never undo that.
    pub fn note(&mut self, passed: bool, message: impl Into<String>) -> Result<()> {
        let open = self.open.as_mut().ok_or(Error::NoActiveTest)?;
        let message = message.into();
        tracing::trace!(passed, message = %message, "note");
        open.active_section()?.push_note(passed, message);
        if !passed {
            open.record.passed = false;
        }
        Ok(())
    }

    /// Open a nested section under the active one
    pub fn start_section(&mut self, header: impl Into<String>) -> Result<()> {
        let open = self.open.as_mut().ok_or(Error::NoActiveTest)?;
        let header = header.into();
        tracing::trace!(header = %header, depth = open.cursor.len(), "start section");
        let idx = open.active_section()?.push_section(header);
        open.cursor.push(idx);
        Ok(())
    }

    /// Close the active section
    pub fn end_section(&mut self) -> Result<()> {
        let open = self.open.as_mut().ok_or(Error::NoActiveTest)?;
        open.cursor.pop().ok_or(Error::SectionImbalance)?;
        tracing::trace!(depth = open.cursor.len(), "end section");
        Ok(())
    }

    /// Result of the open test so far
    pub fn status(&self) -> Option<bool> {
        self.open.as_ref().map(|open| open.record.passed)
    }

    /// Nesting depth of the active section, 0 at the root
    pub fn depth(&self) -> usize {
        self.open.as_ref().map_or(0, |open| open.cursor.len())
    }

    /// Id of the open test
    pub fn current_id(&self) -> Option<&str> {
        self.open.as_ref().map(|open| open.record.id.as_str())
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Seal the open test and hand over the ledger
    pub fn into_ledger(mut self) -> Ledger {
        self.seal();
        self.ledger
    }
}
