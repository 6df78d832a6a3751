//! Recursive value checking
//!
//! A `Checker` walks a given value alongside an expectation and records
//! one note per finding in the run session. Composite checks wrap their
//! findings in a section named after the check.

use serde_json::{Map, Value};

use super::descriptor::{CompareOp, Expectation};
use crate::common::{Error, Result};
use crate::fixtures::FixtureStore;
use crate::results::RunSession;

/// Records check outcomes for the test open in `session`
pub struct Checker<'a> {
    session: &'a mut RunSession,
    fixtures: &'a dyn FixtureStore,
}

impl<'a> Checker<'a> {
    pub fn new(session: &'a mut RunSession, fixtures: &'a dyn FixtureStore) -> Self {
        Self { session, fixtures }
    }

    /// Check `given` against `expect`, naming the findings after `name`
    ///
    /// Mismatches become failing notes. Errors are reserved for broken
    /// expectations and fixtures, and abort the check where they occur.
    pub fn check(&mut self, name: &str, expect: &Expectation, given: &Value) -> Result<()> {
        match expect {
            Expectation::Comparison { op, value } => {
                self.check_comparison(name, *op, value, given)
            }
            Expectation::ObjectMatch(fields) => {
                self.in_section(format!("{} type Object", name), |c| {
                    c.check_object(name, fields, given)
                })
            }
            Expectation::ArrayMatch(items) => {
                self.in_section(format!("{} type Array", name), |c| {
                    c.check_array(name, items, given)
                })
            }
            Expectation::ObjectEqualsFixture(path) => {
                self.in_section(format!("{} type Object", name), |c| {
                    c.check_object_equal(name, path, given)
                })
            }
        }
    }

    /// Record a free-form note in the current test
    pub fn note(&mut self, passed: bool, message: impl Into<String>) -> Result<()> {
        self.session.note(passed, message)
    }

    pub fn fixtures(&self) -> &dyn FixtureStore {
        self.fixtures
    }

    fn in_section<F>(&mut self, header: String, body: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        self.session.start_section(header)?;
        let outcome = body(self);
        let closed = self.session.end_section();
        outcome.and(closed)
    }

    fn check_comparison(
        &mut self,
        name: &str,
        op: CompareOp,
        expected: &Value,
        given: &Value,
    ) -> Result<()> {
        if op.apply(given, expected) {
            self.session
                .note(true, format!("{} is OK, have got {}", name, repr(given)))
        } else {
            self.session.note(
                false,
                format!(
                    "invalid {}, expected {}, have got {}",
                    name,
                    literal(expected),
                    repr(given)
                ),
            )
        }
    }

    fn check_object(
        &mut self,
        name: &str,
        fields: &[(String, Expectation)],
        given: &Value,
    ) -> Result<()> {
        let Some(given) = given.as_object() else {
            return self
                .session
                .note(false, format!("{} fails: given value is not object", name));
        };

        let expected_keys: Vec<&str> = fields.iter().map(|(k, _)| k.as_str()).collect();
        let excess: Vec<&str> = given
            .keys()
            .map(String::as_str)
            .filter(|k| !expected_keys.contains(k))
            .collect();
        let missing: Vec<&str> = expected_keys
            .iter()
            .copied()
            .filter(|k| !given.contains_key(*k))
            .collect();

        if !excess.is_empty() {
            self.session.note(
                false,
                format!("{} fails: excess fields of answer : {}", name, excess.join(",")),
            )?;
        }
        if !missing.is_empty() {
            self.session.note(
                false,
                format!("{} fails: missing fields of answer : {}", name, missing.join(",")),
            )?;
        }

        let shared: Vec<(&String, &Value, &Expectation)> = given
            .iter()
            .filter_map(|(key, value)| field(fields, key).map(|expect| (key, value, expect)))
            .collect();

        if shared.is_empty() {
            self.session.note(
                false,
                format!(
                    "{} fails: no expected fields present at all : {}",
                    name,
                    expected_keys.join(",")
                ),
            )?;
        }

        for (key, value, expect) in shared {
            self.check(&format!("field \"{}\" value", key), expect, value)?;
        }
        Ok(())
    }

    fn check_array(&mut self, name: &str, items: &[Expectation], given: &Value) -> Result<()> {
        let Some(given) = given.as_array() else {
            return self
                .session
                .note(false, format!("{} fails: given value is not array", name));
        };

        self.session
            .note(true, format!("{} type check pass, array given", name))?;
        if items.is_empty() {
            return Ok(());
        }
        if given.is_empty() {
            return self
                .session
                .note(false, format!("{} fails: given is an empty array", name));
        }

        let mut remaining = given.iter();
        for (i, expect) in items.iter().enumerate() {
            let item_name = format!("item \"{}\" value", i);
            match remaining.next() {
                Some(value) => self.check(&item_name, expect, value)?,
                None => self.session.note(
                    false,
                    format!("{} fails: given array has no element left", item_name),
                )?,
            }
        }
        Ok(())
    }

    fn check_object_equal(&mut self, name: &str, path: &[String], given: &Value) -> Result<()> {
        if !given.is_object() {
            return self
                .session
                .note(false, format!("{} fails: given value is not object", name));
        }

        let expected = self.fixtures.get(path)?;
        let fields = equality_fields(&expected).ok_or_else(|| {
            Error::MatcherConfig(format!(
                "fixture /{} is not an object, have got {}",
                path.join("/"),
                expected
            ))
        })?;
        self.check_object(name, &fields, given)
    }
}

fn field<'e>(fields: &'e [(String, Expectation)], key: &str) -> Option<&'e Expectation> {
    fields.iter().find(|(k, _)| k == key).map(|(_, e)| e)
}

/// Turn a fixture object into per-field equality expectations
fn equality_fields(expected: &Value) -> Option<Vec<(String, Expectation)>> {
    expected.as_object().map(|map: &Map<String, Value>| {
        map.iter()
            .map(|(k, v)| (k.clone(), Expectation::equals(v.clone())))
            .collect()
    })
}

/// Given values: strings quoted, everything else as JSON
fn repr(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{}\"", s),
        other => other.to_string(),
    }
}

/// Expected values: strings bare, everything else as JSON
fn literal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
