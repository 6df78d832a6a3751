//! Test runner implementation
//!
//! Runs catalog tests one at a time. Each test gets its own record in the
//! run session; the body decides what to request and what to check.

use serde_json::Value;

use crate::common::Result;
use crate::driver::{ApiDriver, ApiRequest};
use crate::fixtures::FixtureStore;
use crate::matcher::{Checker, Expectation};
use crate::results::{Ledger, RunSession};

use super::catalog::{self, TestCase, TestCatalog};

/// What a single test does
///
/// Mismatches are recorded through the context and are not errors. An
/// `Err` means the test itself is broken and stops the run.
pub trait TestBody {
    fn run(&mut self, ctx: &mut TestContext<'_>, test: &TestCase) -> Result<()>;
}

impl<F> TestBody for F
where
    F: FnMut(&mut TestContext<'_>, &TestCase) -> Result<()>,
{
    fn run(&mut self, ctx: &mut TestContext<'_>, test: &TestCase) -> Result<()> {
        self(ctx, test)
    }
}

/// Handle given to a test body while its record is open
pub struct TestContext<'a> {
    checker: Checker<'a>,
    catalog: &'a dyn TestCatalog,
}

impl<'a> TestContext<'a> {
    /// Check `given` against `expect`
    pub fn check(&mut self, name: &str, expect: &Expectation, given: &Value) -> Result<()> {
        self.checker.check(name, expect, given)
    }

    /// Record a free-form note
    pub fn note(&mut self, passed: bool, message: impl Into<String>) -> Result<()> {
        self.checker.note(passed, message)
    }

    /// Fixture data behind a catalog shortcut
    pub fn shortcut(&self, name: &str, extra: &[String]) -> Result<Value> {
        catalog::shortcut(self.catalog, self.checker.fixtures(), name, extra)
    }

    /// Fixture data at a raw path
    pub fn fixture(&self, path: &[String]) -> Result<Value> {
        self.checker.fixtures().get(path)
    }

    /// Resolve `$data` / `$fixture` references in a request template
    pub fn render_template(&self, template: &Value) -> Result<Value> {
        catalog::render_template(self.catalog, self.checker.fixtures(), template)
    }
}

/// Runs tests from a catalog and collects their results
pub struct TestRunner<'a> {
    catalog: &'a dyn TestCatalog,
    fixtures: &'a dyn FixtureStore,
    session: RunSession,
}

impl<'a> TestRunner<'a> {
    pub fn new(catalog: &'a dyn TestCatalog, fixtures: &'a dyn FixtureStore) -> Self {
        Self {
            catalog,
            fixtures,
            session: RunSession::new(),
        }
    }

    /// Run every test in catalog order
    ///
    /// A broken test stops the run. Its record and all earlier ones are
    /// kept in the ledger and the error is returned.
    pub fn run_all(&mut self, body: &mut dyn TestBody) -> Result<()> {
        let catalog = self.catalog;
        let mut result = Ok(());
        for (id, test) in catalog.enumerate_all() {
            result = self.run_one(id, test, body);
            if result.is_err() {
                break;
            }
        }
        self.session.finish();
        result
    }

    /// Run the single test `id`
    ///
    /// An unknown id is recorded as a failed test named "Invalid test id".
    pub fn run_by_id(&mut self, id: &str, body: &mut dyn TestBody) -> Result<()> {
        let catalog = self.catalog;
        let result = match catalog.get_by_id(id) {
            Some(test) => self.run_one(id, test, body),
            None => {
                tracing::warn!(id, "test not found in catalog");
                self.session.start("Invalid test id", id);
                self.session.note(false, "test not found")
            }
        };
        self.session.finish();
        result
    }

    fn run_one(&mut self, id: &str, test: &TestCase, body: &mut dyn TestBody) -> Result<()> {
        self.session.start(&test.name, id);
        let mut ctx = TestContext {
            checker: Checker::new(&mut self.session, self.fixtures),
            catalog: self.catalog,
        };
        let outcome = body.run(&mut ctx, test);

        if let Err(e) = &outcome {
            tracing::error!(id, error = %e, misuse = e.is_fatal_for_test(), "test aborted");
            if let Err(note_err) = self.session.note(false, format!("test aborted: {}", e)) {
                tracing::warn!(id, error = %note_err, "could not record abort");
            }
        } else {
            tracing::info!(id, passed = ?self.session.status(), "test finished");
        }
        outcome
    }

    pub fn ledger(&self) -> &Ledger {
        self.session.ledger()
    }

    pub fn into_ledger(self) -> Ledger {
        self.session.into_ledger()
    }
}

/// Test body for suite files
///
/// Sends the test's request through the driver, then checks the response
/// status and body against the test's expectations.
pub struct SuiteBody<D> {
    driver: D,
}

impl<D: ApiDriver> SuiteBody<D> {
    pub fn new(driver: D) -> Self {
        Self { driver }
    }
}

impl<D: ApiDriver> TestBody for SuiteBody<D> {
    fn run(&mut self, ctx: &mut TestContext<'_>, test: &TestCase) -> Result<()> {
        let Some(spec) = &test.request else {
            return ctx.note(false, "no request defined for this test");
        };

        let body = spec
            .body
            .as_ref()
            .map(|template| ctx.render_template(template))
            .transpose()?;
        let request = ApiRequest::from_spec(spec, body);

        let response = match self.driver.send(&request) {
            Ok(response) => response,
            Err(e) => return ctx.note(false, e.to_string()),
        };
        ctx.note(
            true,
            format!(
                "{} {} answered {}",
                request.method, request.path, response.status
            ),
        )?;

        if let Some(expect) = &test.expect.status {
            ctx.check("response status", expect, &Value::from(response.status))?;
        }
        if let Some(expect) = &test.expect.body {
            ctx.check("response body", expect, &response.body)?;
        }
        Ok(())
    }
}
