//! Test catalog and suite files
//!
//! A suite is a YAML file listing test cases in the order they run, the
//! fixture data they draw from, and named shortcuts into that data.
//!
//! ```yaml
//! name: Users API
//! fixtures: fixtures.yaml
//! shortcuts:
//!   valid_user: [users, valid]
//! tests:
//!   - id: get-user
//!     name: Fetch a user
//!     request:
//!       method: GET
//!       path: /users/1
//!     expect:
//!       status: ["==", 200]
//!       body: ["object_equal", [users, valid]]
//! ```

use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use crate::common::config::FixtureConfig;
use crate::common::paths::relative_to;
use crate::common::{Error, Result};
use crate::fixtures::{keys_from_value, FixtureStore, JsonFixtures};
use crate::matcher::Expectation;

/// Template key replaced by the value of a named shortcut
pub const DATA_KEY: &str = "$data";
/// Template key replaced by the value at a raw fixture path
pub const FIXTURE_KEY: &str = "$fixture";

/// Source of test cases
pub trait TestCatalog {
    /// All tests in catalog order; every call starts over
    fn enumerate_all(&self) -> Box<dyn Iterator<Item = (&str, &TestCase)> + '_>;

    fn get_by_id(&self, id: &str) -> Option<&TestCase>;

    /// Fixture path a shortcut stands for, extended by `extra`
    fn shortcut_path(&self, name: &str, extra: &[String]) -> Result<Vec<String>>;
}

/// A single test case
#[derive(Deserialize, Debug, Clone, Default)]
pub struct TestCase {
    /// Unique id of the test
    pub id: String,
    /// Human readable name
    pub name: String,
    /// Optional description of what the test verifies
    pub description: Option<String>,
    /// Request to send
    pub request: Option<RequestSpec>,
    /// Expectations for the response
    #[serde(default)]
    pub expect: ResponseExpectation,
    /// Free-form data for custom test bodies
    #[serde(default)]
    pub data: Value,
}

impl TestCase {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Request template of a test
#[derive(Deserialize, Debug, Clone)]
pub struct RequestSpec {
    /// HTTP method (default: GET)
    #[serde(default = "default_method")]
    pub method: String,
    /// Path appended to the API base URL
    pub path: String,
    /// Query parameters
    #[serde(default)]
    pub query: BTreeMap<String, String>,
    /// Extra headers
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// JSON body, may contain `$data` / `$fixture` references
    pub body: Option<Value>,
}

fn default_method() -> String {
    "GET".to_string()
}

/// Expectations for a response
#[derive(Deserialize, Debug, Clone, Default)]
pub struct ResponseExpectation {
    /// Expected HTTP status
    pub status: Option<Expectation>,
    /// Expected JSON body
    pub body: Option<Expectation>,
}

/// Where a suite's fixture data comes from
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum FixtureSource {
    /// YAML or JSON file, relative to the suite file
    File(PathBuf),
    /// Data written inline in the suite
    Inline(Value),
}

impl Default for FixtureSource {
    fn default() -> Self {
        FixtureSource::Inline(Value::Object(Map::new()))
    }
}

/// A test suite loaded from YAML
#[derive(Deserialize, Debug)]
pub struct Suite {
    /// Name of the suite
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    #[serde(default)]
    fixtures: FixtureSource,
    /// Shortcut name -> fixture path
    #[serde(default)]
    shortcuts: BTreeMap<String, Value>,
    tests: Vec<TestCase>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl Suite {
    /// Build a suite from test cases, with inline fixture data
    pub fn new(name: impl Into<String>, tests: Vec<TestCase>) -> Result<Self> {
        Self {
            name: name.into(),
            description: None,
            fixtures: FixtureSource::default(),
            shortcuts: BTreeMap::new(),
            tests,
            index: HashMap::new(),
        }
        .indexed()
    }

    /// Use `data` as the suite's fixture data
    pub fn with_fixtures(mut self, data: Value) -> Self {
        self.fixtures = FixtureSource::Inline(data);
        self
    }

    /// Define a shortcut
    pub fn with_shortcut<S: Into<String>>(
        mut self,
        name: impl Into<String>,
        path: impl IntoIterator<Item = S>,
    ) -> Self {
        let keys: Vec<Value> = path.into_iter().map(|k| Value::String(k.into())).collect();
        self.shortcuts.insert(name.into(), Value::Array(keys));
        self
    }

    /// Parse a suite from YAML text
    ///
    /// Fixture file paths are taken as given.
    pub fn parse(content: &str) -> Result<Self> {
        let suite: Suite = serde_yaml::from_str(content)?;
        suite.indexed()
    }

    /// Load a suite file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "Failed to read test suite '{}': {}",
                path.display(),
                e
            ))
        })?;
        let mut suite = Self::parse(&content)?;
        if let FixtureSource::File(file) = &suite.fixtures {
            suite.fixtures = FixtureSource::File(relative_to(path, file));
        }
        tracing::debug!(path = %path.display(), tests = suite.tests.len(), "loaded suite");
        Ok(suite)
    }

    /// Open the suite's fixture store
    pub fn fixtures(&self, config: &FixtureConfig) -> Result<JsonFixtures> {
        match &self.fixtures {
            FixtureSource::File(path) => JsonFixtures::load(path, config),
            FixtureSource::Inline(data) => Ok(JsonFixtures::from_config(data.clone(), config)),
        }
    }

    pub fn len(&self) -> usize {
        self.tests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    fn indexed(mut self) -> Result<Self> {
        self.index.clear();
        for (i, test) in self.tests.iter().enumerate() {
            if self.index.insert(test.id.clone(), i).is_some() {
                return Err(Error::DuplicateTestId(test.id.clone()));
            }
        }
        Ok(self)
    }
}

impl TestCatalog for Suite {
    fn enumerate_all(&self) -> Box<dyn Iterator<Item = (&str, &TestCase)> + '_> {
        Box::new(self.tests.iter().map(|t| (t.id.as_str(), t)))
    }

    fn get_by_id(&self, id: &str) -> Option<&TestCase> {
        self.index.get(id).map(|&i| &self.tests[i])
    }

    fn shortcut_path(&self, name: &str, extra: &[String]) -> Result<Vec<String>> {
        let base = self
            .shortcuts
            .get(name)
            .ok_or_else(|| Error::UnknownShortcut(name.to_string()))?;
        let mut path = keys_from_value(base).ok_or_else(|| {
            Error::Config(format!("shortcut '{}' is not a list of keys: {}", name, base))
        })?;
        path.extend_from_slice(extra);
        Ok(path)
    }
}

/// Fetch the data a shortcut points at, extended by `extra` keys
pub fn shortcut(
    catalog: &dyn TestCatalog,
    fixtures: &dyn FixtureStore,
    name: &str,
    extra: &[String],
) -> Result<Value> {
    fixtures.get(&catalog.shortcut_path(name, extra)?)
}

/// Replace `$data` and `$fixture` references in a request template
///
/// `{"$data": "name"}` or `{"$data": ["name", "key", ...]}` becomes the
/// shortcut's value; `{"$fixture": ["key", ...]}` the value at a raw
/// fixture path. Each reference is resolved afresh, so list-valued data
/// yields a new random element every time.
pub fn render_template(
    catalog: &dyn TestCatalog,
    fixtures: &dyn FixtureStore,
    template: &Value,
) -> Result<Value> {
    match template {
        Value::Object(map) if map.len() == 1 => {
            if let Some(reference) = map.get(DATA_KEY) {
                let (name, extra) = split_data_reference(reference)?;
                return shortcut(catalog, fixtures, &name, &extra);
            }
            if let Some(reference) = map.get(FIXTURE_KEY) {
                let path = keys_from_value(reference).ok_or_else(|| {
                    Error::Config(format!("{} expects a list of keys, got {}", FIXTURE_KEY, reference))
                })?;
                return fixtures.get(&path);
            }
            render_object(catalog, fixtures, map)
        }
        Value::Object(map) => render_object(catalog, fixtures, map),
        Value::Array(items) => items
            .iter()
            .map(|item| render_template(catalog, fixtures, item))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        other => Ok(other.clone()),
    }
}

fn render_object(
    catalog: &dyn TestCatalog,
    fixtures: &dyn FixtureStore,
    map: &Map<String, Value>,
) -> Result<Value> {
    map.iter()
        .map(|(k, v)| Ok((k.clone(), render_template(catalog, fixtures, v)?)))
        .collect::<Result<Map<_, _>>>()
        .map(Value::Object)
}

fn split_data_reference(reference: &Value) -> Result<(String, Vec<String>)> {
    if let Value::String(name) = reference {
        return Ok((name.clone(), Vec::new()));
    }
    match keys_from_value(reference).as_deref() {
        Some([name, extra @ ..]) => Ok((name.clone(), extra.to_vec())),
        _ => Err(Error::Config(format!(
            "{} expects a shortcut name or [name, key, ...], got {}",
            DATA_KEY, reference
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SUITE: &str = r#"
name: Users API
fixtures:
  users:
    valid: {id: 1, name: Ann, email: ann@example.com}
    names: [Ann, Bob]
shortcuts:
  valid_user: [users, valid]
  names: [users, names]
tests:
  - id: get-user
    name: Fetch a user
    request:
      path: /users/1
    expect:
      status: ["==", 200]
      body: ["object_equal", [users, valid]]
  - id: create-user
    name: Create a user
    request:
      method: POST
      path: /users
      body:
        name: {"$data": names}
        email: {"$data": [valid_user, email]}
        tags: [{"$fixture": [users, valid, id]}]
  - id: no-request
    name: Only data
    data: {limit: 5}
"#;

    #[test]
    fn test_parse_suite() {
        let suite = Suite::parse(SUITE).unwrap();
        assert_eq!(suite.name, "Users API");
        assert_eq!(suite.len(), 3);

        let ids: Vec<_> = suite.enumerate_all().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["get-user", "create-user", "no-request"]);

        let get = suite.get_by_id("get-user").unwrap();
        let request = get.request.as_ref().unwrap();
        assert_eq!(request.method, "GET");
        assert_eq!(get.expect.status, Some(Expectation::equals(200)));
        assert!(matches!(
            get.expect.body,
            Some(Expectation::ObjectEqualsFixture(_))
        ));

        assert_eq!(suite.get_by_id("no-request").unwrap().data, json!({"limit": 5}));
        assert!(suite.get_by_id("missing").is_none());
    }

    #[test]
    fn test_enumerate_restarts() {
        let suite = Suite::parse(SUITE).unwrap();
        assert_eq!(suite.enumerate_all().count(), 3);
        assert_eq!(suite.enumerate_all().count(), 3);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let err = Suite::new(
            "dup",
            vec![TestCase::new("a", "one"), TestCase::new("a", "two")],
        )
        .unwrap_err();
        assert!(matches!(err, Error::DuplicateTestId(id) if id == "a"));
    }

    #[test]
    fn test_bad_expectation_in_suite() {
        let err = Suite::parse(
            "name: bad\ntests:\n  - id: a\n    name: a\n    expect:\n      status: [like, 200]\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("Unknown check type : like"));
    }

    #[test]
    fn test_shortcuts() {
        let suite = Suite::parse(SUITE).unwrap();
        let fixtures = suite.fixtures(&FixtureConfig::default()).unwrap();

        let path = suite
            .shortcut_path("valid_user", &["email".to_string()])
            .unwrap();
        assert_eq!(path, vec!["users", "valid", "email"]);

        let email = shortcut(&suite, &fixtures, "valid_user", &["email".to_string()]).unwrap();
        assert_eq!(email, json!("ann@example.com"));

        let err = shortcut(&suite, &fixtures, "admins", &[]).unwrap_err();
        assert!(matches!(err, Error::UnknownShortcut(name) if name == "admins"));
    }

    #[test]
    fn test_render_template() {
        let suite = Suite::parse(SUITE).unwrap();
        let fixtures = suite.fixtures(&FixtureConfig::default()).unwrap();
        let template = suite
            .get_by_id("create-user")
            .and_then(|t| t.request.as_ref())
            .and_then(|r| r.body.clone())
            .unwrap();

        let body = render_template(&suite, &fixtures, &template).unwrap();
        let name = body["name"].as_str().unwrap();
        assert!(name == "Ann" || name == "Bob");
        assert_eq!(body["email"], json!("ann@example.com"));
        assert_eq!(body["tags"], json!([1]));
    }

    #[test]
    fn test_render_template_missing_fixture() {
        let suite = Suite::parse(SUITE).unwrap();
        let fixtures = suite.fixtures(&FixtureConfig::default()).unwrap();
        let err = render_template(&suite, &fixtures, &json!({"$fixture": ["orders"]})).unwrap_err();
        assert!(matches!(err, Error::FixtureNotFound { .. }));
    }

    #[test]
    fn test_builder_suite() {
        let suite = Suite::new("built", vec![TestCase::new("t1", "first")])
            .unwrap()
            .with_fixtures(json!({"a": {"b": 2}}))
            .with_shortcut("ab", ["a", "b"]);
        let fixtures = suite.fixtures(&FixtureConfig::default()).unwrap();
        assert_eq!(shortcut(&suite, &fixtures, "ab", &[]).unwrap(), json!(2));
    }
}
