//! Fixture store
//!
//! Static test data addressed by key paths. Object members are addressed by
//! name, list elements by decimal index. A path that ends on a list can
//! yield one random element instead, so repeated runs exercise the API with
//! varying input.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::Value;
use std::cell::RefCell;
use std::path::Path;

use crate::common::config::FixtureConfig;
use crate::common::{Error, Result};

/// Key-path lookup over static test data
pub trait FixtureStore {
    /// Value at `path`
    ///
    /// Implementations may return one uniformly chosen element when the
    /// value is a list.
    fn get(&self, path: &[String]) -> Result<Value>;
}

/// Fixture store backed by one JSON document
#[derive(Debug)]
pub struct JsonFixtures {
    data: Value,
    random_pick: bool,
    rng: RefCell<StdRng>,
}

impl JsonFixtures {
    /// Store with random picking seeded from the OS
    pub fn new(data: Value) -> Self {
        Self {
            data,
            random_pick: true,
            rng: RefCell::new(StdRng::from_os_rng()),
        }
    }

    /// Store with reproducible random picks
    pub fn with_seed(data: Value, seed: u64) -> Self {
        Self {
            data,
            random_pick: true,
            rng: RefCell::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Store configured from the `[fixtures]` config section
    pub fn from_config(data: Value, config: &FixtureConfig) -> Self {
        let store = match config.seed {
            Some(seed) => Self::with_seed(data, seed),
            None => Self::new(data),
        };
        store.random_pick(config.random_pick)
    }

    /// Load fixtures from a YAML or JSON file
    pub fn load(path: &Path, config: &FixtureConfig) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::file_read(path, e))?;
        let data: Value = serde_yaml::from_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded fixtures");
        Ok(Self::from_config(data, config))
    }

    /// Enable or disable random element picking
    pub fn random_pick(mut self, enabled: bool) -> Self {
        self.random_pick = enabled;
        self
    }

    /// The value at `path`, never picking
    pub fn resolve<S: AsRef<str>>(&self, path: &[S]) -> Result<&Value> {
        let mut current = &self.data;
        for (depth, step) in path.iter().enumerate() {
            let key = step.as_ref();
            let next = match current {
                Value::Object(map) => map.get(key),
                Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
                _ => None,
            };
            current = next.ok_or_else(|| Error::fixture_not_found(key, &path[..depth]))?;
        }
        Ok(current)
    }

    fn pick(&self, items: &[Value]) -> Value {
        let idx = self.rng.borrow_mut().random_range(0..items.len());
        items[idx].clone()
    }
}

impl FixtureStore for JsonFixtures {
    fn get(&self, path: &[String]) -> Result<Value> {
        let value = self.resolve(path)?;
        match value {
            Value::Array(items) if self.random_pick && !items.is_empty() => Ok(self.pick(items)),
            other => Ok(other.clone()),
        }
    }
}

/// Read a fixture path written as a list of keys
///
/// Numbers are accepted as list indices. Returns `None` for anything that
/// is not a list of strings and numbers.
pub fn keys_from_value(value: &Value) -> Option<Vec<String>> {
    value
        .as_array()?
        .iter()
        .map(|key| match key {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .collect()
}

impl Default for JsonFixtures {
    fn default() -> Self {
        Self::new(Value::Object(Default::default()))
    }
}
