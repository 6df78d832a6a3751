//! Expectation descriptors
//!
//! Descriptors are written as `[type, argument]` pairs, the same shape in
//! YAML suites and JSON:
//!
//! ```yaml
//! ["object", {
//!   id:    ["==", 1],
//!   tags:  ["array", [["!=", ""]]],
//!   owner: ["object_equal", [users, valid]],
//! }]
//! ```

use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::common::{Error, Result};
use crate::fixtures::keys_from_value;

/// Scalar comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Equals,
    NotEquals,
    Gte,
    Lte,
    Gt,
    Lt,
}

impl CompareOp {
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Equals => "==",
            CompareOp::NotEquals => "!=",
            CompareOp::Gte => ">=",
            CompareOp::Lte => "<=",
            CompareOp::Gt => ">",
            CompareOp::Lt => "<",
        }
    }
}

impl FromStr for CompareOp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "==" | "eq" => Ok(CompareOp::Equals),
            "!=" | "ne" => Ok(CompareOp::NotEquals),
            ">=" | "gte" => Ok(CompareOp::Gte),
            "<=" | "lte" => Ok(CompareOp::Lte),
            ">" | "gt" => Ok(CompareOp::Gt),
            "<" | "lt" => Ok(CompareOp::Lt),
            _ => Err(Error::MatcherConfig(format!("Unknown check type : {}", s))),
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// What a value is expected to look like
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub enum Expectation {
    /// Scalar comparison against `value`
    Comparison { op: CompareOp, value: Value },
    /// Keyed object with exactly these fields
    ObjectMatch(Vec<(String, Expectation)>),
    /// List whose leading elements match these items in order
    ArrayMatch(Vec<Expectation>),
    /// Keyed object equal, field by field, to the fixture at this path
    ObjectEqualsFixture(Vec<String>),
}

impl Expectation {
    pub fn compare(op: CompareOp, value: impl Into<Value>) -> Self {
        Expectation::Comparison {
            op,
            value: value.into(),
        }
    }

    pub fn equals(value: impl Into<Value>) -> Self {
        Self::compare(CompareOp::Equals, value)
    }

    pub fn object<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Expectation)>,
    {
        Expectation::ObjectMatch(fields.into_iter().map(|(k, e)| (k.into(), e)).collect())
    }

    pub fn array(items: impl IntoIterator<Item = Expectation>) -> Self {
        Expectation::ArrayMatch(items.into_iter().collect())
    }

    pub fn object_equal<S: Into<String>>(path: impl IntoIterator<Item = S>) -> Self {
        Expectation::ObjectEqualsFixture(path.into_iter().map(Into::into).collect())
    }

    /// Parse a descriptor from its `[type, argument]` form
    pub fn from_value(value: &Value) -> Result<Self> {
        let (tag, arg) = match value.as_array().map(Vec::as_slice) {
            Some([Value::String(tag), arg]) => (tag.as_str(), arg),
            _ => {
                return Err(Error::MatcherConfig(format!(
                    "expectation must be a [type, value] pair, got {}",
                    value
                )))
            }
        };

        match tag {
            "object" => {
                let fields = arg.as_object().ok_or_else(|| {
                    Error::MatcherConfig(format!("'object' expects a map of fields, got {}", arg))
                })?;
                fields
                    .iter()
                    .map(|(k, v)| Ok((k.clone(), Self::from_value(v)?)))
                    .collect::<Result<Vec<_>>>()
                    .map(Expectation::ObjectMatch)
            }
            "array" => {
                let items = arg.as_array().ok_or_else(|| {
                    Error::MatcherConfig(format!("'array' expects a list of items, got {}", arg))
                })?;
                items
                    .iter()
                    .map(Self::from_value)
                    .collect::<Result<Vec<_>>>()
                    .map(Expectation::ArrayMatch)
            }
            "object_equal" => parse_fixture_path(arg).map(Expectation::ObjectEqualsFixture),
            op => Ok(Expectation::Comparison {
                op: op.parse()?,
                value: arg.clone(),
            }),
        }
    }
}

impl TryFrom<Value> for Expectation {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_value(&value)
    }
}

fn parse_fixture_path(arg: &Value) -> Result<Vec<String>> {
    keys_from_value(arg).ok_or_else(|| {
        Error::MatcherConfig(format!(
            "'object_equal' expects a fixture path of keys, got {}",
            arg
        ))
    })
}
