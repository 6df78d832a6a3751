//! Scalar comparison semantics
//!
//! Numbers compare numerically whatever their JSON representation, strings
//! lexicographically, booleans with `false < true`. Lists and objects only
//! support structural equality, with numbers inside them compared the same
//! way. Values of different types are never equal and never ordered.

use serde_json::Value;
use std::cmp::Ordering;

use super::descriptor::CompareOp;

impl CompareOp {
    /// Evaluate `given <op> expected`
    pub fn apply(self, given: &Value, expected: &Value) -> bool {
        match self {
            CompareOp::Equals => values_equal(given, expected),
            CompareOp::NotEquals => !values_equal(given, expected),
            CompareOp::Gte => matches!(
                order(given, expected),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            CompareOp::Lte => matches!(
                order(given, expected),
                Some(Ordering::Less | Ordering::Equal)
            ),
            CompareOp::Gt => order(given, expected) == Some(Ordering::Greater),
            CompareOp::Lt => order(given, expected) == Some(Ordering::Less),
        }
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(_), Value::Number(_)) => order(a, b) == Some(Ordering::Equal),
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter()
                    .all(|(k, v)| y.get(k).is_some_and(|w| values_equal(v, w)))
        }
        _ => a == b,
    }
}

fn order(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            if let (Some(x), Some(y)) = (x.as_i64(), y.as_i64()) {
                Some(x.cmp(&y))
            } else if let (Some(x), Some(y)) = (x.as_u64(), y.as_u64()) {
                Some(x.cmp(&y))
            } else {
                x.as_f64()?.partial_cmp(&y.as_f64()?)
            }
        }
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numbers_compare_numerically() {
        assert!(CompareOp::Equals.apply(&json!(1), &json!(1.0)));
        assert!(CompareOp::Gt.apply(&json!(10), &json!(9.5)));
        assert!(CompareOp::Lt.apply(&json!(-3), &json!(2)));
        assert!(CompareOp::Gte.apply(&json!(u64::MAX), &json!(u64::MAX)));
        assert!(CompareOp::Lte.apply(&json!(-1), &json!(u64::MAX)));
    }

    #[test]
    fn test_strings_and_bools() {
        assert!(CompareOp::Equals.apply(&json!("abc"), &json!("abc")));
        assert!(CompareOp::Lt.apply(&json!("abc"), &json!("abd")));
        assert!(CompareOp::Gt.apply(&json!(true), &json!(false)));
        assert!(CompareOp::NotEquals.apply(&json!(""), &json!("x")));
    }

    #[test]
    fn test_mismatched_types() {
        assert!(!CompareOp::Equals.apply(&json!("1"), &json!(1)));
        assert!(CompareOp::NotEquals.apply(&json!("1"), &json!(1)));
        assert!(!CompareOp::Gte.apply(&json!("1"), &json!(1)));
        assert!(!CompareOp::Lt.apply(&json!(null), &json!(0)));
    }

    #[test]
    fn test_null_and_composites() {
        assert!(CompareOp::Equals.apply(&json!(null), &json!(null)));
        assert!(CompareOp::Gte.apply(&json!(null), &json!(null)));
        assert!(CompareOp::Equals.apply(&json!({"a": [1, 2]}), &json!({"a": [1, 2]})));
        assert!(!CompareOp::Gt.apply(&json!([2]), &json!([1])));
        assert!(!CompareOp::Lte.apply(&json!({}), &json!({})));
    }

    #[test]
    fn test_nested_numbers_compare_numerically() {
        assert!(CompareOp::Equals.apply(&json!([1]), &json!([1.0])));
        assert!(CompareOp::Equals.apply(&json!({"a": {"b": [2]}}), &json!({"a": {"b": [2.0]}})));
        assert!(!CompareOp::Equals.apply(&json!([1, 2]), &json!([1])));
        assert!(!CompareOp::Equals.apply(&json!({"a": 1}), &json!({"b": 1})));
        assert!(CompareOp::NotEquals.apply(&json!({"a": 1}), &json!({"a": 1, "b": 2})));
    }
}
