//! Request parameters and their canonical lookup key

use std::fmt::Write;

use serde::Serialize;
use serde_json::{Map, Number, Value};

/// Query parameters identifying a cached collection.
///
/// Two parameter sets are equal when they hold the same keys and values,
/// regardless of insertion order.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Params(Map<String, Value>);

/// Canonical, order-independent encoding of a [`Params`] set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParamsKey(String);

impl Params {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter, builder style.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Sets a parameter in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Builds params from a JSON value; anything but an object yields `None`.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Returns the canonical lookup key.
    pub fn key(&self) -> ParamsKey {
        let mut out = String::new();
        write_canonical(&Value::Object(self.0.clone()), &mut out);
        ParamsKey(out)
    }

    /// Renders the params as query-string pairs.
    ///
    /// Strings are used verbatim; other values use their JSON text.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .map(|(key, value)| {
                let rendered = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (key.clone(), rendered)
            })
            .collect()
    }

    /// Returns the underlying map.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Returns true if no parameters are set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl PartialEq for Params {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Params {}

impl From<Map<String, Value>> for Params {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl ParamsKey {
    /// Returns the encoded key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Writes `value` as JSON with object keys sorted at every depth.
fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                let _ = write!(out, "{}:", Value::String(key.clone()));
                write_canonical(&map[key], out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        Value::Number(n) => out.push_str(&canonical_number(n)),
        scalar => {
            let _ = write!(out, "{}", scalar);
        }
    }
}

/// Largest magnitude below which every integral `f64` is exact.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Renders a JSON number so that `1` and `1.0` read the same.
///
/// Floats with an exact integer value are written as integers; every other
/// number keeps its JSON text.
pub(crate) fn canonical_number(n: &Number) -> String {
    if n.is_f64() {
        if let Some(f) = n.as_f64() {
            if f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER {
                return format!("{}", f as i64);
            }
        }
    }
    n.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_ignores_insertion_order() {
        let a = Params::new().with("page", 1).with("sort", "name");
        let b = Params::new().with("sort", "name").with("page", 1);
        assert_eq!(a.key(), b.key());
        assert_eq!(a, b);
    }

    #[test]
    fn test_key_sorts_nested_objects() {
        let a = Params::from_value(json!({"filter": {"b": 2, "a": 1}})).unwrap();
        let b = Params::from_value(json!({"filter": {"a": 1, "b": 2}})).unwrap();
        assert_eq!(a.key(), b.key());
        assert_eq!(a.key().as_str(), r#"{"filter":{"a":1,"b":2}}"#);
    }

    #[test]
    fn test_key_distinguishes_values() {
        let a = Params::new().with("page", 1);
        let b = Params::new().with("page", 2);
        let c = Params::new().with("page", "1");
        assert_ne!(a.key(), b.key());
        assert_ne!(a.key(), c.key());
    }

    #[test]
    fn test_key_treats_integral_floats_as_integers() {
        let int = Params::from_value(json!({"page": 1, "filter": {"min": 0}})).unwrap();
        let float = Params::from_value(json!({"page": 1.0, "filter": {"min": -0.0}})).unwrap();
        assert_eq!(int.key(), float.key());
        assert_eq!(int, float);

        let fractional = Params::new().with("ratio", 1.5);
        assert_eq!(fractional.key().as_str(), r#"{"ratio":1.5}"#);
    }

    #[test]
    fn test_empty_params_key() {
        assert_eq!(Params::new().key().as_str(), "{}");
    }

    #[test]
    fn test_query_pairs() {
        let params = Params::new().with("page", 2).with("q", "blue widgets");
        let mut pairs = params.query_pairs();
        pairs.sort();
        assert_eq!(
            pairs,
            vec![
                ("page".to_string(), "2".to_string()),
                ("q".to_string(), "blue widgets".to_string()),
            ]
        );
    }

    #[test]
    fn test_from_value_rejects_non_objects() {
        assert!(Params::from_value(json!([1, 2])).is_none());
    }
}
