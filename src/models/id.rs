//! Record identifiers
//!
//! Servers hand out numeric or string ids; both are normalised to their
//! string form so `5` and `"5"` address the same record.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::error::{CacheError, Result};
use crate::models::params::canonical_number;

/// Identifier of a single resource record within a model.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Id(String);

impl Id {
    /// Builds an id from its textual form.
    ///
    /// Fails fast on an empty string: that is always a caller bug.
    pub fn parse(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(CacheError::InvalidId("id cannot be empty".to_string()));
        }
        Ok(Self(raw))
    }

    /// Builds an id from a JSON scalar (number or string).
    pub fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::String(s) => Self::parse(s.as_str()),
            Value::Number(n) => Ok(Self(canonical_number(n))),
            Value::Null => Err(CacheError::MissingId("record".to_string())),
            other => Err(CacheError::InvalidId(format!(
                "expected a number or string, got {}",
                other
            ))),
        }
    }

    /// Reads the `id` field of a resource record.
    pub fn from_record(record: &Value) -> Result<Self> {
        match record.get("id") {
            Some(value) => Self::from_value(value),
            None => Err(CacheError::MissingId("record".to_string())),
        }
    }

    /// Returns the string form of the id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

macro_rules! id_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Id {
                fn from(value: $ty) -> Self {
                    Self(value.to_string())
                }
            }
        )*
    };
}

id_from_integer!(i32, i64, u32, u64);
