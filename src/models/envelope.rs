//! Response envelopes
//!
//! A server answers either with the payload itself or with an object that
//! carries the payload under `data` next to metadata such as paging info.
//! The transport declares which shape it speaks; nothing here inspects a
//! body to guess.

use serde_json::{Map, Value};

/// Which response layout a server uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResponseShape {
    /// The body is the payload
    #[default]
    Bare,
    /// The body is an object with the payload under `data`
    Wrapped,
}

impl ResponseShape {
    /// Splits a decoded body according to this shape.
    ///
    /// A wrapped body that is not an object has no `data` and no metadata.
    pub fn decode(self, body: Value) -> Envelope {
        match self {
            ResponseShape::Bare => Envelope::Bare(body),
            ResponseShape::Wrapped => match body {
                Value::Object(mut meta) => {
                    let data = meta.remove("data").unwrap_or(Value::Null);
                    Envelope::Wrapped { data, meta }
                }
                _ => Envelope::Wrapped {
                    data: Value::Null,
                    meta: Map::new(),
                },
            },
        }
    }
}

/// A decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    /// Payload without metadata
    Bare(Value),
    /// Payload with sibling metadata fields
    Wrapped {
        /// The payload
        data: Value,
        /// Every other top-level field of the response
        meta: Map<String, Value>,
    },
}

impl Envelope {
    /// Returns the payload.
    pub fn data(&self) -> &Value {
        match self {
            Envelope::Bare(data) | Envelope::Wrapped { data, .. } => data,
        }
    }

    /// Returns the payload as a record list, or `None` if it is not an array.
    pub fn records(&self) -> Option<&Vec<Value>> {
        self.data().as_array()
    }

    /// Returns the response metadata; empty for bare responses.
    pub fn other_info(&self) -> Map<String, Value> {
        match self {
            Envelope::Bare(_) => Map::new(),
            Envelope::Wrapped { meta, .. } => meta.clone(),
        }
    }

    /// Rebuilds the response body as the server sent it.
    pub fn to_value(&self) -> Value {
        match self {
            Envelope::Bare(data) => data.clone(),
            Envelope::Wrapped { data, meta } => {
                let mut body = meta.clone();
                body.insert("data".to_string(), data.clone());
                Value::Object(body)
            }
        }
    }
}

impl From<Value> for Envelope {
    fn from(value: Value) -> Self {
        Envelope::Bare(value)
    }
}
