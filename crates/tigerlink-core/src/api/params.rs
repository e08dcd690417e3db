//! Typed query-string parameters for installed and interpreted queries.
//!
//! The wire format flattens structured values: a typed vertex becomes
//! `name=id` plus `name.type=Type`, a vertex set becomes `name[i]` plus
//! `name[i].type` pairs, and a primitive list repeats the key.

use chrono::NaiveDateTime;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
    /// A single typed vertex reference.
    Vertex { id: String, vertex_type: String },
    /// A `SET<VERTEX>` argument of `(id, type)` pairs.
    VertexSet(Vec<(String, String)>),
    /// A list of primitive values, encoded as a repeated key.
    List(Vec<ParamValue>),
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Str(value.to_string())
    }
}
impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Str(value)
    }
}
impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}
impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}
impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}
impl From<NaiveDateTime> for ParamValue {
    fn from(value: NaiveDateTime) -> Self {
        ParamValue::DateTime(value)
    }
}
impl From<Vec<String>> for ParamValue {
    fn from(values: Vec<String>) -> Self {
        ParamValue::List(values.into_iter().map(ParamValue::Str).collect())
    }
}

/// Ordered parameter map; insertion order is preserved on the wire.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams(Vec<(String, ParamValue)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.push(key, value);
        self
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.push((key.into(), value.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Flatten to `(key, value)` pairs ready for the query string.
    pub fn encode(&self) -> Result<Vec<(String, String)>> {
        let mut out = Vec::new();
        for (key, value) in &self.0 {
            encode_value(key, value, &mut out)?;
        }
        Ok(out)
    }
}

fn scalar(value: &ParamValue) -> Option<String> {
    match value {
        ParamValue::Str(s) => Some(s.clone()),
        ParamValue::Int(i) => Some(i.to_string()),
        ParamValue::Float(f) => Some(f.to_string()),
        ParamValue::Bool(b) => Some(b.to_string()),
        ParamValue::DateTime(dt) => Some(dt.format("%Y-%m-%d %H:%M:%S").to_string()),
        _ => None,
    }
}

fn encode_value(key: &str, value: &ParamValue, out: &mut Vec<(String, String)>) -> Result<()> {
    match value {
        ParamValue::Vertex { id, vertex_type } => {
            out.push((key.to_string(), id.clone()));
            out.push((format!("{key}.type"), vertex_type.clone()));
        }
        ParamValue::VertexSet(vertices) => {
            for (i, (id, vertex_type)) in vertices.iter().enumerate() {
                out.push((format!("{key}[{i}]"), id.clone()));
                out.push((format!("{key}[{i}].type"), vertex_type.clone()));
            }
        }
        ParamValue::List(items) => {
            for item in items {
                let encoded = scalar(item).ok_or_else(|| {
                    Error::Parameter(format!(
                        "Invalid parameter format in list: expected a primitive value for '{key}'"
                    ))
                })?;
                out.push((key.to_string(), encoded));
            }
        }
        other => {
            let encoded = scalar(other).ok_or_else(|| {
                Error::Parameter(format!("Invalid parameter format: expected a scalar for '{key}'"))
            })?;
            out.push((key.to_string(), encoded));
        }
    }
    Ok(())
}
