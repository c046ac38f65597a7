//! Declarative field mapping with defaults.
//!
//! A schema is a static table of [`FieldSpec`]s. [`apply_schema`] resolves
//! each upstream path, checks the JSON type against the field kind and falls
//! back to the field default when the value is missing or null.

use serde_json::{Map, Number, Value};
use std::fmt;

/// Sentinel for absent string fields.
pub const UNKNOWN: &str = "unknown";

/// Expected JSON type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// String; numbers are stringified
    Str,
    /// Number; numeric strings are parsed
    Number,
    /// Boolean
    Bool,
    /// Boolean that may arrive as `"0"`/`"1"` or `"true"`/`"false"`
    Flag,
    /// Passed through unchanged
    Any,
}

/// Value used when the upstream field is missing or null.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultValue {
    Null,
    Zero,
    False,
    Unknown,
    Str(&'static str),
}

impl DefaultValue {
    fn to_value(self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Zero => Value::from(0),
            Self::False => Value::Bool(false),
            Self::Unknown => Value::String(UNKNOWN.to_string()),
            Self::Str(s) => Value::String(s.to_string()),
        }
    }
}

/// One row of a schema: dotted output path, dotted upstream path, kind, default.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub output: &'static str,
    pub source: &'static str,
    pub kind: FieldKind,
    pub default: DefaultValue,
}

impl FieldSpec {
    pub const fn new(
        output: &'static str,
        source: &'static str,
        kind: FieldKind,
        default: DefaultValue,
    ) -> Self {
        Self {
            output,
            source,
            kind,
            default,
        }
    }
}

/// Upstream value had the wrong JSON type for its field.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaError {
    pub path: String,
    pub expected: &'static str,
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field '{}' is not {}", self.path, self.expected)
    }
}

impl std::error::Error for SchemaError {}

/// Resolve every field of `schema` against `raw`.
///
/// `raw` must be an object. Missing or null fields take their default; a
/// present field of the wrong type is an error.
pub fn apply_schema(raw: &Value, schema: &[FieldSpec]) -> Result<Value, SchemaError> {
    if !raw.is_object() {
        return Err(SchemaError {
            path: "$".to_string(),
            expected: "an object",
        });
    }

    let mut out = Value::Object(Map::new());
    for field in schema {
        let value = match lookup(raw, field.source)? {
            None | Some(Value::Null) => field.default.to_value(),
            Some(found) => coerce(found, field)?,
        };
        insert_path(&mut out, field.output, value);
    }
    Ok(out)
}

/// Follow a dotted path. Missing or null intermediates yield `None`.
pub fn lookup<'a>(raw: &'a Value, path: &str) -> Result<Option<&'a Value>, SchemaError> {
    let mut current = raw;
    for (depth, segment) in path.split('.').enumerate() {
        match current {
            Value::Object(map) => match map.get(segment) {
                Some(next) => current = next,
                None => return Ok(None),
            },
            Value::Null => return Ok(None),
            _ => {
                return Err(SchemaError {
                    path: path.split('.').take(depth).collect::<Vec<_>>().join("."),
                    expected: "an object",
                })
            }
        }
    }
    Ok(Some(current))
}

fn coerce(value: &Value, field: &FieldSpec) -> Result<Value, SchemaError> {
    let mismatch = |expected| SchemaError {
        path: field.source.to_string(),
        expected,
    };

    match field.kind {
        FieldKind::Any => Ok(value.clone()),
        FieldKind::Str => match value {
            Value::String(_) => Ok(value.clone()),
            Value::Number(n) => Ok(Value::String(n.to_string())),
            _ => Err(mismatch("a string")),
        },
        FieldKind::Number => match value {
            Value::Number(_) => Ok(value.clone()),
            Value::String(s) if s.trim().is_empty() => Ok(field.default.to_value()),
            Value::String(s) => parse_number(s.trim())
                .map(Value::Number)
                .ok_or_else(|| mismatch("a number")),
            _ => Err(mismatch("a number")),
        },
        FieldKind::Bool => match value {
            Value::Bool(_) => Ok(value.clone()),
            _ => Err(mismatch("a boolean")),
        },
        FieldKind::Flag => match value {
            Value::Bool(_) => Ok(value.clone()),
            Value::String(s) => match s.as_str() {
                "1" | "true" => Ok(Value::Bool(true)),
                "0" | "false" | "" => Ok(Value::Bool(false)),
                _ => Err(mismatch("a flag")),
            },
            Value::Number(n) => Ok(Value::Bool(n.as_u64() != Some(0))),
            _ => Err(mismatch("a flag")),
        },
    }
}

fn parse_number(s: &str) -> Option<Number> {
    if let Ok(i) = s.parse::<u64>() {
        return Some(Number::from(i));
    }
    if let Ok(i) = s.parse::<i64>() {
        return Some(Number::from(i));
    }
    s.parse::<f64>().ok().and_then(Number::from_f64)
}

fn insert_path(out: &mut Value, path: &str, value: Value) {
    let mut segments = path.split('.').peekable();
    let mut current = out;
    while let Some(segment) = segments.next() {
        if !current.is_object() {
            *current = Value::Object(Map::new());
        }
        let Value::Object(map) = current else { return };
        if segments.peek().is_none() {
            map.insert(segment.to_string(), value);
            return;
        }
        current = map
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }
}

/// Read a number at `path` of an already normalized value, 0.0 if absent.
pub fn number_at(value: &Value, path: &str) -> f64 {
    match lookup(value, path) {
        Ok(Some(v)) => v.as_f64().unwrap_or(0.0),
        _ => 0.0,
    }
}
