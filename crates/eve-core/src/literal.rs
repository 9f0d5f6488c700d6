//! # Literal Values
//!
//! Values that appear inside a validator graph: enumeration members, range
//! bounds, and key defaults. A registry exports them untagged, so plain YAML
//! scalars, lists, and string-keyed maps read naturally. Two sigil-keyed
//! forms carry the values JSON cannot represent:
//!
//! ```yaml
//! { $seconds: 30 }       # a duration
//! { $opaque: "Lambda" }  # any other object, by display form
//! ```
//!
//! Deserialization tries the sigil forms before the generic map, and the
//! sigil structs deny unknown fields, so `{ $seconds: 30, x: 1 }` is a map.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// Nesting depth beyond which a literal is not considered JSON-compatible.
pub const MAX_JSON_DEPTH: usize = 6;

/// A value embedded in the validator graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    /// Absent / null.
    Null,
    /// Boolean.
    Bool(bool),
    /// Integer.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// String.
    String(String),
    /// A duration, such as a polling interval.
    Period(TimePeriod),
    /// An object with no JSON form, carried by its display representation.
    Opaque(OpaqueLiteral),
    /// Sequence of literals.
    List(Vec<Literal>),
    /// String-keyed mapping of literals.
    Map(BTreeMap<String, Literal>),
}

/// A duration literal, stored as (possibly fractional) seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimePeriod {
    /// Total length of the period in seconds.
    #[serde(rename = "$seconds")]
    pub seconds: f64,
}

/// A value with no JSON representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OpaqueLiteral {
    /// Display form of the value.
    #[serde(rename = "$opaque")]
    pub repr: String,
}

impl TimePeriod {
    /// A period of whole or fractional seconds.
    pub fn from_seconds(seconds: f64) -> Self {
        Self { seconds }
    }

    /// A period of milliseconds.
    pub fn from_millis(millis: u64) -> Self {
        Self {
            seconds: millis as f64 / 1000.0,
        }
    }

    /// Total length in seconds.
    pub fn total_seconds(&self) -> f64 {
        self.seconds
    }
}

impl fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let millis = self.seconds * 1000.0;
        if self.seconds.fract() == 0.0 {
            write!(f, "{}s", self.seconds as i64)
        } else if millis.fract() == 0.0 {
            write!(f, "{}ms", millis as i64)
        } else {
            write!(f, "{}s", self.seconds)
        }
    }
}

impl Literal {
    /// Convert to JSON if every part of the value is JSON-compatible.
    ///
    /// Durations, opaque values, non-finite floats, and nesting deeper than
    /// [`MAX_JSON_DEPTH`] make the whole value incompatible.
    pub fn to_json(&self) -> Option<Value> {
        self.to_json_at(0)
    }

    fn to_json_at(&self, depth: usize) -> Option<Value> {
        if depth > MAX_JSON_DEPTH {
            return None;
        }
        match self {
            Self::Null => Some(Value::Null),
            Self::Bool(b) => Some(Value::Bool(*b)),
            Self::Int(i) => Some(Value::Number(Number::from(*i))),
            Self::Float(x) => Number::from_f64(*x).map(Value::Number),
            Self::String(s) => Some(Value::String(s.clone())),
            Self::Period(_) | Self::Opaque(_) => None,
            Self::List(items) => items
                .iter()
                .map(|item| item.to_json_at(depth + 1))
                .collect::<Option<Vec<_>>>()
                .map(Value::Array),
            Self::Map(map) => map
                .iter()
                .map(|(k, v)| v.to_json_at(depth + 1).map(|v| (k.clone(), v)))
                .collect::<Option<serde_json::Map<_, _>>>()
                .map(Value::Object),
        }
    }

    /// Coerce to a single JSON scalar for display in a form control.
    ///
    /// Scalars pass through, durations become floating-point seconds, and
    /// anything else becomes its display string. Never fails.
    pub fn to_json_scalar(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Int(i) => Value::Number(Number::from(*i)),
            Self::Float(x) => Number::from_f64(*x)
                .map(Value::Number)
                .unwrap_or_else(|| Value::String(x.to_string())),
            Self::String(s) => Value::String(s.clone()),
            Self::Period(p) => Number::from_f64(p.total_seconds())
                .map(Value::Number)
                .unwrap_or_else(|| Value::String(p.to_string())),
            other => Value::String(other.to_string()),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            // Whole floats keep a fractional digit so `1.0` and `1` label apart.
            Self::Float(x) if x.fract() == 0.0 && x.abs() < 1e16 => write!(f, "{x:.1}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) => f.write_str(s),
            Self::Period(p) => write!(f, "{p}"),
            Self::Opaque(o) => f.write_str(&o.repr),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Map(map) => {
                f.write_str("{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<i64> for Literal {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for Literal {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<bool> for Literal {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<TimePeriod> for Literal {
    fn from(p: TimePeriod) -> Self {
        Self::Period(p)
    }
}
