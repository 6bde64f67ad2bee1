use crate::name::{Name, Path};
use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The type tag carried by every [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PropertyType {
    String,
    Long,
    Double,
    Boolean,
    Date,
    Binary,
    Name,
    Path,
    Reference,
}

impl PropertyType {
    /// The type name used by `CAST(... AS <type>)` in the textual query form.
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyType::String => "STRING",
            PropertyType::Long => "LONG",
            PropertyType::Double => "DOUBLE",
            PropertyType::Boolean => "BOOLEAN",
            PropertyType::Date => "DATE",
            PropertyType::Binary => "BINARY",
            PropertyType::Name => "NAME",
            PropertyType::Path => "PATH",
            PropertyType::Reference => "REFERENCE",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// A single property value as stored in the repository.
///
/// Multi-valued properties are represented as a `Vec<Value>` by the
/// navigation layer; a `Value` itself is always a scalar.
///
/// Conversions that need a namespace registry (string to name, string to
/// path) are not performed here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "UPPERCASE")]
pub enum Value {
    String(String),
    Long(i64),
    Double(f64),
    Boolean(bool),
    Date(DateTime<FixedOffset>),
    Binary(Vec<u8>),
    Name(Name),
    Path(Path),
    /// Identifier of a referenced node.
    Reference(String),
}

impl Value {
    pub fn property_type(&self) -> PropertyType {
        match self {
            Value::String(_) => PropertyType::String,
            Value::Long(_) => PropertyType::Long,
            Value::Double(_) => PropertyType::Double,
            Value::Boolean(_) => PropertyType::Boolean,
            Value::Date(_) => PropertyType::Date,
            Value::Binary(_) => PropertyType::Binary,
            Value::Name(_) => PropertyType::Name,
            Value::Path(_) => PropertyType::Path,
            Value::Reference(_) => PropertyType::Reference,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::Reference(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view of the value. Dates convert to epoch milliseconds,
    /// strings are parsed.
    pub fn to_double(&self) -> Option<f64> {
        match self {
            Value::Long(n) => Some(*n as f64),
            Value::Double(n) => Some(*n),
            Value::String(s) => s.trim().parse().ok(),
            Value::Date(d) => Some(d.timestamp_millis() as f64),
            _ => None,
        }
    }

    pub fn to_boolean(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            Value::String(s) if s.eq_ignore_ascii_case("true") => Some(true),
            Value::String(s) if s.eq_ignore_ascii_case("false") => Some(false),
            _ => None,
        }
    }

    /// Dates parse from RFC 3339 strings; numbers are epoch milliseconds (UTC).
    pub fn to_date(&self) -> Option<DateTime<FixedOffset>> {
        match self {
            Value::Date(d) => Some(*d),
            Value::String(s) => DateTime::parse_from_rfc3339(s.trim()).ok(),
            Value::Long(ms) => Utc
                .timestamp_millis_opt(*ms)
                .single()
                .map(|d| d.fixed_offset()),
            Value::Double(ms) if ms.is_finite() => Utc
                .timestamp_millis_opt(*ms as i64)
                .single()
                .map(|d| d.fixed_offset()),
            _ => None,
        }
    }

    /// The lexical form for every type whose text does not depend on a
    /// namespace registry. Names and paths return `None`.
    pub fn lexical_form(&self) -> Option<String> {
        match self {
            Value::String(s) | Value::Reference(s) => Some(s.clone()),
            Value::Long(n) => Some(n.to_string()),
            Value::Double(n) => Some(format_double(*n)),
            Value::Boolean(b) => Some(b.to_string()),
            Value::Date(d) => Some(d.to_rfc3339()),
            Value::Binary(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
            Value::Name(_) | Value::Path(_) => None,
        }
    }
}

/// Formats a double so that it always reads back as a double (`1.0`, not `1`).
pub fn format_double(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e16 {
        format!("{:.1}", n)
    } else {
        n.to_string()
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Long(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Double(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<Name> for Value {
    fn from(name: Name) -> Self {
        Value::Name(name)
    }
}

impl From<Path> for Value {
    fn from(path: Path) -> Self {
        Value::Path(path)
    }
}
