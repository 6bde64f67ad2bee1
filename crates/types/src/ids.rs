//! Newtype wrappers for the plain-text identifiers of a query
//!
//! Selector names and bind-variable names are never resolved through the
//! namespace registry, so they stay plain strings. Wrapping them keeps the
//! two apart from each other and from qualified [`Name`](crate::Name)s.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

/// The name a query gives to one of its sources (e.g. `s1` in `[nt:base] AS s1`)
#[derive(Debug, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectorName(Arc<str>);

impl SelectorName {
    /// Creates a new SelectorName from a string
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    /// Returns the string representation of this selector name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SelectorName {
    fn from(s: String) -> Self {
        Self(s.into())
    }
}

impl From<&str> for SelectorName {
    fn from(s: &str) -> Self {
        Self(s.into())
    }
}

impl AsRef<str> for SelectorName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for SelectorName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SelectorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The name of a bind variable (`$name` in the textual form)
#[derive(Debug, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableName(Arc<str>);

impl VariableName {
    /// Creates a new VariableName from a string
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    /// Returns the string representation of this variable name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for VariableName {
    fn from(s: String) -> Self {
        Self(s.into())
    }
}

impl From<&str> for VariableName {
    fn from(s: &str) -> Self {
        Self(s.into())
    }
}

impl AsRef<str> for VariableName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for VariableName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VariableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_name_creation() {
        let s1 = SelectorName::new("s1");
        let s2 = SelectorName::from("s1");
        let s3 = SelectorName::from(String::from("s1"));

        assert_eq!(s1, s2);
        assert_eq!(s2, s3);
        assert_eq!(s1.as_str(), "s1");
    }

    #[test]
    fn test_hash_map_lookup_by_str() {
        use std::collections::HashMap;

        let mut tuple = HashMap::new();
        tuple.insert(SelectorName::new("file"), 42);

        assert_eq!(tuple.get("file"), Some(&42));
        assert_eq!(tuple.get("folder"), None);
    }

    #[test]
    fn test_serde_is_transparent() {
        let name = VariableName::new("limit");
        let json = serde_json::to_string(&name).unwrap();
        assert_eq!(json, "\"limit\"");
        let back: VariableName = serde_json::from_str(&json).unwrap();
        assert_eq!(back, name);
    }
}
