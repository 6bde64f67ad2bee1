//! Qualified names and repository paths in their internal, prefix-free form.
//!
//! A [`Name`] is a namespace URI plus a local part. A [`Path`] is a sequence
//! of [`PathElement`]s. Both are produced by a name/path resolver from their
//! prefixed text form; `Display` prints the expanded `{uri}local` notation,
//! which never depends on a namespace registry.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A qualified name: namespace URI and local part.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Name {
    namespace: String,
    local: String,
}

impl Name {
    pub fn new(namespace: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            local: local.into(),
        }
    }

    /// A name in the default (empty) namespace.
    pub fn local(local: impl Into<String>) -> Self {
        Self::new("", local)
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn local_name(&self) -> &str {
        &self.local
    }

    /// The root node carries the empty name.
    pub fn is_empty(&self) -> bool {
        self.namespace.is_empty() && self.local.is_empty()
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.local)
        } else {
            write!(f, "{{{}}}{}", self.namespace, self.local)
        }
    }
}

/// One step of a path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PathElement {
    /// `.`
    Current,
    /// `..`
    Parent,
    /// A named child with its 1-based same-name-sibling index.
    Named { name: Name, index: u32 },
}

impl PathElement {
    pub fn named(name: Name) -> Self {
        PathElement::Named { name, index: 1 }
    }

    pub fn indexed(name: Name, index: u32) -> Self {
        PathElement::Named {
            name,
            index: index.max(1),
        }
    }

    pub fn name(&self) -> Option<&Name> {
        match self {
            PathElement::Named { name, .. } => Some(name),
            _ => None,
        }
    }
}

/// An absolute or relative repository path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Path {
    absolute: bool,
    elements: Vec<PathElement>,
}

impl Path {
    pub fn new(absolute: bool, elements: Vec<PathElement>) -> Self {
        Self { absolute, elements }
    }

    /// The path of the root node, `/`.
    pub fn root() -> Self {
        Self::new(true, Vec::new())
    }

    /// An absolute path from plain names, all with index 1.
    pub fn from_names(names: impl IntoIterator<Item = Name>) -> Self {
        Self::new(true, names.into_iter().map(PathElement::named).collect())
    }

    pub fn is_absolute(&self) -> bool {
        self.absolute
    }

    pub fn is_root(&self) -> bool {
        self.absolute && self.elements.is_empty()
    }

    pub fn elements(&self) -> &[PathElement] {
        &self.elements
    }

    /// The last named element, if any.
    pub fn name(&self) -> Option<&Name> {
        self.elements.last().and_then(PathElement::name)
    }

    /// Number of elements. For a normalized absolute path this is the depth of
    /// the node it identifies (root = 0).
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Appends `other` to this path. An absolute `other` replaces this path.
    pub fn join(&self, other: &Path) -> Path {
        if other.absolute {
            return other.clone();
        }
        let mut elements = self.elements.clone();
        elements.extend(other.elements.iter().cloned());
        Path::new(self.absolute, elements)
    }

    /// Makes a relative path absolute against the root.
    pub fn to_absolute(&self) -> Path {
        if self.absolute {
            self.clone()
        } else {
            Path::root().join(self)
        }
    }

    /// Removes `.` elements and folds `..` into the preceding element.
    ///
    /// Returns `None` when an absolute path climbs above the root.
    pub fn normalized(&self) -> Option<Path> {
        let mut out: Vec<PathElement> = Vec::with_capacity(self.elements.len());
        for element in &self.elements {
            match element {
                PathElement::Current => {}
                PathElement::Parent => match out.last() {
                    Some(PathElement::Named { .. }) => {
                        out.pop();
                    }
                    _ if self.absolute => return None,
                    _ => out.push(PathElement::Parent),
                },
                named => out.push(named.clone()),
            }
        }
        Some(Path::new(self.absolute, out))
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return write!(f, "/");
        }
        for (i, element) in self.elements.iter().enumerate() {
            if i > 0 || self.absolute {
                write!(f, "/")?;
            }
            match element {
                PathElement::Current => write!(f, ".")?,
                PathElement::Parent => write!(f, "..")?,
                PathElement::Named { name, index } if *index > 1 => {
                    write!(f, "{}[{}]", name, index)?
                }
                PathElement::Named { name, .. } => write!(f, "{}", name)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abs(names: &[&str]) -> Path {
        Path::from_names(names.iter().map(|n| Name::local(*n)))
    }

    #[test]
    fn test_display_expanded_form() {
        let name = Name::new("http://www.jcp.org/jcr/1.0", "content");
        assert_eq!(name.to_string(), "{http://www.jcp.org/jcr/1.0}content");
        assert_eq!(Name::local("a").to_string(), "a");
        assert_eq!(Path::root().to_string(), "/");
        assert_eq!(abs(&["a", "b"]).to_string(), "/a/b");
    }

    #[test]
    fn test_normalize_parent_and_current() {
        let path = Path::new(
            true,
            vec![
                PathElement::named(Name::local("a")),
                PathElement::Current,
                PathElement::named(Name::local("b")),
                PathElement::Parent,
                PathElement::named(Name::local("c")),
            ],
        );
        assert_eq!(path.normalized(), Some(abs(&["a", "c"])));
    }

    #[test]
    fn test_normalize_above_root_fails() {
        let path = Path::new(true, vec![PathElement::Parent]);
        assert_eq!(path.normalized(), None);

        let relative = Path::new(false, vec![PathElement::Parent]);
        assert_eq!(relative.normalized(), Some(relative.clone()));
    }

    #[test]
    fn test_join_and_absolute() {
        let base = abs(&["a"]);
        let rel = Path::new(false, vec![PathElement::named(Name::local("b"))]);
        assert_eq!(base.join(&rel), abs(&["a", "b"]));
        assert_eq!(rel.to_absolute(), abs(&["b"]));
        assert_eq!(base.join(&abs(&["x"])), abs(&["x"]));
    }

    #[test]
    fn test_index_defaults_to_one() {
        let e = PathElement::indexed(Name::local("item"), 0);
        assert_eq!(e, PathElement::named(Name::local("item")));
        let p = Path::new(true, vec![PathElement::indexed(Name::local("item"), 3)]);
        assert_eq!(p.to_string(), "/item[3]");
    }
}
