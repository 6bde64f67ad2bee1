//! NamePathResolver trait for converting between prefixed text and qualified names.
//!
//! Every query node that carries a name or a path holds the qualified form.
//! The prefixed text form (`jcr:content`, `/a/b[2]/nt:file`) only exists at
//! the edges: when a query is built from text and when it is rendered back.

use nom::{
    IResult, Parser,
    bytes::complete::{take_until, take_while1},
    character::complete::{char, digit1},
    combinator::{all_consuming, map_res, opt, recognize},
    multi::separated_list0,
    sequence::{delimited, pair},
};
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::RwLock;
use sylvan_types::{Name, Path, PathElement};
use thiserror::Error;

/// Error type for name and path resolution.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    #[error("Unknown namespace prefix '{prefix}' in '{text}'")]
    UnknownPrefix { prefix: String, text: String },

    #[error("No prefix registered for namespace '{0}'")]
    UnknownNamespace(String),

    #[error("Invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("Namespace registry unavailable: {0}")]
    Registry(String),
}

/// Maps between prefixed text and qualified [`Name`]s / [`Path`]s.
///
/// Implementations only need to provide the name conversions; the path
/// conversions are derived from them using the standard path syntax
/// (`/`-separated segments, `.`/`..`, optional `[n]` same-name-sibling index).
///
/// # Example
///
/// ```ignore
/// let resolver = NamespaceResolver::new();
/// let name = resolver.qualified_name("jcr:content")?;
/// assert_eq!(resolver.name_text(&name)?, "jcr:content");
/// ```
pub trait NamePathResolver: Send + Sync + Debug {
    /// Converts `prefix:local`, `local` or `{uri}local` into a qualified name.
    fn qualified_name(&self, text: &str) -> Result<Name, ResolveError>;

    /// Converts a qualified name into its prefixed text form.
    fn name_text(&self, name: &Name) -> Result<String, ResolveError>;

    /// Converts the text form of a path into a qualified path.
    fn qualified_path(&self, text: &str) -> Result<Path, ResolveError> {
        let raw = parse_path_text(text)?;
        let mut elements = Vec::with_capacity(raw.segments.len());
        for segment in raw.segments {
            elements.push(match segment {
                RawSegment::Current => PathElement::Current,
                RawSegment::Parent => PathElement::Parent,
                RawSegment::Named { name, index } => {
                    PathElement::indexed(self.qualified_name(name)?, index)
                }
            });
        }
        Ok(Path::new(raw.absolute, elements))
    }

    /// Converts a qualified path into its prefixed text form.
    fn path_text(&self, path: &Path) -> Result<String, ResolveError> {
        if path.is_root() {
            return Ok("/".to_string());
        }
        let mut out = String::new();
        for (i, element) in path.elements().iter().enumerate() {
            if i > 0 || path.is_absolute() {
                out.push('/');
            }
            match element {
                PathElement::Current => out.push('.'),
                PathElement::Parent => out.push_str(".."),
                PathElement::Named { name, index } => {
                    out.push_str(&self.name_text(name)?);
                    if *index > 1 {
                        out.push_str(&format!("[{}]", index));
                    }
                }
            }
        }
        Ok(out)
    }

    /// Returns a human-readable name for this resolver (for logging/debugging).
    fn name(&self) -> &'static str;
}

// --- Path text grammar ---

#[derive(Debug, PartialEq)]
enum RawSegment<'a> {
    Current,
    Parent,
    Named { name: &'a str, index: u32 },
}

#[derive(Debug, PartialEq)]
struct RawPath<'a> {
    absolute: bool,
    segments: Vec<RawSegment<'a>>,
}

fn expanded_prefix(input: &str) -> IResult<&str, &str> {
    recognize(delimited(char('{'), take_until("}"), char('}'))).parse(input)
}

fn segment_name(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        opt(expanded_prefix),
        take_while1(|c: char| c != '/' && c != '[' && c != ']'),
    ))
    .parse(input)
}

fn segment_index(input: &str) -> IResult<&str, u32> {
    map_res(delimited(char('['), digit1, char(']')), str::parse::<u32>).parse(input)
}

fn segment(input: &str) -> IResult<&str, RawSegment<'_>> {
    let (rest, (name, index)) = pair(segment_name, opt(segment_index)).parse(input)?;
    let raw = match (name, index) {
        (".", None) => RawSegment::Current,
        ("..", None) => RawSegment::Parent,
        (name, index) => RawSegment::Named {
            name,
            index: index.unwrap_or(1),
        },
    };
    Ok((rest, raw))
}

fn raw_path(input: &str) -> IResult<&str, RawPath<'_>> {
    let (rest, (slash, segments)) =
        pair(opt(char('/')), separated_list0(char('/'), segment)).parse(input)?;
    Ok((
        rest,
        RawPath {
            absolute: slash.is_some(),
            segments,
        },
    ))
}

fn parse_path_text(text: &str) -> Result<RawPath<'_>, ResolveError> {
    if text.is_empty() {
        return Err(ResolveError::InvalidPath {
            path: text.to_string(),
            reason: "path is empty".to_string(),
        });
    }
    match all_consuming(raw_path).parse(text) {
        Ok((_, raw)) if raw.segments.iter().any(|s| matches!(s, RawSegment::Named { index: 0, .. })) => {
            Err(ResolveError::InvalidPath {
                path: text.to_string(),
                reason: "same-name-sibling index must be at least 1".to_string(),
            })
        }
        Ok((_, raw)) => Ok(raw),
        Err(e) => Err(ResolveError::InvalidPath {
            path: text.to_string(),
            reason: e.to_string(),
        }),
    }
}

fn validate_local(text: &str, local: &str) -> Result<(), ResolveError> {
    let reason = if local.is_empty() {
        Some("local part is empty")
    } else if local.chars().any(|c| matches!(c, '/' | ':' | '[' | ']' | '|' | '*' | '{' | '}')) {
        Some("local part contains an illegal character")
    } else if local == "." || local == ".." {
        Some("'.' and '..' are not names")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(ResolveError::InvalidName {
            name: text.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

// --- Namespace registry ---

pub const NS_DEFAULT_URI: &str = "";
pub const NS_JCR_URI: &str = "http://www.jcp.org/jcr/1.0";
pub const NS_NT_URI: &str = "http://www.jcp.org/jcr/nt/1.0";
pub const NS_MIX_URI: &str = "http://www.jcp.org/jcr/mix/1.0";
pub const NS_SV_URI: &str = "http://www.jcp.org/jcr/sv/1.0";
pub const NS_XML_URI: &str = "http://www.w3.org/XML/1998/namespace";

#[derive(Debug, Default)]
struct Mappings {
    prefix_to_uri: HashMap<String, String>,
    uri_to_prefix: HashMap<String, String>,
}

/// A resolver backed by an in-memory namespace registry.
///
/// Starts out with the built-in repository prefixes (`jcr`, `nt`, `mix`,
/// `sv`, `xml` and the empty default prefix). Further mappings can be
/// registered at any time; re-registering a prefix replaces its old URI.
#[derive(Debug)]
pub struct NamespaceResolver {
    mappings: RwLock<Mappings>,
}

impl NamespaceResolver {
    pub fn new() -> Self {
        let resolver = Self {
            mappings: RwLock::new(Mappings::default()),
        };
        for (prefix, uri) in [
            ("", NS_DEFAULT_URI),
            ("jcr", NS_JCR_URI),
            ("nt", NS_NT_URI),
            ("mix", NS_MIX_URI),
            ("sv", NS_SV_URI),
            ("xml", NS_XML_URI),
        ] {
            // A freshly created lock cannot be poisoned.
            let _ = resolver.register(prefix, uri);
        }
        resolver
    }

    /// Registers (or re-maps) a prefix.
    ///
    /// # Errors
    ///
    /// Returns `ResolveError::Registry` if the internal lock is poisoned.
    pub fn register(&self, prefix: impl Into<String>, uri: impl Into<String>) -> Result<(), ResolveError> {
        let (prefix, uri) = (prefix.into(), uri.into());
        let mut mappings = self
            .mappings
            .write()
            .map_err(|_| ResolveError::Registry("namespace registry lock poisoned".to_string()))?;
        if let Some(old_uri) = mappings.prefix_to_uri.insert(prefix.clone(), uri.clone()) {
            mappings.uri_to_prefix.remove(&old_uri);
        }
        if let Some(old_prefix) = mappings.uri_to_prefix.insert(uri, prefix.clone()) {
            if old_prefix != prefix {
                mappings.prefix_to_uri.remove(&old_prefix);
            }
        }
        Ok(())
    }

    /// Looks up the URI of a prefix.
    pub fn uri(&self, prefix: &str) -> Option<String> {
        self.mappings.read().ok()?.prefix_to_uri.get(prefix).cloned()
    }

    /// Looks up the prefix of a URI.
    pub fn prefix(&self, uri: &str) -> Option<String> {
        self.mappings.read().ok()?.uri_to_prefix.get(uri).cloned()
    }
}

impl Default for NamespaceResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl NamePathResolver for NamespaceResolver {
    fn qualified_name(&self, text: &str) -> Result<Name, ResolveError> {
        if let Some(rest) = text.strip_prefix('{') {
            let (uri, local) = rest.split_once('}').ok_or_else(|| ResolveError::InvalidName {
                name: text.to_string(),
                reason: "unterminated namespace URI".to_string(),
            })?;
            validate_local(text, local)?;
            return Ok(Name::new(uri, local));
        }
        let (prefix, local) = text.split_once(':').unwrap_or(("", text));
        validate_local(text, local)?;
        let uri = self.uri(prefix).ok_or_else(|| ResolveError::UnknownPrefix {
            prefix: prefix.to_string(),
            text: text.to_string(),
        })?;
        Ok(Name::new(uri, local))
    }

    fn name_text(&self, name: &Name) -> Result<String, ResolveError> {
        let prefix = self
            .prefix(name.namespace())
            .ok_or_else(|| ResolveError::UnknownNamespace(name.namespace().to_string()))?;
        if prefix.is_empty() {
            Ok(name.local_name().to_string())
        } else {
            Ok(format!("{}:{}", prefix, name.local_name()))
        }
    }

    fn name(&self) -> &'static str {
        "NamespaceResolver"
    }
}
