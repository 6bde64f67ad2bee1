//! FullTextSearcher trait for delegating full-text predicates.
//!
//! The constraint engine never interprets a full-text expression itself. It
//! forwards the selector, the optional property and the expression to a
//! searcher and reports the verdict it returns.

use crate::navigator::TreeNavigator;
use sylvan_types::{Name, SelectorName};
use thiserror::Error;

/// Error type for full-text search failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FullTextError {
    #[error("Invalid full-text expression '{expression}': {message}")]
    InvalidExpression { expression: String, message: String },

    #[error("Full-text search is not available: {0}")]
    Unavailable(String),

    #[error("Full-text index error: {0}")]
    Index(String),
}

/// A full-text search collaborator over the nodes of a navigator `T`.
pub trait FullTextSearcher<T: TreeNavigator + ?Sized>: Send + Sync {
    /// True if `node` (bound to `selector`) matches `expression`, either on
    /// the given property or on any property when `property` is `None`.
    fn search(
        &self,
        navigator: &T,
        selector: &SelectorName,
        node: &T::Node,
        property: Option<&Name>,
        expression: &str,
    ) -> Result<bool, FullTextError>;

    /// The relevance score of `node` for `expression`. Zero for non-matches.
    fn score(
        &self,
        navigator: &T,
        selector: &SelectorName,
        node: &T::Node,
        property: Option<&Name>,
        expression: &str,
    ) -> Result<f64, FullTextError>;

    /// Returns a human-readable name for this searcher (for logging/debugging).
    fn name(&self) -> &'static str;
}

/// A searcher for deployments without a full-text index.
///
/// Every full-text predicate fails with [`FullTextError::Unavailable`];
/// scores are zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFullTextSearch;

impl<T: TreeNavigator + ?Sized> FullTextSearcher<T> for NoFullTextSearch {
    fn search(
        &self,
        _navigator: &T,
        selector: &SelectorName,
        _node: &T::Node,
        _property: Option<&Name>,
        _expression: &str,
    ) -> Result<bool, FullTextError> {
        Err(FullTextError::Unavailable(format!(
            "no full-text searcher configured (selector '{}')",
            selector
        )))
    }

    fn score(
        &self,
        _navigator: &T,
        _selector: &SelectorName,
        _node: &T::Node,
        _property: Option<&Name>,
        _expression: &str,
    ) -> Result<f64, FullTextError> {
        Ok(0.0)
    }

    fn name(&self) -> &'static str {
        "NoFullTextSearch"
    }
}
