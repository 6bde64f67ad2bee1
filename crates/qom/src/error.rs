use sylvan_traits::{FullTextError, NavigationError, ResolveError};
use sylvan_types::{SelectorName, VariableName};
use thiserror::Error;

/// Errors raised while building, validating or rendering a query tree.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QomError {
    #[error("Malformed constraint: {0}")]
    MalformedConstraint(String),

    #[error("Unresolvable name: {0}")]
    UnresolvableName(#[from] ResolveError),

    #[error("Selector '{0}' is not declared in the query source")]
    UnknownSelector(SelectorName),

    #[error("Selector '{0}' is declared more than once")]
    DuplicateSelector(SelectorName),
}

/// Failures raised while evaluating a constraint against a node-tuple.
///
/// An `Unsatisfied` verdict is never an error; these are the cases where no
/// verdict can be given.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("Selector '{0}' is not bound in the node-tuple")]
    SelectorNotBound(SelectorName),

    #[error("Unresolvable name: {0}")]
    UnresolvableName(#[from] ResolveError),

    #[error("Variable '${0}' has no bound value")]
    UnknownVariable(VariableName),

    #[error("Static operand produced {count} values; at most one is allowed")]
    MultiValuedStaticOperand { count: usize },

    #[error("Malformed path '{0}'")]
    MalformedPath(String),

    #[error("Navigation failed: {0}")]
    Navigation(#[from] NavigationError),

    #[error("Full-text search failed: {0}")]
    FullText(#[from] FullTextError),
}
