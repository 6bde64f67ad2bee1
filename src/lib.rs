//! Sylvan: query constraints over hierarchical content.
//!
//! The workspace is layered like this:
//!
//! - `sylvan-types`: names, paths and typed values
//! - `sylvan-traits`: collaborator contracts (resolver, navigator, full-text, executor)
//! - `sylvan-qom`: the query object model, its visitors, evaluator and unparser
//! - `sylvan-executor`: order-preserving evaluation pools (sequential or rayon)
//!
//! This crate ties them together in [`ConstraintFilter`], which evaluates one
//! constraint over batches of candidate node-tuples.

pub mod config;
pub mod error;
pub mod filter;

pub use config::{ExecutorKind, FilterConfig};
pub use error::FilterError;
pub use filter::{CancelHandle, ConstraintFilter, ConstraintFilterBuilder};

pub use sylvan_executor as executor;
pub use sylvan_qom as qom;
pub use sylvan_traits as traits;
pub use sylvan_types as types;

pub use sylvan_qom::{
    Bindings, Constraint, EvaluationConfig, Evaluator, NodeTuple, QomFactory, QueryObjectModel,
    Satisfaction, Unparser,
};
pub use sylvan_traits::{InMemoryTree, NamePathResolver, NamespaceResolver, TreeNavigator};
