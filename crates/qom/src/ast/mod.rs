//! # Query Object Model
//!
//! The in-memory form of a repository query. Every node is immutable once
//! built by the [`QomFactory`](crate::QomFactory) and holds only qualified
//! names, paths and child nodes.
//!
//! ## Node categories
//!
//! - **[operand]** - static operands (literal, bind variable) and dynamic
//!   operands (property value, length, node name, local name, score,
//!   upper/lower case)
//! - **[constraint]** - boolean nodes (`AND`, `OR`, `NOT`, comparison,
//!   property existence, full-text search, same/child/descendant node)
//! - **[join]** - join conditions (equi, same node, child node, descendant node)
//! - **[source]** - selectors and joins
//! - **[query]** - orderings, columns and the complete query
//!
//! Each category is a closed enum. Algorithms over the tree are visitors
//! (see [`crate::visitor`]); the nodes themselves only offer accessors and
//! `accept`.
//!
//! ## Example
//!
//! ```text
//! SELECT * FROM [nt:file] AS s
//! WHERE ISDESCENDANTNODE(s, [/content/site]) AND s.size > 10
//! ```
pub mod constraint;
pub mod join;
pub mod operand;
pub mod query;
pub mod source;

pub use constraint::{
    And, ChildNode, Comparison, Constraint, DescendantNode, FullTextSearch, Not, Operator, Or,
    PropertyExistence, SameNode,
};
pub use join::{ChildNodeJoin, DescendantNodeJoin, EquiJoin, JoinCondition, SameNodeJoin};
pub use operand::{
    BindVariable, DynamicOperand, FullTextSearchScore, Length, Literal, LowerCase, NodeLocalName,
    NodeName, PropertyValue, StaticOperand, UpperCase,
};
pub use query::{Column, Order, Ordering, QueryObjectModel};
pub use source::{Join, JoinType, Selector, Source};
