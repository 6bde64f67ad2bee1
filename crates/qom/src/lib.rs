pub mod ast;
pub mod collect;
pub mod config;
pub mod engine;
pub mod error;
pub mod factory;
pub mod fulltext;
pub mod like;
pub mod operators;
pub mod ordering;
pub mod unparse;
pub mod visitor;

pub use ast::{Constraint, DynamicOperand, JoinCondition, Operator, QueryObjectModel, Source, StaticOperand};
pub use collect::{
    FullTextPredicate, SelectorCollector, SelectorUse, collect_full_text_predicates, selector_use,
    validate_selectors,
};
pub use config::EvaluationConfig;
pub use engine::{Bindings, EvaluationContext, Evaluator, NodeTuple, Satisfaction};
pub use error::{EvalError, QomError};
pub use factory::QomFactory;
pub use fulltext::{TermMatchSearcher, parse_full_text};
pub use ordering::sort_tuples;
pub use unparse::Unparser;
pub use visitor::{ConstraintVisitor, JoinConditionVisitor, OperandVisitor, SourceVisitor};
