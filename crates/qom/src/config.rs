use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use sylvan_types::SelectorName;

/// How the evaluator treats selectors that are absent from a node-tuple.
///
/// By default an unbound selector makes the constraint reading it
/// `Unsatisfied`, which is what outer joins need. A selector that is
/// *required* raises `EvalError::SelectorNotBound` instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Treat every selector as required.
    pub strict_selectors: bool,
    /// Selectors that must always be bound.
    pub required_selectors: BTreeSet<SelectorName>,
}

impl EvaluationConfig {
    /// A configuration in which every selector is required.
    pub fn strict() -> Self {
        Self {
            strict_selectors: true,
            ..Self::default()
        }
    }

    /// Marks one selector as required.
    pub fn require(mut self, selector: impl Into<SelectorName>) -> Self {
        self.required_selectors.insert(selector.into());
        self
    }

    pub fn is_required(&self, selector: &SelectorName) -> bool {
        self.strict_selectors || self.required_selectors.contains(selector)
    }
}
