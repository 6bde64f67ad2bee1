//! The evaluation engine: decides whether a node-tuple satisfies a constraint.
//!
//! [`Evaluator`] is a visitor over operands, constraints and join conditions.
//! Evaluation is a pure function of the tree, the tuple, the bindings and the
//! navigator, so one evaluator can serve many tuples concurrently.

use crate::ast::{
    And, BindVariable, ChildNode, ChildNodeJoin, Comparison, Constraint, DescendantNode,
    DescendantNodeJoin, DynamicOperand, EquiJoin, FullTextSearch, FullTextSearchScore,
    JoinCondition, Length, Literal, LowerCase, NodeLocalName, NodeName, Not, Operator, Or,
    PropertyExistence, PropertyValue, SameNode, SameNodeJoin, StaticOperand, UpperCase,
};
use crate::collect::FullTextPredicate;
use crate::config::EvaluationConfig;
use crate::error::EvalError;
use crate::operators::{compare, lexical};
use crate::visitor::{ConstraintVisitor, JoinConditionVisitor, OperandVisitor};
use log::trace;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops;
use sylvan_traits::{FullTextSearcher, NamePathResolver, TreeNavigator};
use sylvan_types::{Name, Path, SelectorName, Value, VariableName};

/// The verdict of a constraint for one node-tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Satisfaction {
    Satisfied,
    Unsatisfied,
}

impl Satisfaction {
    pub fn is_satisfied(self) -> bool {
        self == Satisfaction::Satisfied
    }
}

impl From<bool> for Satisfaction {
    fn from(value: bool) -> Self {
        if value {
            Satisfaction::Satisfied
        } else {
            Satisfaction::Unsatisfied
        }
    }
}

impl ops::Not for Satisfaction {
    type Output = Satisfaction;

    fn not(self) -> Satisfaction {
        match self {
            Satisfaction::Satisfied => Satisfaction::Unsatisfied,
            Satisfaction::Unsatisfied => Satisfaction::Satisfied,
        }
    }
}

/// One candidate row: a node (or nothing, for outer joins) per selector.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeTuple<N> {
    nodes: HashMap<SelectorName, Option<N>>,
}

impl<N> NodeTuple<N> {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
        }
    }

    /// Binds `selector` to `node`.
    pub fn with(mut self, selector: impl Into<SelectorName>, node: N) -> Self {
        self.nodes.insert(selector.into(), Some(node));
        self
    }

    /// Declares `selector` without a node, as an outer join does.
    pub fn with_unbound(mut self, selector: impl Into<SelectorName>) -> Self {
        self.nodes.insert(selector.into(), None);
        self
    }

    /// The node bound to `selector`, if any.
    pub fn get(&self, selector: &SelectorName) -> Option<&N> {
        self.nodes.get(selector).and_then(Option::as_ref)
    }

    pub fn selectors(&self) -> impl Iterator<Item = &SelectorName> {
        self.nodes.keys()
    }
}

impl<N> Default for NodeTuple<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Values of the bind variables of a query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings {
    values: HashMap<VariableName, Vec<Value>>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, name: impl Into<VariableName>, value: impl Into<Value>) -> Self {
        self.with_values(name, vec![value.into()])
    }

    /// Binds a variable to several values. Such a variable fails when used as
    /// the right-hand side of a comparison.
    pub fn with_values(mut self, name: impl Into<VariableName>, values: Vec<Value>) -> Self {
        self.values.insert(name.into(), values);
        self
    }

    pub fn get(&self, name: &VariableName) -> Option<&[Value]> {
        self.values.get(name).map(Vec::as_slice)
    }
}

/// The collaborators and settings an evaluation runs against.
pub struct EvaluationContext<'e, T: TreeNavigator + ?Sized> {
    pub navigator: &'e T,
    pub resolver: &'e dyn NamePathResolver,
    pub full_text: &'e dyn FullTextSearcher<T>,
    pub bindings: &'e Bindings,
    pub config: &'e EvaluationConfig,
}

impl<'e, T: TreeNavigator + ?Sized> EvaluationContext<'e, T> {
    pub fn new(
        navigator: &'e T,
        resolver: &'e dyn NamePathResolver,
        full_text: &'e dyn FullTextSearcher<T>,
        bindings: &'e Bindings,
        config: &'e EvaluationConfig,
    ) -> Self {
        Self {
            navigator,
            resolver,
            full_text,
            bindings,
            config,
        }
    }
}

/// Evaluates constraints, join conditions and operands for node-tuples.
///
/// The full-text predicates of the whole query must be supplied with
/// [`Evaluator::with_full_text_predicates`] for `SCORE()` to be non-zero;
/// see [`collect_full_text_predicates`](crate::collect_full_text_predicates).
pub struct Evaluator<'e, T: TreeNavigator + ?Sized> {
    context: EvaluationContext<'e, T>,
    predicates: &'e [FullTextPredicate],
}

type Tuple<'t, T> = &'t NodeTuple<<T as TreeNavigator>::Node>;

impl<'e, T: TreeNavigator + ?Sized> Evaluator<'e, T> {
    pub fn new(context: EvaluationContext<'e, T>) -> Self {
        Self {
            context,
            predicates: &[],
        }
    }

    pub fn with_full_text_predicates(mut self, predicates: &'e [FullTextPredicate]) -> Self {
        self.predicates = predicates;
        self
    }

    /// Decides whether `tuple` satisfies `constraint`.
    pub fn evaluate(
        &self,
        constraint: &Constraint,
        tuple: &NodeTuple<T::Node>,
    ) -> Result<Satisfaction, EvalError> {
        let mut data = tuple;
        let verdict = constraint.accept(self, &mut data);
        trace!("Constraint evaluated to {:?}", verdict);
        verdict
    }

    /// Decides whether `tuple` satisfies a join condition.
    pub fn evaluate_join(
        &self,
        condition: &JoinCondition,
        tuple: &NodeTuple<T::Node>,
    ) -> Result<Satisfaction, EvalError> {
        let mut data = tuple;
        condition.accept(self, &mut data)
    }

    /// The values of a dynamic operand for `tuple`.
    pub fn operand_values(
        &self,
        operand: &DynamicOperand,
        tuple: &NodeTuple<T::Node>,
    ) -> Result<Vec<Value>, EvalError> {
        let mut data = tuple;
        operand.accept(self, &mut data)
    }

    fn bound<'t>(
        &self,
        tuple: &'t NodeTuple<T::Node>,
        selector: &SelectorName,
    ) -> Result<&'t T::Node, EvalError> {
        tuple
            .get(selector)
            .ok_or_else(|| EvalError::SelectorNotBound(selector.clone()))
    }

    /// Applies the unbound-selector policy to the verdict of a leaf.
    fn leaf(&self, verdict: Result<Satisfaction, EvalError>) -> Result<Satisfaction, EvalError> {
        match verdict {
            Err(EvalError::SelectorNotBound(selector)) if !self.context.config.is_required(&selector) => {
                trace!("Selector '{}' is unbound, constraint unsatisfied", selector);
                Ok(Satisfaction::Unsatisfied)
            }
            other => other,
        }
    }

    /// Evaluates a static operand that must produce at most one value.
    fn single_value(
        &self,
        operand: &StaticOperand,
        data: &mut Tuple<'_, T>,
    ) -> Result<Option<Value>, EvalError> {
        let mut values = operand.accept(self, data)?;
        match values.len() {
            0 | 1 => Ok(values.pop()),
            count => Err(EvalError::MultiValuedStaticOperand { count }),
        }
    }

    fn property_values(
        &self,
        operand: &PropertyValue,
        tuple: &NodeTuple<T::Node>,
    ) -> Result<Vec<Value>, EvalError> {
        let node = self.bound(tuple, operand.selector())?;
        let navigator = self.context.navigator;
        match operand.property() {
            Some(property) => Ok(navigator.property_values(node, property)?),
            None => {
                let mut values = Vec::new();
                for name in navigator.property_names(node)? {
                    values.extend(navigator.property_values(node, &name)?);
                }
                Ok(values)
            }
        }
    }

    /// Resolves a constraint path to a node; `None` if it does not exist or
    /// is not visible.
    fn resolve(&self, path: &Path) -> Result<Option<T::Node>, EvalError> {
        let absolute = path
            .to_absolute()
            .normalized()
            .ok_or_else(|| EvalError::MalformedPath(path.to_string()))?;
        Ok(self.context.navigator.resolve_path(&absolute)?)
    }

    /// True if `ancestor` is a proper ancestor of `node`, at most `max_steps`
    /// levels up when given.
    fn is_ancestor(
        &self,
        ancestor: &T::Node,
        node: &T::Node,
        max_steps: Option<usize>,
    ) -> Result<bool, EvalError> {
        let navigator = self.context.navigator;
        let target_depth = navigator.depth(ancestor)?;
        let depth = navigator.depth(node)?;
        if depth <= target_depth || max_steps.is_some_and(|steps| depth - target_depth > steps) {
            return Ok(false);
        }
        match navigator.ancestor_at(node, target_depth)? {
            Some(found) => Ok(navigator.same_node(&found, ancestor)?),
            None => Ok(false),
        }
    }

    fn fold_case(values: Vec<Value>, fold: fn(&str) -> String) -> Vec<Value> {
        values
            .into_iter()
            .map(|value| match value {
                Value::String(s) => Value::String(fold(&s)),
                other => other,
            })
            .collect()
    }
}

// Leaf checks. Each returns `SelectorNotBound` for a missing selector and is
// wrapped in `leaf` by its visit method.
impl<'e, T: TreeNavigator + ?Sized> Evaluator<'e, T> {
    fn any_value_matches(
        &self,
        operator: Operator,
        values: &[Value],
        fixed: &Value,
    ) -> Result<Satisfaction, EvalError> {
        for value in values {
            if compare(operator, value, fixed, self.context.resolver)? {
                return Ok(Satisfaction::Satisfied);
            }
        }
        Ok(Satisfaction::Unsatisfied)
    }

    fn has_property(
        &self,
        node: &PropertyExistence,
        tuple: &NodeTuple<T::Node>,
    ) -> Result<Satisfaction, EvalError> {
        let bound = self.bound(tuple, node.selector())?;
        let values = self.context.navigator.property_values(bound, node.property())?;
        Ok(Satisfaction::from(!values.is_empty()))
    }

    fn full_text_matches(
        &self,
        node: &FullTextSearch,
        expression: &str,
        tuple: &NodeTuple<T::Node>,
    ) -> Result<Satisfaction, EvalError> {
        let bound = self.bound(tuple, node.selector())?;
        let found = self.context.full_text.search(
            self.context.navigator,
            node.selector(),
            bound,
            node.property(),
            expression,
        )?;
        Ok(Satisfaction::from(found))
    }

    fn is_same_node(
        &self,
        selector: &SelectorName,
        path: &Path,
        tuple: &NodeTuple<T::Node>,
    ) -> Result<Satisfaction, EvalError> {
        let bound = self.bound(tuple, selector)?;
        match self.resolve(path)? {
            Some(target) => Ok(self.context.navigator.same_node(bound, &target)?.into()),
            None => Ok(Satisfaction::Unsatisfied),
        }
    }

    /// Shared by `ISCHILDNODE` (`max_steps = Some(1)`) and `ISDESCENDANTNODE`.
    fn is_below_path(
        &self,
        selector: &SelectorName,
        path: &Path,
        max_steps: Option<usize>,
        tuple: &NodeTuple<T::Node>,
    ) -> Result<Satisfaction, EvalError> {
        let bound = self.bound(tuple, selector)?;
        match self.resolve(path)? {
            Some(ancestor) => Ok(self.is_ancestor(&ancestor, bound, max_steps)?.into()),
            None => Ok(Satisfaction::Unsatisfied),
        }
    }

    fn equi_join(&self, node: &EquiJoin, tuple: &NodeTuple<T::Node>) -> Result<Satisfaction, EvalError> {
        let left = PropertyValue::new(node.selector1().clone(), Some(node.property1().clone()));
        let right = PropertyValue::new(node.selector2().clone(), Some(node.property2().clone()));
        let left = self.property_values(&left, tuple)?;
        for value in self.property_values(&right, tuple)? {
            if self.any_value_matches(Operator::EqualTo, &left, &value)?.is_satisfied() {
                return Ok(Satisfaction::Satisfied);
            }
        }
        Ok(Satisfaction::Unsatisfied)
    }

    fn same_node_join(
        &self,
        node: &SameNodeJoin,
        tuple: &NodeTuple<T::Node>,
    ) -> Result<Satisfaction, EvalError> {
        let first = self.bound(tuple, node.selector1())?;
        let second = self.bound(tuple, node.selector2())?;
        let navigator = self.context.navigator;
        let target = match node.selector2_path() {
            Some(relative) => match self.resolve(&navigator.path_of(second)?.join(relative))? {
                Some(target) => target,
                None => return Ok(Satisfaction::Unsatisfied),
            },
            None => second.clone(),
        };
        Ok(navigator.same_node(first, &target)?.into())
    }

    fn is_below_selector(
        &self,
        node_selector: &SelectorName,
        ancestor_selector: &SelectorName,
        max_steps: Option<usize>,
        tuple: &NodeTuple<T::Node>,
    ) -> Result<Satisfaction, EvalError> {
        let node = self.bound(tuple, node_selector)?;
        let ancestor = self.bound(tuple, ancestor_selector)?;
        Ok(self.is_ancestor(ancestor, node, max_steps)?.into())
    }
}

impl<'e, 't, T: TreeNavigator + ?Sized> OperandVisitor<Tuple<'t, T>> for Evaluator<'e, T> {
    type Output = Vec<Value>;
    type Error = EvalError;

    fn visit_literal(&self, node: &Literal, _data: &mut Tuple<'t, T>) -> Result<Vec<Value>, EvalError> {
        Ok(vec![node.value().clone()])
    }

    fn visit_bind_variable(
        &self,
        node: &BindVariable,
        _data: &mut Tuple<'t, T>,
    ) -> Result<Vec<Value>, EvalError> {
        self.context
            .bindings
            .get(node.name())
            .map(<[Value]>::to_vec)
            .ok_or_else(|| EvalError::UnknownVariable(node.name().clone()))
    }

    fn visit_property_value(
        &self,
        node: &PropertyValue,
        data: &mut Tuple<'t, T>,
    ) -> Result<Vec<Value>, EvalError> {
        self.property_values(node, *data)
    }

    fn visit_length(&self, node: &Length, data: &mut Tuple<'t, T>) -> Result<Vec<Value>, EvalError> {
        let values = self.property_values(node.property_value(), *data)?;
        let mut lengths = Vec::with_capacity(values.len());
        for value in &values {
            let length = match value {
                Value::Binary(bytes) => bytes.len(),
                other => lexical(other, self.context.resolver)?.chars().count(),
            };
            lengths.push(Value::Long(length as i64));
        }
        Ok(lengths)
    }

    fn visit_node_name(&self, node: &NodeName, data: &mut Tuple<'t, T>) -> Result<Vec<Value>, EvalError> {
        let bound = self.bound(*data, node.selector())?;
        Ok(vec![Value::Name(self.context.navigator.node_name(bound)?)])
    }

    fn visit_node_local_name(
        &self,
        node: &NodeLocalName,
        data: &mut Tuple<'t, T>,
    ) -> Result<Vec<Value>, EvalError> {
        let bound = self.bound(*data, node.selector())?;
        let name: Name = self.context.navigator.node_name(bound)?;
        Ok(vec![Value::String(name.local_name().to_string())])
    }

    fn visit_full_text_search_score(
        &self,
        node: &FullTextSearchScore,
        data: &mut Tuple<'t, T>,
    ) -> Result<Vec<Value>, EvalError> {
        let tuple: Tuple<'t, T> = *data;
        let bound = self.bound(tuple, node.selector())?;
        let mut score = 0.0;
        for predicate in self.predicates.iter().filter(|p| &p.selector == node.selector()) {
            let Some(expression) = self.single_value(&predicate.expression, data)? else {
                continue;
            };
            let expression = lexical(&expression, self.context.resolver)?;
            score += self.context.full_text.score(
                self.context.navigator,
                node.selector(),
                bound,
                predicate.property.as_ref(),
                &expression,
            )?;
        }
        Ok(vec![Value::Double(score)])
    }

    fn visit_upper_case(&self, node: &UpperCase, data: &mut Tuple<'t, T>) -> Result<Vec<Value>, EvalError> {
        Ok(Self::fold_case(node.operand().accept(self, data)?, str::to_uppercase))
    }

    fn visit_lower_case(&self, node: &LowerCase, data: &mut Tuple<'t, T>) -> Result<Vec<Value>, EvalError> {
        Ok(Self::fold_case(node.operand().accept(self, data)?, str::to_lowercase))
    }
}

impl<'e, 't, T: TreeNavigator + ?Sized> ConstraintVisitor<Tuple<'t, T>> for Evaluator<'e, T> {
    type Output = Satisfaction;
    type Error = EvalError;

    fn visit_and(&self, node: &And, data: &mut Tuple<'t, T>) -> Result<Satisfaction, EvalError> {
        match node.left().accept(self, data)? {
            Satisfaction::Unsatisfied => Ok(Satisfaction::Unsatisfied),
            Satisfaction::Satisfied => node.right().accept(self, data),
        }
    }

    fn visit_or(&self, node: &Or, data: &mut Tuple<'t, T>) -> Result<Satisfaction, EvalError> {
        match node.left().accept(self, data)? {
            Satisfaction::Satisfied => Ok(Satisfaction::Satisfied),
            Satisfaction::Unsatisfied => node.right().accept(self, data),
        }
    }

    fn visit_not(&self, node: &Not, data: &mut Tuple<'t, T>) -> Result<Satisfaction, EvalError> {
        Ok(!node.constraint().accept(self, data)?)
    }

    fn visit_comparison(&self, node: &Comparison, data: &mut Tuple<'t, T>) -> Result<Satisfaction, EvalError> {
        // The static side decides first: no value means no match, several are an error.
        // The dynamic side is still read so a required selector is checked.
        let Some(fixed) = self.single_value(node.operand2(), data)? else {
            let read = node.operand1().accept(self, data);
            return self.leaf(read.map(|_| Satisfaction::Unsatisfied));
        };
        let verdict = node
            .operand1()
            .accept(self, data)
            .and_then(|values| self.any_value_matches(node.operator(), &values, &fixed));
        self.leaf(verdict)
    }

    fn visit_property_existence(
        &self,
        node: &PropertyExistence,
        data: &mut Tuple<'t, T>,
    ) -> Result<Satisfaction, EvalError> {
        self.leaf(self.has_property(node, *data))
    }

    fn visit_full_text_search(
        &self,
        node: &FullTextSearch,
        data: &mut Tuple<'t, T>,
    ) -> Result<Satisfaction, EvalError> {
        let Some(expression) = self.single_value(node.expression(), data)? else {
            let bound = self.bound(*data, node.selector());
            return self.leaf(bound.map(|_| Satisfaction::Unsatisfied));
        };
        let expression = lexical(&expression, self.context.resolver)?;
        self.leaf(self.full_text_matches(node, &expression, *data))
    }

    fn visit_same_node(&self, node: &SameNode, data: &mut Tuple<'t, T>) -> Result<Satisfaction, EvalError> {
        self.leaf(self.is_same_node(node.selector(), node.path(), *data))
    }

    fn visit_child_node(&self, node: &ChildNode, data: &mut Tuple<'t, T>) -> Result<Satisfaction, EvalError> {
        self.leaf(self.is_below_path(node.selector(), node.path(), Some(1), *data))
    }

    fn visit_descendant_node(
        &self,
        node: &DescendantNode,
        data: &mut Tuple<'t, T>,
    ) -> Result<Satisfaction, EvalError> {
        self.leaf(self.is_below_path(node.selector(), node.path(), None, *data))
    }
}

impl<'e, 't, T: TreeNavigator + ?Sized> JoinConditionVisitor<Tuple<'t, T>> for Evaluator<'e, T> {
    type Output = Satisfaction;
    type Error = EvalError;

    fn visit_equi_join(&self, node: &EquiJoin, data: &mut Tuple<'t, T>) -> Result<Satisfaction, EvalError> {
        self.leaf(self.equi_join(node, *data))
    }

    fn visit_same_node_join(
        &self,
        node: &SameNodeJoin,
        data: &mut Tuple<'t, T>,
    ) -> Result<Satisfaction, EvalError> {
        self.leaf(self.same_node_join(node, *data))
    }

    fn visit_child_node_join(
        &self,
        node: &ChildNodeJoin,
        data: &mut Tuple<'t, T>,
    ) -> Result<Satisfaction, EvalError> {
        self.leaf(self.is_below_selector(node.child_selector(), node.parent_selector(), Some(1), *data))
    }

    fn visit_descendant_node_join(
        &self,
        node: &DescendantNodeJoin,
        data: &mut Tuple<'t, T>,
    ) -> Result<Satisfaction, EvalError> {
        self.leaf(self.is_below_selector(
            node.descendant_selector(),
            node.ancestor_selector(),
            None,
            *data,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_satisfaction_logic() {
        assert_eq!(!Satisfaction::Satisfied, Satisfaction::Unsatisfied);
        assert_eq!(Satisfaction::from(true), Satisfaction::Satisfied);
        assert!(!Satisfaction::Unsatisfied.is_satisfied());
    }

    #[test]
    fn test_node_tuple_binding() {
        let tuple = NodeTuple::new().with("a", 1usize).with_unbound("b");
        assert_eq!(tuple.get(&SelectorName::new("a")), Some(&1));
        assert_eq!(tuple.get(&SelectorName::new("b")), None);
        assert_eq!(tuple.get(&SelectorName::new("c")), None);
        assert_eq!(tuple.selectors().count(), 2);
    }

    #[test]
    fn test_bindings() {
        let bindings = Bindings::new()
            .with("size", 10i64)
            .with_values("tags", vec![Value::from("a"), Value::from("b")]);
        assert_eq!(bindings.get(&VariableName::new("size")), Some(&[Value::Long(10)][..]));
        assert_eq!(bindings.get(&VariableName::new("tags")).map(<[Value]>::len), Some(2));
        assert_eq!(bindings.get(&VariableName::new("missing")), None);
    }
}
