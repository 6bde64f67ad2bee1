//! Collecting visitors: selector usage and full-text predicates.

use crate::ast::{
    And, BindVariable, ChildNode, ChildNodeJoin, Comparison, Constraint, DescendantNode,
    DescendantNodeJoin, EquiJoin, FullTextSearch, FullTextSearchScore, Join, Length, Literal,
    LowerCase, NodeLocalName, NodeName, Not, Or, PropertyExistence, PropertyValue,
    QueryObjectModel, SameNode, SameNodeJoin, Selector, StaticOperand, UpperCase,
};
use crate::error::QomError;
use crate::visitor::{ConstraintVisitor, JoinConditionVisitor, OperandVisitor, SourceVisitor};
use itertools::Itertools;
use std::convert::Infallible;
use sylvan_types::{Name, SelectorName};

/// Selectors declared by a source and selectors referenced anywhere else.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorUse {
    pub declared: Vec<SelectorName>,
    pub referenced: Vec<SelectorName>,
}

/// Walks every node category and records selector names into a [`SelectorUse`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectorCollector;

type Collected = Result<(), Infallible>;

impl SelectorCollector {
    fn reference(data: &mut SelectorUse, selector: &SelectorName) -> Collected {
        data.referenced.push(selector.clone());
        Ok(())
    }
}

impl OperandVisitor<SelectorUse> for SelectorCollector {
    type Output = ();
    type Error = Infallible;

    fn visit_literal(&self, _node: &Literal, _data: &mut SelectorUse) -> Collected {
        Ok(())
    }

    fn visit_bind_variable(&self, _node: &BindVariable, _data: &mut SelectorUse) -> Collected {
        Ok(())
    }

    fn visit_property_value(&self, node: &PropertyValue, data: &mut SelectorUse) -> Collected {
        Self::reference(data, node.selector())
    }

    fn visit_length(&self, node: &Length, data: &mut SelectorUse) -> Collected {
        node.property_value().accept(self, data)
    }

    fn visit_node_name(&self, node: &NodeName, data: &mut SelectorUse) -> Collected {
        Self::reference(data, node.selector())
    }

    fn visit_node_local_name(&self, node: &NodeLocalName, data: &mut SelectorUse) -> Collected {
        Self::reference(data, node.selector())
    }

    fn visit_full_text_search_score(&self, node: &FullTextSearchScore, data: &mut SelectorUse) -> Collected {
        Self::reference(data, node.selector())
    }

    fn visit_upper_case(&self, node: &UpperCase, data: &mut SelectorUse) -> Collected {
        node.operand().accept(self, data)
    }

    fn visit_lower_case(&self, node: &LowerCase, data: &mut SelectorUse) -> Collected {
        node.operand().accept(self, data)
    }
}

impl ConstraintVisitor<SelectorUse> for SelectorCollector {
    type Output = ();
    type Error = Infallible;

    fn visit_and(&self, node: &And, data: &mut SelectorUse) -> Collected {
        node.left().accept(self, data)?;
        node.right().accept(self, data)
    }

    fn visit_or(&self, node: &Or, data: &mut SelectorUse) -> Collected {
        node.left().accept(self, data)?;
        node.right().accept(self, data)
    }

    fn visit_not(&self, node: &Not, data: &mut SelectorUse) -> Collected {
        node.constraint().accept(self, data)
    }

    fn visit_comparison(&self, node: &Comparison, data: &mut SelectorUse) -> Collected {
        node.operand1().accept(self, data)
    }

    fn visit_property_existence(&self, node: &PropertyExistence, data: &mut SelectorUse) -> Collected {
        Self::reference(data, node.selector())
    }

    fn visit_full_text_search(&self, node: &FullTextSearch, data: &mut SelectorUse) -> Collected {
        Self::reference(data, node.selector())
    }

    fn visit_same_node(&self, node: &SameNode, data: &mut SelectorUse) -> Collected {
        Self::reference(data, node.selector())
    }

    fn visit_child_node(&self, node: &ChildNode, data: &mut SelectorUse) -> Collected {
        Self::reference(data, node.selector())
    }

    fn visit_descendant_node(&self, node: &DescendantNode, data: &mut SelectorUse) -> Collected {
        Self::reference(data, node.selector())
    }
}

impl JoinConditionVisitor<SelectorUse> for SelectorCollector {
    type Output = ();
    type Error = Infallible;

    fn visit_equi_join(&self, node: &EquiJoin, data: &mut SelectorUse) -> Collected {
        Self::reference(data, node.selector1())?;
        Self::reference(data, node.selector2())
    }

    fn visit_same_node_join(&self, node: &SameNodeJoin, data: &mut SelectorUse) -> Collected {
        Self::reference(data, node.selector1())?;
        Self::reference(data, node.selector2())
    }

    fn visit_child_node_join(&self, node: &ChildNodeJoin, data: &mut SelectorUse) -> Collected {
        Self::reference(data, node.child_selector())?;
        Self::reference(data, node.parent_selector())
    }

    fn visit_descendant_node_join(&self, node: &DescendantNodeJoin, data: &mut SelectorUse) -> Collected {
        Self::reference(data, node.descendant_selector())?;
        Self::reference(data, node.ancestor_selector())
    }
}

impl SourceVisitor<SelectorUse> for SelectorCollector {
    type Output = ();
    type Error = Infallible;

    fn visit_selector(&self, node: &Selector, data: &mut SelectorUse) -> Collected {
        data.declared.push(node.selector().clone());
        Ok(())
    }

    fn visit_join(&self, node: &Join, data: &mut SelectorUse) -> Collected {
        node.left().accept(self, data)?;
        node.right().accept(self, data)?;
        node.condition().accept(self, data)
    }
}

/// Records the selectors a whole query declares and references.
pub fn selector_use(query: &QueryObjectModel) -> SelectorUse {
    let mut data = SelectorUse::default();
    let collector = SelectorCollector;
    let Ok(()) = query.source().accept(&collector, &mut data);
    if let Some(constraint) = query.constraint() {
        let Ok(()) = constraint.accept(&collector, &mut data);
    }
    for ordering in query.orderings() {
        let Ok(()) = ordering.operand().accept(&collector, &mut data);
    }
    data.referenced
        .extend(query.columns().iter().map(|column| column.selector().clone()));
    data
}

/// Checks that every selector is declared exactly once and that every
/// referenced selector is declared.
pub fn validate_selectors(query: &QueryObjectModel) -> Result<(), QomError> {
    let used = selector_use(query);
    if let Some(duplicate) = used.declared.iter().duplicates().next() {
        return Err(QomError::DuplicateSelector(duplicate.clone()));
    }
    match used.referenced.iter().find(|s| !used.declared.contains(s)) {
        Some(unknown) => Err(QomError::UnknownSelector(unknown.clone())),
        None => Ok(()),
    }
}

/// A full-text predicate of a query, kept for computing scores.
#[derive(Debug, Clone, PartialEq)]
pub struct FullTextPredicate {
    pub selector: SelectorName,
    pub property: Option<Name>,
    pub expression: StaticOperand,
}

/// Collects the `CONTAINS` predicates of a constraint tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct FullTextCollector;

type Predicates = Vec<FullTextPredicate>;

impl ConstraintVisitor<Predicates> for FullTextCollector {
    type Output = ();
    type Error = Infallible;

    fn visit_and(&self, node: &And, data: &mut Predicates) -> Collected {
        node.left().accept(self, data)?;
        node.right().accept(self, data)
    }

    fn visit_or(&self, node: &Or, data: &mut Predicates) -> Collected {
        node.left().accept(self, data)?;
        node.right().accept(self, data)
    }

    fn visit_not(&self, node: &Not, data: &mut Predicates) -> Collected {
        node.constraint().accept(self, data)
    }

    fn visit_comparison(&self, _node: &Comparison, _data: &mut Predicates) -> Collected {
        Ok(())
    }

    fn visit_property_existence(&self, _node: &PropertyExistence, _data: &mut Predicates) -> Collected {
        Ok(())
    }

    fn visit_full_text_search(&self, node: &FullTextSearch, data: &mut Predicates) -> Collected {
        data.push(FullTextPredicate {
            selector: node.selector().clone(),
            property: node.property().cloned(),
            expression: node.expression().clone(),
        });
        Ok(())
    }

    fn visit_same_node(&self, _node: &SameNode, _data: &mut Predicates) -> Collected {
        Ok(())
    }

    fn visit_child_node(&self, _node: &ChildNode, _data: &mut Predicates) -> Collected {
        Ok(())
    }

    fn visit_descendant_node(&self, _node: &DescendantNode, _data: &mut Predicates) -> Collected {
        Ok(())
    }
}

/// The full-text predicates of `constraint`, in tree order.
pub fn collect_full_text_predicates(constraint: &Constraint) -> Vec<FullTextPredicate> {
    let mut predicates = Vec::new();
    let Ok(()) = constraint.accept(&FullTextCollector, &mut predicates);
    predicates
}
