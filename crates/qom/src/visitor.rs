//! Double-dispatch visitor protocol for the query tree.
//!
//! Each node category has a visitor trait with one method per variant. A
//! node's `accept` calls the method for its own variant; a category enum's
//! `accept` is an exhaustive `match`, so adding a variant breaks every
//! visitor until it handles the new case.
//!
//! Visitors are stateless (`&self`). Per-traversal state travels in the
//! `data` accumulator, which lets one visitor value be shared by many
//! concurrent traversals.

use crate::ast::{
    And, BindVariable, ChildNode, ChildNodeJoin, Comparison, Constraint, DescendantNode,
    DescendantNodeJoin, DynamicOperand, EquiJoin, FullTextSearch, FullTextSearchScore, Join,
    JoinCondition, Length, Literal, LowerCase, NodeLocalName, NodeName, Not, Or,
    PropertyExistence, PropertyValue, SameNode, SameNodeJoin, Selector, Source, StaticOperand,
    UpperCase,
};

/// Visits static and dynamic operands.
pub trait OperandVisitor<D> {
    type Output;
    type Error;

    fn visit_literal(&self, node: &Literal, data: &mut D) -> Result<Self::Output, Self::Error>;
    fn visit_bind_variable(&self, node: &BindVariable, data: &mut D)
    -> Result<Self::Output, Self::Error>;
    fn visit_property_value(&self, node: &PropertyValue, data: &mut D)
    -> Result<Self::Output, Self::Error>;
    fn visit_length(&self, node: &Length, data: &mut D) -> Result<Self::Output, Self::Error>;
    fn visit_node_name(&self, node: &NodeName, data: &mut D) -> Result<Self::Output, Self::Error>;
    fn visit_node_local_name(&self, node: &NodeLocalName, data: &mut D)
    -> Result<Self::Output, Self::Error>;
    fn visit_full_text_search_score(
        &self,
        node: &FullTextSearchScore,
        data: &mut D,
    ) -> Result<Self::Output, Self::Error>;
    fn visit_upper_case(&self, node: &UpperCase, data: &mut D) -> Result<Self::Output, Self::Error>;
    fn visit_lower_case(&self, node: &LowerCase, data: &mut D) -> Result<Self::Output, Self::Error>;
}

/// Visits constraints.
pub trait ConstraintVisitor<D> {
    type Output;
    type Error;

    fn visit_and(&self, node: &And, data: &mut D) -> Result<Self::Output, Self::Error>;
    fn visit_or(&self, node: &Or, data: &mut D) -> Result<Self::Output, Self::Error>;
    fn visit_not(&self, node: &Not, data: &mut D) -> Result<Self::Output, Self::Error>;
    fn visit_comparison(&self, node: &Comparison, data: &mut D) -> Result<Self::Output, Self::Error>;
    fn visit_property_existence(
        &self,
        node: &PropertyExistence,
        data: &mut D,
    ) -> Result<Self::Output, Self::Error>;
    fn visit_full_text_search(&self, node: &FullTextSearch, data: &mut D)
    -> Result<Self::Output, Self::Error>;
    fn visit_same_node(&self, node: &SameNode, data: &mut D) -> Result<Self::Output, Self::Error>;
    fn visit_child_node(&self, node: &ChildNode, data: &mut D) -> Result<Self::Output, Self::Error>;
    fn visit_descendant_node(&self, node: &DescendantNode, data: &mut D)
    -> Result<Self::Output, Self::Error>;
}

/// Visits join conditions.
pub trait JoinConditionVisitor<D> {
    type Output;
    type Error;

    fn visit_equi_join(&self, node: &EquiJoin, data: &mut D) -> Result<Self::Output, Self::Error>;
    fn visit_same_node_join(&self, node: &SameNodeJoin, data: &mut D)
    -> Result<Self::Output, Self::Error>;
    fn visit_child_node_join(&self, node: &ChildNodeJoin, data: &mut D)
    -> Result<Self::Output, Self::Error>;
    fn visit_descendant_node_join(
        &self,
        node: &DescendantNodeJoin,
        data: &mut D,
    ) -> Result<Self::Output, Self::Error>;
}

/// Visits query sources.
pub trait SourceVisitor<D> {
    type Output;
    type Error;

    fn visit_selector(&self, node: &Selector, data: &mut D) -> Result<Self::Output, Self::Error>;
    fn visit_join(&self, node: &Join, data: &mut D) -> Result<Self::Output, Self::Error>;
}

macro_rules! accept_via {
    ($visitor:ident { $($node:ty => $method:ident),+ $(,)? }) => {
        $(
            impl $node {
                /// Dispatches to the matching method of the visitor.
                pub fn accept<V, D>(&self, visitor: &V, data: &mut D) -> Result<V::Output, V::Error>
                where
                    V: $visitor<D> + ?Sized,
                {
                    visitor.$method(self, data)
                }
            }
        )+
    };
}

accept_via!(OperandVisitor {
    Literal => visit_literal,
    BindVariable => visit_bind_variable,
    PropertyValue => visit_property_value,
    Length => visit_length,
    NodeName => visit_node_name,
    NodeLocalName => visit_node_local_name,
    FullTextSearchScore => visit_full_text_search_score,
    UpperCase => visit_upper_case,
    LowerCase => visit_lower_case,
});

accept_via!(ConstraintVisitor {
    And => visit_and,
    Or => visit_or,
    Not => visit_not,
    Comparison => visit_comparison,
    PropertyExistence => visit_property_existence,
    FullTextSearch => visit_full_text_search,
    SameNode => visit_same_node,
    ChildNode => visit_child_node,
    DescendantNode => visit_descendant_node,
});

accept_via!(JoinConditionVisitor {
    EquiJoin => visit_equi_join,
    SameNodeJoin => visit_same_node_join,
    ChildNodeJoin => visit_child_node_join,
    DescendantNodeJoin => visit_descendant_node_join,
});

accept_via!(SourceVisitor {
    Selector => visit_selector,
    Join => visit_join,
});

impl StaticOperand {
    pub fn accept<V, D>(&self, visitor: &V, data: &mut D) -> Result<V::Output, V::Error>
    where
        V: OperandVisitor<D> + ?Sized,
    {
        match self {
            StaticOperand::Literal(node) => node.accept(visitor, data),
            StaticOperand::BindVariable(node) => node.accept(visitor, data),
        }
    }
}

impl DynamicOperand {
    pub fn accept<V, D>(&self, visitor: &V, data: &mut D) -> Result<V::Output, V::Error>
    where
        V: OperandVisitor<D> + ?Sized,
    {
        match self {
            DynamicOperand::PropertyValue(node) => node.accept(visitor, data),
            DynamicOperand::Length(node) => node.accept(visitor, data),
            DynamicOperand::NodeName(node) => node.accept(visitor, data),
            DynamicOperand::NodeLocalName(node) => node.accept(visitor, data),
            DynamicOperand::FullTextSearchScore(node) => node.accept(visitor, data),
            DynamicOperand::UpperCase(node) => node.accept(visitor, data),
            DynamicOperand::LowerCase(node) => node.accept(visitor, data),
        }
    }
}

impl Constraint {
    pub fn accept<V, D>(&self, visitor: &V, data: &mut D) -> Result<V::Output, V::Error>
    where
        V: ConstraintVisitor<D> + ?Sized,
    {
        match self {
            Constraint::And(node) => node.accept(visitor, data),
            Constraint::Or(node) => node.accept(visitor, data),
            Constraint::Not(node) => node.accept(visitor, data),
            Constraint::Comparison(node) => node.accept(visitor, data),
            Constraint::PropertyExistence(node) => node.accept(visitor, data),
            Constraint::FullTextSearch(node) => node.accept(visitor, data),
            Constraint::SameNode(node) => node.accept(visitor, data),
            Constraint::ChildNode(node) => node.accept(visitor, data),
            Constraint::DescendantNode(node) => node.accept(visitor, data),
        }
    }
}

impl JoinCondition {
    pub fn accept<V, D>(&self, visitor: &V, data: &mut D) -> Result<V::Output, V::Error>
    where
        V: JoinConditionVisitor<D> + ?Sized,
    {
        match self {
            JoinCondition::EquiJoin(node) => node.accept(visitor, data),
            JoinCondition::SameNodeJoin(node) => node.accept(visitor, data),
            JoinCondition::ChildNodeJoin(node) => node.accept(visitor, data),
            JoinCondition::DescendantNodeJoin(node) => node.accept(visitor, data),
        }
    }
}

impl Source {
    pub fn accept<V, D>(&self, visitor: &V, data: &mut D) -> Result<V::Output, V::Error>
    where
        V: SourceVisitor<D> + ?Sized,
    {
        match self {
            Source::Selector(node) => node.accept(visitor, data),
            Source::Join(node) => node.accept(visitor, data),
        }
    }
}
