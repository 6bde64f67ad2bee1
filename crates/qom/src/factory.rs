//! Builds query trees from the prefixed text form of names and paths.
//!
//! Every method validates its arguments and resolves names and paths through
//! the injected [`NamePathResolver`], so a tree that was built successfully
//! only holds qualified names.

use crate::ast::{
    And, BindVariable, ChildNode, ChildNodeJoin, Column, Comparison, Constraint, DescendantNode,
    DescendantNodeJoin, DynamicOperand, EquiJoin, FullTextSearch, FullTextSearchScore, Join,
    JoinCondition, JoinType, Length, Literal, LowerCase, NodeLocalName, NodeName, Not, Operator,
    Or, Order, Ordering, PropertyExistence, PropertyValue, QueryObjectModel, SameNode,
    SameNodeJoin, Selector, Source, StaticOperand, UpperCase,
};
use crate::error::QomError;
use std::fmt;
use std::sync::Arc;
use sylvan_traits::NamePathResolver;
use sylvan_types::{Name, Path, SelectorName, Value, VariableName};

#[derive(Clone)]
pub struct QomFactory {
    resolver: Arc<dyn NamePathResolver>,
}

impl fmt::Debug for QomFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QomFactory")
            .field("resolver", &self.resolver.name())
            .finish()
    }
}

fn required<'a>(what: &str, text: &'a str) -> Result<&'a str, QomError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        Err(QomError::MalformedConstraint(format!("{} must not be empty", what)))
    } else {
        Ok(trimmed)
    }
}

impl QomFactory {
    pub fn new(resolver: Arc<dyn NamePathResolver>) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &dyn NamePathResolver {
        self.resolver.as_ref()
    }

    fn selector_name(&self, text: &str) -> Result<SelectorName, QomError> {
        Ok(SelectorName::new(required("selector name", text)?))
    }

    fn name(&self, what: &str, text: &str) -> Result<Name, QomError> {
        Ok(self.resolver.qualified_name(required(what, text)?)?)
    }

    fn path(&self, text: &str) -> Result<Path, QomError> {
        Ok(self.resolver.qualified_path(required("path", text)?)?)
    }

    // --- Static operands ---

    pub fn literal(&self, value: impl Into<Value>) -> StaticOperand {
        StaticOperand::Literal(Literal::new(value.into()))
    }

    /// A `NAME` literal from its prefixed text form.
    pub fn name_literal(&self, text: &str) -> Result<StaticOperand, QomError> {
        Ok(self.literal(Value::Name(self.name("name literal", text)?)))
    }

    /// A `PATH` literal from its text form.
    pub fn path_literal(&self, text: &str) -> Result<StaticOperand, QomError> {
        Ok(self.literal(Value::Path(self.path(text)?)))
    }

    /// A bind variable. Its name must be an identifier so `$name` reads back
    /// unambiguously.
    pub fn bind_variable(&self, name: &str) -> Result<StaticOperand, QomError> {
        let name = required("bind variable name", name)?;
        let mut chars = name.chars();
        let starts_well = chars.next().is_some_and(|c| c.is_alphabetic() || c == '_');
        if !starts_well || !chars.all(|c| c.is_alphanumeric() || c == '_') {
            return Err(QomError::MalformedConstraint(format!(
                "bind variable name '{}' is not an identifier",
                name
            )));
        }
        Ok(StaticOperand::BindVariable(BindVariable::new(VariableName::new(name))))
    }

    // --- Dynamic operands ---

    pub fn property_value(&self, selector: &str, property: &str) -> Result<DynamicOperand, QomError> {
        Ok(DynamicOperand::PropertyValue(PropertyValue::new(
            self.selector_name(selector)?,
            Some(self.name("property name", property)?),
        )))
    }

    /// The values of every property of the selector's node.
    pub fn any_property_value(&self, selector: &str) -> Result<DynamicOperand, QomError> {
        Ok(DynamicOperand::PropertyValue(PropertyValue::new(
            self.selector_name(selector)?,
            None,
        )))
    }

    /// Wraps a property-value operand; any other operand is rejected.
    pub fn length(&self, operand: DynamicOperand) -> Result<DynamicOperand, QomError> {
        match operand {
            DynamicOperand::PropertyValue(property_value) => {
                Ok(DynamicOperand::Length(Length::new(property_value)))
            }
            other => Err(QomError::MalformedConstraint(format!(
                "LENGTH requires a property value operand, got {:?}",
                other
            ))),
        }
    }

    pub fn node_name(&self, selector: &str) -> Result<DynamicOperand, QomError> {
        Ok(DynamicOperand::NodeName(NodeName::new(self.selector_name(selector)?)))
    }

    pub fn node_local_name(&self, selector: &str) -> Result<DynamicOperand, QomError> {
        Ok(DynamicOperand::NodeLocalName(NodeLocalName::new(
            self.selector_name(selector)?,
        )))
    }

    pub fn full_text_search_score(&self, selector: &str) -> Result<DynamicOperand, QomError> {
        Ok(DynamicOperand::FullTextSearchScore(FullTextSearchScore::new(
            self.selector_name(selector)?,
        )))
    }

    pub fn upper_case(&self, operand: DynamicOperand) -> DynamicOperand {
        DynamicOperand::UpperCase(UpperCase::new(operand))
    }

    pub fn lower_case(&self, operand: DynamicOperand) -> DynamicOperand {
        DynamicOperand::LowerCase(LowerCase::new(operand))
    }

    // --- Constraints ---

    pub fn and(&self, left: Constraint, right: Constraint) -> Constraint {
        Constraint::And(And::new(left, right))
    }

    pub fn or(&self, left: Constraint, right: Constraint) -> Constraint {
        Constraint::Or(Or::new(left, right))
    }

    pub fn not(&self, constraint: Constraint) -> Constraint {
        Constraint::Not(Not::new(constraint))
    }

    /// `operator` is a symbol (`=`, `<>`, `!=`, `LIKE`, ...) or an operator
    /// constant (`jcr.operator.equal.to`, ...).
    pub fn comparison(
        &self,
        operand1: DynamicOperand,
        operator: &str,
        operand2: StaticOperand,
    ) -> Result<Constraint, QomError> {
        let operator: Operator = operator.parse()?;
        Ok(Constraint::Comparison(Comparison::new(operand1, operator, operand2)))
    }

    pub fn property_existence(&self, selector: &str, property: &str) -> Result<Constraint, QomError> {
        Ok(Constraint::PropertyExistence(PropertyExistence::new(
            self.selector_name(selector)?,
            self.name("property name", property)?,
        )))
    }

    /// `property` of `None` searches every property of the node.
    pub fn full_text_search(
        &self,
        selector: &str,
        property: Option<&str>,
        expression: StaticOperand,
    ) -> Result<Constraint, QomError> {
        let property = property.map(|p| self.name("property name", p)).transpose()?;
        Ok(Constraint::FullTextSearch(FullTextSearch::new(
            self.selector_name(selector)?,
            property,
            expression,
        )))
    }

    pub fn same_node(&self, selector: &str, path: &str) -> Result<Constraint, QomError> {
        Ok(Constraint::SameNode(SameNode::new(
            self.selector_name(selector)?,
            self.path(path)?,
        )))
    }

    pub fn child_node(&self, selector: &str, path: &str) -> Result<Constraint, QomError> {
        Ok(Constraint::ChildNode(ChildNode::new(
            self.selector_name(selector)?,
            self.path(path)?,
        )))
    }

    pub fn descendant_node(&self, selector: &str, path: &str) -> Result<Constraint, QomError> {
        Ok(Constraint::DescendantNode(DescendantNode::new(
            self.selector_name(selector)?,
            self.path(path)?,
        )))
    }

    // --- Join conditions ---

    pub fn equi_join(
        &self,
        selector1: &str,
        property1: &str,
        selector2: &str,
        property2: &str,
    ) -> Result<JoinCondition, QomError> {
        Ok(JoinCondition::EquiJoin(EquiJoin::new(
            self.selector_name(selector1)?,
            self.name("property name", property1)?,
            self.selector_name(selector2)?,
            self.name("property name", property2)?,
        )))
    }

    /// `selector2_path`, when given, must be relative to the node of `selector2`.
    pub fn same_node_join(
        &self,
        selector1: &str,
        selector2: &str,
        selector2_path: Option<&str>,
    ) -> Result<JoinCondition, QomError> {
        let path = selector2_path.map(|p| self.path(p)).transpose()?;
        if let Some(path) = path.as_ref().filter(|p| p.is_absolute()) {
            return Err(QomError::MalformedConstraint(format!(
                "same-node join path must be relative, got '{}'",
                path
            )));
        }
        Ok(JoinCondition::SameNodeJoin(SameNodeJoin::new(
            self.selector_name(selector1)?,
            self.selector_name(selector2)?,
            path,
        )))
    }

    pub fn child_node_join(&self, child_selector: &str, parent_selector: &str) -> Result<JoinCondition, QomError> {
        Ok(JoinCondition::ChildNodeJoin(ChildNodeJoin::new(
            self.selector_name(child_selector)?,
            self.selector_name(parent_selector)?,
        )))
    }

    pub fn descendant_node_join(
        &self,
        descendant_selector: &str,
        ancestor_selector: &str,
    ) -> Result<JoinCondition, QomError> {
        Ok(JoinCondition::DescendantNodeJoin(DescendantNodeJoin::new(
            self.selector_name(descendant_selector)?,
            self.selector_name(ancestor_selector)?,
        )))
    }

    // --- Sources and queries ---

    pub fn selector(&self, node_type: &str, selector: &str) -> Result<Source, QomError> {
        Ok(Source::Selector(Selector::new(
            self.name("node type", node_type)?,
            self.selector_name(selector)?,
        )))
    }

    /// `join_type` is `INNER`, `LEFT OUTER`, `RIGHT OUTER` (optionally followed
    /// by `JOIN`) or a join-type constant.
    pub fn join(
        &self,
        left: Source,
        right: Source,
        join_type: &str,
        condition: JoinCondition,
    ) -> Result<Source, QomError> {
        let join_type: JoinType = join_type.parse()?;
        Ok(Source::Join(Join::new(left, right, join_type, condition)))
    }

    pub fn ascending(&self, operand: DynamicOperand) -> Ordering {
        Ordering::new(operand, Order::Ascending)
    }

    pub fn descending(&self, operand: DynamicOperand) -> Ordering {
        Ordering::new(operand, Order::Descending)
    }

    /// `order` is `ASC`, `DESC` or an order constant.
    pub fn ordering(&self, operand: DynamicOperand, order: &str) -> Result<Ordering, QomError> {
        Ok(Ordering::new(operand, order.parse()?))
    }

    pub fn column(
        &self,
        selector: &str,
        property: Option<&str>,
        column_name: Option<&str>,
    ) -> Result<Column, QomError> {
        let property = property.map(|p| self.name("property name", p)).transpose()?;
        let column_name = column_name.map(|c| required("column name", c).map(str::to_string)).transpose()?;
        Ok(Column::new(self.selector_name(selector)?, property, column_name))
    }

    /// Assembles a query. Selector references are not checked here; see
    /// [`QueryObjectModel::validate`].
    pub fn query(
        &self,
        source: Source,
        constraint: Option<Constraint>,
        orderings: Vec<Ordering>,
        columns: Vec<Column>,
    ) -> QueryObjectModel {
        QueryObjectModel::new(source, constraint, orderings, columns)
    }
}
