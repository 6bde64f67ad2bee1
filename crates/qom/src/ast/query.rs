use super::constraint::Constraint;
use super::operand::DynamicOperand;
use super::source::Source;
use crate::error::QomError;
use std::str::FromStr;
use sylvan_types::{Name, SelectorName};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Order {
    #[default]
    Ascending,
    Descending,
}

impl Order {
    pub fn keyword(&self) -> &'static str {
        match self {
            Order::Ascending => "ASC",
            Order::Descending => "DESC",
        }
    }

    pub fn constant(&self) -> &'static str {
        match self {
            Order::Ascending => "jcr.order.ascending",
            Order::Descending => "jcr.order.descending",
        }
    }
}

impl FromStr for Order {
    type Err = QomError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token.trim() {
            t if t.eq_ignore_ascii_case("ASC") || t.eq_ignore_ascii_case("ASCENDING") => Ok(Order::Ascending),
            t if t.eq_ignore_ascii_case("DESC") || t.eq_ignore_ascii_case("DESCENDING") => Ok(Order::Descending),
            "jcr.order.ascending" => Ok(Order::Ascending),
            "jcr.order.descending" => Ok(Order::Descending),
            other => Err(QomError::MalformedConstraint(format!("unknown order '{}'", other))),
        }
    }
}

/// One sort key of the result.
#[derive(Debug, Clone, PartialEq)]
pub struct Ordering {
    operand: DynamicOperand,
    order: Order,
}

impl Ordering {
    pub(crate) fn new(operand: DynamicOperand, order: Order) -> Self {
        Self { operand, order }
    }

    pub fn operand(&self) -> &DynamicOperand {
        &self.operand
    }

    pub fn order(&self) -> Order {
        self.order
    }
}

/// A result column: one property, or every property of a selector when
/// `property` is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    selector: SelectorName,
    property: Option<Name>,
    column_name: Option<String>,
}

impl Column {
    pub(crate) fn new(selector: SelectorName, property: Option<Name>, column_name: Option<String>) -> Self {
        Self {
            selector,
            property,
            column_name,
        }
    }

    pub fn selector(&self) -> &SelectorName {
        &self.selector
    }

    pub fn property(&self) -> Option<&Name> {
        self.property.as_ref()
    }

    pub fn column_name(&self) -> Option<&str> {
        self.column_name.as_deref()
    }
}

/// A complete query: source, optional constraint, orderings and columns.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryObjectModel {
    source: Source,
    constraint: Option<Constraint>,
    orderings: Vec<Ordering>,
    columns: Vec<Column>,
}

impl QueryObjectModel {
    pub(crate) fn new(
        source: Source,
        constraint: Option<Constraint>,
        orderings: Vec<Ordering>,
        columns: Vec<Column>,
    ) -> Self {
        Self {
            source,
            constraint,
            orderings,
            columns,
        }
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn constraint(&self) -> Option<&Constraint> {
        self.constraint.as_ref()
    }

    pub fn orderings(&self) -> &[Ordering] {
        &self.orderings
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Checks that every selector is declared once and every reference
    /// names a declared selector.
    pub fn validate(&self) -> Result<(), QomError> {
        crate::collect::validate_selectors(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_tokens() {
        assert_eq!("asc".parse::<Order>().unwrap(), Order::Ascending);
        assert_eq!("jcr.order.descending".parse::<Order>().unwrap(), Order::Descending);
        assert!("sideways".parse::<Order>().is_err());
        assert_eq!(Order::default(), Order::Ascending);
    }
}
