use super::operand::{DynamicOperand, StaticOperand};
use crate::error::QomError;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use sylvan_types::{Name, Path, SelectorName};

/// A boolean-valued node of the query tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    And(And),
    Or(Or),
    Not(Not),
    Comparison(Comparison),
    PropertyExistence(PropertyExistence),
    FullTextSearch(FullTextSearch),
    SameNode(SameNode),
    ChildNode(ChildNode),
    DescendantNode(DescendantNode),
}

impl Constraint {
    /// True for the variants that combine other constraints.
    pub fn is_compound(&self) -> bool {
        matches!(self, Constraint::And(_) | Constraint::Or(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct And {
    left: Box<Constraint>,
    right: Box<Constraint>,
}

impl And {
    pub(crate) fn new(left: Constraint, right: Constraint) -> Self {
        Self {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn left(&self) -> &Constraint {
        &self.left
    }

    pub fn right(&self) -> &Constraint {
        &self.right
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Or {
    left: Box<Constraint>,
    right: Box<Constraint>,
}

impl Or {
    pub(crate) fn new(left: Constraint, right: Constraint) -> Self {
        Self {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn left(&self) -> &Constraint {
        &self.left
    }

    pub fn right(&self) -> &Constraint {
        &self.right
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Not {
    constraint: Box<Constraint>,
}

impl Not {
    pub(crate) fn new(constraint: Constraint) -> Self {
        Self {
            constraint: Box::new(constraint),
        }
    }

    /// The negated constraint.
    pub fn constraint(&self) -> &Constraint {
        &self.constraint
    }
}

/// A comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    EqualTo,
    NotEqualTo,
    LessThan,
    LessThanOrEqualTo,
    GreaterThan,
    GreaterThanOrEqualTo,
    Like,
}

impl Operator {
    pub const ALL: [Operator; 7] = [
        Operator::EqualTo,
        Operator::NotEqualTo,
        Operator::LessThan,
        Operator::LessThanOrEqualTo,
        Operator::GreaterThan,
        Operator::GreaterThanOrEqualTo,
        Operator::Like,
    ];

    /// The token of the textual query form.
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::EqualTo => "=",
            Operator::NotEqualTo => "<>",
            Operator::LessThan => "<",
            Operator::LessThanOrEqualTo => "<=",
            Operator::GreaterThan => ">",
            Operator::GreaterThanOrEqualTo => ">=",
            Operator::Like => "LIKE",
        }
    }

    /// The repository API constant for this operator.
    pub fn constant(&self) -> &'static str {
        match self {
            Operator::EqualTo => "jcr.operator.equal.to",
            Operator::NotEqualTo => "jcr.operator.not.equal.to",
            Operator::LessThan => "jcr.operator.less.than",
            Operator::LessThanOrEqualTo => "jcr.operator.less.than.or.equal.to",
            Operator::GreaterThan => "jcr.operator.greater.than",
            Operator::GreaterThanOrEqualTo => "jcr.operator.greater.than.or.equal.to",
            Operator::Like => "jcr.operator.like",
        }
    }

    /// Applies an ordering operator to the outcome of a value comparison.
    ///
    /// `Like` is not an ordering operator and always returns `false` here.
    pub fn holds(&self, ordering: Ordering) -> bool {
        match self {
            Operator::EqualTo => ordering == Ordering::Equal,
            Operator::NotEqualTo => ordering != Ordering::Equal,
            Operator::LessThan => ordering == Ordering::Less,
            Operator::LessThanOrEqualTo => ordering != Ordering::Greater,
            Operator::GreaterThan => ordering == Ordering::Greater,
            Operator::GreaterThanOrEqualTo => ordering != Ordering::Less,
            Operator::Like => false,
        }
    }
}

impl FromStr for Operator {
    type Err = QomError;

    /// Accepts the textual symbol (`=`, `<>`, `!=`, `LIKE`, ...) or the API constant.
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let token = token.trim();
        if token == "!=" {
            return Ok(Operator::NotEqualTo);
        }
        Operator::ALL
            .into_iter()
            .find(|op| op.symbol().eq_ignore_ascii_case(token) || op.constant() == token)
            .ok_or_else(|| QomError::MalformedConstraint(format!("unknown operator '{}'", token)))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// `operand1 <operator> operand2`.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    operand1: DynamicOperand,
    operator: Operator,
    operand2: StaticOperand,
}

impl Comparison {
    pub(crate) fn new(operand1: DynamicOperand, operator: Operator, operand2: StaticOperand) -> Self {
        Self {
            operand1,
            operator,
            operand2,
        }
    }

    pub fn operand1(&self) -> &DynamicOperand {
        &self.operand1
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn operand2(&self) -> &StaticOperand {
        &self.operand2
    }
}

/// The bound node has the property, with at least one value.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyExistence {
    selector: SelectorName,
    property: Name,
}

impl PropertyExistence {
    pub(crate) fn new(selector: SelectorName, property: Name) -> Self {
        Self { selector, property }
    }

    pub fn selector(&self) -> &SelectorName {
        &self.selector
    }

    pub fn property(&self) -> &Name {
        &self.property
    }
}

/// A full-text predicate, decided by the full-text collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct FullTextSearch {
    selector: SelectorName,
    property: Option<Name>,
    expression: StaticOperand,
}

impl FullTextSearch {
    pub(crate) fn new(selector: SelectorName, property: Option<Name>, expression: StaticOperand) -> Self {
        Self {
            selector,
            property,
            expression,
        }
    }

    pub fn selector(&self) -> &SelectorName {
        &self.selector
    }

    /// The searched property; `None` searches the whole node.
    pub fn property(&self) -> Option<&Name> {
        self.property.as_ref()
    }

    pub fn expression(&self) -> &StaticOperand {
        &self.expression
    }
}

/// The bound node is the node at `path`.
#[derive(Debug, Clone, PartialEq)]
pub struct SameNode {
    selector: SelectorName,
    path: Path,
}

impl SameNode {
    pub(crate) fn new(selector: SelectorName, path: Path) -> Self {
        Self { selector, path }
    }

    pub fn selector(&self) -> &SelectorName {
        &self.selector
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// The bound node is a child of the node at `path`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildNode {
    selector: SelectorName,
    path: Path,
}

impl ChildNode {
    pub(crate) fn new(selector: SelectorName, path: Path) -> Self {
        Self { selector, path }
    }

    pub fn selector(&self) -> &SelectorName {
        &self.selector
    }

    /// The parent path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// The bound node is a descendant, at any depth, of the node at `path`.
#[derive(Debug, Clone, PartialEq)]
pub struct DescendantNode {
    selector: SelectorName,
    path: Path,
}

impl DescendantNode {
    pub(crate) fn new(selector: SelectorName, path: Path) -> Self {
        Self { selector, path }
    }

    pub fn selector(&self) -> &SelectorName {
        &self.selector
    }

    /// The ancestor path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_tokens() {
        for op in Operator::ALL {
            assert_eq!(op.symbol().parse::<Operator>().unwrap(), op);
            assert_eq!(op.constant().parse::<Operator>().unwrap(), op);
        }
        assert_eq!("!=".parse::<Operator>().unwrap(), Operator::NotEqualTo);
        assert_eq!("like".parse::<Operator>().unwrap(), Operator::Like);
        assert!(matches!(
            "~=".parse::<Operator>(),
            Err(QomError::MalformedConstraint(_))
        ));
    }

    #[test]
    fn test_operator_holds() {
        assert!(Operator::LessThanOrEqualTo.holds(Ordering::Equal));
        assert!(Operator::NotEqualTo.holds(Ordering::Less));
        assert!(!Operator::GreaterThan.holds(Ordering::Equal));
        assert!(!Operator::Like.holds(Ordering::Equal));
    }
}
