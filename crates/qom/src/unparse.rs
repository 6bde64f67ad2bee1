//! Renders query trees as statement text.
//!
//! The output follows the JCR-SQL2 surface syntax. Rendering is deterministic
//! and never looks at node-tuples; it only needs the resolver to turn
//! qualified names and paths back into their prefixed form.

use crate::ast::{
    And, BindVariable, ChildNode, ChildNodeJoin, Column, Comparison, Constraint, DescendantNode,
    DescendantNodeJoin, DynamicOperand, EquiJoin, FullTextSearch, FullTextSearchScore, Join,
    JoinCondition, Length, Literal, LowerCase, NodeLocalName, NodeName, Not, Or, Ordering,
    PropertyExistence, PropertyValue, QueryObjectModel, SameNode, SameNodeJoin, Selector, Source,
    StaticOperand, UpperCase,
};
use crate::error::QomError;
use crate::visitor::{ConstraintVisitor, JoinConditionVisitor, OperandVisitor, SourceVisitor};
use sylvan_traits::NamePathResolver;
use sylvan_types::{Name, Path, SelectorName, Value, format_double};

/// Words that must be bracketed when used as a name.
pub const RESERVED_WORDS: &[&str] = &[
    "AND", "AS", "ASC", "BY", "CAST", "CONTAINS", "DESC", "FROM", "INNER", "IS",
    "ISCHILDNODE", "ISDESCENDANTNODE", "ISSAMENODE", "JOIN", "LEFT", "LENGTH", "LIKE",
    "LOCALNAME", "LOWER", "NAME", "NOT", "NULL", "ON", "OR", "ORDER", "OUTER", "RIGHT",
    "SCORE", "SELECT", "UPPER", "WHERE",
];

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn is_bare_name(text: &str) -> bool {
    let plain = match text.split_once(':') {
        Some((prefix, local)) => is_identifier(prefix) && is_identifier(local),
        None => is_identifier(text),
    };
    plain && !RESERVED_WORDS.iter().any(|w| w.eq_ignore_ascii_case(text))
}

/// Quotes a string literal, doubling embedded quotes.
pub fn quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

/// A name bare when possible, bracketed otherwise; a quoted literal if it
/// contains `]`.
pub fn escape_name(text: &str) -> String {
    if text.contains(']') {
        quote(text)
    } else if is_bare_name(text) {
        text.to_string()
    } else {
        format!("[{}]", text)
    }
}

/// A path, always bracketed; a quoted literal if it contains `]`.
pub fn escape_path(text: &str) -> String {
    if text.contains(']') {
        quote(text)
    } else {
        format!("[{}]", text)
    }
}

/// The statement renderer. Implements every visitor with a `String` buffer
/// as accumulator.
#[derive(Debug, Clone, Copy)]
pub struct Unparser<'r> {
    resolver: &'r dyn NamePathResolver,
}

type Rendered = Result<(), QomError>;

impl<'r> Unparser<'r> {
    pub fn new(resolver: &'r dyn NamePathResolver) -> Self {
        Self { resolver }
    }

    pub fn render_constraint(&self, constraint: &Constraint) -> Result<String, QomError> {
        let mut out = String::new();
        constraint.accept(self, &mut out)?;
        Ok(out)
    }

    pub fn render_dynamic_operand(&self, operand: &DynamicOperand) -> Result<String, QomError> {
        let mut out = String::new();
        operand.accept(self, &mut out)?;
        Ok(out)
    }

    pub fn render_static_operand(&self, operand: &StaticOperand) -> Result<String, QomError> {
        let mut out = String::new();
        operand.accept(self, &mut out)?;
        Ok(out)
    }

    pub fn render_join_condition(&self, condition: &JoinCondition) -> Result<String, QomError> {
        let mut out = String::new();
        condition.accept(self, &mut out)?;
        Ok(out)
    }

    pub fn render_source(&self, source: &Source) -> Result<String, QomError> {
        let mut out = String::new();
        source.accept(self, &mut out)?;
        Ok(out)
    }

    /// `SELECT <columns> FROM <source> [WHERE <constraint>] [ORDER BY <orderings>]`
    pub fn render_query(&self, query: &QueryObjectModel) -> Result<String, QomError> {
        let mut out = String::from("SELECT ");
        if query.columns().is_empty() {
            out.push('*');
        } else {
            let columns: Vec<String> = query
                .columns()
                .iter()
                .map(|column| self.column(column))
                .collect::<Result<_, _>>()?;
            out.push_str(&columns.join(", "));
        }
        out.push_str(" FROM ");
        query.source().accept(self, &mut out)?;
        if let Some(constraint) = query.constraint() {
            out.push_str(" WHERE ");
            constraint.accept(self, &mut out)?;
        }
        if !query.orderings().is_empty() {
            let orderings: Vec<String> = query
                .orderings()
                .iter()
                .map(|ordering| self.ordering(ordering))
                .collect::<Result<_, _>>()?;
            out.push_str(" ORDER BY ");
            out.push_str(&orderings.join(", "));
        }
        Ok(out)
    }

    fn column(&self, column: &Column) -> Result<String, QomError> {
        let mut out = self.selector_property(column.selector(), column.property())?;
        if let Some(alias) = column.column_name() {
            out.push_str(" AS ");
            out.push_str(&escape_name(alias));
        }
        Ok(out)
    }

    fn ordering(&self, ordering: &Ordering) -> Result<String, QomError> {
        let mut out = self.render_dynamic_operand(ordering.operand())?;
        out.push(' ');
        out.push_str(ordering.order().keyword());
        Ok(out)
    }

    fn name(&self, name: &Name) -> Result<String, QomError> {
        Ok(escape_name(&self.resolver.name_text(name)?))
    }

    fn path(&self, path: &Path) -> Result<String, QomError> {
        Ok(escape_path(&self.resolver.path_text(path)?))
    }

    fn selector_name(selector: &SelectorName) -> String {
        escape_name(selector.as_str())
    }

    /// `s.p`, or `s.*` for every property.
    fn selector_property(&self, selector: &SelectorName, property: Option<&Name>) -> Result<String, QomError> {
        let property = match property {
            Some(name) => self.name(name)?,
            None => "*".to_string(),
        };
        Ok(format!("{}.{}", Self::selector_name(selector), property))
    }

    /// Writes a child constraint, in parentheses if it is compound.
    fn operand_constraint(&self, constraint: &Constraint, out: &mut String) -> Rendered {
        if constraint.is_compound() {
            out.push('(');
            constraint.accept(self, out)?;
            out.push(')');
            Ok(())
        } else {
            constraint.accept(self, out)
        }
    }

    fn path_function(&self, function: &str, selector: &SelectorName, path: &Path, out: &mut String) -> Rendered {
        out.push_str(&format!(
            "{}({}, {})",
            function,
            Self::selector_name(selector),
            self.path(path)?
        ));
        Ok(())
    }

    fn literal(&self, value: &Value) -> Result<String, QomError> {
        let rendered = match value {
            Value::String(s) => quote(s),
            Value::Long(n) => n.to_string(),
            Value::Double(n) => format_double(*n),
            Value::Name(name) => format!("CAST({} AS NAME)", quote(&self.resolver.name_text(name)?)),
            Value::Path(path) => format!("CAST({} AS PATH)", quote(&self.resolver.path_text(path)?)),
            other => format!(
                "CAST({} AS {})",
                quote(&other.lexical_form().unwrap_or_default()),
                other.property_type().type_name()
            ),
        };
        Ok(rendered)
    }
}

impl OperandVisitor<String> for Unparser<'_> {
    type Output = ();
    type Error = QomError;

    fn visit_literal(&self, node: &Literal, out: &mut String) -> Rendered {
        out.push_str(&self.literal(node.value())?);
        Ok(())
    }

    fn visit_bind_variable(&self, node: &BindVariable, out: &mut String) -> Rendered {
        out.push('$');
        out.push_str(node.name().as_str());
        Ok(())
    }

    fn visit_property_value(&self, node: &PropertyValue, out: &mut String) -> Rendered {
        out.push_str(&self.selector_property(node.selector(), node.property())?);
        Ok(())
    }

    fn visit_length(&self, node: &Length, out: &mut String) -> Rendered {
        out.push_str("LENGTH(");
        node.property_value().accept(self, out)?;
        out.push(')');
        Ok(())
    }

    fn visit_node_name(&self, node: &NodeName, out: &mut String) -> Rendered {
        out.push_str(&format!("NAME({})", Self::selector_name(node.selector())));
        Ok(())
    }

    fn visit_node_local_name(&self, node: &NodeLocalName, out: &mut String) -> Rendered {
        out.push_str(&format!("LOCALNAME({})", Self::selector_name(node.selector())));
        Ok(())
    }

    fn visit_full_text_search_score(&self, node: &FullTextSearchScore, out: &mut String) -> Rendered {
        out.push_str(&format!("SCORE({})", Self::selector_name(node.selector())));
        Ok(())
    }

    fn visit_upper_case(&self, node: &UpperCase, out: &mut String) -> Rendered {
        out.push_str("UPPER(");
        node.operand().accept(self, out)?;
        out.push(')');
        Ok(())
    }

    fn visit_lower_case(&self, node: &LowerCase, out: &mut String) -> Rendered {
        out.push_str("LOWER(");
        node.operand().accept(self, out)?;
        out.push(')');
        Ok(())
    }
}

impl ConstraintVisitor<String> for Unparser<'_> {
    type Output = ();
    type Error = QomError;

    fn visit_and(&self, node: &And, out: &mut String) -> Rendered {
        self.operand_constraint(node.left(), out)?;
        out.push_str(" AND ");
        self.operand_constraint(node.right(), out)
    }

    fn visit_or(&self, node: &Or, out: &mut String) -> Rendered {
        self.operand_constraint(node.left(), out)?;
        out.push_str(" OR ");
        self.operand_constraint(node.right(), out)
    }

    fn visit_not(&self, node: &Not, out: &mut String) -> Rendered {
        out.push_str("NOT ");
        self.operand_constraint(node.constraint(), out)
    }

    fn visit_comparison(&self, node: &Comparison, out: &mut String) -> Rendered {
        node.operand1().accept(self, out)?;
        out.push(' ');
        out.push_str(node.operator().symbol());
        out.push(' ');
        node.operand2().accept(self, out)
    }

    fn visit_property_existence(&self, node: &PropertyExistence, out: &mut String) -> Rendered {
        out.push_str(&self.selector_property(node.selector(), Some(node.property()))?);
        out.push_str(" IS NOT NULL");
        Ok(())
    }

    fn visit_full_text_search(&self, node: &FullTextSearch, out: &mut String) -> Rendered {
        out.push_str("CONTAINS(");
        out.push_str(&self.selector_property(node.selector(), node.property())?);
        out.push_str(", ");
        node.expression().accept(self, out)?;
        out.push(')');
        Ok(())
    }

    fn visit_same_node(&self, node: &SameNode, out: &mut String) -> Rendered {
        self.path_function("ISSAMENODE", node.selector(), node.path(), out)
    }

    fn visit_child_node(&self, node: &ChildNode, out: &mut String) -> Rendered {
        self.path_function("ISCHILDNODE", node.selector(), node.path(), out)
    }

    fn visit_descendant_node(&self, node: &DescendantNode, out: &mut String) -> Rendered {
        self.path_function("ISDESCENDANTNODE", node.selector(), node.path(), out)
    }
}

impl JoinConditionVisitor<String> for Unparser<'_> {
    type Output = ();
    type Error = QomError;

    fn visit_equi_join(&self, node: &EquiJoin, out: &mut String) -> Rendered {
        out.push_str(&format!(
            "{} = {}",
            self.selector_property(node.selector1(), Some(node.property1()))?,
            self.selector_property(node.selector2(), Some(node.property2()))?
        ));
        Ok(())
    }

    fn visit_same_node_join(&self, node: &SameNodeJoin, out: &mut String) -> Rendered {
        out.push_str(&format!(
            "ISSAMENODE({}, {}",
            Self::selector_name(node.selector1()),
            Self::selector_name(node.selector2())
        ));
        if let Some(path) = node.selector2_path() {
            out.push_str(", ");
            out.push_str(&self.path(path)?);
        }
        out.push(')');
        Ok(())
    }

    fn visit_child_node_join(&self, node: &ChildNodeJoin, out: &mut String) -> Rendered {
        out.push_str(&format!(
            "ISCHILDNODE({}, {})",
            Self::selector_name(node.child_selector()),
            Self::selector_name(node.parent_selector())
        ));
        Ok(())
    }

    fn visit_descendant_node_join(&self, node: &DescendantNodeJoin, out: &mut String) -> Rendered {
        out.push_str(&format!(
            "ISDESCENDANTNODE({}, {})",
            Self::selector_name(node.descendant_selector()),
            Self::selector_name(node.ancestor_selector())
        ));
        Ok(())
    }
}

impl SourceVisitor<String> for Unparser<'_> {
    type Output = ();
    type Error = QomError;

    fn visit_selector(&self, node: &Selector, out: &mut String) -> Rendered {
        out.push_str(&format!(
            "{} AS {}",
            self.name(node.node_type())?,
            Self::selector_name(node.selector())
        ));
        Ok(())
    }

    fn visit_join(&self, node: &Join, out: &mut String) -> Rendered {
        node.left().accept(self, out)?;
        out.push(' ');
        out.push_str(node.join_type().keywords());
        out.push(' ');
        // Joins nest to the left; a nested right-hand join needs parentheses.
        if let Source::Join(_) = node.right() {
            out.push('(');
            node.right().accept(self, out)?;
            out.push(')');
        } else {
            node.right().accept(self, out)?;
        }
        out.push_str(" ON ");
        node.condition().accept(self, out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_name() {
        assert_eq!(escape_name("title"), "title");
        assert_eq!(escape_name("jcr:content"), "jcr:content");
        assert_eq!(escape_name("_x1"), "_x1");
        assert_eq!(escape_name("my title"), "[my title]");
        assert_eq!(escape_name("1abc"), "[1abc]");
        assert_eq!(escape_name("a:b:c"), "[a:b:c]");
        assert_eq!(escape_name("select"), "[select]");
        assert_eq!(escape_name("Name"), "[Name]");
        assert_eq!(escape_name("odd]name"), "'odd]name'");
    }

    #[test]
    fn test_escape_path() {
        assert_eq!(escape_path("/a/b"), "[/a/b]");
        assert_eq!(escape_path("/a/b[2]"), "'/a/b[2]'");
    }

    #[test]
    fn test_quote_doubles_single_quotes() {
        assert_eq!(quote("it's"), "'it''s'");
        assert_eq!(quote(""), "''");
    }
}
