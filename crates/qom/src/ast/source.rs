use super::join::JoinCondition;
use crate::error::QomError;
use std::str::FromStr;
use sylvan_types::{Name, SelectorName};

/// Where the candidate node-tuples of a query come from.
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    Selector(Selector),
    Join(Join),
}

/// All nodes of a node type, bound to a selector name.
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    node_type: Name,
    selector: SelectorName,
}

impl Selector {
    pub(crate) fn new(node_type: Name, selector: SelectorName) -> Self {
        Self { node_type, selector }
    }

    pub fn node_type(&self) -> &Name {
        &self.node_type
    }

    pub fn selector(&self) -> &SelectorName {
        &self.selector
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinType {
    Inner,
    LeftOuter,
    RightOuter,
}

impl JoinType {
    /// The keywords of the textual query form.
    pub fn keywords(&self) -> &'static str {
        match self {
            JoinType::Inner => "INNER JOIN",
            JoinType::LeftOuter => "LEFT OUTER JOIN",
            JoinType::RightOuter => "RIGHT OUTER JOIN",
        }
    }

    pub fn constant(&self) -> &'static str {
        match self {
            JoinType::Inner => "jcr.join.type.inner",
            JoinType::LeftOuter => "jcr.join.type.left.outer",
            JoinType::RightOuter => "jcr.join.type.right.outer",
        }
    }
}

impl FromStr for JoinType {
    type Err = QomError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let normalized = token.trim().to_ascii_uppercase();
        [JoinType::Inner, JoinType::LeftOuter, JoinType::RightOuter]
            .into_iter()
            .find(|jt| {
                jt.constant() == token.trim()
                    || jt.keywords() == normalized
                    || jt.keywords().trim_end_matches(" JOIN") == normalized
            })
            .ok_or_else(|| QomError::MalformedConstraint(format!("unknown join type '{}'", token)))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    left: Box<Source>,
    right: Box<Source>,
    join_type: JoinType,
    condition: JoinCondition,
}

impl Join {
    pub(crate) fn new(left: Source, right: Source, join_type: JoinType, condition: JoinCondition) -> Self {
        Self {
            left: Box::new(left),
            right: Box::new(right),
            join_type,
            condition,
        }
    }

    pub fn left(&self) -> &Source {
        &self.left
    }

    pub fn right(&self) -> &Source {
        &self.right
    }

    pub fn join_type(&self) -> JoinType {
        self.join_type
    }

    pub fn condition(&self) -> &JoinCondition {
        &self.condition
    }
}
