use sylvan_types::{Name, Path, SelectorName};

/// The condition relating the two sides of a join.
#[derive(Debug, Clone, PartialEq)]
pub enum JoinCondition {
    EquiJoin(EquiJoin),
    SameNodeJoin(SameNodeJoin),
    ChildNodeJoin(ChildNodeJoin),
    DescendantNodeJoin(DescendantNodeJoin),
}

/// `selector1.property1 = selector2.property2`
#[derive(Debug, Clone, PartialEq)]
pub struct EquiJoin {
    selector1: SelectorName,
    property1: Name,
    selector2: SelectorName,
    property2: Name,
}

impl EquiJoin {
    pub(crate) fn new(
        selector1: SelectorName,
        property1: Name,
        selector2: SelectorName,
        property2: Name,
    ) -> Self {
        Self {
            selector1,
            property1,
            selector2,
            property2,
        }
    }

    pub fn selector1(&self) -> &SelectorName {
        &self.selector1
    }

    pub fn property1(&self) -> &Name {
        &self.property1
    }

    pub fn selector2(&self) -> &SelectorName {
        &self.selector2
    }

    pub fn property2(&self) -> &Name {
        &self.property2
    }
}

/// `selector1` is the node of `selector2`, or the node reached from it by
/// the relative `selector2_path`.
#[derive(Debug, Clone, PartialEq)]
pub struct SameNodeJoin {
    selector1: SelectorName,
    selector2: SelectorName,
    selector2_path: Option<Path>,
}

impl SameNodeJoin {
    pub(crate) fn new(selector1: SelectorName, selector2: SelectorName, selector2_path: Option<Path>) -> Self {
        Self {
            selector1,
            selector2,
            selector2_path,
        }
    }

    pub fn selector1(&self) -> &SelectorName {
        &self.selector1
    }

    pub fn selector2(&self) -> &SelectorName {
        &self.selector2
    }

    pub fn selector2_path(&self) -> Option<&Path> {
        self.selector2_path.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChildNodeJoin {
    child_selector: SelectorName,
    parent_selector: SelectorName,
}

impl ChildNodeJoin {
    pub(crate) fn new(child_selector: SelectorName, parent_selector: SelectorName) -> Self {
        Self {
            child_selector,
            parent_selector,
        }
    }

    pub fn child_selector(&self) -> &SelectorName {
        &self.child_selector
    }

    pub fn parent_selector(&self) -> &SelectorName {
        &self.parent_selector
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DescendantNodeJoin {
    descendant_selector: SelectorName,
    ancestor_selector: SelectorName,
}

impl DescendantNodeJoin {
    pub(crate) fn new(descendant_selector: SelectorName, ancestor_selector: SelectorName) -> Self {
        Self {
            descendant_selector,
            ancestor_selector,
        }
    }

    pub fn descendant_selector(&self) -> &SelectorName {
        &self.descendant_selector
    }

    pub fn ancestor_selector(&self) -> &SelectorName {
        &self.ancestor_selector
    }
}
