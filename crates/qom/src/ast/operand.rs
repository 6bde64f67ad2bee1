use sylvan_types::{Name, SelectorName, Value, VariableName};

/// An operand whose value is fixed before evaluation starts.
#[derive(Debug, Clone, PartialEq)]
pub enum StaticOperand {
    Literal(Literal),
    BindVariable(BindVariable),
}

/// A literal value with its type tag.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    value: Value,
}

impl Literal {
    pub(crate) fn new(value: Value) -> Self {
        Self { value }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

/// A named placeholder, looked up in the bindings at evaluation time.
#[derive(Debug, Clone, PartialEq)]
pub struct BindVariable {
    name: VariableName,
}

impl BindVariable {
    pub(crate) fn new(name: VariableName) -> Self {
        Self { name }
    }

    pub fn name(&self) -> &VariableName {
        &self.name
    }
}

/// An operand computed from the node bound to a selector.
///
/// Every variant reads exactly one selector, either directly or through the
/// operand it wraps.
#[derive(Debug, Clone, PartialEq)]
pub enum DynamicOperand {
    PropertyValue(PropertyValue),
    Length(Length),
    NodeName(NodeName),
    NodeLocalName(NodeLocalName),
    FullTextSearchScore(FullTextSearchScore),
    UpperCase(UpperCase),
    LowerCase(LowerCase),
}

impl DynamicOperand {
    /// The selector this operand reads.
    pub fn selector(&self) -> &SelectorName {
        match self {
            DynamicOperand::PropertyValue(op) => op.selector(),
            DynamicOperand::Length(op) => op.property_value().selector(),
            DynamicOperand::NodeName(op) => op.selector(),
            DynamicOperand::NodeLocalName(op) => op.selector(),
            DynamicOperand::FullTextSearchScore(op) => op.selector(),
            DynamicOperand::UpperCase(op) => op.operand().selector(),
            DynamicOperand::LowerCase(op) => op.operand().selector(),
        }
    }
}

/// The values of one property, or of all properties when `property` is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyValue {
    selector: SelectorName,
    property: Option<Name>,
}

impl PropertyValue {
    pub(crate) fn new(selector: SelectorName, property: Option<Name>) -> Self {
        Self { selector, property }
    }

    pub fn selector(&self) -> &SelectorName {
        &self.selector
    }

    pub fn property(&self) -> Option<&Name> {
        self.property.as_ref()
    }
}

/// The length of each value of a property.
#[derive(Debug, Clone, PartialEq)]
pub struct Length {
    property_value: PropertyValue,
}

impl Length {
    pub(crate) fn new(property_value: PropertyValue) -> Self {
        Self { property_value }
    }

    pub fn property_value(&self) -> &PropertyValue {
        &self.property_value
    }
}

/// The qualified name of the bound node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeName {
    selector: SelectorName,
}

impl NodeName {
    pub(crate) fn new(selector: SelectorName) -> Self {
        Self { selector }
    }

    pub fn selector(&self) -> &SelectorName {
        &self.selector
    }
}

/// The local part of the bound node's name.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeLocalName {
    selector: SelectorName,
}

impl NodeLocalName {
    pub(crate) fn new(selector: SelectorName) -> Self {
        Self { selector }
    }

    pub fn selector(&self) -> &SelectorName {
        &self.selector
    }
}

/// The full-text relevance score of the bound node.
#[derive(Debug, Clone, PartialEq)]
pub struct FullTextSearchScore {
    selector: SelectorName,
}

impl FullTextSearchScore {
    pub(crate) fn new(selector: SelectorName) -> Self {
        Self { selector }
    }

    pub fn selector(&self) -> &SelectorName {
        &self.selector
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpperCase {
    operand: Box<DynamicOperand>,
}

impl UpperCase {
    pub(crate) fn new(operand: DynamicOperand) -> Self {
        Self {
            operand: Box::new(operand),
        }
    }

    pub fn operand(&self) -> &DynamicOperand {
        &self.operand
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LowerCase {
    operand: Box<DynamicOperand>,
}

impl LowerCase {
    pub(crate) fn new(operand: DynamicOperand) -> Self {
        Self {
            operand: Box::new(operand),
        }
    }

    pub fn operand(&self) -> &DynamicOperand {
        &self.operand
    }
}
