//! Defines the navigation contract over a read-only, hierarchical content tree.
//!
//! The constraint evaluator is written exclusively against [`TreeNavigator`],
//! so it runs unchanged over a persistent store, a cache, or the
//! [`InMemoryTree`] used by tests.

use std::collections::BTreeMap;
use std::fmt::Debug;
use sylvan_types::{Name, Path, PathElement, Value};
use thiserror::Error;

/// Error type for navigation failures raised by the tree backend.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NavigationError {
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Access denied to '{0}'")]
    AccessDenied(String),

    #[error("Tree backend error: {0}")]
    Backend(String),
}

/// The navigation capability consumed by the evaluator.
///
/// `Node` is an opaque handle; the navigator is the only thing that knows how
/// to interpret it. Handles must be cheap to clone and safe to share across
/// worker threads.
pub trait TreeNavigator: Send + Sync {
    type Node: Clone + Debug + Send + Sync;

    /// The depth of a node. The root has depth 0.
    fn depth(&self, node: &Self::Node) -> Result<usize, NavigationError>;

    /// The ancestor of `node` at the given absolute depth.
    ///
    /// Returns the node itself when `depth` equals its own depth and `None`
    /// when `depth` is greater.
    fn ancestor_at(&self, node: &Self::Node, depth: usize)
    -> Result<Option<Self::Node>, NavigationError>;

    /// The normalized absolute path of a node.
    fn path_of(&self, node: &Self::Node) -> Result<Path, NavigationError>;

    /// True if both handles identify the same node.
    fn same_node(&self, a: &Self::Node, b: &Self::Node) -> Result<bool, NavigationError>;

    /// Resolves an absolute path. A path that does not exist, or names a node
    /// that is not visible to the caller, yields `None`.
    fn resolve_path(&self, path: &Path) -> Result<Option<Self::Node>, NavigationError>;

    /// All values of a property; empty if the property does not exist.
    fn property_values(
        &self,
        node: &Self::Node,
        property: &Name,
    ) -> Result<Vec<Value>, NavigationError>;

    /// The names of all properties of a node.
    fn property_names(&self, node: &Self::Node) -> Result<Vec<Name>, NavigationError>;

    /// The name of a node; the root carries the empty name.
    fn node_name(&self, node: &Self::Node) -> Result<Name, NavigationError> {
        Ok(self
            .path_of(node)?
            .name()
            .cloned()
            .unwrap_or_else(|| Name::local("")))
    }

    /// The parent of a node, `None` for the root.
    fn parent(&self, node: &Self::Node) -> Result<Option<Self::Node>, NavigationError> {
        match self.depth(node)? {
            0 => Ok(None),
            depth => self.ancestor_at(node, depth - 1),
        }
    }
}

/// Handle of a node in an [`InMemoryTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone)]
struct NodeData {
    name: Name,
    parent: Option<usize>,
    children: Vec<usize>,
    properties: BTreeMap<Name, Vec<Value>>,
    hidden: bool,
}

/// A simple, in-memory content tree.
///
/// Node 0 is the root. Nodes can be marked hidden to model nodes the caller
/// may not see: a hidden node (or anything below it) never resolves by path.
#[derive(Debug, Clone)]
pub struct InMemoryTree {
    nodes: Vec<NodeData>,
}

impl InMemoryTree {
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData {
                name: Name::local(""),
                parent: None,
                children: Vec::new(),
                properties: BTreeMap::new(),
                hidden: false,
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Appends a child. Same-name siblings are allowed and get increasing indexes.
    pub fn add_child(&mut self, parent: NodeId, name: Name) -> Result<NodeId, NavigationError> {
        self.data(parent)?;
        let id = self.nodes.len();
        self.nodes.push(NodeData {
            name,
            parent: Some(parent.0),
            children: Vec::new(),
            properties: BTreeMap::new(),
            hidden: false,
        });
        self.nodes[parent.0].children.push(id);
        Ok(NodeId(id))
    }

    /// Creates every missing node along a normalized absolute path and returns the last.
    ///
    /// Index-bearing elements create siblings up to the requested index.
    pub fn add_path(&mut self, path: &Path) -> Result<NodeId, NavigationError> {
        let path = path
            .to_absolute()
            .normalized()
            .ok_or_else(|| NavigationError::NodeNotFound(path.to_string()))?;
        let mut current = self.root();
        for element in path.elements() {
            if let PathElement::Named { name, index } = element {
                current = match self.find_child(current, name, *index) {
                    Some(child) => child,
                    None => {
                        let mut child = self.add_child(current, name.clone())?;
                        while self.same_name_index(child) < *index {
                            child = self.add_child(current, name.clone())?;
                        }
                        child
                    }
                };
            }
        }
        Ok(current)
    }

    pub fn set_property(
        &mut self,
        node: NodeId,
        name: Name,
        values: Vec<Value>,
    ) -> Result<(), NavigationError> {
        self.data(node)?;
        self.nodes[node.0].properties.insert(name, values);
        Ok(())
    }

    /// Marks a node as not visible to path resolution.
    pub fn hide(&mut self, node: NodeId) -> Result<(), NavigationError> {
        self.data(node)?;
        self.nodes[node.0].hidden = true;
        Ok(())
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes
            .get(node.0)
            .map(|d| d.children.iter().map(|&c| NodeId(c)).collect())
            .unwrap_or_default()
    }

    fn data(&self, node: NodeId) -> Result<&NodeData, NavigationError> {
        self.nodes
            .get(node.0)
            .ok_or_else(|| NavigationError::NodeNotFound(format!("node #{}", node.0)))
    }

    fn find_child(&self, parent: NodeId, name: &Name, index: u32) -> Option<NodeId> {
        self.nodes[parent.0]
            .children
            .iter()
            .filter(|&&c| &self.nodes[c].name == name)
            .nth(index.saturating_sub(1) as usize)
            .map(|&c| NodeId(c))
    }

    fn same_name_index(&self, node: NodeId) -> u32 {
        let data = &self.nodes[node.0];
        let Some(parent) = data.parent else {
            return 1;
        };
        let position = self.nodes[parent]
            .children
            .iter()
            .filter(|&&c| self.nodes[c].name == data.name)
            .position(|&c| c == node.0)
            .unwrap_or(0);
        position as u32 + 1
    }
}

impl Default for InMemoryTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeNavigator for InMemoryTree {
    type Node = NodeId;

    fn depth(&self, node: &NodeId) -> Result<usize, NavigationError> {
        let mut depth = 0;
        let mut current = self.data(*node)?.parent;
        while let Some(p) = current {
            depth += 1;
            current = self.nodes[p].parent;
        }
        Ok(depth)
    }

    fn ancestor_at(&self, node: &NodeId, depth: usize) -> Result<Option<NodeId>, NavigationError> {
        let own = self.depth(node)?;
        if depth > own {
            return Ok(None);
        }
        let mut current = node.0;
        for _ in 0..(own - depth) {
            match self.nodes[current].parent {
                Some(p) => current = p,
                None => return Ok(None),
            }
        }
        Ok(Some(NodeId(current)))
    }

    fn path_of(&self, node: &NodeId) -> Result<Path, NavigationError> {
        let mut elements = Vec::new();
        let mut current = *node;
        while let Some(parent) = self.data(current)?.parent {
            elements.push(PathElement::indexed(
                self.nodes[current.0].name.clone(),
                self.same_name_index(current),
            ));
            current = NodeId(parent);
        }
        elements.reverse();
        Ok(Path::new(true, elements))
    }

    fn same_node(&self, a: &NodeId, b: &NodeId) -> Result<bool, NavigationError> {
        Ok(a == b)
    }

    fn resolve_path(&self, path: &Path) -> Result<Option<NodeId>, NavigationError> {
        let Some(path) = path.to_absolute().normalized() else {
            return Ok(None);
        };
        let mut current = self.root();
        for element in path.elements() {
            let PathElement::Named { name, index } = element else {
                return Ok(None);
            };
            match self.find_child(current, name, *index) {
                Some(child) if !self.nodes[child.0].hidden => current = child,
                _ => return Ok(None),
            }
        }
        Ok(Some(current))
    }

    fn property_values(&self, node: &NodeId, property: &Name) -> Result<Vec<Value>, NavigationError> {
        Ok(self
            .data(*node)?
            .properties
            .get(property)
            .cloned()
            .unwrap_or_default())
    }

    fn property_names(&self, node: &NodeId) -> Result<Vec<Name>, NavigationError> {
        Ok(self.data(*node)?.properties.keys().cloned().collect())
    }

    fn node_name(&self, node: &NodeId) -> Result<Name, NavigationError> {
        Ok(self.data(*node)?.name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(names: &[&str]) -> Path {
        Path::from_names(names.iter().map(|n| Name::local(*n)))
    }

    /// /a/b/c/d plus a sibling branch /a/x
    fn create_test_tree() -> (InMemoryTree, Vec<NodeId>) {
        let mut tree = InMemoryTree::new();
        let d = tree.add_path(&path(&["a", "b", "c", "d"])).unwrap();
        let x = tree.add_path(&path(&["a", "x"])).unwrap();
        let a = tree.resolve_path(&path(&["a"])).unwrap().unwrap();
        let b = tree.resolve_path(&path(&["a", "b"])).unwrap().unwrap();
        let c = tree.resolve_path(&path(&["a", "b", "c"])).unwrap().unwrap();
        (tree, vec![a, b, c, d, x])
    }

    #[test]
    fn test_depth_and_ancestors() {
        let (tree, ids) = create_test_tree();
        let (a, b, d) = (ids[0], ids[1], ids[3]);
        assert_eq!(tree.depth(&tree.root()).unwrap(), 0);
        assert_eq!(tree.depth(&d).unwrap(), 4);
        assert_eq!(tree.ancestor_at(&d, 2).unwrap(), Some(b));
        assert_eq!(tree.ancestor_at(&d, 1).unwrap(), Some(a));
        assert_eq!(tree.ancestor_at(&d, 4).unwrap(), Some(d));
        assert_eq!(tree.ancestor_at(&d, 5).unwrap(), None);
        assert_eq!(tree.parent(&a).unwrap(), Some(tree.root()));
        assert_eq!(tree.parent(&tree.root()).unwrap(), None);
    }

    #[test]
    fn test_path_round_trip() {
        let (tree, ids) = create_test_tree();
        for id in ids {
            let p = tree.path_of(&id).unwrap();
            assert_eq!(tree.resolve_path(&p).unwrap(), Some(id));
        }
        assert_eq!(tree.path_of(&tree.root()).unwrap(), Path::root());
    }

    #[test]
    fn test_same_name_siblings() {
        let mut tree = InMemoryTree::new();
        let first = tree.add_child(tree.root(), Name::local("item")).unwrap();
        let second = tree.add_child(tree.root(), Name::local("item")).unwrap();
        let p = tree.path_of(&second).unwrap();
        assert_eq!(p.to_string(), "/item[2]");
        assert_eq!(tree.resolve_path(&path(&["item"])).unwrap(), Some(first));

        let third = tree
            .add_path(&Path::new(true, vec![PathElement::indexed(Name::local("item"), 3)]))
            .unwrap();
        assert_eq!(tree.path_of(&third).unwrap().to_string(), "/item[3]");
    }

    #[test]
    fn test_hidden_nodes_do_not_resolve() {
        let (mut tree, ids) = create_test_tree();
        tree.hide(ids[1]).unwrap();
        assert_eq!(tree.resolve_path(&path(&["a", "b"])).unwrap(), None);
        assert_eq!(tree.resolve_path(&path(&["a", "b", "c"])).unwrap(), None);
        assert_eq!(tree.resolve_path(&path(&["a", "x"])).unwrap(), Some(ids[4]));
    }

    #[test]
    fn test_properties() {
        let (mut tree, ids) = create_test_tree();
        let size = Name::local("size");
        tree.set_property(ids[3], size.clone(), vec![Value::Long(5), Value::Long(20)])
            .unwrap();
        assert_eq!(tree.property_values(&ids[3], &size).unwrap().len(), 2);
        assert!(tree.property_values(&ids[2], &size).unwrap().is_empty());
        assert_eq!(tree.property_names(&ids[3]).unwrap(), vec![size]);
    }

    #[test]
    fn test_unknown_node_is_an_error() {
        let tree = InMemoryTree::new();
        assert!(matches!(
            tree.depth(&NodeId(99)),
            Err(NavigationError::NodeNotFound(_))
        ));
    }
}
