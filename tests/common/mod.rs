#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use sylvan::qom::{EvalError, EvaluationContext, TermMatchSearcher};
use sylvan::traits::NodeId;
use sylvan::types::{Name, Path, Value};
use sylvan::{
    Bindings, Constraint, EvaluationConfig, Evaluator, InMemoryTree, NamePathResolver,
    NamespaceResolver, NodeTuple, QomFactory, Satisfaction,
};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Paths of every node in the fixture tree, root excluded.
pub const PATHS: [&str; 6] = ["/a", "/a/b", "/a/b/c", "/a/b/c/d", "/a/x", "/docs"];

/// A content tree with collaborators for evaluating constraints in tests.
///
/// ```text
/// /
/// ├── a
/// │   ├── b               title = "Introduction"
/// │   │   └── c           title = "Hello Rust world", body = "rust rust and more rust"
/// │   │       └── d       size = [5, 20], jcr:mimeType = "text/plain"
/// │   └── x               size = [5, 8]
/// └── docs                size = 12, score = 2.5
/// ```
pub struct Fixture {
    pub tree: Arc<InMemoryTree>,
    pub resolver: Arc<NamespaceResolver>,
    pub factory: QomFactory,
    nodes: HashMap<&'static str, NodeId>,
}

impl Fixture {
    pub fn new() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();

        let resolver = Arc::new(NamespaceResolver::new());
        let factory = QomFactory::new(resolver.clone());
        let mut tree = InMemoryTree::new();
        let mut nodes = HashMap::new();
        for text in PATHS {
            let path = resolver.qualified_path(text).expect("fixture path");
            nodes.insert(text, tree.add_path(&path).expect("fixture node"));
        }

        let set = |tree: &mut InMemoryTree, node: &str, name: &str, values: Vec<Value>| {
            let name = resolver.qualified_name(name).expect("fixture property");
            tree.set_property(nodes[node], name, values).expect("fixture value");
        };
        set(&mut tree, "/a/b", "title", vec!["Introduction".into()]);
        set(&mut tree, "/a/b/c", "title", vec!["Hello Rust world".into()]);
        set(&mut tree, "/a/b/c", "body", vec!["rust rust and more rust".into()]);
        set(&mut tree, "/a/b/c/d", "size", vec![Value::Long(5), Value::Long(20)]);
        set(&mut tree, "/a/b/c/d", "jcr:mimeType", vec!["text/plain".into()]);
        set(&mut tree, "/a/x", "size", vec![Value::Long(5), Value::Long(8)]);
        set(&mut tree, "/docs", "size", vec![Value::Long(12)]);
        set(&mut tree, "/docs", "score", vec![Value::Double(2.5)]);

        Self {
            tree: Arc::new(tree),
            resolver,
            factory,
            nodes,
        }
    }

    pub fn node(&self, path: &str) -> NodeId {
        self.nodes[path]
    }

    pub fn path(&self, text: &str) -> Path {
        self.resolver.qualified_path(text).expect("valid path")
    }

    pub fn name(&self, text: &str) -> Name {
        self.resolver.qualified_name(text).expect("valid name")
    }

    /// A tuple binding `selector` to the node at `path`.
    pub fn tuple(&self, selector: &str, path: &str) -> NodeTuple<NodeId> {
        NodeTuple::new().with(selector, self.node(path))
    }

    /// One single-selector tuple per fixture node.
    pub fn all_tuples(&self, selector: &str) -> Vec<NodeTuple<NodeId>> {
        PATHS.iter().map(|path| self.tuple(selector, path)).collect()
    }

    pub fn evaluate(
        &self,
        constraint: &Constraint,
        tuple: &NodeTuple<NodeId>,
    ) -> Result<Satisfaction, EvalError> {
        self.evaluate_with(constraint, tuple, &Bindings::new(), &EvaluationConfig::default())
    }

    pub fn evaluate_with(
        &self,
        constraint: &Constraint,
        tuple: &NodeTuple<NodeId>,
        bindings: &Bindings,
        config: &EvaluationConfig,
    ) -> Result<Satisfaction, EvalError> {
        self.with_evaluator(bindings, config, |evaluator| evaluator.evaluate(constraint, tuple))
    }

    /// Runs `f` with an evaluator over the fixture tree and a term-matching
    /// full-text searcher.
    pub fn with_evaluator<R>(
        &self,
        bindings: &Bindings,
        config: &EvaluationConfig,
        f: impl FnOnce(&Evaluator<'_, InMemoryTree>) -> R,
    ) -> R {
        let searcher = TermMatchSearcher;
        let context = EvaluationContext::new(
            &*self.tree,
            &*self.resolver,
            &searcher,
            bindings,
            config,
        );
        f(&Evaluator::new(context))
    }

    pub fn satisfied(&self, constraint: &Constraint, path: &str) -> bool {
        self.evaluate(constraint, &self.tuple("s", path))
            .expect("evaluation succeeds")
            .is_satisfied()
    }
}
