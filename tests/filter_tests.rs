mod common;

use common::{Fixture, PATHS, TestResult};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use sylvan::qom::{EvalError, TermMatchSearcher};
use sylvan::traits::{FullTextError, FullTextSearcher, NodeId};
use sylvan::types::{Name, SelectorName, Value};
use sylvan::{
    Bindings, ConstraintFilter, EvaluationConfig, ExecutorKind, FilterConfig, FilterError,
    InMemoryTree, NodeTuple, Satisfaction, TreeNavigator,
};

fn sizes(fx: &Fixture, tuples: &[NodeTuple<NodeId>]) -> Vec<Option<i64>> {
    let size = fx.name("size");
    tuples
        .iter()
        .map(|tuple| {
            let node = tuple.get(&SelectorName::new("s"))?;
            match fx.tree.property_values(node, &size).ok()?.first() {
                Some(Value::Long(n)) => Some(*n),
                _ => None,
            }
        })
        .collect()
}

fn filter_for(fx: &Fixture, executor: ExecutorKind) -> Result<ConstraintFilter<InMemoryTree>, FilterError> {
    let f = &fx.factory;
    let constraint = f.and(
        f.descendant_node("s", "/a")?,
        f.property_existence("s", "size")?,
    );
    ConstraintFilter::builder()
        .with_navigator(fx.tree.clone())
        .with_resolver(fx.resolver.clone())
        .with_constraint(constraint)
        .with_config(FilterConfig::new().with_executor(executor).with_worker_threads(3))
        .build()
}

#[test]
fn test_verdicts_follow_tuple_order() -> TestResult {
    let fx = Fixture::new();
    let expected: Vec<Satisfaction> = PATHS
        .iter()
        .map(|p| Satisfaction::from(matches!(*p, "/a/b/c/d" | "/a/x")))
        .collect();
    for kind in [ExecutorKind::Sync, ExecutorKind::default()] {
        let filter = filter_for(&fx, kind)?;
        assert_eq!(filter.evaluate_all(fx.all_tuples("s"))?, expected);
    }
    Ok(())
}

#[cfg(feature = "rayon-executor")]
#[test]
fn test_parallel_matches_sequential_on_a_large_batch() -> TestResult {
    let fx = Fixture::new();
    let tuples: Vec<_> = (0..500).flat_map(|_| fx.all_tuples("s")).collect();
    let sequential = filter_for(&fx, ExecutorKind::Sync)?.evaluate_all(tuples.clone())?;
    let parallel = filter_for(&fx, ExecutorKind::Rayon)?.evaluate_all(tuples)?;
    assert_eq!(sequential.len(), 3000);
    assert_eq!(sequential, parallel);
    Ok(())
}

#[test]
fn test_select_and_order() -> TestResult {
    let fx = Fixture::new();
    let f = &fx.factory;
    let filter = ConstraintFilter::builder()
        .with_navigator(fx.tree.clone())
        .with_resolver(fx.resolver.clone())
        .with_constraint(f.property_existence("s", "size")?)
        .build()?;

    let selected = filter.select(fx.all_tuples("s"))?;
    assert_eq!(sizes(&fx, &selected), vec![Some(5), Some(5), Some(12)]);

    let by_size_desc = vec![f.descending(f.property_value("s", "size")?)];
    let ordered = filter.select_ordered(fx.all_tuples("s"), &by_size_desc)?;
    assert_eq!(sizes(&fx, &ordered), vec![Some(12), Some(5), Some(5)]);
    assert_eq!(ordered[1], fx.tuple("s", "/a/b/c/d"));
    assert_eq!(ordered[2], fx.tuple("s", "/a/x"));
    Ok(())
}

#[test]
fn test_first_error_in_tuple_order_is_reported() -> TestResult {
    let fx = Fixture::new();
    let f = &fx.factory;
    let constraint = f.or(
        f.property_existence("s", "size")?,
        f.property_existence("t", "size")?,
    );
    let filter = ConstraintFilter::builder()
        .with_navigator(fx.tree.clone())
        .with_constraint(constraint)
        .with_config(FilterConfig::new().with_evaluation(EvaluationConfig::strict()))
        .build()?;

    // Nodes with a size never look at `t`.
    let bound = vec![fx.tuple("s", "/a/x"), fx.tuple("s", "/docs")];
    assert!(filter.evaluate_all(bound)?.iter().all(|v| v.is_satisfied()));

    let result = filter.evaluate_all(fx.all_tuples("s"));
    assert!(matches!(
        result,
        Err(FilterError::Evaluation(EvalError::SelectorNotBound(ref s))) if s.as_str() == "t"
    ));
    Ok(())
}

#[test]
fn test_bindings_and_full_text() -> TestResult {
    let fx = Fixture::new();
    let f = &fx.factory;
    let constraint = f.and(
        f.full_text_search("s", None, f.bind_variable("terms")?)?,
        f.not(f.same_node("s", "/a/b")?),
    );
    let filter = ConstraintFilter::builder()
        .with_navigator(fx.tree.clone())
        .with_full_text(Arc::new(TermMatchSearcher))
        .with_bindings(Bindings::new().with("terms", "hello OR introduction"))
        .with_constraint(constraint)
        .build()?;
    let selected = filter.select(fx.all_tuples("s"))?;
    assert_eq!(selected, vec![fx.tuple("s", "/a/b/c")]);
    Ok(())
}

#[test]
fn test_missing_full_text_searcher_fails() -> TestResult {
    let fx = Fixture::new();
    let f = &fx.factory;
    let filter = ConstraintFilter::builder()
        .with_navigator(fx.tree.clone())
        .with_constraint(f.full_text_search("s", None, f.literal("rust"))?)
        .build()?;
    let result = filter.evaluate(&fx.tuple("s", "/a/b/c"));
    assert!(matches!(
        result,
        Err(FilterError::Evaluation(EvalError::FullText(FullTextError::Unavailable(_))))
    ));
    Ok(())
}

/// Cancels the batch after a fixed number of searches.
struct CancellingSearcher {
    searches: AtomicUsize,
    after: usize,
    handle: std::sync::OnceLock<sylvan::CancelHandle>,
}

impl FullTextSearcher<InMemoryTree> for CancellingSearcher {
    fn search(
        &self,
        _navigator: &InMemoryTree,
        _selector: &SelectorName,
        _node: &NodeId,
        _property: Option<&Name>,
        _expression: &str,
    ) -> Result<bool, FullTextError> {
        if self.searches.fetch_add(1, AtomicOrdering::SeqCst) + 1 == self.after {
            if let Some(handle) = self.handle.get() {
                handle.cancel();
            }
        }
        Ok(true)
    }

    fn score(
        &self,
        _navigator: &InMemoryTree,
        _selector: &SelectorName,
        _node: &NodeId,
        _property: Option<&Name>,
        _expression: &str,
    ) -> Result<f64, FullTextError> {
        Ok(1.0)
    }

    fn name(&self) -> &'static str {
        "CancellingSearcher"
    }
}

#[test]
fn test_cancellation_stops_the_batch() -> TestResult {
    let fx = Fixture::new();
    let f = &fx.factory;
    let searcher = Arc::new(CancellingSearcher {
        searches: AtomicUsize::new(0),
        after: 2,
        handle: std::sync::OnceLock::new(),
    });
    let filter = ConstraintFilter::builder()
        .with_navigator(fx.tree.clone())
        .with_full_text(searcher.clone())
        .with_constraint(f.full_text_search("s", None, f.literal("anything"))?)
        .with_config(FilterConfig::new().with_executor(ExecutorKind::Sync))
        .build()?;
    let _ = searcher.handle.set(filter.cancel_handle());

    let result = filter.evaluate_all(fx.all_tuples("s"));
    assert!(matches!(result, Err(FilterError::Cancelled)));
    assert_eq!(searcher.searches.load(AtomicOrdering::SeqCst), 2);

    filter.cancel_handle().reset();
    assert_eq!(filter.evaluate_all(fx.all_tuples("s"))?.len(), PATHS.len());
    Ok(())
}

#[test]
fn test_builder_loads_json_config() -> TestResult {
    let fx = Fixture::new();
    let f = &fx.factory;
    let filter = ConstraintFilter::builder()
        .with_navigator(fx.tree.clone())
        .with_constraint(f.property_existence("t", "size")?)
        .with_config_json(
            r#"{
                "executor": "sync",
                "evaluation": { "required_selectors": ["t"] }
            }"#,
        )?
        .build()?;
    assert_eq!(filter.executor_name(), "SyncExecutor");
    assert_eq!(filter.config().executor, ExecutorKind::Sync);
    assert!(matches!(
        filter.evaluate(&fx.tuple("s", "/docs")),
        Err(FilterError::Evaluation(EvalError::SelectorNotBound(_)))
    ));

    let broken = ConstraintFilter::<InMemoryTree>::builder().with_config_json("{ executor: }");
    assert!(matches!(broken, Err(FilterError::Json(_))));
    Ok(())
}
