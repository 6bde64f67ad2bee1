//! Batch constraint evaluation over candidate node-tuples.
//!
//! A [`ConstraintFilter`] owns one constraint and the collaborators it is
//! evaluated against, and fans the candidate tuples of a query out over an
//! [`EvaluationPool`]. Results always come back in the order the tuples went in.

use crate::config::FilterConfig;
use crate::error::FilterError;
use log::{debug, trace, warn};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use sylvan_executor::EvaluationPool;
use sylvan_qom::ast::Ordering;
use sylvan_qom::{
    Bindings, Constraint, EvalError, EvaluationContext, Evaluator, FullTextPredicate, NodeTuple,
    Satisfaction, collect_full_text_predicates, sort_tuples,
};
use sylvan_traits::{
    FullTextSearcher, NamePathResolver, NamespaceResolver, NoFullTextSearch, TreeNavigator,
};

/// A shared flag that stops a running batch at the next tuple.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, AtomicOrdering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(AtomicOrdering::SeqCst)
    }

    /// Clears the flag so the filter accepts new batches.
    pub fn reset(&self) {
        self.flag.store(false, AtomicOrdering::SeqCst);
    }
}

/// Everything one evaluation needs, shared by all workers of a batch.
struct Shared<T: TreeNavigator + ?Sized> {
    constraint: Arc<Constraint>,
    predicates: Arc<[FullTextPredicate]>,
    navigator: Arc<T>,
    resolver: Arc<dyn NamePathResolver>,
    full_text: Arc<dyn FullTextSearcher<T>>,
    bindings: Arc<Bindings>,
    config: Arc<FilterConfig>,
}

impl<T: TreeNavigator + ?Sized> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Self {
            constraint: Arc::clone(&self.constraint),
            predicates: Arc::clone(&self.predicates),
            navigator: Arc::clone(&self.navigator),
            resolver: Arc::clone(&self.resolver),
            full_text: Arc::clone(&self.full_text),
            bindings: Arc::clone(&self.bindings),
            config: Arc::clone(&self.config),
        }
    }
}

impl<T: TreeNavigator + ?Sized> Shared<T> {
    fn evaluator(&self) -> Evaluator<'_, T> {
        let context = EvaluationContext::new(
            &*self.navigator,
            &*self.resolver,
            &*self.full_text,
            &self.bindings,
            &self.config.evaluation,
        );
        Evaluator::new(context).with_full_text_predicates(&self.predicates)
    }

    fn evaluate(&self, tuple: &NodeTuple<T::Node>) -> Result<Satisfaction, EvalError> {
        let verdict = self.evaluator().evaluate(&self.constraint, tuple)?;
        trace!("Tuple {:?} -> {:?}", tuple, verdict);
        Ok(verdict)
    }
}

/// Evaluates one constraint over batches of node-tuples.
pub struct ConstraintFilter<T: TreeNavigator + ?Sized> {
    shared: Shared<T>,
    pool: EvaluationPool,
    cancel: CancelHandle,
}

impl<T> ConstraintFilter<T>
where
    T: TreeNavigator + 'static,
    T::Node: 'static,
{
    pub fn builder() -> ConstraintFilterBuilder<T> {
        ConstraintFilterBuilder::new()
    }

    pub fn constraint(&self) -> &Constraint {
        &self.shared.constraint
    }

    pub fn config(&self) -> &FilterConfig {
        &self.shared.config
    }

    pub fn executor_name(&self) -> &'static str {
        self.pool.name()
    }

    /// A handle that cancels batches of this filter from another thread.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Evaluates the constraint for a single tuple on the calling thread.
    pub fn evaluate(&self, tuple: &NodeTuple<T::Node>) -> Result<Satisfaction, FilterError> {
        Ok(self.shared.evaluate(tuple)?)
    }

    /// Evaluates every tuple and returns the verdicts in tuple order.
    ///
    /// The first failure in tuple order is returned. A cancelled batch fails
    /// with [`FilterError::Cancelled`] unless an earlier tuple already failed.
    pub fn evaluate_all(
        &self,
        tuples: Vec<NodeTuple<T::Node>>,
    ) -> Result<Vec<Satisfaction>, FilterError> {
        Ok(self
            .run(tuples)?
            .into_iter()
            .map(|(_, verdict)| verdict)
            .collect())
    }

    /// The tuples that satisfy the constraint, in their original order.
    pub fn select(
        &self,
        tuples: Vec<NodeTuple<T::Node>>,
    ) -> Result<Vec<NodeTuple<T::Node>>, FilterError> {
        Ok(self
            .run(tuples)?
            .into_iter()
            .filter(|(_, verdict)| verdict.is_satisfied())
            .map(|(tuple, _)| tuple)
            .collect())
    }

    /// The satisfying tuples sorted by `orderings`.
    pub fn select_ordered(
        &self,
        tuples: Vec<NodeTuple<T::Node>>,
        orderings: &[Ordering],
    ) -> Result<Vec<NodeTuple<T::Node>>, FilterError> {
        let selected = self.select(tuples)?;
        Ok(sort_tuples(&self.shared.evaluator(), orderings, selected)?)
    }

    fn run(
        &self,
        tuples: Vec<NodeTuple<T::Node>>,
    ) -> Result<Vec<(NodeTuple<T::Node>, Satisfaction)>, FilterError> {
        debug!(
            "Evaluating constraint over {} tuples with {} (parallelism {})",
            tuples.len(),
            self.pool.name(),
            self.pool.workers()
        );
        let shared = self.shared.clone();
        let cancel = self.cancel.clone();
        let results = self.pool.evaluate_in_order(tuples, move |tuple| {
            let verdict = if cancel.is_cancelled() {
                Err(FilterError::Cancelled)
            } else {
                shared.evaluate(&tuple).map_err(FilterError::from)
            };
            verdict.map(|v| (tuple, v))
        });
        let ordered: Result<Vec<_>, FilterError> = results.into_iter().collect();
        match &ordered {
            Ok(verdicts) => debug!(
                "{} of {} tuples satisfied the constraint",
                verdicts.iter().filter(|(_, v)| v.is_satisfied()).count(),
                verdicts.len()
            ),
            Err(FilterError::Cancelled) => warn!("Constraint evaluation cancelled"),
            Err(e) => debug!("Constraint evaluation failed: {}", e),
        }
        ordered
    }
}

/// A builder for creating a [`ConstraintFilter`].
///
/// A constraint and a navigator are required. The resolver defaults to a
/// [`NamespaceResolver`] with the built-in prefixes and full-text search
/// defaults to [`NoFullTextSearch`].
pub struct ConstraintFilterBuilder<T: TreeNavigator + ?Sized> {
    constraint: Option<Constraint>,
    navigator: Option<Arc<T>>,
    resolver: Option<Arc<dyn NamePathResolver>>,
    full_text: Option<Arc<dyn FullTextSearcher<T>>>,
    bindings: Bindings,
    config: FilterConfig,
}

impl<T: TreeNavigator + ?Sized> Default for ConstraintFilterBuilder<T> {
    fn default() -> Self {
        Self {
            constraint: None,
            navigator: None,
            resolver: None,
            full_text: None,
            bindings: Bindings::new(),
            config: FilterConfig::default(),
        }
    }
}

impl<T> ConstraintFilterBuilder<T>
where
    T: TreeNavigator + 'static,
    T::Node: 'static,
{
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraint = Some(constraint);
        self
    }

    pub fn with_navigator(mut self, navigator: Arc<T>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    pub fn with_resolver(mut self, resolver: Arc<dyn NamePathResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn with_full_text(mut self, full_text: Arc<dyn FullTextSearcher<T>>) -> Self {
        self.full_text = Some(full_text);
        self
    }

    pub fn with_bindings(mut self, bindings: Bindings) -> Self {
        self.bindings = bindings;
        self
    }

    pub fn with_config(mut self, config: FilterConfig) -> Self {
        self.config = config;
        self
    }

    /// Loads the configuration from a JSON document.
    pub fn with_config_json(mut self, json: &str) -> Result<Self, FilterError> {
        self.config = FilterConfig::from_json(json)?;
        Ok(self)
    }

    /// Consumes the builder and creates the [`ConstraintFilter`].
    pub fn build(self) -> Result<ConstraintFilter<T>, FilterError> {
        let constraint = self.constraint.ok_or_else(|| {
            FilterError::Configuration(
                "No constraint has been configured. Use `with_constraint`.".to_string(),
            )
        })?;
        let navigator = self.navigator.ok_or_else(|| {
            FilterError::Configuration(
                "No navigator has been configured. Use `with_navigator`.".to_string(),
            )
        })?;
        let pool = self.config.build_pool()?;
        let predicates: Arc<[FullTextPredicate]> = collect_full_text_predicates(&constraint).into();
        debug!(
            "Built constraint filter ({} full-text predicates, executor {})",
            predicates.len(),
            pool.name()
        );

        let resolver = self
            .resolver
            .unwrap_or_else(|| Arc::new(NamespaceResolver::new()));
        let full_text = self
            .full_text
            .unwrap_or_else(|| Arc::new(NoFullTextSearch));

        Ok(ConstraintFilter {
            shared: Shared {
                constraint: Arc::new(constraint),
                predicates,
                navigator,
                resolver,
                full_text,
                bindings: Arc::new(self.bindings),
                config: Arc::new(self.config),
            },
            pool,
            cancel: CancelHandle::new(),
        })
    }
}
