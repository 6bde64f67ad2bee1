//! Worker pools for batch constraint evaluation.
//!
//! An [`EvaluationPool`] evaluates the candidate tuples of a batch either on
//! the calling thread or on a rayon pool (feature: `rayon`), and always hands
//! the results back in the order the tuples went in.
//!
//! ## Usage
//!
//! ```ignore
//! use sylvan_executor::EvaluationPool;
//!
//! let pool = EvaluationPool::parallel(Some(4))?;
//! let verdicts = pool.evaluate_in_order(tuples, move |tuple| evaluate(&tuple));
//! ```

#[cfg(feature = "rayon")]
mod rayon_executor;

#[cfg(feature = "rayon")]
pub use rayon_executor::RayonExecutor;

pub use sylvan_traits::{Executor, ExecutorError, SyncExecutor};

/// Where the tuples of a batch are evaluated.
#[derive(Clone, Debug)]
pub enum EvaluationPool {
    /// One tuple after another on the calling thread.
    Sequential(SyncExecutor),

    /// Tuples spread over a rayon pool.
    #[cfg(feature = "rayon")]
    Parallel(RayonExecutor),
}

impl EvaluationPool {
    pub fn sequential() -> Self {
        EvaluationPool::Sequential(SyncExecutor::new())
    }

    /// A rayon pool with `workers` dedicated threads, or the global pool
    /// when `workers` is `None`.
    #[cfg(feature = "rayon")]
    pub fn parallel(workers: Option<usize>) -> Result<Self, ExecutorError> {
        let executor = match workers {
            Some(threads) => RayonExecutor::with_threads(threads)?,
            None => RayonExecutor::new(),
        };
        Ok(EvaluationPool::Parallel(executor))
    }

    /// Applies `evaluate` to every item and returns the results in item
    /// order, whatever order the workers finished in.
    pub fn evaluate_in_order<T, R, F>(&self, items: Vec<T>, evaluate: F) -> Vec<R>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> R + Send + Sync + Clone + 'static,
    {
        let indexed: Vec<(usize, T)> = items.into_iter().enumerate().collect();
        let tagged = move |(index, item): (usize, T)| (index, evaluate(item));
        let mut results = match self {
            EvaluationPool::Sequential(exec) => exec.execute_all(indexed, tagged),
            #[cfg(feature = "rayon")]
            EvaluationPool::Parallel(exec) => exec.execute_all(indexed, tagged),
        };
        results.sort_by_key(|(index, _)| *index);
        results.into_iter().map(|(_, result)| result).collect()
    }

    /// Number of tuples that may be evaluated at the same time.
    pub fn workers(&self) -> usize {
        match self {
            EvaluationPool::Sequential(exec) => exec.parallelism(),
            #[cfg(feature = "rayon")]
            EvaluationPool::Parallel(exec) => exec.parallelism(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EvaluationPool::Sequential(exec) => exec.name(),
            #[cfg(feature = "rayon")]
            EvaluationPool::Parallel(exec) => exec.name(),
        }
    }
}
