//! Rayon-based parallel executor.
//!
//! Uses rayon's work-stealing thread pool. Constraint evaluation is CPU-bound
//! and independent per tuple, which is the workload rayon is built for.

use rayon::prelude::*;
use std::sync::Arc;
use sylvan_traits::{Executor, ExecutorError};

/// A parallel executor using rayon's work-stealing thread pool.
///
/// [`RayonExecutor::new`] shares rayon's global pool, sized to the number of
/// CPU cores. [`RayonExecutor::with_threads`] builds a dedicated pool, which
/// keeps batch evaluation from competing with other users of the global pool.
///
/// # Example
///
/// ```ignore
/// use sylvan_executor::RayonExecutor;
/// use sylvan_traits::Executor;
///
/// let executor = RayonExecutor::with_threads(2)?;
/// let results = executor.execute_all(vec![1, 2, 3], |x| x * 2);
/// assert_eq!(results, vec![2, 4, 6]);
/// ```
#[derive(Debug, Clone)]
pub struct RayonExecutor {
    /// Dedicated pool; `None` runs on the global pool.
    pool: Option<Arc<rayon::ThreadPool>>,
    num_threads: usize,
}

impl RayonExecutor {
    /// Creates an executor on rayon's global thread pool.
    pub fn new() -> Self {
        Self {
            pool: None,
            num_threads: rayon::current_num_threads(),
        }
    }

    /// Creates an executor with its own pool of `threads` workers.
    ///
    /// # Errors
    ///
    /// `ExecutorError::InvalidWorkerCount` for zero threads and
    /// `ExecutorError::PoolBuild` if rayon cannot start the pool.
    pub fn with_threads(threads: usize) -> Result<Self, ExecutorError> {
        if threads == 0 {
            return Err(ExecutorError::InvalidWorkerCount(threads));
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("sylvan-eval-{}", i))
            .build()
            .map_err(|e| ExecutorError::PoolBuild(e.to_string()))?;
        Ok(Self {
            pool: Some(Arc::new(pool)),
            num_threads: threads,
        })
    }

    fn run<T, R, F>(&self, items: Vec<T>, f: F) -> Vec<R>
    where
        T: Send,
        R: Send,
        F: Fn(T) -> R + Send + Sync,
    {
        match &self.pool {
            Some(pool) => pool.install(|| items.into_par_iter().map(f).collect()),
            None => items.into_par_iter().map(f).collect(),
        }
    }
}

impl Default for RayonExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl Executor for RayonExecutor {
    fn execute_all<T, R, F>(&self, items: Vec<T>, f: F) -> Vec<R>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> R + Send + Sync + Clone + 'static,
    {
        self.run(items, f)
    }

    fn parallelism(&self) -> usize {
        self.num_threads
    }

    fn name(&self) -> &'static str {
        "RayonExecutor"
    }
}
