//! Executor trait for fanning independent work items out over workers.
//!
//! Batch constraint evaluation hands one closure call per candidate tuple to
//! an executor. The engine has no opinion on threading; the executor decides.

use thiserror::Error;

/// Error type for executor construction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExecutorError {
    #[error("Failed to build worker pool: {0}")]
    PoolBuild(String),

    #[error("Invalid worker count: {0}")]
    InvalidWorkerCount(usize),
}

/// Runs a function over a batch of items.
///
/// Implementations may reorder the execution of items; callers that need
/// item order must carry an index through `f`.
pub trait Executor: Send + Sync {
    fn execute_all<T, R, F>(&self, items: Vec<T>, f: F) -> Vec<R>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> R + Send + Sync + Clone + 'static;

    /// Number of items that may run at the same time.
    fn parallelism(&self) -> usize;

    /// Returns a human-readable name for this executor (for logging/debugging).
    fn name(&self) -> &'static str;
}

/// Runs every item on the calling thread, in order.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncExecutor;

impl SyncExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl Executor for SyncExecutor {
    fn execute_all<T, R, F>(&self, items: Vec<T>, f: F) -> Vec<R>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> R + Send + Sync + Clone + 'static,
    {
        items.into_iter().map(f).collect()
    }

    fn parallelism(&self) -> usize {
        1
    }

    fn name(&self) -> &'static str {
        "SyncExecutor"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_executor_preserves_order() {
        let executor = SyncExecutor::new();
        let results = executor.execute_all(vec![3, 1, 2], |x| x * 10);
        assert_eq!(results, vec![30, 10, 20]);
    }

    #[test]
    fn test_sync_executor_runs_fallible_work() {
        let executor = SyncExecutor::new();
        let results: Vec<Result<i32, String>> = executor.execute_all(vec![1, 0], |x| {
            if x == 0 { Err("zero".to_string()) } else { Ok(x) }
        });
        assert_eq!(results, vec![Ok(1), Err("zero".to_string())]);
        assert_eq!(executor.parallelism(), 1);
        assert_eq!(executor.name(), "SyncExecutor");
    }
}
