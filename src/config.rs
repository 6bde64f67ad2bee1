use crate::error::FilterError;
use serde::{Deserialize, Serialize};
use sylvan_executor::EvaluationPool;
use sylvan_qom::EvaluationConfig;

/// Selects how a batch of tuples is spread over workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutorKind {
    /// Evaluate every tuple on the calling thread.
    Sync,
    /// Evaluate tuples on a rayon work-stealing pool. (Default when the
    /// `rayon-executor` feature is enabled)
    Rayon,
}

impl Default for ExecutorKind {
    fn default() -> Self {
        if cfg!(feature = "rayon-executor") {
            ExecutorKind::Rayon
        } else {
            ExecutorKind::Sync
        }
    }
}

/// Settings of a [`ConstraintFilter`](crate::ConstraintFilter).
///
/// Loads from JSON; every field is optional:
///
/// ```json
/// {
///   "executor": "rayon",
///   "worker_threads": 4,
///   "evaluation": { "strict_selectors": false, "required_selectors": ["s"] }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub executor: ExecutorKind,
    /// Size of a dedicated worker pool. `None` shares the global pool.
    pub worker_threads: Option<usize>,
    pub evaluation: EvaluationConfig,
}

impl FilterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, FilterError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_executor(mut self, executor: ExecutorKind) -> Self {
        self.executor = executor;
        self
    }

    pub fn with_worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = Some(threads);
        self
    }

    pub fn with_evaluation(mut self, evaluation: EvaluationConfig) -> Self {
        self.evaluation = evaluation;
        self
    }

    /// Instantiates the configured evaluation pool.
    pub fn build_pool(&self) -> Result<EvaluationPool, FilterError> {
        match self.executor {
            ExecutorKind::Sync => Ok(EvaluationPool::sequential()),
            #[cfg(feature = "rayon-executor")]
            ExecutorKind::Rayon => Ok(EvaluationPool::parallel(self.worker_threads)?),
            #[cfg(not(feature = "rayon-executor"))]
            ExecutorKind::Rayon => Err(FilterError::Configuration(
                "the rayon executor requires the `rayon-executor` feature".to_string(),
            )),
        }
    }
}
