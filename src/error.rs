// src/error.rs
use sylvan_executor::ExecutorError;
use sylvan_qom::{EvalError, QomError};
use thiserror::Error;

/// Errors raised while configuring or running a [`ConstraintFilter`](crate::ConstraintFilter).
#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Evaluation failed: {0}")]
    Evaluation(#[from] EvalError),

    #[error("Invalid query: {0}")]
    Query(#[from] QomError),

    #[error("Batch evaluation was cancelled")]
    Cancelled,

    #[error("Filter configuration is invalid: {0}")]
    Configuration(String),

    #[error("Executor error: {0}")]
    Executor(#[from] ExecutorError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}
