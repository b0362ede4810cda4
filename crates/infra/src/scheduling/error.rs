//! Scheduler error types

use thanksync_domain::ThanksyncError;
use thiserror::Error;

use crate::errors::InfraError;

/// Scheduler-specific errors
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Scheduler is already running
    #[error("Scheduler already running")]
    AlreadyRunning,

    /// Scheduler is not running
    #[error("Scheduler not running")]
    NotRunning,

    /// A pass failed fatally and ended the loop
    #[error("Sync pass failed: {0}")]
    PassFailed(#[source] ThanksyncError),

    /// Operation timed out
    #[error("Operation timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// Task join failed
    #[error("Task join failed: {0}")]
    TaskJoinFailed(String),
}

impl From<SchedulerError> for InfraError {
    fn from(err: SchedulerError) -> Self {
        let inner = match err {
            SchedulerError::PassFailed(inner) => inner,
            SchedulerError::AlreadyRunning | SchedulerError::NotRunning => {
                ThanksyncError::InvalidInput(err.to_string())
            }
            _ => ThanksyncError::Internal(err.to_string()),
        };
        InfraError(inner)
    }
}

impl From<SchedulerError> for ThanksyncError {
    fn from(err: SchedulerError) -> Self {
        InfraError::from(err).into()
    }
}

/// Convenience type alias for scheduler operations
pub type SchedulerResult<T> = Result<T, SchedulerError>;
