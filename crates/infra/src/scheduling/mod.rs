//! Scheduling infrastructure for the sync loop
//!
//! The scheduler follows the runtime rules used across the infrastructure
//! crate:
//! - Explicit lifecycle management (start/stop)
//! - Join handles for spawned tasks
//! - Cancellation token support
//! - Structured tracing for every tick

pub mod error;
pub mod sync_scheduler;

pub use error::{SchedulerError, SchedulerResult};
pub use sync_scheduler::{next_sleep, SyncScheduler, SyncSchedulerConfig};
