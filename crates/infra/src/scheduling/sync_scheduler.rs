//! Fixed-interval scheduler for sync passes.
//!
//! Runs a pass immediately on start, then one pass per interval. The sleep
//! after a pass is the interval minus the time the pass took, floored at
//! zero, so slow passes delay the next one instead of queueing extra ticks.
//! Exactly one pass is in flight at any time.
//!
//! Cancellation is cooperative: a stop request is honoured between passes,
//! never in the middle of one. A fatal pass error ends the loop and is
//! reported by [`SyncScheduler::wait`] or [`SyncScheduler::stop`].
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use thanksync_infra::scheduling::{SyncScheduler, SyncSchedulerConfig};
//!
//! # async fn example(service: Arc<thanksync_core::SyncService>) -> Result<(), String> {
//! let mut scheduler = SyncScheduler::new(
//!     service,
//!     SyncSchedulerConfig { interval: Duration::from_secs(10), ..Default::default() },
//! );
//!
//! scheduler.start().await.map_err(|e| e.to_string())?;
//! // ... application runs ...
//! scheduler.stop().await.map_err(|e| e.to_string())?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use thanksync_core::SyncService;
use thanksync_domain::SyncConfig;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use crate::scheduling::error::{SchedulerError, SchedulerResult};

/// Type alias for task handle to avoid complexity warnings
type TaskHandle = Arc<Mutex<Option<JoinHandle<SchedulerResult<()>>>>>;

/// Configuration for sync scheduler
#[derive(Debug, Clone)]
pub struct SyncSchedulerConfig {
    /// Time between the starts of consecutive passes
    pub interval: Duration,
    /// How long `stop` waits for an in-flight pass to finish
    pub shutdown_timeout: Duration,
}

impl Default for SyncSchedulerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            shutdown_timeout: Duration::from_secs(30),
        }
    }
}

impl From<&SyncConfig> for SyncSchedulerConfig {
    fn from(config: &SyncConfig) -> Self {
        Self { interval: Duration::from_secs(config.interval_seconds), ..Self::default() }
    }
}

/// Sleep owed after a pass that took `elapsed`.
pub fn next_sleep(interval: Duration, elapsed: Duration) -> Duration {
    interval.saturating_sub(elapsed)
}

/// Periodic driver for [`SyncService::run_pass`]
pub struct SyncScheduler {
    service: Arc<SyncService>,
    config: SyncSchedulerConfig,
    cancellation_token: CancellationToken,
    task_handle: TaskHandle,
}

impl SyncScheduler {
    pub fn new(service: Arc<SyncService>, config: SyncSchedulerConfig) -> Self {
        Self {
            service,
            config,
            cancellation_token: CancellationToken::new(),
            task_handle: Arc::new(Mutex::new(None)),
        }
    }

    /// Start the scheduler
    ///
    /// Spawns a background task that runs the first pass right away.
    ///
    /// # Errors
    ///
    /// Returns error if scheduler is already running
    #[instrument(skip(self), fields(interval_secs = self.config.interval.as_secs()))]
    pub async fn start(&mut self) -> SchedulerResult<()> {
        if self.is_running() {
            return Err(SchedulerError::AlreadyRunning);
        }

        info!("Starting sync scheduler");

        // Fresh token so the scheduler can be restarted after a stop
        self.cancellation_token = CancellationToken::new();

        let service = Arc::clone(&self.service);
        let interval = self.config.interval;
        let cancel = self.cancellation_token.clone();

        let handle = tokio::spawn(Self::sync_loop(service, interval, cancel));
        *self.task_handle.lock().await = Some(handle);

        Ok(())
    }

    /// Stop the scheduler gracefully
    ///
    /// Requests cancellation and waits for the in-flight pass, if any, to
    /// finish. Returns the loop's own result, so a pass that failed before the
    /// stop request surfaces here.
    ///
    /// # Errors
    ///
    /// Returns error if the scheduler was never started, if the loop ended on
    /// a fatal pass error, or if the pass outlives the shutdown timeout.
    #[instrument(skip(self))]
    pub async fn stop(&mut self) -> SchedulerResult<()> {
        let Some(handle) = self.task_handle.lock().await.take() else {
            return Err(SchedulerError::NotRunning);
        };

        info!("Stopping sync scheduler");
        self.cancellation_token.cancel();

        let timeout = self.config.shutdown_timeout;
        let joined = tokio::time::timeout(timeout, handle)
            .await
            .map_err(|_| SchedulerError::Timeout { seconds: timeout.as_secs() })?;
        let result = flatten(joined);

        info!("Sync scheduler stopped");
        result
    }

    /// Wait for the loop to end on its own, which only happens on a fatal
    /// pass error or after [`shutdown_token`](Self::shutdown_token) fires.
    ///
    /// # Errors
    ///
    /// Returns error if the scheduler is not running or the loop failed.
    pub async fn wait(&self) -> SchedulerResult<()> {
        let Some(handle) = self.task_handle.lock().await.take() else {
            return Err(SchedulerError::NotRunning);
        };
        flatten(handle.await)
    }

    /// Token that stops the loop between passes when cancelled.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.cancellation_token.clone()
    }

    /// Check if scheduler is running
    ///
    /// A scheduler is considered running if it has an active task handle that
    /// hasn't finished.
    pub fn is_running(&self) -> bool {
        self.task_handle
            .try_lock()
            .ok()
            .and_then(|guard| guard.as_ref().map(|h| !h.is_finished()))
            .unwrap_or(false)
    }

    async fn sync_loop(
        service: Arc<SyncService>,
        interval: Duration,
        cancel: CancellationToken,
    ) -> SchedulerResult<()> {
        loop {
            let started = Instant::now();

            match service.run_pass().await {
                Ok(report) => debug!(
                    pass_id = %report.pass_id,
                    elapsed_ms = started.elapsed().as_millis(),
                    "scheduler tick complete"
                ),
                Err(err) => {
                    error!(error = %err, "sync pass failed; stopping scheduler");
                    return Err(SchedulerError::PassFailed(err));
                }
            }

            let pause = next_sleep(interval, started.elapsed());
            if pause.is_zero() {
                warn!(interval_ms = interval.as_millis(), "sync pass overran its interval");
            }

            tokio::select! {
                () = cancel.cancelled() => {
                    debug!("Sync loop cancelled");
                    return Ok(());
                }
                () = tokio::time::sleep(pause) => {}
            }
        }
    }
}

fn flatten(
    joined: Result<SchedulerResult<()>, tokio::task::JoinError>,
) -> SchedulerResult<()> {
    joined.map_err(|err| SchedulerError::TaskJoinFailed(err.to_string()))?
}

/// Ensure scheduler is stopped when dropped
impl Drop for SyncScheduler {
    fn drop(&mut self) {
        if !self.cancellation_token.is_cancelled() && self.is_running() {
            warn!("SyncScheduler dropped while running; cancelling");
            self.cancellation_token.cancel();
        }
    }
}
