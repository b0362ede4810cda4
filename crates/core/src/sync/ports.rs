//! Port interfaces for sync operations

use async_trait::async_trait;
use thanksync_domain::{
    EmailAddress, EmailMessage, NotificationOutcome, NotificationRecord, Result, TestTakerPage,
};

/// Trait for acquiring the bearer token attached to listing requests
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Exchange the configured credentials for an access token
    async fn access_token(&self) -> Result<String>;
}

/// Trait for the paginated remote listing, newest `finished_at` first
#[async_trait]
pub trait TestTakerSource: Send + Sync {
    /// Fetch `limit` test takers starting at `offset`, plus the reported total
    async fn list_page(&self, token: &str, limit: usize, offset: usize)
        -> Result<TestTakerPage>;
}

/// Trait for the durable high-water mark of processed records
#[async_trait]
pub trait WatermarkStore: Send + Sync {
    /// Read the stored watermark, `None` when no pass has stored one yet
    async fn get(&self) -> Result<Option<i64>>;

    /// Persist a new watermark
    async fn set(&self, timestamp: i64) -> Result<()>;
}

/// Trait for the per-record notification outcome
///
/// Entries are write-once: recording an outcome for an id that already has
/// one must leave the existing entry untouched.
#[async_trait]
pub trait NotificationLedger: Send + Sync {
    /// Whether the id sits in either bucket
    async fn has_outcome(&self, test_taker_id: i64) -> Result<bool> {
        Ok(self.outcome(test_taker_id).await?.is_some())
    }

    /// The bucket the id sits in, if any
    async fn outcome(&self, test_taker_id: i64) -> Result<Option<NotificationOutcome>>;

    /// Record a delivered notification
    async fn record_sent(&self, record: &NotificationRecord) -> Result<()>;

    /// Record a notification whose delivery failed
    async fn record_failed(&self, record: &NotificationRecord) -> Result<()>;
}

/// Trait for delivering one message to one recipient
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Single attempt; any error counts as a failed delivery
    async fn send(&self, to: &EmailAddress, from: &EmailAddress, message: &EmailMessage)
        -> Result<()>;
}
