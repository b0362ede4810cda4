//! Notifier that writes each message to the structured log
//!
//! Stands in for a mail transport: every call succeeds after emitting one
//! `info` event carrying the recipient, the sender and the message.

use async_trait::async_trait;
use thanksync_core::Notifier;
use thanksync_domain::{EmailAddress, EmailMessage, Result};
use tracing::info;

/// [`Notifier`] that logs each message instead of mailing it
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl LogNotifier {
    /// Stateless; every instance logs to the global subscriber.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(
        &self,
        to: &EmailAddress,
        from: &EmailAddress,
        message: &EmailMessage,
    ) -> Result<()> {
        info!(
            to_name = %to.name,
            to_address = %to.address,
            from_name = %from.name,
            from_address = %from.address,
            subject = %message.subject,
            body = %message.body,
            "notification delivered to log"
        );
        Ok(())
    }
}
