//! Common data types used throughout the application

use serde::{Deserialize, Serialize};

use crate::impl_label_conversions;

/// A candidate for the thank-you notification, as listed by the remote API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestTaker {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub is_demo: bool,
    /// Score in percent, 0 to 100.
    pub percent: i64,
    /// Completion timestamp. The source lists newest first.
    pub finished_at: i64,
}

/// One page of the remote listing together with the reported total.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestTakerPage {
    pub test_takers: Vec<TestTaker>,
    pub total: usize,
}

impl TestTakerPage {
    pub fn new(test_takers: Vec<TestTaker>, total: usize) -> Self {
        Self { test_takers, total }
    }

    pub fn is_empty(&self) -> bool {
        self.test_takers.is_empty()
    }
}

/// Display name plus mailbox address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAddress {
    pub name: String,
    pub address: String,
}

impl EmailAddress {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self { name: name.into(), address: address.into() }
    }
}

/// Subject and body of the notification. Opaque to the sync engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    pub subject: String,
    pub body: String,
}

/// Ledger payload: which test taker was notified at which address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub test_taker_id: i64,
    pub email: String,
}

impl NotificationRecord {
    pub fn for_test_taker(test_taker: &TestTaker) -> Self {
        Self { test_taker_id: test_taker.id, email: test_taker.email.clone() }
    }
}

/// Ledger bucket a record landed in. Either one blocks further attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationOutcome {
    Sent,
    Failed,
}

impl_label_conversions!(NotificationOutcome {
    Sent => "sent",
    Failed => "failed",
});

/// When a pass moves the watermark forward.
///
/// `Early` writes the newest completion time right after the first page is
/// fetched, before any record is handled. A crash mid-pass can then leave
/// newer records unnotified. `AfterPass` writes only once every page was read
/// and every candidate handled, so a crash or a skipped page causes a rescan
/// instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatermarkAdvance {
    #[default]
    Early,
    AfterPass,
}

impl_label_conversions!(WatermarkAdvance {
    Early => "early",
    AfterPass => "after_pass",
});

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TestTaker {
        TestTaker {
            id: 7,
            name: "Ada".into(),
            email: "ada@example.com".into(),
            is_demo: false,
            percent: 92,
            finished_at: 1_700_000_000,
        }
    }

    #[test]
    fn notification_record_copies_identity_and_email() {
        let record = NotificationRecord::for_test_taker(&sample());
        assert_eq!(record.test_taker_id, 7);
        assert_eq!(record.email, "ada@example.com");
    }

    #[test]
    fn outcome_labels_parse_back() {
        assert_eq!("sent".parse::<NotificationOutcome>().unwrap(), NotificationOutcome::Sent);
        assert_eq!(NotificationOutcome::Failed.to_string(), "failed");
    }

    #[test]
    fn watermark_advance_defaults_to_early() {
        assert_eq!(WatermarkAdvance::default(), WatermarkAdvance::Early);
        let parsed: WatermarkAdvance = serde_json::from_str("\"after_pass\"").unwrap();
        assert_eq!(parsed, WatermarkAdvance::AfterPass);
    }
}
