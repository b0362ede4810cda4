//! In-memory port implementations
//!
//! Each fake keeps its state behind a `Mutex` so a single instance can be
//! shared through `Arc` with the service and inspected by the test afterwards.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use thanksync_core::{
    AccessTokenProvider, EligibilityPolicy, NotificationLedger, Notifier, SyncService,
    SyncSettings, TestTakerSource, WatermarkStore,
};
use thanksync_domain::{
    EmailAddress, EmailMessage, NotificationOutcome, NotificationRecord, Result, TestTaker,
    TestTakerPage, ThanksyncError, WatermarkAdvance,
};

/// Hands out a fixed token, or fails every call.
#[derive(Default)]
pub struct FakeTokenProvider {
    pub fail: Mutex<bool>,
    pub calls: AtomicUsize,
}

#[async_trait]
impl AccessTokenProvider for FakeTokenProvider {
    async fn access_token(&self) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if *self.fail.lock().unwrap() {
            return Err(ThanksyncError::Auth("invalid credentials".into()));
        }
        Ok("test-token".into())
    }
}

/// Serves slices of a newest-first feed and records every requested offset.
#[derive(Default)]
pub struct FakeSource {
    feed: Mutex<Vec<TestTaker>>,
    failing_offsets: Mutex<HashSet<usize>>,
    requested: Mutex<Vec<usize>>,
}

impl FakeSource {
    pub fn new(feed: Vec<TestTaker>) -> Self {
        Self { feed: Mutex::new(feed), ..Self::default() }
    }

    pub fn set_feed(&self, feed: Vec<TestTaker>) {
        *self.feed.lock().unwrap() = feed;
    }

    pub fn fail_offset(&self, offset: usize) {
        self.failing_offsets.lock().unwrap().insert(offset);
    }

    pub fn heal(&self) {
        self.failing_offsets.lock().unwrap().clear();
    }

    pub fn requested_offsets(&self) -> Vec<usize> {
        self.requested.lock().unwrap().clone()
    }

    pub fn clear_requests(&self) {
        self.requested.lock().unwrap().clear();
    }
}

#[async_trait]
impl TestTakerSource for FakeSource {
    async fn list_page(&self, token: &str, limit: usize, offset: usize) -> Result<TestTakerPage> {
        assert_eq!(token, "test-token", "source called without the acquired token");
        self.requested.lock().unwrap().push(offset);
        if self.failing_offsets.lock().unwrap().contains(&offset) {
            return Err(ThanksyncError::Network(format!("connection reset at offset {offset}")));
        }
        let feed = self.feed.lock().unwrap();
        let page = feed.iter().skip(offset).take(limit).cloned().collect();
        Ok(TestTakerPage::new(page, feed.len()))
    }
}

/// Watermark held in memory, with a log of every value written.
#[derive(Default)]
pub struct FakeWatermark {
    value: Mutex<Option<i64>>,
    history: Mutex<Vec<i64>>,
    pub fail_get: Mutex<bool>,
    pub fail_set: Mutex<bool>,
}

impl FakeWatermark {
    pub fn starting_at(value: i64) -> Self {
        Self { value: Mutex::new(Some(value)), ..Self::default() }
    }

    pub fn current(&self) -> Option<i64> {
        *self.value.lock().unwrap()
    }

    pub fn history(&self) -> Vec<i64> {
        self.history.lock().unwrap().clone()
    }

    /// Operator reset, as if the stored value had been deleted.
    pub fn clear(&self) {
        *self.value.lock().unwrap() = None;
    }
}

#[async_trait]
impl WatermarkStore for FakeWatermark {
    async fn get(&self) -> Result<Option<i64>> {
        if *self.fail_get.lock().unwrap() {
            return Err(ThanksyncError::Database("store unavailable".into()));
        }
        Ok(self.current())
    }

    async fn set(&self, timestamp: i64) -> Result<()> {
        if *self.fail_set.lock().unwrap() {
            return Err(ThanksyncError::Database("disk full".into()));
        }
        *self.value.lock().unwrap() = Some(timestamp);
        self.history.lock().unwrap().push(timestamp);
        Ok(())
    }
}

/// Write-once ledger keyed by test taker id.
#[derive(Default)]
pub struct FakeLedger {
    entries: Mutex<HashMap<i64, (NotificationOutcome, NotificationRecord)>>,
    failing_reads: Mutex<HashSet<i64>>,
    pub writes: AtomicUsize,
}

impl FakeLedger {
    pub fn entry(&self, id: i64) -> Option<(NotificationOutcome, NotificationRecord)> {
        self.entries.lock().unwrap().get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn fail_reads_for(&self, id: i64) {
        self.failing_reads.lock().unwrap().insert(id);
    }

    pub fn heal(&self) {
        self.failing_reads.lock().unwrap().clear();
    }

    fn insert(&self, outcome: NotificationOutcome, record: &NotificationRecord) {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.entries
            .lock()
            .unwrap()
            .entry(record.test_taker_id)
            .or_insert_with(|| (outcome, record.clone()));
    }
}

#[async_trait]
impl NotificationLedger for FakeLedger {
    async fn outcome(&self, test_taker_id: i64) -> Result<Option<NotificationOutcome>> {
        if self.failing_reads.lock().unwrap().contains(&test_taker_id) {
            return Err(ThanksyncError::Database("ledger read failed".into()));
        }
        Ok(self.entries.lock().unwrap().get(&test_taker_id).map(|(outcome, _)| *outcome))
    }

    async fn record_sent(&self, record: &NotificationRecord) -> Result<()> {
        self.insert(NotificationOutcome::Sent, record);
        Ok(())
    }

    async fn record_failed(&self, record: &NotificationRecord) -> Result<()> {
        self.insert(NotificationOutcome::Failed, record);
        Ok(())
    }
}

/// Counts sends per recipient address.
///
/// Addresses in `failing` get an error back; an address in `stalling` never
/// completes, which lets a test abandon a pass mid-flight.
#[derive(Default)]
pub struct FakeNotifier {
    sends: Mutex<HashMap<String, usize>>,
    failing: Mutex<HashSet<String>>,
    stalling: Mutex<HashSet<String>>,
}

impl FakeNotifier {
    pub fn fail_for(&self, address: impl Into<String>) {
        self.failing.lock().unwrap().insert(address.into());
    }

    pub fn stall_on(&self, address: impl Into<String>) {
        self.stalling.lock().unwrap().insert(address.into());
    }

    pub fn heal(&self) {
        self.failing.lock().unwrap().clear();
        self.stalling.lock().unwrap().clear();
    }

    pub fn sends_to(&self, address: &str) -> usize {
        self.sends.lock().unwrap().get(address).copied().unwrap_or(0)
    }

    pub fn total_sends(&self) -> usize {
        self.sends.lock().unwrap().values().sum()
    }
}

#[async_trait]
impl Notifier for FakeNotifier {
    async fn send(
        &self,
        to: &EmailAddress,
        _from: &EmailAddress,
        _message: &EmailMessage,
    ) -> Result<()> {
        let stall = self.stalling.lock().unwrap().contains(&to.address);
        if stall {
            std::future::pending::<()>().await;
        }
        *self.sends.lock().unwrap().entry(to.address.clone()).or_default() += 1;
        if self.failing.lock().unwrap().contains(&to.address) {
            return Err(ThanksyncError::Notification(format!("mailbox {} rejected", to.address)));
        }
        Ok(())
    }
}

/// The five fakes wired together.
pub struct Harness {
    pub tokens: Arc<FakeTokenProvider>,
    pub source: Arc<FakeSource>,
    pub watermark: Arc<FakeWatermark>,
    pub ledger: Arc<FakeLedger>,
    pub notifier: Arc<FakeNotifier>,
}

impl Harness {
    pub fn new(feed: Vec<TestTaker>) -> Self {
        Self::with_watermark(feed, FakeWatermark::default())
    }

    pub fn with_watermark(feed: Vec<TestTaker>, watermark: FakeWatermark) -> Self {
        Self {
            tokens: Arc::new(FakeTokenProvider::default()),
            source: Arc::new(FakeSource::new(feed)),
            watermark: Arc::new(watermark),
            ledger: Arc::new(FakeLedger::default()),
            notifier: Arc::new(FakeNotifier::default()),
        }
    }

    pub fn service(&self, advance: WatermarkAdvance) -> SyncService {
        SyncService::new(
            self.tokens.clone(),
            self.source.clone(),
            self.watermark.clone(),
            self.ledger.clone(),
            self.notifier.clone(),
            settings(advance),
        )
    }
}

pub fn settings(advance: WatermarkAdvance) -> SyncSettings {
    SyncSettings {
        page_size: 10,
        eligibility: EligibilityPolicy::default(),
        watermark_advance: advance,
        sender: EmailAddress::new("Hiring Team", "hiring@example.com"),
        message: EmailMessage { subject: "Thank you".into(), body: "Thanks for your time.".into() },
    }
}
