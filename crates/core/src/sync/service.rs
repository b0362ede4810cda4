//! Sync service - one synchronization pass over the remote listing
//!
//! A pass authenticates, reads the previous watermark, walks the listing down
//! to that watermark, and for every eligible candidate that has no ledger
//! entry yet attempts exactly one notification and records its outcome.
//!
//! Errors that leave nothing to work with (token, watermark read, first page,
//! watermark write) abort the pass and are returned to the caller. Everything
//! else is logged, counted in the [`PassReport`], and skipped.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use thanksync_domain::{
    Config, EmailAddress, EmailMessage, NotificationRecord, Result, TestTaker, WatermarkAdvance,
};
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use super::eligibility::EligibilityPolicy;
use super::pagination::collect_new_test_takers;
use super::ports::{
    AccessTokenProvider, NotificationLedger, Notifier, TestTakerSource, WatermarkStore,
};

/// Static inputs of a pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSettings {
    /// `limit` sent with every listing request
    pub page_size: usize,
    /// Score threshold plus demo and email checks
    pub eligibility: EligibilityPolicy,
    /// When the pass stores the newest completion time
    pub watermark_advance: WatermarkAdvance,
    /// Sender identity on every notification
    pub sender: EmailAddress,
    /// Subject and body shared by every notification
    pub message: EmailMessage,
}

impl SyncSettings {
    /// Pass settings from the `sync` and `mail` sections.
    pub fn from_config(config: &Config) -> Self {
        Self {
            page_size: config.sync.page_size,
            eligibility: EligibilityPolicy::new(config.sync.eligibility_threshold),
            watermark_advance: config.sync.watermark_advance,
            sender: config.mail.sender(),
            message: config.mail.message(),
        }
    }
}

/// Counters and identifiers for one completed pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassReport {
    /// Random id carried by every log line of the pass
    pub pass_id: Uuid,
    /// Wall-clock start, taken after the watermark read
    pub started_at: DateTime<Utc>,
    /// Offsets requested from the source, page 0 included
    pub offsets: Vec<usize>,
    /// Records newer than the previous watermark
    pub candidates: usize,
    /// Candidates passing the eligibility check
    pub eligible: usize,
    /// Candidates failing the eligibility check
    pub ineligible: usize,
    /// Records for which `send` was attempted
    pub processed: usize,
    /// Sends that succeeded
    pub sent: usize,
    /// Sends that returned an error, recorded as `Failed`
    pub failed: usize,
    /// Eligible records skipped because the ledger already had an outcome
    pub duplicates: usize,
    /// Failed ledger reads and writes
    pub ledger_errors: usize,
    /// Eligible records skipped because their ledger lookup failed
    pub unread: usize,
    /// Later pages that could not be fetched
    pub page_errors: usize,
    /// Stored watermark once the pass finished
    pub watermark: Option<i64>,
}

impl PassReport {
    fn begin(pass_id: Uuid, previous_watermark: Option<i64>) -> Self {
        Self {
            pass_id,
            started_at: Utc::now(),
            offsets: Vec::new(),
            candidates: 0,
            eligible: 0,
            ineligible: 0,
            processed: 0,
            sent: 0,
            failed: 0,
            duplicates: 0,
            ledger_errors: 0,
            unread: 0,
            page_errors: 0,
            watermark: previous_watermark,
        }
    }

    /// Every page was read and every eligible candidate reached a decision.
    pub fn is_complete(&self) -> bool {
        self.page_errors == 0 && self.unread == 0
    }
}

/// Orchestrates one synchronization pass against the five ports
pub struct SyncService {
    tokens: Arc<dyn AccessTokenProvider>,
    source: Arc<dyn TestTakerSource>,
    watermark: Arc<dyn WatermarkStore>,
    ledger: Arc<dyn NotificationLedger>,
    notifier: Arc<dyn Notifier>,
    settings: SyncSettings,
}

impl SyncService {
    /// Wire a service over its ports. Nothing is contacted until a pass runs.
    pub fn new(
        tokens: Arc<dyn AccessTokenProvider>,
        source: Arc<dyn TestTakerSource>,
        watermark: Arc<dyn WatermarkStore>,
        ledger: Arc<dyn NotificationLedger>,
        notifier: Arc<dyn Notifier>,
        settings: SyncSettings,
    ) -> Self {
        Self { tokens, source, watermark, ledger, notifier, settings }
    }

    /// Settings every pass runs with.
    pub fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    /// Run one pass.
    ///
    /// # Errors
    /// Returns an error when the access token, the previous watermark or the
    /// first page cannot be obtained, or when the new watermark cannot be
    /// stored. No record is notified in the first three cases.
    pub async fn run_pass(&self) -> Result<PassReport> {
        let pass_id = Uuid::new_v4();
        let span = info_span!("sync_pass", %pass_id);
        self.execute(pass_id).instrument(span).await
    }

    async fn execute(&self, pass_id: Uuid) -> Result<PassReport> {
        let page_size = self.settings.page_size;

        let token = self
            .tokens
            .access_token()
            .await
            .map_err(|err| err.context("failed to acquire access token"))?;

        let previous = self
            .watermark
            .get()
            .await
            .map_err(|err| err.context("failed to read watermark"))?;

        let mut report = PassReport::begin(pass_id, previous);
        info!(
            started_at = %report.started_at,
            previous_watermark = ?previous,
            advance = %self.settings.watermark_advance,
            "starting sync pass"
        );

        let first_page = self
            .source
            .list_page(&token, page_size, 0)
            .await
            .map_err(|err| err.context("failed to fetch first page"))?;
        let newest = first_page.test_takers.first().map(|taker| taker.finished_at);

        if self.settings.watermark_advance == WatermarkAdvance::Early {
            if let Some(newest) = newest {
                report.watermark = self.advance_watermark(previous, newest).await?;
            }
        }

        let walk =
            collect_new_test_takers(self.source.as_ref(), &token, page_size, previous, first_page)
                .await;
        report.offsets = walk.offsets;
        report.page_errors = walk.page_errors;
        report.candidates = walk.candidates.len();

        let mut attempted = HashSet::new();
        for test_taker in &walk.candidates {
            self.process(test_taker, &mut attempted, &mut report).await;
        }

        if self.settings.watermark_advance == WatermarkAdvance::AfterPass {
            if let Some(newest) = newest {
                if report.is_complete() {
                    report.watermark = self.advance_watermark(previous, newest).await?;
                } else {
                    warn!(
                        page_errors = report.page_errors,
                        unread = report.unread,
                        "pass incomplete; watermark left in place for a rescan"
                    );
                }
            }
        }

        info!(
            candidates = report.candidates,
            processed = report.processed,
            sent = report.sent,
            failed = report.failed,
            duplicates = report.duplicates,
            page_errors = report.page_errors,
            ledger_errors = report.ledger_errors,
            unread = report.unread,
            watermark = ?report.watermark,
            "sync pass finished"
        );

        Ok(report)
    }

    /// Store `newest` unless it would move the watermark backward.
    ///
    /// Returns the watermark in effect afterwards.
    async fn advance_watermark(&self, previous: Option<i64>, newest: i64) -> Result<Option<i64>> {
        if previous.is_some_and(|mark| newest <= mark) {
            debug!(newest, previous = ?previous, "watermark already current");
            return Ok(previous);
        }

        self.watermark
            .set(newest)
            .await
            .map_err(|err| err.context("failed to store watermark"))?;
        debug!(watermark = newest, "watermark advanced");
        Ok(Some(newest))
    }

    async fn process(
        &self,
        test_taker: &TestTaker,
        attempted: &mut HashSet<i64>,
        report: &mut PassReport,
    ) {
        let id = test_taker.id;

        if !self.settings.eligibility.is_eligible(test_taker) {
            debug!(test_taker_id = id, percent = test_taker.percent, "not eligible");
            report.ineligible += 1;
            return;
        }
        report.eligible += 1;

        // Listing shifts while paging can surface the same record twice.
        if attempted.contains(&id) {
            report.duplicates += 1;
            return;
        }

        match self.ledger.has_outcome(id).await {
            Ok(true) => {
                debug!(test_taker_id = id, "already notified");
                report.duplicates += 1;
                return;
            }
            Ok(false) => {}
            Err(err) => {
                warn!(test_taker_id = id, error = %err, "ledger lookup failed; skipping");
                report.ledger_errors += 1;
                report.unread += 1;
                return;
            }
        }

        attempted.insert(id);
        report.processed += 1;

        let recipient = EmailAddress::new(test_taker.name.clone(), test_taker.email.clone());
        let record = NotificationRecord::for_test_taker(test_taker);

        let recorded = match self
            .notifier
            .send(&recipient, &self.settings.sender, &self.settings.message)
            .await
        {
            Ok(()) => {
                info!(test_taker_id = id, "notification sent");
                report.sent += 1;
                self.ledger.record_sent(&record).await
            }
            Err(err) => {
                warn!(test_taker_id = id, error = %err, "notification failed");
                report.failed += 1;
                self.ledger.record_failed(&record).await
            }
        };

        if let Err(err) = recorded {
            error!(test_taker_id = id, error = %err, "failed to record notification outcome");
            report.ledger_errors += 1;
        }
    }
}
