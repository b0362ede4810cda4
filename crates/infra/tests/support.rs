#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};
use tempfile::TempDir;
use thanksync_core::{EligibilityPolicy, Notifier, SyncService, SyncSettings};
use thanksync_domain::{EmailAddress, EmailMessage, Result, ThanksyncError, WatermarkAdvance};
use thanksync_infra::api::{ApiClient, ApiTestTakerSource, CredentialsAuthenticator};
use thanksync_infra::database::{DbManager, SqliteLedgerRepository, SqliteWatermarkRepository};
use thanksync_infra::http::HttpClient;
use wiremock::MockServer;

pub const AUTH_PATH: &str = "/auth";
pub const LISTING_PATH: &str = "/test-takers";

/// Temporary database wrapper that keeps the underlying file alive for the
/// duration of a test run.
pub struct TestDatabase {
    pub manager: Arc<DbManager>,
    _temp_dir: TempDir,
}

impl TestDatabase {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("temp dir should be created");
        let db_path = temp_dir.path().join("thanksync.db");

        let manager = DbManager::new(&db_path, 2).expect("db manager should be created");
        manager.run_migrations().expect("schema should apply");

        Self { manager: Arc::new(manager), _temp_dir: temp_dir }
    }
}

impl Default for TestDatabase {
    fn default() -> Self {
        Self::new()
    }
}

/// Notifier that remembers every recipient and fails for chosen addresses.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<String>>,
    failing: Mutex<HashSet<String>>,
}

impl RecordingNotifier {
    pub fn fail_for(&self, address: &str) {
        self.failing.lock().unwrap().insert(address.to_string());
    }

    pub fn recipients(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, to: &EmailAddress, _: &EmailAddress, _: &EmailMessage) -> Result<()> {
        self.sent.lock().unwrap().push(to.address.clone());
        if self.failing.lock().unwrap().contains(&to.address) {
            return Err(ThanksyncError::Notification(format!("mailbox {} rejected", to.address)));
        }
        Ok(())
    }
}

/// Listing entry as the remote API returns it.
pub fn api_taker(id: i64, percent: i64, finished_at: i64) -> Value {
    json!({
        "id": id,
        "name": format!("Taker {id}"),
        "email": format!("taker{id}@example.com"),
        "is_demo": false,
        "percent": percent,
        "finished_at": finished_at,
        "hire_state": "new",
        "contact_info": {"full_name": "", "contact_email": ""}
    })
}

/// Everything a pass needs, wired against a mock server and a temp database.
pub struct Stack {
    pub db: TestDatabase,
    pub ledger: Arc<SqliteLedgerRepository>,
    pub watermark: Arc<SqliteWatermarkRepository>,
    pub notifier: Arc<RecordingNotifier>,
    pub service: SyncService,
}

impl Stack {
    pub fn new(server: &MockServer, page_size: usize) -> Self {
        let db = TestDatabase::new();
        let ledger = Arc::new(SqliteLedgerRepository::new(Arc::clone(&db.manager)));
        let watermark = Arc::new(SqliteWatermarkRepository::new(Arc::clone(&db.manager)));
        let notifier = Arc::new(RecordingNotifier::default());

        let http = HttpClient::builder().max_attempts(1).build().expect("http client");
        let client = ApiClient::new(http);
        let tokens = CredentialsAuthenticator::new(
            client.clone(),
            format!("{}{AUTH_PATH}", server.uri()),
            "robot@example.com",
            "s3cret",
        );
        let source = ApiTestTakerSource::new(client, format!("{}{LISTING_PATH}", server.uri()));

        let settings = SyncSettings {
            page_size,
            eligibility: EligibilityPolicy::new(80),
            watermark_advance: WatermarkAdvance::Early,
            sender: EmailAddress::new("Hiring Team", "hiring@example.com"),
            message: EmailMessage {
                subject: "Thank you".into(),
                body: "Thanks for taking the test.".into(),
            },
        };

        let service = SyncService::new(
            Arc::new(tokens),
            Arc::new(source),
            watermark.clone(),
            ledger.clone(),
            notifier.clone(),
            settings,
        );

        Self { db, ledger, watermark, notifier, service }
    }
}
