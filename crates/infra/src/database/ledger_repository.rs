//! Notification ledger repository implementation
//!
//! Two tables, `sent_notifications` and `failed_notifications`, keyed by test
//! taker id with the JSON [`NotificationRecord`] as payload. Inserts are
//! conditional on the id being absent from both tables, which makes every
//! entry write-once and keeps the buckets disjoint.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, OptionalExtension};
use thanksync_core::NotificationLedger;
use thanksync_domain::{NotificationOutcome, NotificationRecord, Result, ThanksyncError};
use tokio::task;
use tracing::debug;

use super::manager::{DbManager, SqliteConnection};
use super::{map_join_error, map_sql_error};
use crate::errors::InfraError;

/// Bucket plus stored payload
pub type LedgerEntry = (NotificationOutcome, NotificationRecord);

pub struct SqliteLedgerRepository {
    db: Arc<DbManager>,
}

impl SqliteLedgerRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    /// Stored payload for `test_taker_id`, whichever bucket holds it.
    pub async fn entry(&self, test_taker_id: i64) -> Result<Option<LedgerEntry>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<Option<LedgerEntry>> {
            let conn = db.get_connection()?;
            query_entry(&conn, test_taker_id)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn record(
        &self,
        outcome: NotificationOutcome,
        record: &NotificationRecord,
    ) -> Result<()> {
        let db = Arc::clone(&self.db);
        let test_taker_id = record.test_taker_id;
        let payload = serde_json::to_string(record).map_err(InfraError::from)?;

        let inserted = task::spawn_blocking(move || -> Result<bool> {
            let conn = db.get_connection()?;
            insert_entry(&conn, outcome, test_taker_id, &payload).map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)??;

        if !inserted {
            debug!(test_taker_id, %outcome, "ledger entry already present; left untouched");
        }
        Ok(())
    }
}

#[async_trait]
impl NotificationLedger for SqliteLedgerRepository {
    async fn outcome(&self, test_taker_id: i64) -> Result<Option<NotificationOutcome>> {
        Ok(self.entry(test_taker_id).await?.map(|(outcome, _)| outcome))
    }

    async fn record_sent(&self, record: &NotificationRecord) -> Result<()> {
        self.record(NotificationOutcome::Sent, record).await
    }

    async fn record_failed(&self, record: &NotificationRecord) -> Result<()> {
        self.record(NotificationOutcome::Failed, record).await
    }
}

// ============================================================================
// SQL Operations (synchronous)
// ============================================================================

fn table_for(outcome: NotificationOutcome) -> &'static str {
    match outcome {
        NotificationOutcome::Sent => "sent_notifications",
        NotificationOutcome::Failed => "failed_notifications",
    }
}

fn insert_entry(
    conn: &SqliteConnection,
    outcome: NotificationOutcome,
    test_taker_id: i64,
    payload: &str,
) -> rusqlite::Result<bool> {
    let sql = format!(
        "INSERT OR IGNORE INTO {table} (test_taker_id, payload, recorded_at)
         SELECT ?1, ?2, ?3
         WHERE NOT EXISTS (SELECT 1 FROM sent_notifications WHERE test_taker_id = ?1)
           AND NOT EXISTS (SELECT 1 FROM failed_notifications WHERE test_taker_id = ?1)",
        table = table_for(outcome)
    );
    let changed = conn.execute(&sql, params![test_taker_id, payload, Utc::now().timestamp()])?;
    Ok(changed > 0)
}

fn query_entry(conn: &SqliteConnection, test_taker_id: i64) -> Result<Option<LedgerEntry>> {
    let row: Option<(String, String)> = conn
        .query_row(
            "SELECT 'sent', payload FROM sent_notifications WHERE test_taker_id = ?1
             UNION ALL
             SELECT 'failed', payload FROM failed_notifications WHERE test_taker_id = ?1
             LIMIT 1",
            params![test_taker_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()
        .map_err(map_sql_error)?;

    let Some((label, payload)) = row else {
        return Ok(None);
    };

    let outcome = label.parse::<NotificationOutcome>().map_err(ThanksyncError::Database)?;
    let record = serde_json::from_str(&payload).map_err(|err| {
        ThanksyncError::Database(format!("corrupt ledger payload for {test_taker_id}: {err}"))
    })?;
    Ok(Some((outcome, record)))
}
