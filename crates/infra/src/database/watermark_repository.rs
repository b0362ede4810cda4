//! Watermark repository implementation
//!
//! Stores the completion time of the newest processed test taker under a
//! single key of the `config` table. Writes keep the larger of the stored and
//! the new value, so the watermark cannot move backward even if a caller asks.

use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension};
use thanksync_core::WatermarkStore;
use thanksync_domain::Result;
use tokio::task;

use super::manager::{DbManager, SqliteConnection};
use super::{map_join_error, map_sql_error};

const WATERMARK_KEY: &str = "last_finished_at";

pub struct SqliteWatermarkRepository {
    db: Arc<DbManager>,
}

impl SqliteWatermarkRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl WatermarkStore for SqliteWatermarkRepository {
    async fn get(&self) -> Result<Option<i64>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<Option<i64>> {
            let conn = db.get_connection()?;
            query_watermark(&conn).map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn set(&self, timestamp: i64) -> Result<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            upsert_watermark(&conn, timestamp).map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }
}

fn query_watermark(conn: &SqliteConnection) -> rusqlite::Result<Option<i64>> {
    conn.query_row("SELECT value FROM config WHERE key = ?1", params![WATERMARK_KEY], |row| {
        row.get(0)
    })
    .optional()
}

fn upsert_watermark(conn: &SqliteConnection, timestamp: i64) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO config (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = MAX(value, excluded.value)",
        params![WATERMARK_KEY, timestamp],
    )?;
    Ok(())
}
