//! SQLite persistence for the watermark and the notification ledger

pub mod ledger_repository;
pub mod manager;
pub mod watermark_repository;

pub use ledger_repository::{LedgerEntry, SqliteLedgerRepository};
pub use manager::DbManager;
pub use watermark_repository::SqliteWatermarkRepository;

use thanksync_domain::ThanksyncError;

use crate::errors::InfraError;

pub(crate) fn map_sql_error(err: rusqlite::Error) -> ThanksyncError {
    ThanksyncError::from(InfraError::from(err))
}

pub(crate) fn map_join_error(err: tokio::task::JoinError) -> ThanksyncError {
    ThanksyncError::Internal(format!("database task failed: {err}"))
}
