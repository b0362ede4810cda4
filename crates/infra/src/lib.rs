//! # Thanksync Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - HTTP adapters for the remote test-taker API (auth + listing)
//! - SQLite repositories for the watermark and the notification ledger
//! - The log-backed notifier
//! - Configuration loading (`.env`, environment, JSON/TOML files)
//! - The fixed-interval sync scheduler
//!
//! ## Architecture
//! - Implements traits defined in `thanksync-core`
//! - Depends on `thanksync-domain` and `thanksync-core`
//! - Contains all "impure" code (I/O, network, storage)

pub mod api;
pub mod config;
pub mod database;
pub mod errors;
pub mod http;
pub mod mailer;
pub mod scheduling;

// Re-export commonly used items
pub use api::{ApiClient, ApiTestTakerSource, CredentialsAuthenticator};
pub use database::{DbManager, SqliteLedgerRepository, SqliteWatermarkRepository};
pub use errors::InfraError;
pub use http::HttpClient;
pub use mailer::LogNotifier;
pub use scheduling::{SyncScheduler, SyncSchedulerConfig};
