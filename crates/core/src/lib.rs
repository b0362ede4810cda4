//! # Thanksync Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces (traits) for the record source, watermark store,
//!   notification ledger and notifier
//! - The eligibility predicate and the watermark-bounded page walk
//! - The sync service that drives one synchronization pass
//!
//! ## Architecture Principles
//! - Only depends on `thanksync-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits

pub mod sync;

pub use sync::eligibility::{email_is_valid, EligibilityPolicy};
pub use sync::pagination::{collect_new_test_takers, is_new, PageWalk};
pub use sync::ports::{
    AccessTokenProvider, NotificationLedger, Notifier, TestTakerSource, WatermarkStore,
};
pub use sync::service::{PassReport, SyncService, SyncSettings};
