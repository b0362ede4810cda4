//! Application constants
//!
//! Centralized location for the defaults that the configuration layer falls
//! back to when an option is not provided.

// Pagination
pub const DEFAULT_PAGE_SIZE: usize = 10;

// Eligibility
pub const DEFAULT_ELIGIBILITY_THRESHOLD: u8 = 80;
pub const MAX_PERCENT: u8 = 100;

// Scheduling
pub const DEFAULT_FETCH_INTERVAL_SECS: u64 = 10;

// Remote API
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 30;

// Storage
pub const DEFAULT_DB_PATH: &str = "thanksync.db";
pub const DEFAULT_DB_POOL_SIZE: u32 = 4;
