//! Incremental synchronization and exactly-once notification

pub mod eligibility;
pub mod pagination;
pub mod ports;
pub mod service;
