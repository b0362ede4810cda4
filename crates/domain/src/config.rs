//! Configuration structures
//!
//! The whole process shares one immutable [`Config`], built once at startup by
//! the infrastructure loader and passed explicitly to every component.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_API_TIMEOUT_SECS, DEFAULT_DB_PATH, DEFAULT_DB_POOL_SIZE,
    DEFAULT_ELIGIBILITY_THRESHOLD, DEFAULT_FETCH_INTERVAL_SECS, DEFAULT_PAGE_SIZE, MAX_PERCENT,
};
use crate::errors::{Result, ThanksyncError};
use crate::types::{EmailAddress, EmailMessage, WatermarkAdvance};

/// Top-level application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    pub mail: MailConfig,
}

/// Remote test-taker API endpoints and credentials
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    pub auth_endpoint: String,
    pub test_takers_endpoint: String,
    pub email: String,
    pub password: String,
    #[serde(default = "default_api_timeout")]
    pub timeout_seconds: u64,
}

// Keep the password out of logs.
impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("auth_endpoint", &self.auth_endpoint)
            .field("test_takers_endpoint", &self.test_takers_endpoint)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

/// Durable store location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: DEFAULT_DB_PATH.to_string(), pool_size: DEFAULT_DB_POOL_SIZE }
    }
}

/// Pass and scheduler tuning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default = "default_interval")]
    pub interval_seconds: u64,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_threshold")]
    pub eligibility_threshold: u8,
    #[serde(default)]
    pub watermark_advance: WatermarkAdvance,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            interval_seconds: DEFAULT_FETCH_INTERVAL_SECS,
            page_size: DEFAULT_PAGE_SIZE,
            eligibility_threshold: DEFAULT_ELIGIBILITY_THRESHOLD,
            watermark_advance: WatermarkAdvance::default(),
        }
    }
}

/// Sender identity and message content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailConfig {
    pub from_name: String,
    pub from_address: String,
    pub subject: String,
    pub body: String,
}

impl MailConfig {
    pub fn sender(&self) -> EmailAddress {
        EmailAddress::new(self.from_name.clone(), self.from_address.clone())
    }

    pub fn message(&self) -> EmailMessage {
        EmailMessage { subject: self.subject.clone(), body: self.body.clone() }
    }
}

impl Config {
    /// Reject values the engine cannot run with.
    ///
    /// # Errors
    /// Returns `ThanksyncError::Config` describing the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if self.api.auth_endpoint.trim().is_empty() {
            return Err(ThanksyncError::Config("api.auth_endpoint must not be empty".into()));
        }
        if self.api.test_takers_endpoint.trim().is_empty() {
            return Err(ThanksyncError::Config(
                "api.test_takers_endpoint must not be empty".into(),
            ));
        }
        if self.database.path.trim().is_empty() {
            return Err(ThanksyncError::Config("database.path must not be empty".into()));
        }
        if self.sync.page_size == 0 {
            return Err(ThanksyncError::Config("sync.page_size must be at least 1".into()));
        }
        if self.sync.interval_seconds == 0 {
            return Err(ThanksyncError::Config("sync.interval_seconds must be at least 1".into()));
        }
        if self.sync.eligibility_threshold > MAX_PERCENT {
            return Err(ThanksyncError::Config(format!(
                "sync.eligibility_threshold must be between 0 and {MAX_PERCENT}, got {}",
                self.sync.eligibility_threshold
            )));
        }
        Ok(())
    }
}

fn default_api_timeout() -> u64 {
    DEFAULT_API_TIMEOUT_SECS
}

fn default_pool_size() -> u32 {
    DEFAULT_DB_POOL_SIZE
}

fn default_interval() -> u64 {
    DEFAULT_FETCH_INTERVAL_SECS
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_threshold() -> u8 {
    DEFAULT_ELIGIBILITY_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        Config {
            api: ApiConfig {
                auth_endpoint: "https://api.example.com/auth".into(),
                test_takers_endpoint: "https://api.example.com/test-takers".into(),
                email: "robot@example.com".into(),
                password: "hunter2".into(),
                timeout_seconds: 30,
            },
            database: DatabaseConfig::default(),
            sync: SyncConfig::default(),
            mail: MailConfig {
                from_name: "Hiring Team".into(),
                from_address: "hiring@example.com".into(),
                subject: "Thank you".into(),
                body: "Thanks for taking the test.".into(),
            },
        }
    }

    #[test]
    fn defaults_match_documented_values() {
        let sync = SyncConfig::default();
        assert_eq!(sync.page_size, 10);
        assert_eq!(sync.eligibility_threshold, 80);
        assert_eq!(sync.interval_seconds, 10);
        assert_eq!(sync.watermark_advance, WatermarkAdvance::Early);
    }

    #[test]
    fn validate_accepts_complete_config() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_page_size() {
        let mut config = valid_config();
        config.sync.page_size = 0;
        assert!(matches!(config.validate(), Err(ThanksyncError::Config(_))));
    }

    #[test]
    fn validate_rejects_threshold_above_hundred() {
        let mut config = valid_config();
        config.sync.eligibility_threshold = 101;
        assert!(matches!(config.validate(), Err(ThanksyncError::Config(_))));
    }

    #[test]
    fn validate_rejects_blank_endpoint() {
        let mut config = valid_config();
        config.api.test_takers_endpoint = "  ".into();
        assert!(matches!(config.validate(), Err(ThanksyncError::Config(_))));
    }

    #[test]
    fn debug_output_redacts_password() {
        let rendered = format!("{:?}", valid_config().api);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn sync_section_is_optional_in_json() {
        let json = r#"{
            "api": {
                "auth_endpoint": "a", "test_takers_endpoint": "b",
                "email": "e", "password": "p"
            },
            "mail": {"from_name": "n", "from_address": "f", "subject": "s", "body": "b"}
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.sync, SyncConfig::default());
        assert_eq!(config.api.timeout_seconds, 30);
        assert_eq!(config.database.path, "thanksync.db");
    }
}
