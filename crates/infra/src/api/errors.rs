//! API-specific error types

use thanksync_domain::ThanksyncError;
use thiserror::Error;

/// Failures talking to the remote test-taker API
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    /// 401/403 from either endpoint
    #[error("authentication rejected (HTTP {status})")]
    Unauthorized { status: u16 },

    /// 2xx answer carrying an `error` envelope
    #[error("API returned an error: {kind}")]
    Envelope { kind: String },

    #[error("unexpected HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("auth response did not contain an access token")]
    MissingToken,
}

impl ApiError {
    pub(crate) fn from_status(status: reqwest::StatusCode, body: String) -> Self {
        match status.as_u16() {
            code @ (401 | 403) => Self::Unauthorized { status: code },
            code => Self::Status { status: code, body },
        }
    }
}

impl From<ApiError> for ThanksyncError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized { .. } | ApiError::MissingToken => {
                ThanksyncError::Auth(err.to_string())
            }
            ApiError::Status { status, .. } if status >= 500 => {
                ThanksyncError::Network(err.to_string())
            }
            ApiError::Envelope { .. } | ApiError::Status { .. } | ApiError::Decode(_) => {
                ThanksyncError::Remote(err.to_string())
            }
        }
    }
}
