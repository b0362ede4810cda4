//! Conversions from external infrastructure errors into domain errors.

use r2d2::Error as PoolError;
use reqwest::Error as HttpError;
use rusqlite::Error as SqlError;
use serde_json::Error as JsonError;
use thanksync_domain::ThanksyncError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub ThanksyncError);

impl From<InfraError> for ThanksyncError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<ThanksyncError> for InfraError {
    fn from(value: ThanksyncError) -> Self {
        InfraError(value)
    }
}

trait IntoThanksyncError {
    fn into_thanksync(self) -> ThanksyncError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → ThanksyncError */
/* -------------------------------------------------------------------------- */

impl IntoThanksyncError for SqlError {
    fn into_thanksync(self) -> ThanksyncError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match err.code {
                    ErrorCode::DatabaseBusy => ThanksyncError::Database("database is busy".into()),
                    ErrorCode::DatabaseLocked => {
                        ThanksyncError::Database("database is locked".into())
                    }
                    ErrorCode::CannotOpen => {
                        ThanksyncError::Database(format!("unable to open database: {message}"))
                    }
                    ErrorCode::ReadOnly => ThanksyncError::Database("database is read-only".into()),
                    ErrorCode::DiskFull => ThanksyncError::Database("disk is full".into()),
                    _ => ThanksyncError::Database(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => ThanksyncError::NotFound("no rows returned by query".into()),
            RE::FromSqlConversionFailure(_, _, cause) => {
                ThanksyncError::Database(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, name, ty) => {
                ThanksyncError::Database(format!("invalid column type for {name}: {ty}"))
            }
            RE::InvalidPath(path) => ThanksyncError::Database(format!(
                "invalid database path: {}",
                path.to_string_lossy()
            )),
            other => ThanksyncError::Database(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_thanksync())
    }
}

/* -------------------------------------------------------------------------- */
/* r2d2::Error → ThanksyncError */
/* -------------------------------------------------------------------------- */

impl From<PoolError> for InfraError {
    fn from(value: PoolError) -> Self {
        InfraError(ThanksyncError::Database(format!("connection pool: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → ThanksyncError */
/* -------------------------------------------------------------------------- */

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        InfraError(ThanksyncError::InvalidInput(format!("malformed JSON: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → ThanksyncError */
/* -------------------------------------------------------------------------- */

impl IntoThanksyncError for HttpError {
    fn into_thanksync(self) -> ThanksyncError {
        if self.is_timeout() {
            return ThanksyncError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return ThanksyncError::Network("HTTP connection failure".into());
        }

        if self.is_decode() {
            return ThanksyncError::Remote(format!("undecodable response body: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => ThanksyncError::Auth(message),
                404 => ThanksyncError::NotFound(message),
                400..=499 => ThanksyncError::Remote(message),
                _ => ThanksyncError::Network(message),
            };
        }

        ThanksyncError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_thanksync())
    }
}
