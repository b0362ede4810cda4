//! Configuration loader
//!
//! Builds the process-wide [`Config`] once at startup.
//!
//! ## Loading Strategy
//! 1. The binary calls [`load_dotenv`] once, before tracing starts, so a
//!    `.env` file in the working directory (or a parent) is already merged
//!    into the process environment; [`load`] does not read it again
//! 2. An explicitly requested config file wins over everything else
//! 3. Otherwise the environment is read; if a required variable is missing,
//!    the loader falls back to the first config file found by
//!    [`locate_config_path`]
//! 4. The result is validated before it is returned
//!
//! ## Environment Variables
//! Required:
//! - `API_AUTH_ENDPOINT`, `API_AUTH_EMAIL`, `API_AUTH_PASSWORD`
//! - `API_TEST_TAKERS_ENDPOINT`
//! - `MAIL_FROM` (sender name), `MAIL_FROM_EMAIL`, `MAIL_SUBJECT`, `MAIL_BODY`
//!
//! Optional:
//! - `DB_PATH` (default `thanksync.db`), `DB_POOL_SIZE` (4)
//! - `FETCH_INTERVAL_SECONDS` (10), `PAGE_SIZE` (10)
//! - `ELIGIBILITY_THRESHOLD` (80), `WATERMARK_ADVANCE` (`early` | `after_pass`)
//! - `API_TIMEOUT_SECONDS` (30)

use std::path::{Path, PathBuf};
use std::str::FromStr;

use thanksync_domain::constants::{
    DEFAULT_API_TIMEOUT_SECS, DEFAULT_DB_PATH, DEFAULT_DB_POOL_SIZE,
    DEFAULT_ELIGIBILITY_THRESHOLD, DEFAULT_FETCH_INTERVAL_SECS, DEFAULT_PAGE_SIZE,
};
use thanksync_domain::{
    ApiConfig, Config, DatabaseConfig, MailConfig, Result, SyncConfig, ThanksyncError,
    WatermarkAdvance,
};

const CONFIG_FILE_NAMES: [&str; 4] =
    ["thanksync.toml", "thanksync.json", "config.toml", "config.json"];

/// Load and validate the configuration.
///
/// # Errors
/// Returns `ThanksyncError::Config` when no complete configuration can be
/// assembled or when the assembled one fails validation.
pub fn load(explicit_path: Option<PathBuf>) -> Result<Config> {
    let config = match explicit_path {
        Some(path) => load_from_file(Some(path))?,
        None => match load_from_env() {
            Ok(config) => {
                tracing::info!("configuration loaded from environment variables");
                config
            }
            Err(err) => {
                tracing::debug!(error = %err, "environment incomplete, trying config file");
                load_from_file(None)?
            }
        },
    };

    config.validate()?;
    Ok(config)
}

/// Merge a `.env` file into the process environment, if one exists.
///
/// Variables already set in the environment are left untouched.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env file"),
        Err(err) if err.not_found() => {}
        Err(err) => tracing::warn!(error = %err, "ignoring unreadable .env file"),
    }
}

/// Load configuration from the process environment.
///
/// # Errors
/// Returns `ThanksyncError::Config` if a required variable is missing or a
/// numeric variable does not parse.
pub fn load_from_env() -> Result<Config> {
    from_lookup(|key| std::env::var(key).ok())
}

/// Build a configuration from any key lookup, using the environment
/// variable names documented above.
pub fn from_lookup<F>(lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let required = |key: &str| {
        lookup(key).filter(|value| !value.is_empty()).ok_or_else(|| {
            ThanksyncError::Config(format!("Missing required environment variable: {key}"))
        })
    };

    Ok(Config {
        api: ApiConfig {
            auth_endpoint: required("API_AUTH_ENDPOINT")?,
            test_takers_endpoint: required("API_TEST_TAKERS_ENDPOINT")?,
            email: required("API_AUTH_EMAIL")?,
            password: required("API_AUTH_PASSWORD")?,
            timeout_seconds: parsed(&lookup, "API_TIMEOUT_SECONDS", DEFAULT_API_TIMEOUT_SECS)?,
        },
        database: DatabaseConfig {
            path: lookup("DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.to_string()),
            pool_size: parsed(&lookup, "DB_POOL_SIZE", DEFAULT_DB_POOL_SIZE)?,
        },
        sync: SyncConfig {
            interval_seconds: parsed(
                &lookup,
                "FETCH_INTERVAL_SECONDS",
                DEFAULT_FETCH_INTERVAL_SECS,
            )?,
            page_size: parsed(&lookup, "PAGE_SIZE", DEFAULT_PAGE_SIZE)?,
            eligibility_threshold: parsed(
                &lookup,
                "ELIGIBILITY_THRESHOLD",
                DEFAULT_ELIGIBILITY_THRESHOLD,
            )?,
            watermark_advance: parsed(&lookup, "WATERMARK_ADVANCE", WatermarkAdvance::default())?,
        },
        mail: MailConfig {
            from_name: required("MAIL_FROM")?,
            from_address: required("MAIL_FROM_EMAIL")?,
            subject: required("MAIL_SUBJECT")?,
            body: required("MAIL_BODY")?,
        },
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, searches the standard locations. The format is picked
/// from the extension (`.json` or `.toml`).
///
/// # Errors
/// Returns `ThanksyncError::Config` if the file is missing, unreadable or
/// malformed.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) if p.exists() => p,
        Some(p) => {
            return Err(ThanksyncError::Config(format!(
                "Config file not found: {}",
                p.display()
            )))
        }
        None => locate_config_path().ok_or_else(|| {
            ThanksyncError::Config(
                "environment incomplete and no config file found in the standard locations".into(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| ThanksyncError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| ThanksyncError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| ThanksyncError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(ThanksyncError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// First existing config file in the working directory, then next to the
/// executable.
pub fn locate_config_path() -> Option<PathBuf> {
    let mut directories = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        directories.push(cwd);
    }
    if let Some(exe_dir) =
        std::env::current_exe().ok().and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        directories.push(exe_dir);
    }

    directories
        .iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

fn parsed<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key).filter(|value| !value.trim().is_empty()) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| ThanksyncError::Config(format!("Invalid value for {key} ({raw}): {e}"))),
        None => Ok(default),
    }
}
