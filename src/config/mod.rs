//! Configuration module for the backup report client.
//!
//! All configuration is loaded from environment variables (optionally seeded from a
//! `.env` file) with sensible defaults.

use std::env;
use std::path::Path;
use std::time::Duration;

use crate::auth::Credentials;
use crate::errors::{ApiError, ApiResult};

pub const DEFAULT_URL: &str = "http://127.0.0.1:55414/x";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    /// Action endpoint of the backup server
    pub url: String,
    /// Login name; empty selects anonymous login
    pub username: String,
    /// Plaintext password, held only in memory
    pub password: String,
    /// Upper bound for every network call
    pub timeout: Duration,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::read_env()
    }

    /// Load configuration from an explicit env file, then the environment.
    pub fn from_env_file(path: &Path) -> ApiResult<Self> {
        dotenvy::from_path(path).map_err(|e| {
            ApiError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Ok(Self::read_env())
    }

    fn read_env() -> Self {
        let url = env::var("BACKUP_REPORT_URL").unwrap_or_else(|_| DEFAULT_URL.to_string());

        let username = env::var("BACKUP_REPORT_USERNAME").unwrap_or_default();
        let password = env::var("BACKUP_REPORT_PASSWORD").unwrap_or_default();

        let timeout_secs = env::var("BACKUP_REPORT_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let log_level = env::var("BACKUP_REPORT_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Self {
            url,
            username,
            password,
            timeout: Duration::from_secs(timeout_secs),
            log_level,
        }
    }

    /// Immutable login material for the session manager.
    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.url, &self.username, &self.password)
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("log_level", &self.log_level)
            .finish()
    }
}
