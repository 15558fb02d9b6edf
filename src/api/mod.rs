//! Server API client.
//!
//! `ServerClient` ties the session manager, the transport and the live log cursor
//! together and exposes typed snapshot accessors to the reporting layer.

mod activities;
mod logs;
mod settings;
mod status;
mod usage;

pub use activities::*;
pub use status::*;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::auth::Credentials;
use crate::config::Config;
use crate::errors::{ApiError, ApiResult};
use crate::livelog::LogCursor;
use crate::session::SessionManager;
use crate::transport::{HttpTransport, Params, Transport};

/// Authenticated client for one backup server.
pub struct ServerClient {
    session: SessionManager,
    log_cursor: LogCursor,
}

impl ServerClient {
    pub fn new(transport: Arc<dyn Transport>, credentials: Credentials) -> Self {
        Self {
            session: SessionManager::new(transport, credentials),
            log_cursor: LogCursor::new(),
        }
    }

    /// Build a client talking HTTP to the configured server.
    pub fn from_config(config: &Config) -> ApiResult<Self> {
        let transport = HttpTransport::new(&config.url, config.timeout)?;
        Ok(Self::new(Arc::new(transport), config.credentials()))
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub async fn ensure_logged_in(&self) -> ApiResult<()> {
        self.session.ensure_logged_in().await.map(|_| ())
    }

    pub async fn invalidate(&self) {
        self.session.invalidate().await;
    }

    /// One authenticated call, then extract and decode `field` from the response.
    async fn fetch_field<T: DeserializeOwned>(
        &self,
        action: &str,
        params: Params,
        field: &str,
    ) -> ApiResult<T> {
        let mut resp = self.session.call(action, params).await?;
        self.take_field(&mut resp, action, field).await
    }

    /// Decode one field of a response. A missing or mistyped field is a protocol
    /// mismatch and drops the session.
    async fn take_field<T: DeserializeOwned>(
        &self,
        resp: &mut Value,
        action: &str,
        field: &str,
    ) -> ApiResult<T> {
        let decoded = match resp.get_mut(field).map(Value::take) {
            Some(value) => serde_json::from_value(value).map_err(|e| {
                tracing::error!("Action {} returned malformed {}: {}", action, field, e);
                ApiError::malformed_response()
            }),
            None => {
                tracing::error!("Action {} response lacks {}", action, field);
                Err(ApiError::malformed_response())
            }
        };
        if decoded.is_err() {
            self.session.invalidate().await;
        }
        decoded
    }
}

/// Build form parameters from key/value pairs.
fn params<const N: usize>(pairs: [(&str, String); N]) -> Params {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}
