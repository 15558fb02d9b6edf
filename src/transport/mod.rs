//! HTTP transport for the server's action protocol.
//!
//! Every API verb is a single `POST {url}?a={action}` with form-encoded parameters.
//! The transport knows nothing about sessions; the session manager attaches the
//! token to `params`.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;

use crate::errors::{messages, ApiError, ApiResult};

/// Form parameters of one action call.
pub type Params = BTreeMap<String, String>;

/// Parameter carrying the session token.
pub const SESSION_PARAM: &str = "ses";

/// One POST per API verb.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(&self, action: &str, params: &Params) -> ApiResult<Value>;
}

/// reqwest-backed transport with a bounded timeout per call.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    url: String,
}

impl HttpTransport {
    pub fn new(url: &str, timeout: Duration) -> ApiResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, action: &str, params: &Params) -> ApiResult<Value> {
        tracing::debug!("POST {} action={}", self.url, action);

        let resp = self
            .client
            .post(&self.url)
            .query(&[("a", action)])
            .form(params)
            .send()
            .await?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            tracing::warn!("Action {} rejected with HTTP {}", action, status);
            return Err(ApiError::Authentication(
                messages::SESSION_EXPIRED.to_string(),
            ));
        }
        if !status.is_success() {
            tracing::warn!("Action {} failed with HTTP {}", action, status);
            return Err(ApiError::Transport(format!("HTTP {}", status)));
        }

        let body = resp.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
