//! Session management.
//!
//! Owns the login state and serializes login attempts: at most one login sequence
//! is in flight, and callers arriving meanwhile wait for its outcome.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Mutex;

use crate::auth::{answer_challenge, Challenge, Credentials};
use crate::errors::{messages, ApiError, ApiResult};
use crate::transport::{Params, Transport, SESSION_PARAM};

/// Login state. `Authenticating` only exists inside a running login attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    LoggedOut,
    LoggedIn {
        token: String,
    },
}

impl SessionState {
    fn token(&self) -> Option<&str> {
        match self {
            SessionState::LoggedIn { token } if !token.is_empty() => Some(token),
            _ => None,
        }
    }
}

/// Session manager shared by all accessors of one client.
pub struct SessionManager {
    transport: Arc<dyn Transport>,
    credentials: Credentials,
    state: Mutex<SessionState>,
}

impl SessionManager {
    pub fn new(transport: Arc<dyn Transport>, credentials: Credentials) -> Self {
        Self {
            transport,
            credentials,
            state: Mutex::new(SessionState::LoggedOut),
        }
    }

    /// Current session token, if logged in.
    pub async fn token(&self) -> Option<String> {
        self.state.lock().await.token().map(str::to_string)
    }

    pub async fn is_logged_in(&self) -> bool {
        self.state.lock().await.token().is_some()
    }

    /// Drop the cached session so the next call logs in again.
    pub async fn invalidate(&self) {
        let mut state = self.state.lock().await;
        if *state != SessionState::LoggedOut {
            tracing::info!("Invalidating session for {}", self.credentials.url);
        }
        *state = SessionState::LoggedOut;
    }

    /// Drop the session only if it still holds `token`.
    ///
    /// A caller that was rejected with an old token must not clear a session
    /// another caller has already renewed.
    pub async fn invalidate_token(&self, token: &str) {
        let mut state = self.state.lock().await;
        if state.token() != Some(token) {
            tracing::debug!("Session already renewed; keeping it");
            return;
        }
        tracing::info!("Invalidating session for {}", self.credentials.url);
        *state = SessionState::LoggedOut;
    }

    /// Make sure an authorized session exists and return its token.
    ///
    /// The state lock is held for the whole login sequence.
    pub async fn ensure_logged_in(&self) -> ApiResult<String> {
        let mut state = self.state.lock().await;
        if let Some(token) = state.token() {
            return Ok(token.to_string());
        }

        *state = SessionState::LoggedOut;
        let result = if self.credentials.is_anonymous() {
            self.anonymous_login().await
        } else {
            self.challenge_login().await
        };

        match result {
            Ok(token) => {
                tracing::info!("Logged in to {}", self.credentials.url);
                *state = SessionState::LoggedIn {
                    token: token.clone(),
                };
                Ok(token)
            }
            Err(e) => {
                tracing::warn!("Login to {} failed: {}", self.credentials.url, e);
                Err(e)
            }
        }
    }

    async fn anonymous_login(&self) -> ApiResult<String> {
        tracing::debug!("Starting anonymous login");
        let failed = || ApiError::Authentication(messages::ANONYMOUS_LOGIN_FAILED.to_string());

        let resp = self
            .transport
            .post("login", &Params::new())
            .await
            .map_err(|e| match e {
                ApiError::Transport(_) => e,
                _ => failed(),
            })?;

        if !is_success(&resp) {
            return Err(failed());
        }
        match resp.get("session").and_then(Value::as_str) {
            Some(token) if !token.is_empty() => Ok(token.to_string()),
            _ => Err(failed()),
        }
    }

    async fn challenge_login(&self) -> ApiResult<String> {
        let username = &self.credentials.username;
        tracing::debug!("Requesting login challenge for {}", username);

        let mut params = Params::new();
        params.insert("username".to_string(), username.clone());
        let resp = self.transport.post("salt", &params).await.map_err(|e| match e {
            ApiError::Transport(_) => e,
            _ => ApiError::invalid_credentials(),
        })?;

        // A missing salt is how the server reports an unknown user.
        if !resp.get("salt").is_some_and(Value::is_string) {
            return Err(ApiError::invalid_credentials());
        }
        let challenge: Challenge = serde_json::from_value(resp)?;

        let proof = answer_challenge(&self.credentials, &challenge);

        let mut params = Params::new();
        params.insert("username".to_string(), username.clone());
        params.insert("password".to_string(), proof);
        params.insert(SESSION_PARAM.to_string(), challenge.session_seed.clone());

        let resp = self.transport.post("login", &params).await.map_err(|e| match e {
            ApiError::Transport(_) => e,
            _ => ApiError::invalid_credentials(),
        })?;

        if !is_success(&resp) {
            return Err(ApiError::invalid_credentials());
        }
        Ok(challenge.session_seed)
    }

    /// Issue an authenticated action call.
    ///
    /// Authentication and protocol failures clear the session so the next call
    /// starts from a clean login.
    pub async fn call(&self, action: &str, mut params: Params) -> ApiResult<Value> {
        let token = self.ensure_logged_in().await?;
        params.insert(SESSION_PARAM.to_string(), token.clone());

        let resp = match self.transport.post(action, &params).await {
            Ok(resp) => resp,
            Err(e) => {
                if e.clears_session() {
                    self.invalidate_token(&token).await;
                }
                return Err(e);
            }
        };

        if resp.get("error").and_then(Value::as_i64) == Some(1) {
            tracing::warn!("Server rejected session on action {}", action);
            self.invalidate_token(&token).await;
            return Err(ApiError::Authentication(
                messages::SESSION_EXPIRED.to_string(),
            ));
        }
        Ok(resp)
    }
}

fn is_success(resp: &Value) -> bool {
    resp.get("success").and_then(Value::as_bool).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::testing::ScriptedTransport;
    use serde_json::json;

    fn manager(transport: &Arc<ScriptedTransport>, username: &str) -> SessionManager {
        SessionManager::new(
            transport.clone(),
            Credentials::new("http://backup.local/x", username, "secret"),
        )
    }

    fn challenge() -> Value {
        json!({"salt": "s4lt", "rnd": "rnd-key", "ses": "pre-auth", "pbkdf2_rounds": 10})
    }

    #[tokio::test]
    async fn test_anonymous_login() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push(json!({"success": true, "session": "anon-token"}));
        let session = manager(&transport, "");

        let token = session.ensure_logged_in().await.unwrap();
        assert_eq!(token, "anon-token");
        assert_eq!(transport.actions(), vec!["login"]);
        assert!(transport.calls()[0].1.is_empty());
    }

    #[tokio::test]
    async fn test_anonymous_login_rejected() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push(json!({"success": false}));
        let session = manager(&transport, "");

        let err = session.ensure_logged_in().await.unwrap_err();
        assert_eq!(
            err,
            ApiError::Authentication(messages::ANONYMOUS_LOGIN_FAILED.to_string())
        );
        assert!(!session.is_logged_in().await);
        assert_eq!(session.token().await, None);
    }

    #[tokio::test]
    async fn test_challenge_login_sends_proof() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push(challenge()).push(json!({"success": true}));
        let session = manager(&transport, "admin");

        let token = session.ensure_logged_in().await.unwrap();
        assert_eq!(token, "pre-auth");

        let calls = transport.calls();
        assert_eq!(calls[0].0, "salt");
        assert_eq!(calls[0].1["username"], "admin");
        assert_eq!(calls[1].0, "login");
        assert_eq!(calls[1].1["ses"], "pre-auth");
        assert_eq!(
            calls[1].1["password"],
            crate::auth::derive_password_proof("secret", "s4lt", 10, "rnd-key")
        );
        assert!(!calls[1].1.values().any(|v| v == "secret"));
    }

    #[tokio::test]
    async fn test_second_ensure_is_free() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push(challenge()).push(json!({"success": true}));
        let session = manager(&transport, "admin");

        session.ensure_logged_in().await.unwrap();
        let calls_after_login = transport.call_count();
        session.ensure_logged_in().await.unwrap();
        session.ensure_logged_in().await.unwrap();
        assert_eq!(transport.call_count(), calls_after_login);
    }

    #[tokio::test]
    async fn test_unknown_user_is_generic_failure() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push(json!({"error": "unknown user"}));
        let session = manager(&transport, "nobody");

        let err = session.ensure_logged_in().await.unwrap_err();
        assert_eq!(err, ApiError::invalid_credentials());
        assert_eq!(transport.call_count(), 1);
        assert_eq!(session.token().await, None);
    }

    #[tokio::test]
    async fn test_wrong_password_leaves_no_token() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push(challenge()).push(json!({"success": false}));
        let session = manager(&transport, "admin");

        let err = session.ensure_logged_in().await.unwrap_err();
        assert_eq!(err, ApiError::invalid_credentials());
        assert!(!session.is_logged_in().await);
        assert_eq!(session.token().await, None);
    }

    #[tokio::test]
    async fn test_failed_login_is_not_retried() {
        let transport = Arc::new(ScriptedTransport::new());
        transport
            .push(challenge())
            .push(json!({"success": false}))
            .push(challenge())
            .push(json!({"success": true}));
        let session = manager(&transport, "admin");

        assert!(session.ensure_logged_in().await.is_err());
        assert_eq!(transport.call_count(), 2);
        assert!(session.ensure_logged_in().await.is_ok());
        assert_eq!(transport.call_count(), 4);
    }

    #[tokio::test]
    async fn test_rejected_challenge_is_generic_failure() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_err(ApiError::Authentication(messages::SESSION_EXPIRED.to_string()));
        let session = manager(&transport, "admin");

        let err = session.ensure_logged_in().await.unwrap_err();
        assert_eq!(err, ApiError::invalid_credentials());
        assert_eq!(session.token().await, None);
    }

    #[tokio::test]
    async fn test_stale_token_does_not_clear_renewed_session() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push(json!({"success": true, "session": "fresh-token"}));
        let session = manager(&transport, "");
        session.ensure_logged_in().await.unwrap();

        session.invalidate_token("old-token").await;
        assert_eq!(session.token().await.as_deref(), Some("fresh-token"));

        session.invalidate_token("fresh-token").await;
        assert_eq!(session.token().await, None);
    }

    #[tokio::test]
    async fn test_transport_failure_propagates() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_err(ApiError::Transport("connection refused".into()));
        let session = manager(&transport, "admin");

        let err = session.ensure_logged_in().await.unwrap_err();
        assert_eq!(err.error_code(), "TRANSPORT_ERROR");
    }

    #[tokio::test]
    async fn test_call_attaches_token() {
        let transport = Arc::new(ScriptedTransport::new());
        transport
            .push(json!({"success": true, "session": "anon-token"}))
            .push(json!({"status": []}));
        let session = manager(&transport, "");

        session.call("status", Params::new()).await.unwrap();
        let calls = transport.calls();
        assert_eq!(calls[1].0, "status");
        assert_eq!(calls[1].1[SESSION_PARAM], "anon-token");
    }

    #[tokio::test]
    async fn test_rejected_session_is_cleared() {
        let transport = Arc::new(ScriptedTransport::new());
        transport
            .push(json!({"success": true, "session": "anon-token"}))
            .push(json!({"error": 1}))
            .push(json!({"success": true, "session": "fresh-token"}))
            .push(json!({"status": []}));
        let session = manager(&transport, "");

        let err = session.call("status", Params::new()).await.unwrap_err();
        assert_eq!(err.error_code(), "AUTHENTICATION_ERROR");
        assert!(!session.is_logged_in().await);

        session.call("status", Params::new()).await.unwrap();
        assert_eq!(session.token().await.as_deref(), Some("fresh-token"));
        assert_eq!(transport.actions(), vec!["login", "status", "login", "status"]);
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_login() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push(challenge()).push(json!({"success": true}));
        let session = Arc::new(manager(&transport, "admin"));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let session = session.clone();
                tokio::spawn(async move { session.ensure_logged_in().await })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), "pre-auth");
        }
        assert_eq!(transport.actions(), vec!["salt", "login"]);
    }
}
