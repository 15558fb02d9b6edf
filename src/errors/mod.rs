//! Error handling module for the backup report client.
//!
//! Provides a single error type with stable error codes. Every failure path in the
//! client surfaces as one of these variants rather than a default value.

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const AUTHENTICATION_ERROR: &str = "AUTHENTICATION_ERROR";
    pub const PROTOCOL_ERROR: &str = "PROTOCOL_ERROR";
    pub const INVALID_POLICY: &str = "INVALID_POLICY";
    pub const TRANSPORT_ERROR: &str = "TRANSPORT_ERROR";
    pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
}

/// Standard messages shared between the session manager and the accessors.
pub mod messages {
    pub const ANONYMOUS_LOGIN_FAILED: &str = "anonymous login failed";
    pub const INVALID_CREDENTIALS: &str = "invalid username or password";
    pub const MALFORMED_RESPONSE: &str = "missing or malformed response values";
    pub const SESSION_EXPIRED: &str = "session expired";
}

/// Client error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Bad credentials, rejected anonymous login or a rejected session
    Authentication(String),
    /// Response is missing expected fields
    Protocol(String),
    /// Contradictory classification options
    InvalidPolicy(String),
    /// Network failure, timeout or non-success HTTP status
    Transport(String),
    /// Unusable configuration value
    Config(String),
}

impl ApiError {
    /// Shorthand for the generic credential failure.
    pub fn invalid_credentials() -> Self {
        ApiError::Authentication(messages::INVALID_CREDENTIALS.to_string())
    }

    /// Shorthand for a response that does not match the expected shape.
    pub fn malformed_response() -> Self {
        ApiError::Protocol(messages::MALFORMED_RESPONSE.to_string())
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Authentication(_) => codes::AUTHENTICATION_ERROR,
            ApiError::Protocol(_) => codes::PROTOCOL_ERROR,
            ApiError::InvalidPolicy(_) => codes::INVALID_POLICY,
            ApiError::Transport(_) => codes::TRANSPORT_ERROR,
            ApiError::Config(_) => codes::CONFIG_ERROR,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            ApiError::Authentication(msg) => msg.clone(),
            ApiError::Protocol(msg) => msg.clone(),
            ApiError::InvalidPolicy(msg) => msg.clone(),
            ApiError::Transport(msg) => msg.clone(),
            ApiError::Config(msg) => msg.clone(),
        }
    }

    /// Whether this error must drop the cached session.
    pub fn clears_session(&self) -> bool {
        matches!(self, ApiError::Authentication(_) | ApiError::Protocol(_))
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        tracing::error!("Transport error: {:?}", err);
        if err.is_timeout() {
            ApiError::Transport(format!("request timed out: {}", err))
        } else {
            ApiError::Transport(format!("request failed: {}", err))
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON error: {:?}", err);
        ApiError::Protocol(format!("{}: {}", messages::MALFORMED_RESPONSE, err))
    }
}

/// Result alias used throughout the client.
pub type ApiResult<T> = Result<T, ApiError>;
