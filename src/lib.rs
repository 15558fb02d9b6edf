//! Backup report client
//!
//! A reporting client for a backup server's HTTP/JSON control API: challenge-response
//! login, typed snapshot accessors and client classification.

pub mod api;
pub mod auth;
pub mod classify;
pub mod config;
pub mod errors;
pub mod livelog;
pub mod models;
pub mod session;
pub mod transport;

pub use api::{ActivityFilter, ServerClient, StatusFilter};
pub use classify::{Category, ClassificationPolicy};
pub use errors::{ApiError, ApiResult};
pub use livelog::LogTarget;
