//! Wire models for the backup server's JSON action protocol.
//!
//! Field names follow the server's JSON keys; Rust-side names say what the value means.

mod activity;
mod client;
mod log;
mod usage;
mod user;

pub use activity::*;
pub use client::*;
pub use log::*;
pub use usage::*;
pub use user::*;

use serde::{de, Deserialize, Deserializer};
use serde_json::Value;

/// Accept a boolean reported as a JSON bool, a number or a string.
///
/// The server is inconsistent here: `delete_pending` arrives as `""`/`"1"`, other
/// flags as real booleans.
pub(crate) fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(false),
        Value::Bool(b) => Ok(b),
        Value::Number(n) => Ok(n.as_f64().is_some_and(|v| v != 0.0)),
        Value::String(s) => match s.trim() {
            "" | "0" | "false" => Ok(false),
            "1" | "true" => Ok(true),
            other => Err(de::Error::custom(format!("invalid boolean: {}", other))),
        },
        other => Err(de::Error::custom(format!("invalid boolean: {}", other))),
    }
}

/// Accept an integer reported as a JSON number or a numeric string.
pub(crate) fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(0),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|v| v.round() as i64))
            .ok_or_else(|| de::Error::custom(format!("invalid integer: {}", n))),
        Value::String(s) if s.trim().is_empty() => Ok(0),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid integer: {}", s))),
        other => Err(de::Error::custom(format!("invalid integer: {}", other))),
    }
}
