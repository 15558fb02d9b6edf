//! Live log entries from the `livelog` action.

use serde::{Deserialize, Serialize};

use super::lenient_i64;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(deserialize_with = "lenient_i64")]
    pub id: i64,
    #[serde(rename = "msg", default)]
    pub message: String,
    #[serde(rename = "loglevel", default, deserialize_with = "lenient_i64")]
    pub level: i64,
    /// Epoch seconds
    #[serde(default, deserialize_with = "lenient_i64")]
    pub time: i64,
}
