//! Storage usage per client from the `usage` action.

use serde::{Deserialize, Serialize};

use super::lenient_i64;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageEntry {
    /// Client name
    pub name: String,
    /// Bytes used by file backups
    #[serde(default, deserialize_with = "lenient_i64")]
    pub files: i64,
    /// Bytes used by image backups
    #[serde(default, deserialize_with = "lenient_i64")]
    pub images: i64,
    /// Total bytes
    #[serde(default, deserialize_with = "lenient_i64")]
    pub used: i64,
}
