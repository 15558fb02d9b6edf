//! Running and finished backup activities from the `progress` action.

use serde::{Deserialize, Serialize};

use super::{lenient_bool, lenient_i64};

/// A running (or paused) activity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub id: i64,
    #[serde(rename = "clientid", default, deserialize_with = "lenient_i64")]
    pub client_id: i64,
    /// Client name
    #[serde(default)]
    pub name: String,
    /// Activity code
    #[serde(default, deserialize_with = "lenient_i64")]
    pub action: i64,
    /// Percent done; negative while indeterminate
    #[serde(rename = "pcdone", default, deserialize_with = "lenient_i64")]
    pub percent_done: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub queue: i64,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub paused: bool,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub eta_ms: i64,
    #[serde(rename = "speed_bpms", default)]
    pub speed_bytes_per_ms: f64,
    #[serde(default)]
    pub details: String,
}

/// A finished activity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PastActivity {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub id: i64,
    #[serde(rename = "clientid", default, deserialize_with = "lenient_i64")]
    pub client_id: i64,
    #[serde(default)]
    pub name: String,
    /// Epoch seconds the backup finished
    #[serde(rename = "backuptime", default, deserialize_with = "lenient_i64")]
    pub backup_time: i64,
    /// Seconds
    #[serde(default, deserialize_with = "lenient_i64")]
    pub duration: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub size_bytes: i64,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub incremental: bool,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub image: bool,
    #[serde(rename = "del", default, deserialize_with = "lenient_bool")]
    pub deletion: bool,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub restore: bool,
    #[serde(default)]
    pub details: String,
}

/// Current and last activities of one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Activities {
    pub current: Vec<Activity>,
    pub last: Vec<PastActivity>,
}
