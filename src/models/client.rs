//! Per-client backup status as reported by the `status` action.

use serde::{Deserialize, Serialize};

use super::{lenient_bool, lenient_i64};

/// One backup client in a status snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientStatus {
    #[serde(deserialize_with = "lenient_i64")]
    pub id: i64,
    pub name: String,
    /// Empty string is the default group
    #[serde(rename = "groupname", default)]
    pub group: String,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub delete_pending: bool,

    #[serde(default, deserialize_with = "lenient_bool")]
    pub file_ok: bool,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub file_disabled: bool,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub last_filebackup_issues: i64,
    /// Epoch seconds of the last file backup; 0 = never
    #[serde(rename = "lastbackup", default, deserialize_with = "lenient_i64")]
    pub last_file_backup: i64,

    #[serde(default, deserialize_with = "lenient_bool")]
    pub image_ok: bool,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub image_disabled: bool,
    /// Epoch seconds of the last image backup; 0 = never
    #[serde(rename = "lastbackup_image", default, deserialize_with = "lenient_i64")]
    pub last_image_backup: i64,

    #[serde(default, deserialize_with = "lenient_bool")]
    pub online: bool,
    /// Epoch seconds of the last contact; 0 = never
    #[serde(rename = "lastseen", default, deserialize_with = "lenient_i64")]
    pub last_seen: i64,
    /// Current activity code; 0 = idle
    #[serde(rename = "status", default, deserialize_with = "lenient_i64")]
    pub activity: i64,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub outdated: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_version_string: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_version_string: Option<String>,
}

impl ClientStatus {
    pub fn is_active(&self) -> bool {
        self.activity != 0
    }
}
