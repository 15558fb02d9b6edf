//! Server user accounts and client groups.

use serde::{Deserialize, Serialize};

use super::lenient_i64;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "lenient_i64")]
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub rights: Vec<UserRight>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserRight {
    pub domain: String,
    pub right: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Group {
    #[serde(deserialize_with = "lenient_i64")]
    pub id: i64,
    /// Empty string is the default group
    #[serde(default)]
    pub name: String,
}
