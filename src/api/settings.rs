//! Users, groups and settings.

use serde_json::{Map, Value};

use super::{params, ServerClient};
use crate::errors::ApiResult;
use crate::models::{Group, User};

impl ServerClient {
    pub async fn get_users(&self) -> ApiResult<Vec<User>> {
        self.fetch_field("settings", params([("sa", "listusers".to_string())]), "users")
            .await
    }

    pub async fn get_groups(&self) -> ApiResult<Vec<Group>> {
        self.fetch_field("settings", params([("sa", "listgroups".to_string())]), "groups")
            .await
    }

    pub async fn get_general_settings(&self) -> ApiResult<Map<String, Value>> {
        self.fetch_field("settings", params([("sa", "general".to_string())]), "settings")
            .await
    }

    /// Settings of one client by exact name. An unknown client is `None`.
    pub async fn get_client_settings(&self, name: &str) -> ApiResult<Option<Map<String, Value>>> {
        let Some(id) = self.get_client_id(name).await? else {
            return Ok(None);
        };
        let settings = self
            .fetch_field(
                "settings",
                params([
                    ("sa", "clientsettings".to_string()),
                    ("t_clientid", id.to_string()),
                ]),
                "settings",
            )
            .await?;
        Ok(Some(settings))
    }
}
