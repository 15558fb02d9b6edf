//! Storage usage.

use super::ServerClient;
use crate::errors::ApiResult;
use crate::models::UsageEntry;
use crate::transport::Params;

impl ServerClient {
    pub async fn get_usage(&self) -> ApiResult<Vec<UsageEntry>> {
        self.fetch_field("usage", Params::new(), "usage").await
    }

    /// Usage of one client by exact name. No match is `None`.
    pub async fn get_client_usage(&self, name: &str) -> ApiResult<Option<UsageEntry>> {
        Ok(self.get_usage().await?.into_iter().find(|u| u.name == name))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::anonymous_client;
    use serde_json::json;

    #[tokio::test]
    async fn test_usage() {
        let (client, transport) = anonymous_client();
        transport
            .push(json!({"usage": [
                {"name": "alpha", "files": 100, "images": 200, "used": 300},
                {"name": "beta", "files": "5", "images": 0, "used": 5}
            ]}))
            .push(json!({"usage": [{"name": "alpha", "files": 1, "images": 2, "used": 3}]}));

        let all = client.get_usage().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].files, 5);

        assert_eq!(client.get_client_usage("beta").await.unwrap(), None);
        // one login for both calls
        assert_eq!(transport.actions(), vec!["login", "usage", "usage"]);
    }
}
