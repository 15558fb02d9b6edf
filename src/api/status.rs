//! Status snapshot, category queries and client name/id resolution.

use super::ServerClient;
use crate::classify::{classify_now, Category, ClassificationPolicy};
use crate::errors::ApiResult;
use crate::models::ClientStatus;
use crate::transport::Params;

/// Which clients a raw status fetch returns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusFilter {
    pub include_removed: bool,
    /// `Some("")` selects the default group
    pub group_name: Option<String>,
}

impl ServerClient {
    /// Fetch the status snapshot.
    pub async fn get_status(&self, filter: &StatusFilter) -> ApiResult<Vec<ClientStatus>> {
        let clients: Vec<ClientStatus> = self.fetch_field("status", Params::new(), "status").await?;

        Ok(clients
            .into_iter()
            .filter(|c| filter.include_removed || !c.delete_pending)
            .filter(|c| filter.group_name.as_ref().map_or(true, |g| c.group == *g))
            .collect())
    }

    /// Every client the server knows, including those pending removal.
    pub async fn get_all_clients(&self) -> ApiResult<Vec<ClientStatus>> {
        self.get_status(&StatusFilter {
            include_removed: true,
            group_name: None,
        })
        .await
    }

    /// Clients of one category. The policy is checked before any network call.
    pub async fn get_clients(
        &self,
        category: Category,
        policy: &ClassificationPolicy,
    ) -> ApiResult<Vec<ClientStatus>> {
        policy.validate()?;
        let snapshot = self.get_all_clients().await?;
        let selected = classify_now(category, &snapshot, policy)?;
        tracing::debug!(
            "Category {} selected {} of {} clients",
            category,
            selected.len(),
            snapshot.len()
        );
        Ok(selected)
    }

    /// Exact, case-sensitive lookup by name. No match is `None`.
    pub async fn get_client_status(&self, name: &str) -> ApiResult<Option<ClientStatus>> {
        Ok(self
            .get_all_clients()
            .await?
            .into_iter()
            .find(|c| c.name == name))
    }

    pub async fn get_client_id(&self, name: &str) -> ApiResult<Option<i64>> {
        Ok(self.get_client_status(name).await?.map(|c| c.id))
    }

    pub async fn get_client_name(&self, id: i64) -> ApiResult<Option<String>> {
        Ok(self
            .get_all_clients()
            .await?
            .into_iter()
            .find(|c| c.id == id)
            .map(|c| c.name))
    }
}
