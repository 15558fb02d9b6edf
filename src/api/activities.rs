//! Running and finished activities.

use super::ServerClient;
use crate::errors::ApiResult;
use crate::models::{Activities, Activity, PastActivity};
use crate::transport::Params;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityFilter {
    /// Exact client name
    pub client_name: Option<String>,
}

impl ActivityFilter {
    fn admits(&self, name: &str) -> bool {
        self.client_name.as_deref().map_or(true, |n| n == name)
    }
}

impl ServerClient {
    pub async fn get_activities(&self, filter: &ActivityFilter) -> ApiResult<Activities> {
        let mut resp = self.session.call("progress", Params::new()).await?;
        let current: Vec<Activity> = self.take_field(&mut resp, "progress", "progress").await?;
        let last: Vec<PastActivity> = self.take_field(&mut resp, "progress", "lastacts").await?;

        Ok(Activities {
            current: current.into_iter().filter(|a| filter.admits(&a.name)).collect(),
            last: last.into_iter().filter(|a| filter.admits(&a.name)).collect(),
        })
    }

    pub async fn get_paused_activities(&self, filter: &ActivityFilter) -> ApiResult<Vec<Activity>> {
        Ok(self
            .get_activities(filter)
            .await?
            .current
            .into_iter()
            .filter(|a| a.paused)
            .collect())
    }
}
