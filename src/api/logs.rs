//! Incremental live log retrieval.

use super::ServerClient;
use crate::errors::ApiResult;
use crate::livelog::LogTarget;
use crate::models::LogEntry;
use crate::transport::Params;

impl ServerClient {
    /// Fetch live log entries for `target`.
    ///
    /// With `recent_only` only entries newer than the last fetch for the same
    /// target are requested. The cursor moves after every successful fetch.
    pub async fn get_live_log(&self, target: LogTarget, recent_only: bool) -> ApiResult<Vec<LogEntry>> {
        let last_id = self.log_cursor.start_after(target, recent_only).await;

        let mut params = Params::new();
        params.insert("lastid".to_string(), last_id.to_string());
        if let Some(client_id) = target.client_param() {
            params.insert("clientid".to_string(), client_id.to_string());
        }

        let entries: Vec<LogEntry> = self.fetch_field("livelog", params, "logdata").await?;
        self.log_cursor.advance(target, &entries).await;
        Ok(entries)
    }
}
