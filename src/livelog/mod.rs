//! Live log cursor.
//!
//! Remembers, per log target, the highest entry id already handed out so that
//! repeated polls only return new entries.

use std::collections::HashMap;

use tokio::sync::Mutex;

use crate::models::LogEntry;

/// Whose live log to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogTarget {
    Server,
    Client(i64),
}

impl LogTarget {
    /// Value of the `clientid` parameter; the server log is requested without one.
    pub fn client_param(&self) -> Option<i64> {
        match self {
            LogTarget::Server => None,
            LogTarget::Client(id) => Some(*id),
        }
    }
}

#[derive(Debug, Default)]
pub struct LogCursor {
    last_ids: Mutex<HashMap<LogTarget, i64>>,
}

impl LogCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id after which the next fetch should start.
    pub async fn start_after(&self, target: LogTarget, recent_only: bool) -> i64 {
        if !recent_only {
            return 0;
        }
        self.last_ids
            .lock()
            .await
            .get(&target)
            .copied()
            .unwrap_or(0)
    }

    pub async fn position(&self, target: LogTarget) -> Option<i64> {
        self.last_ids.lock().await.get(&target).copied()
    }

    /// Move the cursor to the last entry of a successful fetch. It never moves
    /// backwards, so a late overlapping fetch cannot replay handed-out entries.
    pub async fn advance(&self, target: LogTarget, entries: &[LogEntry]) {
        let Some(last) = entries.last() else {
            return;
        };
        tracing::debug!("Log cursor for {:?} moved to {}", target, last.id);
        self.last_ids
            .lock()
            .await
            .entry(target)
            .and_modify(|id| *id = (*id).max(last.id))
            .or_insert(last.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: i64) -> LogEntry {
        LogEntry {
            id,
            message: format!("line {}", id),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_cursor_starts_at_zero() {
        let cursor = LogCursor::new();
        assert_eq!(cursor.start_after(LogTarget::Server, true).await, 0);
        assert_eq!(cursor.position(LogTarget::Server).await, None);
    }

    #[tokio::test]
    async fn test_cursor_tracks_targets_separately() {
        let cursor = LogCursor::new();
        cursor.advance(LogTarget::Server, &[entry(4), entry(9)]).await;
        cursor.advance(LogTarget::Client(0), &[entry(2)]).await;

        assert_eq!(cursor.start_after(LogTarget::Server, true).await, 9);
        assert_eq!(cursor.start_after(LogTarget::Client(0), true).await, 2);
        assert_eq!(cursor.start_after(LogTarget::Client(7), true).await, 0);
        assert_eq!(cursor.start_after(LogTarget::Server, false).await, 0);
    }

    #[tokio::test]
    async fn test_empty_fetch_keeps_position() {
        let cursor = LogCursor::new();
        cursor.advance(LogTarget::Client(3), &[entry(11)]).await;
        cursor.advance(LogTarget::Client(3), &[]).await;
        assert_eq!(cursor.position(LogTarget::Client(3)).await, Some(11));
    }

    #[tokio::test]
    async fn test_cursor_never_moves_backwards() {
        let cursor = LogCursor::new();
        cursor.advance(LogTarget::Server, &[entry(11), entry(12)]).await;
        cursor.advance(LogTarget::Server, &[entry(9), entry(10)]).await;
        assert_eq!(cursor.position(LogTarget::Server).await, Some(12));
        assert_eq!(cursor.start_after(LogTarget::Server, true).await, 12);
    }

    #[test]
    fn test_client_param() {
        assert_eq!(LogTarget::Server.client_param(), None);
        assert_eq!(LogTarget::Client(0).client_param(), Some(0));
        assert_eq!(LogTarget::Client(12).client_param(), Some(12));
    }
}
