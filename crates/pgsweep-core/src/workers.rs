//! Pausing and resuming background queue workers.
//!
//! Two production strategies exist, selected by configuration at
//! construction: a supervised worker-manager daemon driven over HTTP,
//! and a queue-level pause flag written directly to Redis. Exactly one
//! is active per run. Pause and resume are best-effort from the
//! orchestrator's point of view; a failure is logged and the run
//! continues.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use crate::error::{MaintenanceError, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Control surface for background worker fleets.
#[async_trait]
pub trait WorkerControl: Send + Sync {
    /// Backend name used in log lines.
    fn name(&self) -> &'static str;

    /// Stops workers from picking up new jobs.
    async fn pause(&self) -> Result<()>;

    /// Lets workers pick up jobs again.
    async fn resume(&self) -> Result<()>;
}

/// Drives a supervising worker-manager daemon over HTTP
/// (`POST {base}/pause`, `POST {base}/continue`).
pub struct SupervisedWorkerControl {
    client: reqwest::Client,
    base_url: String,
}

impl SupervisedWorkerControl {
    /// Creates a control for the manager at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| MaintenanceError::config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn post(&self, action: &str) -> Result<()> {
        let url = format!("{}/{action}", self.base_url);
        let response = self
            .client
            .post(&url)
            .send()
            .await
            .map_err(|e| MaintenanceError::worker_control(format!("{action} request failed: {e}")))?;

        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(MaintenanceError::worker_control(format!(
                "{action} rejected (status={status}): {body}"
            )))
        }
    }
}

#[async_trait]
impl WorkerControl for SupervisedWorkerControl {
    fn name(&self) -> &'static str {
        "supervised"
    }

    async fn pause(&self) -> Result<()> {
        self.post("pause").await
    }

    async fn resume(&self) -> Result<()> {
        self.post("continue").await
    }
}

/// Pauses consumption by flagging the queue in Redis; workers check the
/// flag before reserving jobs.
pub struct QueueFlagWorkerControl {
    conn: redis::aio::ConnectionManager,
    paused_key: String,
}

impl QueueFlagWorkerControl {
    /// Creates a control writing `<prefix>queues:<queue>:paused`.
    #[must_use]
    pub fn new(conn: redis::aio::ConnectionManager, prefix: &str, queue: &str) -> Self {
        Self {
            conn,
            paused_key: paused_key(prefix, queue),
        }
    }
}

#[async_trait]
impl WorkerControl for QueueFlagWorkerControl {
    fn name(&self) -> &'static str {
        "queue-flag"
    }

    async fn pause(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        let () = redis::cmd("SET")
            .arg(&self.paused_key)
            .arg(Utc::now().timestamp())
            .query_async(&mut conn)
            .await?;
        Ok(())
    }

    async fn resume(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        let _removed: i64 = redis::cmd("DEL")
            .arg(&self.paused_key)
            .query_async(&mut conn)
            .await?;
        Ok(())
    }
}

/// No-op control for deployments without a worker manager; pause and
/// resume only log that manual supervision may be needed.
pub struct NullWorkerControl;

#[async_trait]
impl WorkerControl for NullWorkerControl {
    fn name(&self) -> &'static str {
        "none"
    }

    async fn pause(&self) -> Result<()> {
        tracing::warn!("no worker manager configured; workers were not paused");
        Ok(())
    }

    async fn resume(&self) -> Result<()> {
        tracing::info!("no worker manager configured; nothing to resume");
        Ok(())
    }
}

/// Builds the pause-flag key for a queue.
#[must_use]
pub fn paused_key(prefix: &str, queue: &str) -> String {
    format!("{prefix}queues:{queue}:paused")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paused_key_includes_prefix_and_queue() {
        assert_eq!(paused_key("", "default"), "queues:default:paused");
        assert_eq!(paused_key("app:", "emails"), "app:queues:emails:paused");
    }

    #[test]
    fn supervised_control_trims_trailing_slash() {
        let control = SupervisedWorkerControl::new("http://localhost:6001/").unwrap();
        assert_eq!(control.base_url, "http://localhost:6001");
    }
}
