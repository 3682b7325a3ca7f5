//! Traffic gating at the service boundary.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;

use crate::error::{MaintenanceError, Result};

/// Binary external toggle for normal request traffic.
#[async_trait]
pub trait TrafficGate: Send + Sync {
    /// Signals the boundary to reject or queue normal requests.
    async fn disable(&self) -> Result<()>;

    /// Restores normal request handling. Idempotent.
    async fn enable(&self) -> Result<()>;
}

/// Marker-file gate: the web tier serves maintenance responses while
/// the file exists.
pub struct FileTrafficGate {
    path: PathBuf,
}

impl FileTrafficGate {
    /// Creates a gate using the given marker path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl TrafficGate for FileTrafficGate {
    async fn disable(&self) -> Result<()> {
        let payload = json!({
            "time": Utc::now().to_rfc3339(),
            "message": "Scheduled database maintenance in progress",
        });

        tokio::fs::write(&self.path, payload.to_string())
            .await
            .map_err(|e| {
                MaintenanceError::traffic_gate(format!(
                    "failed to write marker {}: {e}",
                    self.path.display()
                ))
            })
    }

    async fn enable(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            // Already enabled.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(MaintenanceError::traffic_gate(format!(
                "failed to remove marker {}: {e}",
                self.path.display()
            ))),
        }
    }
}
