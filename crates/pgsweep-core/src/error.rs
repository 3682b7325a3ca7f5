//! Error types and result alias for maintenance operations.

use thiserror::Error;

/// Result type alias for maintenance operations.
pub type Result<T> = std::result::Result<T, MaintenanceError>;

/// Errors that can occur while driving a maintenance window.
///
/// Only a subset of these is ever fatal to a run: the orchestrator
/// downgrades worker-control and notification failures to warnings and
/// isolates per-schema compaction failures. See the orchestrator module
/// for the full error-handling policy.
#[derive(Debug, Error)]
pub enum MaintenanceError {
    /// A PostgreSQL query or connection failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A command against the Redis queue store failed.
    #[error("queue store error: {0}")]
    QueueStore(#[from] redis::RedisError),

    /// A worker-manager pause/resume call failed.
    #[error("worker control error: {message}")]
    WorkerControl {
        /// Description of the worker-control failure.
        message: String,
    },

    /// The traffic gate could not be toggled.
    #[error("traffic gate error: {message}")]
    TrafficGate {
        /// Description of the gate failure.
        message: String,
    },

    /// Invalid or missing configuration.
    #[error("configuration error: {message}")]
    Config {
        /// Description of the configuration problem.
        message: String,
    },
}

impl MaintenanceError {
    /// Creates a worker-control error with the given message.
    #[must_use]
    pub fn worker_control(message: impl Into<String>) -> Self {
        Self::WorkerControl {
            message: message.into(),
        }
    }

    /// Creates a traffic-gate error with the given message.
    #[must_use]
    pub fn traffic_gate(message: impl Into<String>) -> Self {
        Self::TrafficGate {
            message: message.into(),
        }
    }

    /// Creates a configuration error with the given message.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructor_helpers_preserve_messages() {
        let err = MaintenanceError::worker_control("pause rejected");
        assert!(err.to_string().contains("pause rejected"));

        let err = MaintenanceError::traffic_gate("marker file unwritable");
        assert!(err.to_string().contains("marker file unwritable"));

        let err = MaintenanceError::config("missing webhook URL");
        assert!(matches!(err, MaintenanceError::Config { .. }));
    }
}
