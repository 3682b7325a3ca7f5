//! End-to-end maintenance-window orchestration.
//!
//! One component drives the whole window: disable traffic, pause
//! workers, drain in-flight jobs, compact each tenant schema in turn,
//! then resume workers and re-enable traffic. Error handling is
//! deliberately uneven across phases:
//!
//! - worker pause/resume and notification delivery are best-effort
//!   (logged, never fatal);
//! - one schema's compaction failure is counted and reported, and the
//!   loop continues with the next schema;
//! - a drain timeout aborts before schema maintenance and returns with
//!   workers still paused and traffic still disabled — recovering from
//!   that state is a manual operator step;
//! - a traffic-gate disable failure or a discovery failure is fatal and
//!   propagates.

use std::sync::Arc;

use crate::compact::CompactionExecutor;
use crate::config::RunConfig;
use crate::drain::{wait_for_drain, DrainOutcome};
use crate::error::Result;
use crate::gate::TrafficGate;
use crate::jobs::JobCounter;
use crate::schema::SchemaCatalog;
use crate::slack::{mrkdwn_section, notify, Notifier};
use crate::workers::WorkerControl;

/// Maximum characters of a compaction error carried into outcomes and
/// notifications.
pub const ERROR_MESSAGE_LIMIT: usize = 500;

/// Final status of a maintenance run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// Drain succeeded (or was skipped) and every schema compacted.
    Success,
    /// The drain timed out or at least one schema failed.
    Failure,
}

impl ExitStatus {
    /// Process exit code for this status.
    #[must_use]
    pub fn code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::Failure => 1,
        }
    }
}

/// Outcome of one schema's compaction. Produced at most once per schema
/// per run and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct SchemaOutcome {
    /// Schema that was processed.
    pub schema: String,
    /// Whether compaction succeeded (always true in dry-run).
    pub succeeded: bool,
    /// Error text, truncated to [`ERROR_MESSAGE_LIMIT`] characters.
    pub error: Option<String>,
}

/// Aggregated counts over all schema outcomes.
///
/// `succeeded + failed == total` always holds at completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Schemas discovered and processed.
    pub total: usize,
    /// Schemas that compacted successfully.
    pub succeeded: usize,
    /// Schemas whose compaction failed.
    pub failed: usize,
}

impl RunSummary {
    /// Folds a summary out of per-schema outcomes.
    #[must_use]
    pub fn from_outcomes(outcomes: &[SchemaOutcome]) -> Self {
        let succeeded = outcomes.iter().filter(|o| o.succeeded).count();
        Self {
            total: outcomes.len(),
            succeeded,
            failed: outcomes.len() - succeeded,
        }
    }
}

/// Everything a caller needs to report a finished (or aborted) run.
#[derive(Debug)]
pub struct RunReport {
    /// Aggregated schema counts.
    pub summary: RunSummary,
    /// Per-schema outcomes in processing order.
    pub outcomes: Vec<SchemaOutcome>,
    /// Whether the drain check passed (true when skipped via force).
    pub drained: bool,
    /// Overall exit status.
    pub status: ExitStatus,
}

/// Drives a maintenance window end to end.
pub struct MaintenanceOrchestrator {
    workers: Arc<dyn WorkerControl>,
    jobs: Arc<dyn JobCounter>,
    catalog: Arc<dyn SchemaCatalog>,
    compactor: Arc<dyn CompactionExecutor>,
    notifier: Arc<dyn Notifier>,
    gate: Arc<dyn TrafficGate>,
}

impl MaintenanceOrchestrator {
    /// Creates an orchestrator over the given collaborators.
    #[must_use]
    pub fn new(
        workers: Arc<dyn WorkerControl>,
        jobs: Arc<dyn JobCounter>,
        catalog: Arc<dyn SchemaCatalog>,
        compactor: Arc<dyn CompactionExecutor>,
        notifier: Arc<dyn Notifier>,
        gate: Arc<dyn TrafficGate>,
    ) -> Self {
        Self {
            workers,
            jobs,
            catalog,
            compactor,
            notifier,
            gate,
        }
    }

    /// Runs a single maintenance window.
    ///
    /// # Errors
    ///
    /// Returns an error only for failures fatal to the whole run:
    /// disabling the traffic gate and discovering schemas. Everything
    /// else is handled internally and reflected in the [`RunReport`].
    pub async fn run(&self, config: &RunConfig) -> Result<RunReport> {
        tracing::info!(
            dry_run = config.dry_run,
            force = config.force,
            "starting maintenance window"
        );

        if !config.dry_run {
            self.gate.disable().await?;
            tracing::info!("traffic disabled");
        }

        self.pause_workers().await;

        if config.force {
            tracing::warn!("force mode: skipping job wait, proceeding immediately");
        } else {
            tracing::info!("checking for running jobs");
            if let DrainOutcome::TimedOut { remaining } =
                wait_for_drain(self.jobs.as_ref(), self.notifier.as_ref(), config).await
            {
                tracing::error!(
                    remaining_jobs = remaining,
                    "jobs timeout exceeded; aborting before schema maintenance"
                );
                // Workers stay paused and traffic stays disabled on this
                // path; see the module docs.
                return Ok(RunReport {
                    summary: RunSummary::default(),
                    outcomes: Vec::new(),
                    drained: false,
                    status: ExitStatus::Failure,
                });
            }
        }

        let schemas = self.catalog.list_schemas().await?;

        if schemas.is_empty() {
            tracing::warn!("no tenant schemas found; nothing to maintain");
        } else {
            tracing::info!(total = schemas.len(), schemas = ?schemas, "found tenant schemas");
            if !config.dry_run {
                self.send_schema_list(config, &schemas).await;
            }
        }

        let mut outcomes = Vec::with_capacity(schemas.len());
        for schema in &schemas {
            outcomes.push(self.compact_schema(config, schema).await);
        }

        let summary = RunSummary::from_outcomes(&outcomes);

        if !config.dry_run && !schemas.is_empty() {
            self.send_completion(config, summary).await;
        }

        self.resume_workers().await;

        if !config.dry_run {
            match self.gate.enable().await {
                Ok(()) => tracing::info!("traffic re-enabled; application is live again"),
                Err(e) => tracing::error!(error = %e, "failed to re-enable traffic"),
            }
        }

        let status = if summary.failed == 0 {
            ExitStatus::Success
        } else {
            ExitStatus::Failure
        };

        tracing::info!(
            total = summary.total,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "maintenance window finished"
        );

        Ok(RunReport {
            summary,
            outcomes,
            drained: true,
            status,
        })
    }

    async fn pause_workers(&self) {
        tracing::info!(backend = self.workers.name(), "pausing queue workers");
        if let Err(e) = self.workers.pause().await {
            tracing::warn!(error = %e, "unable to pause queue workers");
        }
    }

    async fn resume_workers(&self) {
        tracing::info!(backend = self.workers.name(), "resuming queue workers");
        if let Err(e) = self.workers.resume().await {
            tracing::warn!(error = %e, "unable to resume queue workers");
        }
    }

    async fn compact_schema(&self, config: &RunConfig, schema: &str) -> SchemaOutcome {
        tracing::info!(schema, "cleaning schema");

        if config.dry_run {
            tracing::info!(schema, "dry run: skipping VACUUM FULL");
            return SchemaOutcome {
                schema: schema.to_string(),
                succeeded: true,
                error: None,
            };
        }

        match self.compactor.compact(schema).await {
            Ok(()) => {
                tracing::info!(schema, "bloat cleared");
                notify(
                    self.notifier.as_ref(),
                    &config.slack_channel,
                    &format!("Schema maintenance completed: {schema}"),
                    vec![mrkdwn_section(&format!(
                        "✅ *Schema Maintenance Complete*\n\n\
                         • Schema: `{schema}`\n\
                         • Status: Success\n\
                         • VACUUM FULL: Complete"
                    ))],
                )
                .await;
                SchemaOutcome {
                    schema: schema.to_string(),
                    succeeded: true,
                    error: None,
                }
            }
            Err(e) => {
                let message = truncate_error(&e.to_string());
                tracing::error!(schema, error = %message, "error cleaning schema");
                notify(
                    self.notifier.as_ref(),
                    &config.slack_channel,
                    &format!("Schema maintenance failed: {schema}"),
                    vec![mrkdwn_section(&format!(
                        "❌ *Schema Maintenance Error*\n\n\
                         • Schema: `{schema}`\n\
                         • Status: Failed\n\
                         • Error: `{message}`"
                    ))],
                )
                .await;
                SchemaOutcome {
                    schema: schema.to_string(),
                    succeeded: false,
                    error: Some(message),
                }
            }
        }
    }

    async fn send_schema_list(&self, config: &RunConfig, schemas: &[String]) {
        let total = schemas.len();
        let list = schemas
            .iter()
            .map(|schema| format!("• `{schema}`"))
            .collect::<Vec<_>>()
            .join("\n");

        notify(
            self.notifier.as_ref(),
            &config.slack_channel,
            &format!("Database maintenance starting for {total} schema(s)"),
            vec![mrkdwn_section(&format!(
                "*📋 Database Maintenance - Schema List*\n\n\
                 Total schemas: {total}\n\n{list}"
            ))],
        )
        .await;
    }

    async fn send_completion(&self, config: &RunConfig, summary: RunSummary) {
        let RunSummary {
            total,
            succeeded,
            failed,
        } = summary;

        let text = if failed == 0 {
            format!(
                "✅ *Database Maintenance Completed*\n\n\
                 • Total schemas: {total}\n\
                 • Successful: {succeeded}\n\
                 • Failed: {failed}\n\
                 • Application is live again."
            )
        } else {
            format!(
                "⚠️ *Database Maintenance Completed (with errors)*\n\n\
                 • Total schemas: {total}\n\
                 • Successful: {succeeded}\n\
                 • Failed: {failed}\n\
                 • Application is live again."
            )
        };

        notify(
            self.notifier.as_ref(),
            &config.slack_channel,
            &format!("Database maintenance completed: {succeeded}/{total} schemas successful"),
            vec![mrkdwn_section(&text)],
        )
        .await;
    }
}

/// Truncates an error message to [`ERROR_MESSAGE_LIMIT`] characters.
fn truncate_error(message: &str) -> String {
    message.chars().take(ERROR_MESSAGE_LIMIT).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_errors_pass_through_untruncated() {
        assert_eq!(truncate_error("lock timeout"), "lock timeout");
    }

    #[test]
    fn long_errors_are_cut_at_the_limit() {
        let long = "x".repeat(800);
        let truncated = truncate_error(&long);
        assert_eq!(truncated.chars().count(), ERROR_MESSAGE_LIMIT);
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let long = "ü".repeat(600);
        let truncated = truncate_error(&long);
        assert_eq!(truncated.chars().count(), ERROR_MESSAGE_LIMIT);
    }

    #[test]
    fn summary_counts_add_up() {
        let outcomes = vec![
            SchemaOutcome {
                schema: "a".into(),
                succeeded: true,
                error: None,
            },
            SchemaOutcome {
                schema: "b".into(),
                succeeded: false,
                error: Some("boom".into()),
            },
            SchemaOutcome {
                schema: "c".into(),
                succeeded: true,
                error: None,
            },
        ];

        let summary = RunSummary::from_outcomes(&outcomes);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.succeeded + summary.failed, summary.total);
    }

    #[test]
    fn exit_codes() {
        assert_eq!(ExitStatus::Success.code(), 0);
        assert_eq!(ExitStatus::Failure.code(), 1);
    }
}
