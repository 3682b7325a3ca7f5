//! # pgsweep-core
//!
//! Orchestration engine for maintenance windows on a multi-tenant
//! PostgreSQL database.
//!
//! A maintenance window is a single sequential runbook:
//!
//! 1. Disable external traffic at the service boundary.
//! 2. Pause background queue workers.
//! 3. Wait (bounded) for in-flight jobs to drain.
//! 4. Discover tenant schemas.
//! 5. Run `VACUUM FULL` against each schema, one at a time.
//! 6. Resume workers and re-enable traffic.
//!
//! Progress is reported through structured logs and best-effort Slack
//! notifications. Nothing here is transactional: side effects are
//! observable as they happen and there is no automatic rollback.
//!
//! Every external collaborator (worker manager, job counter, schema
//! catalog, compaction executor, notifier, traffic gate) sits behind a
//! trait so deployments can select backends by configuration and tests
//! can substitute in-memory fakes.
//!
//! # Example
//!
//! ```rust,ignore
//! use pgsweep_core::{MaintenanceOrchestrator, RunConfig};
//!
//! let orchestrator = MaintenanceOrchestrator::new(
//!     workers, jobs, catalog, compactor, notifier, gate,
//! );
//! let report = orchestrator.run(&RunConfig::default()).await?;
//! println!("{}/{} schemas compacted", report.summary.succeeded, report.summary.total);
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]

pub mod compact;
pub mod config;
pub mod drain;
pub mod error;
pub mod gate;
pub mod jobs;
pub mod observability;
pub mod orchestrator;
pub mod schema;
pub mod slack;
pub mod workers;

pub use config::RunConfig;
pub use drain::DrainOutcome;
pub use error::{MaintenanceError, Result};
pub use orchestrator::{
    ExitStatus, MaintenanceOrchestrator, RunReport, RunSummary, SchemaOutcome,
};
