//! Builds production collaborators from CLI settings.

use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use pgsweep_core::compact::PgCompactionExecutor;
use pgsweep_core::gate::FileTrafficGate;
use pgsweep_core::jobs::{DatabaseJobCounter, JobCounter, NullJobCounter, RedisJobCounter};
use pgsweep_core::schema::PgSchemaCatalog;
use pgsweep_core::slack::{Notifier, SlackNotifier};
use pgsweep_core::workers::{
    NullWorkerControl, QueueFlagWorkerControl, SupervisedWorkerControl, WorkerControl,
};
use pgsweep_core::MaintenanceOrchestrator;

use crate::{QueueBackend, Settings};

/// Connects a small PostgreSQL pool from the configured URL.
///
/// # Errors
///
/// Returns an error if no database URL is configured or the connection
/// cannot be established.
pub async fn pg_pool(settings: &Settings) -> Result<PgPool> {
    let url = settings
        .database_url
        .as_deref()
        .context("Database URL is required. Set PGSWEEP_DATABASE_URL or use --database-url")?;

    PgPoolOptions::new()
        .max_connections(2)
        .connect(url)
        .await
        .context("Failed to connect to PostgreSQL")
}

/// Connects a managed Redis connection from the configured URL.
///
/// # Errors
///
/// Returns an error if no Redis URL is configured or the connection
/// cannot be established.
pub async fn redis_connection(settings: &Settings) -> Result<redis::aio::ConnectionManager> {
    let url = settings
        .redis_url
        .as_deref()
        .context("Redis URL is required. Set PGSWEEP_REDIS_URL or use --redis-url")?;

    let client = redis::Client::open(url).context("Invalid Redis URL")?;
    redis::aio::ConnectionManager::new(client)
        .await
        .context("Failed to connect to Redis")
}

/// Builds the in-flight job counter for the configured queue backend.
///
/// # Errors
///
/// Returns an error if the backend's store is unreachable.
pub async fn job_counter(settings: &Settings) -> Result<Arc<dyn JobCounter>> {
    match settings.queue_backend {
        QueueBackend::Database => Ok(Arc::new(DatabaseJobCounter::new(pg_pool(settings).await?))),
        QueueBackend::Redis => Ok(Arc::new(RedisJobCounter::new(
            redis_connection(settings).await?,
            &settings.redis_prefix,
            &settings.queue_name,
        ))),
        QueueBackend::Sync => Ok(Arc::new(NullJobCounter)),
    }
}

/// Builds the worker control: supervised when a worker-manager URL is
/// configured, queue-flag when Redis is available, otherwise a no-op.
///
/// # Errors
///
/// Returns an error if the selected backend cannot be constructed.
pub async fn worker_control(settings: &Settings) -> Result<Arc<dyn WorkerControl>> {
    if let Some(url) = &settings.worker_api_url {
        return Ok(Arc::new(SupervisedWorkerControl::new(url.clone())?));
    }

    if settings.redis_url.is_some() {
        return Ok(Arc::new(QueueFlagWorkerControl::new(
            redis_connection(settings).await?,
            &settings.redis_prefix,
            &settings.queue_name,
        )));
    }

    Ok(Arc::new(NullWorkerControl))
}

/// Builds the Slack notifier from webhook/token settings.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be constructed.
pub fn notifier(settings: &Settings) -> Result<Arc<dyn Notifier>> {
    let notifier = SlackNotifier::new(
        settings.slack_webhook_url.clone(),
        settings.slack_bot_token.clone(),
    )?;
    Ok(Arc::new(notifier))
}

/// Assembles the full orchestrator with production collaborators.
///
/// # Errors
///
/// Returns an error if any required connection cannot be established.
pub async fn build_orchestrator(settings: &Settings) -> Result<MaintenanceOrchestrator> {
    let pool = pg_pool(settings).await?;

    Ok(MaintenanceOrchestrator::new(
        worker_control(settings).await?,
        job_counter(settings).await?,
        Arc::new(PgSchemaCatalog::new(pool.clone())),
        Arc::new(PgCompactionExecutor::new(pool)),
        notifier(settings)?,
        Arc::new(FileTrafficGate::new(settings.gate_file.clone())),
    ))
}
