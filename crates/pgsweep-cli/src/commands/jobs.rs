//! Jobs command - show the current in-flight job count.

use anyhow::Result;

use pgsweep_core::jobs::JobCounter;

use crate::{wiring, Settings};

/// Execute the jobs command.
///
/// # Errors
///
/// Returns an error if the queue backend is unreachable.
pub async fn execute(settings: &Settings) -> Result<()> {
    let counter = wiring::job_counter(settings).await?;
    let count = counter.in_flight().await?;

    println!("{count} job(s) in flight on the {:?} backend", settings.queue_backend);

    Ok(())
}
