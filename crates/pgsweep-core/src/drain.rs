//! Bounded wait for in-flight jobs to drain.
//!
//! The loop samples the job count at a fixed interval until the count
//! reaches zero or the wait budget elapses. Sampling errors are logged
//! and treated as zero so a flaky counter cannot wedge the window.
//! Periodic "still waiting" updates fire when the elapsed time passes
//! the minute mark on an exact multiple of 60 seconds; if the poll
//! interval does not divide 60 these updates may never fire.

use std::time::Duration;

use tokio::time::{sleep, Instant};

use crate::config::RunConfig;
use crate::jobs::JobCounter;
use crate::slack::{mrkdwn_section, notify, Notifier};

/// Result of the drain-check phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainOutcome {
    /// In-flight work reached zero within the wait budget.
    Drained,
    /// The wait budget elapsed with jobs still outstanding.
    TimedOut {
        /// Jobs still in flight when the budget elapsed.
        remaining: u64,
    },
}

/// Waits for the in-flight job count to reach zero.
///
/// Returns immediately (no sleeping, no notifications) when the initial
/// sample is already zero. Notifications here are sent regardless of
/// dry-run: the drain phase mutates nothing and operators watching the
/// channel want to see the wait either way. In dry-run the messages
/// carry a `[dry run]` tag so a rehearsal is distinguishable from a
/// real window.
pub async fn wait_for_drain(
    counter: &dyn JobCounter,
    notifier: &dyn Notifier,
    config: &RunConfig,
) -> DrainOutcome {
    let start = Instant::now();
    let initial = sample(counter).await;

    if initial == 0 {
        return DrainOutcome::Drained;
    }

    tracing::info!(jobs = initial, "found running jobs; waiting for completion");

    let tag = if config.dry_run { "[dry run] " } else { "" };
    let max_wait_minutes = minutes(config.max_wait_secs);
    notify(
        notifier,
        &config.slack_channel,
        &format!("{tag}Database maintenance waiting for {initial} job(s) to complete"),
        vec![mrkdwn_section(&format!(
            "{tag}⚠️ *Database Maintenance - Jobs In Progress*\n\n\
             • Running Jobs: {initial}\n\
             • Waiting for completion...\n\
             • Max wait time: {max_wait_minutes} minutes"
        ))],
    )
    .await;

    loop {
        sleep(Duration::from_secs(config.poll_interval_secs)).await;

        let count = sample(counter).await;
        let elapsed = start.elapsed().as_secs();

        tracing::info!(jobs = count, elapsed_secs = elapsed, "drain status");

        if count == 0 {
            tracing::info!("all jobs completed");
            notify(
                notifier,
                &config.slack_channel,
                &format!("{tag}All queue jobs completed. Starting database maintenance."),
                vec![mrkdwn_section(&format!(
                    "{tag}✅ *All Jobs Processed*\n\n\
                     • All queue jobs completed\n\
                     • Starting database maintenance now"
                ))],
            )
            .await;
            return DrainOutcome::Drained;
        }

        if elapsed >= config.max_wait_secs {
            tracing::warn!(
                jobs = count,
                max_wait_secs = config.max_wait_secs,
                "drain timeout reached with jobs still running"
            );
            notify(
                notifier,
                &config.slack_channel,
                &format!(
                    "{tag}Job timeout: {count} job(s) still running after {max_wait_minutes} minutes"
                ),
                vec![mrkdwn_section(&format!(
                    "{tag}⏰ *Job Timeout Warning*\n\n\
                     • Jobs still running after {max_wait_minutes} minutes\n\
                     • Remaining jobs: {count}\n\
                     • Manual intervention may be required"
                ))],
            )
            .await;
            return DrainOutcome::TimedOut { remaining: count };
        }

        if elapsed > 60 && elapsed % 60 == 0 {
            let remaining_minutes = minutes(config.max_wait_secs.saturating_sub(elapsed)).round();
            notify(
                notifier,
                &config.slack_channel,
                &format!(
                    "{tag}Still waiting: {count} job(s) running \
                     (about {remaining_minutes} minutes remaining)"
                ),
                vec![mrkdwn_section(&format!(
                    "{tag}⏳ *Update*\n\n\
                     • Remaining jobs: {count}\n\
                     • Time remaining: ~{remaining_minutes} minutes"
                ))],
            )
            .await;
        }
    }
}

async fn sample(counter: &dyn JobCounter) -> u64 {
    match counter.in_flight().await {
        Ok(count) => count,
        Err(e) => {
            tracing::warn!(error = %e, "unable to check running jobs");
            0
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn minutes(secs: u64) -> f64 {
    secs as f64 / 60.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minutes_renders_whole_values_without_fraction() {
        assert_eq!(format!("{} minutes", minutes(300)), "5 minutes");
        assert_eq!(format!("{} minutes", minutes(30)), "0.5 minutes");
    }
}
