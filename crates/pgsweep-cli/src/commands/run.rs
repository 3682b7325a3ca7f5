//! Run command - execute a full maintenance window.

use anyhow::Result;
use clap::Args;

use pgsweep_core::{ExitStatus, RunConfig};

use crate::{wiring, Settings};

/// Arguments for the run command.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Show what will happen without executing statements or sending
    /// notifications.
    #[arg(long)]
    pub dry_run: bool,

    /// Skip the job wait and proceed immediately (dangerous).
    #[arg(long)]
    pub force: bool,

    /// Maximum seconds to wait for in-flight jobs.
    #[arg(long, default_value = "300")]
    pub max_wait: u64,

    /// Seconds between job-count polls.
    #[arg(long, default_value = "10")]
    pub poll_interval: u64,

    /// Slack channel for notifications.
    #[arg(long, default_value = "#general")]
    pub slack_channel: String,
}

/// Execute the run command.
///
/// # Errors
///
/// Returns an error if wiring fails, the drain check times out, or any
/// schema fails compaction — all of which exit non-zero.
pub async fn execute(args: RunArgs, settings: &Settings) -> Result<()> {
    let orchestrator = wiring::build_orchestrator(settings).await?;

    let config = RunConfig {
        dry_run: args.dry_run,
        force: args.force,
        max_wait_secs: args.max_wait,
        poll_interval_secs: args.poll_interval,
        slack_channel: args.slack_channel,
    };

    let report = orchestrator.run(&config).await?;

    if !report.drained {
        anyhow::bail!("Jobs timeout exceeded. Use --force to proceed anyway (dangerous).");
    }

    println!("Maintenance completed.");
    println!("  Total schemas: {}", report.summary.total);
    println!("  Successful:    {}", report.summary.succeeded);
    println!("  Failed:        {}", report.summary.failed);

    for outcome in report.outcomes.iter().filter(|o| !o.succeeded) {
        println!(
            "  {} failed: {}",
            outcome.schema,
            outcome.error.as_deref().unwrap_or("unknown error")
        );
    }

    if report.status == ExitStatus::Failure {
        anyhow::bail!("{} schema(s) failed compaction", report.summary.failed);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(clap::Parser)]
    struct TestCli {
        #[command(flatten)]
        args: RunArgs,
    }

    #[test]
    fn run_args_defaults() {
        use clap::Parser;

        let cli = TestCli::parse_from(["test"]);
        assert!(!cli.args.dry_run);
        assert!(!cli.args.force);
        assert_eq!(cli.args.max_wait, 300);
        assert_eq!(cli.args.poll_interval, 10);
        assert_eq!(cli.args.slack_channel, "#general");
    }

    #[test]
    fn run_args_overrides() {
        use clap::Parser;

        let cli = TestCli::parse_from([
            "test",
            "--dry-run",
            "--force",
            "--max-wait",
            "60",
            "--poll-interval",
            "5",
            "--slack-channel",
            "#ops",
        ]);
        assert!(cli.args.dry_run);
        assert!(cli.args.force);
        assert_eq!(cli.args.max_wait, 60);
        assert_eq!(cli.args.poll_interval, 5);
        assert_eq!(cli.args.slack_channel, "#ops");
    }
}
