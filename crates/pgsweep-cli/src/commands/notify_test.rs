//! Notify-test command - send a test message to Slack.

use anyhow::Result;
use clap::Args;

use pgsweep_core::slack::Notifier;

use crate::{wiring, Settings};

/// Arguments for the notify-test command.
#[derive(Debug, Args)]
pub struct NotifyTestArgs {
    /// Channel to post to.
    #[arg(long, default_value = "#general")]
    pub channel: String,

    /// Message text.
    #[arg(long, default_value = "pgsweep test notification")]
    pub message: String,
}

/// Execute the notify-test command.
///
/// # Errors
///
/// Returns an error if the notifier cannot be built or delivery fails.
pub async fn execute(args: NotifyTestArgs, settings: &Settings) -> Result<()> {
    let notifier = wiring::notifier(settings)?;

    if notifier.send_message(&args.channel, &args.message).await {
        println!("Test message delivered to {}.", args.channel);
        Ok(())
    } else {
        anyhow::bail!(
            "Slack delivery failed. Check PGSWEEP_SLACK_WEBHOOK_URL or PGSWEEP_SLACK_BOT_TOKEN."
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(clap::Parser)]
    struct TestCli {
        #[command(flatten)]
        args: NotifyTestArgs,
    }

    #[test]
    fn notify_test_defaults() {
        use clap::Parser;

        let cli = TestCli::parse_from(["test"]);
        assert_eq!(cli.args.channel, "#general");
        assert_eq!(cli.args.message, "pgsweep test notification");
    }
}
