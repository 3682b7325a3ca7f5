//! Per-run configuration for a maintenance window.

/// Default bound on the drain wait, in seconds (5 minutes).
pub const DEFAULT_MAX_WAIT_SECS: u64 = 300;

/// Default interval between job-count polls, in seconds.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;

/// Default Slack channel for maintenance notifications.
pub const DEFAULT_SLACK_CHANNEL: &str = "#general";

/// Immutable configuration for a single maintenance run.
///
/// Constructed once at invocation and threaded through every phase;
/// nothing reads ambient process-wide settings after this point.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Log the plan without executing statements, toggling traffic, or
    /// sending (non-drain) notifications.
    pub dry_run: bool,
    /// Skip the drain check entirely and proceed immediately.
    pub force: bool,
    /// Maximum seconds to wait for in-flight jobs to drain.
    pub max_wait_secs: u64,
    /// Seconds between job-count polls during the drain check.
    pub poll_interval_secs: u64,
    /// Slack channel that receives maintenance notifications.
    pub slack_channel: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            dry_run: false,
            force: false,
            max_wait_secs: DEFAULT_MAX_WAIT_SECS,
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            slack_channel: DEFAULT_SLACK_CHANNEL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = RunConfig::default();
        assert!(!config.dry_run);
        assert!(!config.force);
        assert_eq!(config.max_wait_secs, 300);
        assert_eq!(config.poll_interval_secs, 10);
        assert_eq!(config.slack_channel, "#general");
    }
}
