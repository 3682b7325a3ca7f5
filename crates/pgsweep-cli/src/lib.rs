//! # pgsweep-cli
//!
//! Command-line interface for tenant database maintenance.
//!
//! ## Commands
//!
//! - `pgsweep run` - Execute a full maintenance window
//! - `pgsweep schemas` - List discovered tenant schemas
//! - `pgsweep jobs` - Show the current in-flight job count
//! - `pgsweep notify-test` - Send a test message to Slack
//!
//! ## Configuration
//!
//! Connection settings come from environment variables or flags:
//!
//! - `PGSWEEP_DATABASE_URL` - PostgreSQL connection string
//! - `PGSWEEP_REDIS_URL` - Redis URL (redis queue backend)
//! - `PGSWEEP_QUEUE_BACKEND` - `database`, `redis`, or `sync`
//! - `PGSWEEP_WORKER_API_URL` - worker-manager daemon (optional)
//! - `PGSWEEP_SLACK_WEBHOOK_URL` / `PGSWEEP_SLACK_BOT_TOKEN`
//! - `PGSWEEP_FORMAT` - log output format (`text` or `json`)

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]
// CLI uses print! macros intentionally
#![allow(clippy::print_stdout)]
#![allow(clippy::print_stderr)]

pub mod commands;
pub mod wiring;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use pgsweep_core::observability::LogFormat;

/// pgsweep - maintenance windows for multi-tenant PostgreSQL.
#[derive(Debug, Parser)]
#[command(name = "pgsweep")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// PostgreSQL connection string.
    #[arg(long, env = "PGSWEEP_DATABASE_URL", global = true)]
    pub database_url: Option<String>,

    /// Redis connection URL (redis queue backend, queue-flag pause).
    #[arg(long, env = "PGSWEEP_REDIS_URL", global = true)]
    pub redis_url: Option<String>,

    /// Key prefix applied to queue keys in Redis.
    #[arg(long, env = "PGSWEEP_REDIS_PREFIX", default_value = "", global = true)]
    pub redis_prefix: String,

    /// Queue backend holding background jobs.
    #[arg(
        long,
        env = "PGSWEEP_QUEUE_BACKEND",
        default_value = "database",
        global = true
    )]
    pub queue_backend: QueueBackend,

    /// Queue name to inspect for in-flight jobs.
    #[arg(
        long,
        env = "PGSWEEP_QUEUE_NAME",
        default_value = "default",
        global = true
    )]
    pub queue_name: String,

    /// Worker-manager base URL; enables supervised pause/resume when set.
    #[arg(long, env = "PGSWEEP_WORKER_API_URL", global = true)]
    pub worker_api_url: Option<String>,

    /// Slack incoming-webhook URL.
    #[arg(long, env = "PGSWEEP_SLACK_WEBHOOK_URL", global = true)]
    pub slack_webhook_url: Option<String>,

    /// Slack bot token (used when no webhook URL is configured).
    #[arg(long, env = "PGSWEEP_SLACK_BOT_TOKEN", global = true)]
    pub slack_bot_token: Option<String>,

    /// Maintenance marker file checked by the web tier.
    #[arg(
        long,
        env = "PGSWEEP_GATE_FILE",
        default_value = ".maintenance",
        global = true
    )]
    pub gate_file: PathBuf,

    /// Log output format.
    #[arg(long, env = "PGSWEEP_FORMAT", default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Get the effective connection settings.
    #[must_use]
    pub fn settings(&self) -> Settings {
        Settings {
            database_url: self.database_url.clone(),
            redis_url: self.redis_url.clone(),
            redis_prefix: self.redis_prefix.clone(),
            queue_backend: self.queue_backend,
            queue_name: self.queue_name.clone(),
            worker_api_url: self.worker_api_url.clone(),
            slack_webhook_url: self.slack_webhook_url.clone(),
            slack_bot_token: self.slack_bot_token.clone(),
            gate_file: self.gate_file.clone(),
        }
    }
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Execute a full maintenance window.
    Run(commands::run::RunArgs),
    /// List discovered tenant schemas.
    Schemas,
    /// Show the current in-flight job count.
    Jobs,
    /// Send a test message to Slack.
    NotifyTest(commands::notify_test::NotifyTestArgs),
}

/// Log output format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable logs.
    #[default]
    Text,
    /// JSON structured logs.
    Json,
}

impl From<OutputFormat> for LogFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => Self::Text,
            OutputFormat::Json => Self::Json,
        }
    }
}

/// Queue backend kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum QueueBackend {
    /// Jobs live in a PostgreSQL `jobs` table.
    #[default]
    Database,
    /// Jobs live in Redis list/sorted-set structures.
    Redis,
    /// Jobs run synchronously; nothing is ever in flight.
    Sync,
}

/// Effective connection settings shared by all commands.
#[derive(Debug, Clone)]
pub struct Settings {
    /// PostgreSQL connection string.
    pub database_url: Option<String>,
    /// Redis connection URL.
    pub redis_url: Option<String>,
    /// Key prefix for Redis queue keys.
    pub redis_prefix: String,
    /// Queue backend kind.
    pub queue_backend: QueueBackend,
    /// Queue name to inspect.
    pub queue_name: String,
    /// Worker-manager base URL, if any.
    pub worker_api_url: Option<String>,
    /// Slack webhook URL, if any.
    pub slack_webhook_url: Option<String>,
    /// Slack bot token, if any.
    pub slack_bot_token: Option<String>,
    /// Maintenance marker file path.
    pub gate_file: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_from_flags() {
        let cli = Cli::parse_from([
            "pgsweep",
            "--database-url",
            "postgres://localhost/app",
            "--queue-backend",
            "redis",
            "--redis-url",
            "redis://localhost:6379",
            "--queue-name",
            "emails",
            "jobs",
        ]);

        let settings = cli.settings();
        assert_eq!(settings.database_url.as_deref(), Some("postgres://localhost/app"));
        assert_eq!(settings.queue_backend, QueueBackend::Redis);
        assert_eq!(settings.queue_name, "emails");
        assert_eq!(settings.redis_prefix, "");
        assert_eq!(settings.gate_file, PathBuf::from(".maintenance"));
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn format_flag_selects_json_logging() {
        let cli = Cli::parse_from(["pgsweep", "jobs", "--format", "json"]);
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(matches!(LogFormat::from(cli.format), LogFormat::Json));
    }

    #[test]
    fn global_flags_can_follow_the_subcommand() {
        let cli = Cli::parse_from([
            "pgsweep",
            "schemas",
            "--database-url",
            "postgres://localhost/app",
        ]);
        assert!(matches!(cli.command, Commands::Schemas));
        assert!(cli.database_url.is_some());
    }
}
