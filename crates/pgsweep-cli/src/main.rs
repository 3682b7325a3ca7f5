//! pgsweep - the main entry point for the CLI binary.

use anyhow::Result;
use clap::Parser;

use pgsweep_cli::{Cli, Commands};
use pgsweep_core::observability::init_logging;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.format.into());

    let settings = cli.settings();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        match cli.command {
            Commands::Run(args) => pgsweep_cli::commands::run::execute(args, &settings).await,
            Commands::Schemas => pgsweep_cli::commands::schemas::execute(&settings).await,
            Commands::Jobs => pgsweep_cli::commands::jobs::execute(&settings).await,
            Commands::NotifyTest(args) => {
                pgsweep_cli::commands::notify_test::execute(args, &settings).await
            }
        }
    })
}
