//! Thanksync - incremental test-taker sync with exactly-once notifications
//!
//! Main entry point for the command-line service.

use anyhow::Context;
use clap::Parser;
use thanksync_app::{init_tracing, AppContext, Cli};
use thanksync_infra::config;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // .env may carry RUST_LOG / LOG_LEVEL, so load it before tracing
    config::load_dotenv();
    init_tracing("info", cli.json_logs)?;

    let config = config::load(cli.config.clone()).context("failed to load configuration")?;
    let context = AppContext::new(config).context("failed to initialise application")?;

    info!(version = env!("CARGO_PKG_VERSION"), once = cli.once, "thanksync starting");

    if cli.once {
        let report = context.sync_service.run_pass().await.context("sync pass failed")?;
        info!(pass_id = %report.pass_id, sent = report.sent, failed = report.failed, "done");
        return Ok(());
    }

    let mut scheduler = context.sync_scheduler();
    scheduler.start().await.context("failed to start sync scheduler")?;

    let shutdown = scheduler.shutdown_token();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("shutdown requested; finishing the current pass");
                shutdown.cancel();
            }
            Err(err) => warn!(error = %err, "cannot listen for ctrl-c"),
        }
    });

    scheduler.wait().await.context("sync scheduler stopped on a fatal error")?;
    info!("thanksync stopped");
    Ok(())
}
