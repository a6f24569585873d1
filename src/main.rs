use std::sync::Arc;

use beacon::config::Config;
use beacon::report::{CommandJob, FailureTracker, Reporter};
use beacon::server::Server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load();

    let failures = Arc::new(FailureTracker::new());
    let job = Arc::new(CommandJob::new(cfg.job.command.clone()));
    let reporter = Reporter::new(
        job,
        failures,
        cfg.scripts.root.clone(),
        cfg.page.refresh_ms,
        cfg.page.stylesheet_text(),
    );

    let mut server = Server::new(cfg.server.workers, Arc::new(reporter));
    server.start(cfg.server.port).await?;

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");

    server.stop().await?;
    Ok(())
}
