//! The request handler behind the status page.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use crate::http::connection::ConnectionContext;
use crate::http::request::Request;
use crate::http::response::Response;
use crate::report::page::{self, PageView};
use crate::report::poller::JobStatus;
use crate::report::scripts::{self, FailureTracker};
use crate::server::Handler;

/// Pause between triggering a forced run and redirecting back to `/`, long
/// enough for the job to flip into its running state so the reloaded page
/// shows it.
const FORCE_RUN_REDIRECT_DELAY: Duration = Duration::from_millis(500);

/// Serves the status page and the two special paths.
///
/// - `/favicon.ico` is swallowed: no response is written and the connection
///   just closes.
/// - `/force-run` triggers the job, waits briefly, and redirects to `/`.
/// - every other path gets the rendered status page.
pub struct Reporter {
    status: Arc<dyn JobStatus>,
    failures: Arc<FailureTracker>,
    scripts_root: PathBuf,
    refresh_ms: u64,
    stylesheet: String,
}

impl Reporter {
    pub fn new(
        status: Arc<dyn JobStatus>,
        failures: Arc<FailureTracker>,
        scripts_root: PathBuf,
        refresh_ms: u64,
        stylesheet: String,
    ) -> Self {
        Self {
            status,
            failures,
            scripts_root,
            refresh_ms,
            stylesheet,
        }
    }

    async fn render_page(&self) -> String {
        let summary = scripts::state_summary(&self.scripts_root).await;
        let badges = scripts::trigger_badges(&self.scripts_root, &self.failures);
        let state = self.status.state();
        let output = self.status.output();

        page::render(&PageView {
            running: self.status.is_running(),
            state: &state,
            output: &output,
            summary: &summary,
            badges: &badges,
            refresh_ms: self.refresh_ms,
            stylesheet: &self.stylesheet,
        })
    }
}

#[async_trait]
impl Handler for Reporter {
    async fn handle(&self, request: Request, ctx: &mut ConnectionContext) -> anyhow::Result<()> {
        match request.path.as_str() {
            // Browser probe, not worth a response body.
            "/favicon.ico" => Ok(()),
            "/force-run" => {
                info!("Forced run triggered by {}", ctx.peer());
                self.status.force_run();
                tokio::time::sleep(FORCE_RUN_REDIRECT_DELAY).await;
                ctx.respond(Response::redirect("/")).await
            }
            _ => ctx.respond(Response::html(self.render_page().await)).await,
        }
    }
}
