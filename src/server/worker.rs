use std::sync::Arc;

use tokio::sync::{Mutex, mpsc::UnboundedReceiver};
use tracing::{debug, warn};

use crate::http::connection::ConnectionContext;
use crate::http::response::Response;
use crate::server::Handler;

pub(super) type SharedQueue = Arc<Mutex<UnboundedReceiver<ConnectionContext>>>;

/// Worker loop: dequeue one connection, serve it, repeat.
///
/// The queue mutex is held only across a single `recv`, never while a
/// request is being served, so the pool handles connections in parallel.
/// `recv` yields every remaining item before reporting the channel closed,
/// which is what guarantees queued connections are drained during shutdown.
pub(super) async fn run(id: usize, queue: SharedQueue, handler: Arc<dyn Handler>) {
    loop {
        let next = { queue.lock().await.recv().await };
        let Some(mut ctx) = next else {
            debug!(worker = id, "Work queue closed and drained, worker exiting");
            break;
        };

        // Failure boundary: a bad request or failing handler is logged and
        // the worker moves on to the next connection.
        if let Err(e) = serve(handler.as_ref(), &mut ctx).await {
            warn!(worker = id, peer = %ctx.peer(), error = %e, "Request failed");
        }
    }
}

async fn serve(handler: &dyn Handler, ctx: &mut ConnectionContext) -> anyhow::Result<()> {
    let request = match ctx.read_request().await {
        Ok(Some(request)) => request,
        // Client connected and went away without sending a request.
        Ok(None) => return Ok(()),
        Err(e) => {
            let _ = ctx.respond(Response::bad_request()).await;
            return Err(e);
        }
    };

    debug!(peer = %ctx.peer(), method = request.method.as_str(), path = %request.path, "Dispatching request");

    if let Err(e) = handler.handle(request, ctx).await {
        if !ctx.responded() {
            let _ = ctx.respond(Response::internal_error()).await;
        }
        return Err(e);
    }
    Ok(())
}
