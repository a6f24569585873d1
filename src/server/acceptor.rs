use tokio::net::TcpListener;
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::http::connection::ConnectionContext;

/// Accept loop: turns inbound connections into queued work items.
///
/// The pending accept is selected against the stop token, so shutdown
/// interrupts it instead of waiting for the next client. An accept error
/// exits the loop; already-queued connections are unaffected. On exit the
/// listener is dropped (the port is released) and with it the queue's only
/// sender, which is what tells the workers to drain and stop.
pub(super) async fn run(
    listener: TcpListener,
    queue: UnboundedSender<ConnectionContext>,
    stop: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = stop.cancelled() => {
                info!("Acceptor stopping");
                break;
            }
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    info!("Accepted connection from {}", peer);
                    if queue.send(ConnectionContext::new(stream, peer)).is_err() {
                        // No worker left holding the receiver; nothing can
                        // serve this queue anymore.
                        break;
                    }
                }
                Err(e) => {
                    error!("Accept failed: {}", e);
                    break;
                }
            }
        }
    }
}
