//! Concurrent request-serving engine.
//!
//! One acceptor task turns inbound connections into queued work items; a
//! fixed pool of workers drains the queue and runs the registered handler.
//! The two sides meet only at the work queue, an mpsc channel carrying
//! [`ConnectionContext`] values in acceptance order, so each accepted
//! connection is delivered to exactly one worker exactly once.
//!
//! ```text
//!  network ──▶ acceptor ──▶ work queue ──▶ worker ──▶ handler ──▶ response
//! ```
//!
//! Shutdown runs the other way: [`Server::stop`] cancels a token the
//! acceptor selects alongside its pending accept. The acceptor exits,
//! dropping the listener (port released) and the queue's only sender;
//! workers drain whatever was already queued, observe the closed channel,
//! and exit. `stop` returns once every task has been joined.

mod acceptor;
mod worker;

use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::net::TcpListener;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::http::connection::ConnectionContext;
use crate::http::request::Request;

/// The per-server request callback.
///
/// Exactly one handler is bound per [`Server`], at construction. The handler
/// owns the exchange once invoked: it may respond, redirect, or deliberately
/// write nothing (the connection closes either way). Errors are logged by
/// the calling worker and answered with a generic 500 when nothing has been
/// written yet; they never terminate the worker.
#[async_trait]
pub trait Handler: Send + Sync + 'static {
    async fn handle(&self, request: Request, ctx: &mut ConnectionContext) -> anyhow::Result<()>;
}

enum Lifecycle {
    Created,
    Running {
        local_addr: SocketAddr,
        acceptor: JoinHandle<()>,
        workers: Vec<JoinHandle<()>>,
    },
    Stopped,
}

/// Composition root: acceptor + work queue + worker pool + stop token.
///
/// The lifecycle is `Created → Running → Stopped` and `Stopped` is terminal;
/// serving again means constructing a new `Server`. Calling [`Server::start`]
/// twice, or [`Server::stop`] outside `Running`, is a programming error and
/// fails fast.
pub struct Server {
    handler: Arc<dyn Handler>,
    pool_size: usize,
    stop: CancellationToken,
    lifecycle: Lifecycle,
}

impl Server {
    /// Creates a server with a fixed worker pool and its single handler.
    ///
    /// # Panics
    ///
    /// Panics if `pool_size` is zero.
    pub fn new(pool_size: usize, handler: Arc<dyn Handler>) -> Self {
        assert!(pool_size > 0, "worker pool must have at least one worker");
        Self {
            handler,
            pool_size,
            stop: CancellationToken::new(),
            lifecycle: Lifecycle::Created,
        }
    }

    /// Binds `0.0.0.0:port` and launches the acceptor and worker tasks.
    ///
    /// Returns the bound address (useful with port 0). The listener is bound
    /// before this returns, so clients may connect immediately.
    pub async fn start(&mut self, port: u16) -> anyhow::Result<SocketAddr> {
        match self.lifecycle {
            Lifecycle::Created => {}
            Lifecycle::Running { .. } => anyhow::bail!("server already started"),
            Lifecycle::Stopped => anyhow::bail!("server already stopped"),
        }

        let listener = TcpListener::bind(("0.0.0.0", port)).await?;
        let local_addr = listener.local_addr()?;
        info!("Listening on {}", local_addr);

        let (tx, rx) = mpsc::unbounded_channel();
        let queue = Arc::new(Mutex::new(rx));

        let acceptor = tokio::spawn(acceptor::run(listener, tx, self.stop.clone()));
        let workers = (0..self.pool_size)
            .map(|id| tokio::spawn(worker::run(id, Arc::clone(&queue), Arc::clone(&self.handler))))
            .collect();

        self.lifecycle = Lifecycle::Running {
            local_addr,
            acceptor,
            workers,
        };
        Ok(local_addr)
    }

    /// Signals stop and blocks until every task owned by this server exited.
    ///
    /// Connections already queued at this point are still served; new
    /// connections stop arriving as soon as the acceptor exits. When this
    /// returns the port is released and no server task remains alive.
    pub async fn stop(&mut self) -> anyhow::Result<()> {
        match std::mem::replace(&mut self.lifecycle, Lifecycle::Stopped) {
            Lifecycle::Running {
                acceptor, workers, ..
            } => {
                self.stop.cancel();
                if let Err(e) = acceptor.await {
                    error!("Acceptor task failed: {}", e);
                }
                for worker in workers {
                    if let Err(e) = worker.await {
                        error!("Worker task failed: {}", e);
                    }
                }
                info!("Server stopped");
                Ok(())
            }
            Lifecycle::Created => anyhow::bail!("server was never started"),
            Lifecycle::Stopped => anyhow::bail!("server already stopped"),
        }
    }

    /// The bound address while running.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        match &self.lifecycle {
            Lifecycle::Running { local_addr, .. } => Some(*local_addr),
            _ => None,
        }
    }

    /// Number of live worker tasks (the configured pool size while running).
    pub fn worker_count(&self) -> usize {
        match &self.lifecycle {
            Lifecycle::Running { workers, .. } => workers.len(),
            _ => 0,
        }
    }
}
