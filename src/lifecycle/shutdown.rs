//! Shutdown coordination.

use tokio::sync::broadcast;

/// Handle that stops a running [`HttpServer`](crate::http::HttpServer).
///
/// Each server subscribes once; [`Shutdown::trigger`] stops all of them.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Receiver to hand to `HttpServer::run`.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Ask every subscribed server to drain and stop.
    pub fn trigger(&self) {
        let stopped = self.tx.send(()).unwrap_or(0);
        tracing::debug!(servers = stopped, "Shutdown triggered");
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
