//! OS signal handling.
//!
//! SIGINT (Ctrl+C) and, on Unix, SIGTERM stop the server gracefully, as does
//! the in-process [`Shutdown`](super::Shutdown) handle.

use tokio::sync::broadcast;

/// Resolves when the process is asked to stop.
pub async fn shutdown_signal(mut manual: broadcast::Receiver<()>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    // A dropped `Shutdown` handle must not stop the server.
    let requested = async {
        if manual.recv().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        _ = ctrl_c => tracing::info!("Ctrl+C received"),
        _ = terminate => tracing::info!("SIGTERM received"),
        _ = requested => tracing::info!("Shutdown requested"),
    }
}
