use derive_more::Display;
use tokio::signal;
use tracing::{error, warn};

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    #[display("Ctrl+C")]
    Interrupt,

    #[display("SIGTERM")]
    Terminate,
}

/// Resolves once the process is asked to stop. A signal source that cannot
/// be installed is logged and never fires, so the other one still works.
pub async fn shutdown_signal() -> ShutdownSignal {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let received = tokio::select! {
        _ = ctrl_c => ShutdownSignal::Interrupt,
        _ = terminate => ShutdownSignal::Terminate,
    };

    warn!("🛑 {} received, shutting down the portfolio API", received);
    received
}
