use anyhow::Result;
use tokio::signal;
use tokio_util::sync::CancellationToken;

/// Signals that can trigger shutdown.
enum ShutdownSignal {
    CtrlC,
    #[cfg(unix)]
    Sigterm,
}

impl ShutdownSignal {
    fn name(&self) -> &'static str {
        match self {
            Self::CtrlC => "Ctrl+C",
            #[cfg(unix)]
            Self::Sigterm => "SIGTERM",
        }
    }
}

/// Wait for termination signals (Ctrl+C, SIGTERM).
///
/// # Errors
/// Returns an error if signal handling fails.
pub async fn wait_for_shutdown() -> Result<()> {
    let signal = tokio::select! {
        result = wait_ctrl_c() => result?,
        result = wait_sigterm() => result?,
    };

    tracing::info!(
        signal = signal.name(),
        "Shutdown signal received, initiating graceful shutdown"
    );
    Ok(())
}

/// Cancels `cancel` once a termination signal arrives.
///
/// A failure to install the handlers also cancels, so the server never
/// runs without a way to stop it.
pub async fn cancel_on_shutdown(cancel: CancellationToken) {
    if let Err(e) = wait_for_shutdown().await {
        tracing::error!(error = %e, "signal handling failed, shutting down");
    }
    cancel.cancel();
}

async fn wait_ctrl_c() -> Result<ShutdownSignal> {
    signal::ctrl_c().await.map_err(|e| {
        tracing::error!(%e, "Error handling Ctrl+C signal");
        e
    })?;
    Ok(ShutdownSignal::CtrlC)
}

#[cfg(unix)]
async fn wait_sigterm() -> Result<ShutdownSignal> {
    let mut signal_handler =
        signal::unix::signal(signal::unix::SignalKind::terminate()).map_err(|e| {
            tracing::error!(%e, "Failed to install SIGTERM handler");
            e
        })?;
    signal_handler.recv().await;
    Ok(ShutdownSignal::Sigterm)
}

#[cfg(not(unix))]
async fn wait_sigterm() -> Result<ShutdownSignal> {
    std::future::pending::<Result<ShutdownSignal>>().await
}
