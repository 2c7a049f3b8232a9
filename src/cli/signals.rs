//! Interrupt handling for `run`

use tracing::warn;

/// Resolves on the first Ctrl+C.
///
/// If the handler cannot be installed the future never resolves, so a run
/// simply cannot be interrupted early.
pub async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
}
