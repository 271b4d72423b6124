//! The web module for handling the Axum API.
//! This file declares the other files in this directory as sub-modules.

pub mod api;
pub mod models;

use std::future::Future;

/// Resolves once `signal` fires. If the signal listener itself fails, logs it
/// and never resolves, so the server keeps running.
pub async fn shutdown_signal<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        tracing::error!("Failed to listen for Ctrl-C, shutdown signal disabled: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}
