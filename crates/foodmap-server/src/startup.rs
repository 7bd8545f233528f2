//! Server startup helper for the `foodmap` binary.
//!
//! Provides [`spawn_server`] which binds eagerly, so a port conflict is
//! reported before the caller moves on, and then serves on a background
//! Tokio task until [`RunningServer::shutdown`] is called.
//!
//! # Usage
//!
//! ```rust,ignore
//! use foodmap_server::startup::spawn_server;
//!
//! let server = spawn_server(&config.server, state).await?;
//! tokio::signal::ctrl_c().await?;
//! server.shutdown().await;
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::server::{ServerConfig, ServerError, bind, serve};
use crate::state::AppState;

/// Errors that can occur when spawning the server.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// The server failed to bind or start.
    #[error("server start error: {0}")]
    Server(#[from] ServerError),
}

/// A server running on a background task.
#[derive(Debug)]
pub struct RunningServer {
    addr: SocketAddr,
    stop: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl RunningServer {
    /// The address the server is listening on.
    pub const fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Stop accepting connections and wait for in-flight requests.
    pub async fn shutdown(self) {
        let _ = self.stop.send(());
        if let Err(e) = self.handle.await {
            tracing::error!(error = %e, "Server task ended abnormally");
        }
        tracing::info!(addr = %self.addr, "Server stopped");
    }
}

/// Bind `config`'s address and serve the API on a background task.
///
/// # Errors
///
/// Returns [`StartupError::Server`] if the address is invalid or cannot
/// be bound.
pub async fn spawn_server(
    config: &ServerConfig,
    state: Arc<AppState>,
) -> Result<RunningServer, StartupError> {
    let listener = bind(config).await?;
    let addr = listener
        .local_addr()
        .map_err(|e| ServerError::Bind(format!("could not read bound address: {e}")))?;

    let (stop, stopped) = oneshot::channel::<()>();
    let handle = tokio::spawn(async move {
        let shutdown = async move {
            let _ = stopped.await;
        };
        if let Err(e) = serve(listener, state, shutdown).await {
            tracing::error!(error = %e, "Server exited with error");
        }
    });

    tracing::info!(%addr, "Food Map server listening");
    Ok(RunningServer { addr, stop, handle })
}
