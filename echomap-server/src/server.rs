//! Server setup and lifecycle for EchoMap.

use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;

use crate::error::{ApiError, Result};
use crate::routes::create_router;
use crate::state::{AppState, ServerConfig};
use crate::telemetry;

/// The EchoMap HTTP server.
pub struct NotesServer {
    state: Arc<AppState>
}

impl NotesServer {
    /// Creates a new server instance with the given configuration.
    pub fn new(config: ServerConfig) -> Result<Self> {
        let metrics_enabled = config.metrics_enabled;
        let mut state = AppState::new(config)?;

        if metrics_enabled {
            state = state.with_metrics(telemetry::install_recorder()?);
        }

        Ok(Self {
            state: Arc::new(state)
        })
    }

    /// Creates a server instance from an existing `AppState`.
    pub fn with_state(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Runs the HTTP server on the configured address.
    ///
    /// This method blocks until the server is shut down (e.g., via Ctrl+C).
    pub async fn run(self) -> Result<()> {
        let addr = self.state.config.socket_addr()?;

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| ApiError::Server(format!("Failed to bind to {addr}: {e}")))?;

        self.serve(listener, shutdown_signal()).await
    }

    /// Serves on an already bound listener until `shutdown` resolves.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static
    {
        let addr = listener
            .local_addr()
            .map_err(|e| ApiError::Server(format!("Listener has no local address: {e}")))?;

        let router = create_router(self.state.clone());

        tracing::info!(%addr, "EchoMap server starting");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| ApiError::Server(format!("Server error: {e}")))?;

        tracing::info!("EchoMap server stopped");
        Ok(())
    }

    /// Returns a reference to the application state.
    #[must_use]
    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }
}

/// Signal handler for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        },
        () = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        },
    }
}

/// Entry point for running the server from configuration.
pub async fn run_server(config: ServerConfig) -> Result<()> {
    let server = NotesServer::new(config)?;
    server.run().await
}

/// Entry point for running the server from environment variables.
pub async fn run_from_env() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into())
        )
        .init();

    let config = ServerConfig::from_env()?;
    run_server(config).await
}
