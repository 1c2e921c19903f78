//! Application state for the EchoMap server.

use echomap_core::{InMemoryNoteStore, NoteStore, demo_notes};
use metrics_exporter_prometheus::PrometheusHandle;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::error::{ApiError, Result};

/// Configuration for the EchoMap server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind the server to.
    pub host: String,
    /// Port to bind the server to.
    pub port: u16,
    /// Populate a fresh store with the two sample notes.
    pub seed_demo_notes: bool,
    /// Install the Prometheus recorder and serve `/metrics`.
    pub metrics_enabled: bool,
    /// Allow cross-origin requests from any origin.
    pub cors_permissive: bool
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            seed_demo_notes: false,
            metrics_enabled: true,
            cors_permissive: true
        }
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    std::env::var(name)
        .map(|v| v == "true" || v == "1")
        .unwrap_or(default)
}

impl ServerConfig {
    /// Creates a new configuration from environment variables.
    ///
    /// Reads `ECHOMAP_HOST`, `ECHOMAP_PORT`, `ECHOMAP_SEED_DEMO_NOTES`,
    /// `ECHOMAP_METRICS_ENABLED` and `ECHOMAP_CORS_PERMISSIVE`.
    pub fn from_env() -> Result<Self> {
        let port = match std::env::var("ECHOMAP_PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| ApiError::Configuration(format!("Invalid ECHOMAP_PORT: {raw}")))?,
            Err(_) => 3000
        };

        Ok(Self {
            host: std::env::var("ECHOMAP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port,
            seed_demo_notes: env_flag("ECHOMAP_SEED_DEMO_NOTES", false),
            metrics_enabled: env_flag("ECHOMAP_METRICS_ENABLED", true),
            cors_permissive: env_flag("ECHOMAP_CORS_PERMISSIVE", true)
        })
    }

    /// Creates a builder for configuration.
    #[must_use]
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ApiError::Configuration(format!("Invalid address: {e}")))
    }
}

/// Builder for `ServerConfig`.
#[derive(Default)]
pub struct ServerConfigBuilder {
    host: Option<String>,
    port: Option<u16>,
    seed_demo_notes: Option<bool>,
    metrics_enabled: Option<bool>,
    cors_permissive: Option<bool>
}

impl ServerConfigBuilder {
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    #[must_use]
    pub fn seed_demo_notes(mut self, seed: bool) -> Self {
        self.seed_demo_notes = Some(seed);
        self
    }

    #[must_use]
    pub fn metrics_enabled(mut self, enabled: bool) -> Self {
        self.metrics_enabled = Some(enabled);
        self
    }

    #[must_use]
    pub fn cors_permissive(mut self, permissive: bool) -> Self {
        self.cors_permissive = Some(permissive);
        self
    }

    #[must_use]
    pub fn build(self) -> ServerConfig {
        let defaults = ServerConfig::default();
        ServerConfig {
            host: self.host.unwrap_or(defaults.host),
            port: self.port.unwrap_or(defaults.port),
            seed_demo_notes: self.seed_demo_notes.unwrap_or(defaults.seed_demo_notes),
            metrics_enabled: self.metrics_enabled.unwrap_or(defaults.metrics_enabled),
            cors_permissive: self.cors_permissive.unwrap_or(defaults.cors_permissive)
        }
    }
}

/// Shared application state for Axum handlers.
///
/// Built once at startup; the store inside is the only writer of the note
/// collection.
#[derive(Clone)]
pub struct AppState {
    /// Authoritative note store.
    pub store: Arc<dyn NoteStore>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Prometheus render handle, present when metrics are enabled.
    pub metrics: Option<PrometheusHandle>
}

impl AppState {
    /// Creates application state backed by a fresh in-memory store.
    pub fn new(config: ServerConfig) -> Result<Self> {
        let store = if config.seed_demo_notes {
            InMemoryNoteStore::seeded(demo_notes())?
        } else {
            InMemoryNoteStore::new()
        };

        Ok(Self::with_store(Arc::new(store), config))
    }

    /// Creates application state from an existing store (useful for testing).
    #[must_use]
    pub fn with_store(store: Arc<dyn NoteStore>, config: ServerConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
            metrics: None
        }
    }

    #[must_use]
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}
