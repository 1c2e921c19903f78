//! Client configuration.

use echomap_core::Coordinates;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for [`HttpNoteGateway`](crate::gateway::HttpNoteGateway)
/// and [`NoteSync`](crate::sync::NoteSync).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the EchoMap server (default: http://localhost:3000).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request HTTP timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Upper bound on a create round trip, in milliseconds.
    #[serde(default = "default_submit_timeout_ms")]
    pub submit_timeout_ms: u64,

    /// Map center before any geolocation fix.
    #[serde(default = "default_initial_center")]
    pub initial_center: Coordinates,

    /// Zoom level before any geolocation fix.
    #[serde(default = "default_initial_zoom")]
    pub initial_zoom: u8
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_submit_timeout_ms() -> u64 {
    15_000
}

fn default_initial_center() -> Coordinates {
    Coordinates::new(20.0, 0.0)
}

fn default_initial_zoom() -> u8 {
    3
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            submit_timeout_ms: default_submit_timeout_ms(),
            initial_center: default_initial_center(),
            initial_zoom: default_initial_zoom()
        }
    }
}

impl ClientConfig {
    /// Create config from environment variables.
    ///
    /// Reads:
    /// - `ECHOMAP_SERVER_URL` (default: http://localhost:3000)
    /// - `ECHOMAP_REQUEST_TIMEOUT_SECS` (default: 10)
    /// - `ECHOMAP_SUBMIT_TIMEOUT_MS` (default: 15000)
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("ECHOMAP_SERVER_URL") {
            config.base_url = url;
        }

        if let Ok(timeout) = std::env::var("ECHOMAP_REQUEST_TIMEOUT_SECS") {
            if let Ok(secs) = timeout.parse() {
                config.request_timeout_secs = secs;
            }
        }

        if let Ok(timeout) = std::env::var("ECHOMAP_SUBMIT_TIMEOUT_MS") {
            if let Ok(ms) = timeout.parse() {
                config.submit_timeout_ms = ms;
            }
        }

        config
    }

    /// Create config for testing (shorter timeouts).
    #[must_use]
    pub fn for_testing(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout_secs: 2,
            submit_timeout_ms: 1_000,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    #[must_use]
    pub fn submit_timeout(&self) -> Duration {
        Duration::from_millis(self.submit_timeout_ms)
    }
}
