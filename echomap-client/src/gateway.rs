//! Transport between the client mirror and the note server.

use async_trait::async_trait;
use echomap_core::{NewNote, Note};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::TransportError;

/// Request/response boundary to the note store.
#[async_trait]
pub trait NoteGateway: Send + Sync {
    /// `GET /notes`
    async fn fetch_notes(&self) -> Result<Vec<Note>, TransportError>;

    /// `POST /notes`
    async fn create_note(&self, note: &NewNote) -> Result<Note, TransportError>;
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String
}

/// [`NoteGateway`] over HTTP.
pub struct HttpNoteGateway {
    http: Client,
    base_url: String,
    timeout: Duration
}

impl HttpNoteGateway {
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let timeout = config.request_timeout();
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(TransportError::Http)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout
        })
    }

    fn notes_url(&self) -> String {
        format!("{}/notes", self.base_url)
    }

    fn map_send_error(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout {
                timeout_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
            }
        } else {
            TransportError::Http(err)
        }
    }

    async fn decode<T: DeserializeOwned>(&self, response: Response) -> Result<T, TransportError> {
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.message)
                .unwrap_or_else(|_| {
                    if body.is_empty() {
                        status.canonical_reason().unwrap_or("unknown error").to_string()
                    } else {
                        body
                    }
                });
            return Err(TransportError::Status {
                status: status.as_u16(),
                message
            });
        }

        let bytes = response.bytes().await.map_err(|e| self.map_send_error(e))?;
        serde_json::from_slice(&bytes).map_err(|e| TransportError::Decode(e.to_string()))
    }
}

#[async_trait]
impl NoteGateway for HttpNoteGateway {
    async fn fetch_notes(&self) -> Result<Vec<Note>, TransportError> {
        let url = self.notes_url();
        debug!(url = %url, "Fetching notes");

        let response = self
            .http
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        self.decode(response).await
    }

    async fn create_note(&self, note: &NewNote) -> Result<Note, TransportError> {
        let url = self.notes_url();
        debug!(url = %url, lat = note.lat, lng = note.lng, "Posting note");

        let response = self
            .http
            .post(&url)
            .json(note)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        self.decode(response).await
    }
}
