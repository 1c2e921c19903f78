//! Client-side mirror of the note collection.
//!
//! [`NoteSync`] keeps a local copy of the server's notes for the map to
//! draw, and drives one note-authoring attempt at a time:
//!
//! ```text
//! Idle ──select_position──► PositionSelected ──submit──► Submitting ──ok──► Idle
//!  ▲                           │      ▲                      │
//!  └─────────cancel────────────┘      └────────failed────────┘
//! ```
//!
//! The mirror only changes by whole replacement on a successful `load` or by
//! appending the server's canonical note on a successful `submit`. Failed
//! operations leave it exactly as it was.

use echomap_core::note::describe_validation_errors;
use echomap_core::{Coordinates, NewNote, Note};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use validator::Validate;

use crate::config::ClientConfig;
use crate::error::{SyncError, SyncResult, TransportError};
use crate::gateway::NoteGateway;
use crate::view::{ComposerOutcome, GeolocationError, MapView, NoteMarker, Viewport};

/// Progress of the current note-authoring attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthoringState {
    Idle,
    PositionSelected {
        position: Coordinates,
        /// Set when the previous submit for this position failed.
        last_error: Option<String>
    },
    Submitting {
        position: Coordinates
    }
}

impl AuthoringState {
    #[must_use]
    pub fn pending_position(&self) -> Option<Coordinates> {
        match self {
            Self::Idle => None,
            Self::PositionSelected { position, .. } | Self::Submitting { position } => {
                Some(*position)
            }
        }
    }
}

struct SyncInner {
    mirror: Vec<Note>,
    authoring: AuthoringState,
    viewport: Viewport
}

impl SyncInner {
    fn markers(&self) -> Vec<NoteMarker> {
        self.mirror.iter().map(NoteMarker::from).collect()
    }
}

/// Resets an abandoned submission back to `PositionSelected`.
///
/// If the future driving `submit` is dropped mid-request, nothing else would
/// leave the `Submitting` state.
struct SubmitGuard<'a> {
    inner: &'a Mutex<SyncInner>,
    position: Coordinates,
    armed: bool
}

impl SubmitGuard<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            let mut inner = self.inner.lock();
            if matches!(inner.authoring, AuthoringState::Submitting { .. }) {
                inner.authoring = AuthoringState::PositionSelected {
                    position: self.position,
                    last_error: Some("submission abandoned".to_string())
                };
            }
        }
    }
}

/// Client-local note mirror and authoring flow.
pub struct NoteSync {
    gateway: Arc<dyn NoteGateway>,
    view: Arc<dyn MapView>,
    inner: Mutex<SyncInner>,
    submit_timeout: Duration
}

impl NoteSync {
    pub fn new(gateway: Arc<dyn NoteGateway>, view: Arc<dyn MapView>, config: &ClientConfig) -> Self {
        Self {
            gateway,
            view,
            inner: Mutex::new(SyncInner {
                mirror: Vec::new(),
                authoring: AuthoringState::Idle,
                viewport: Viewport {
                    center: config.initial_center,
                    zoom: config.initial_zoom
                }
            }),
            submit_timeout: config.submit_timeout()
        }
    }

    /// Replaces the mirror with the server's current notes.
    ///
    /// On failure the mirror is left untouched and the error is logged; the
    /// view is not notified.
    pub async fn load(&self) -> SyncResult<usize> {
        let notes = match self.gateway.fetch_notes().await {
            Ok(notes) => notes,
            Err(e) => {
                error!(error = %e, "Failed to fetch notes");
                return Err(e.into());
            }
        };

        let count = notes.len();
        let markers = {
            let mut inner = self.inner.lock();
            inner.mirror = notes;
            inner.markers()
        };

        self.view.render_markers(&markers);
        info!(count, "Loaded notes");
        Ok(count)
    }

    /// Starts (or moves) a pending note at `position` and opens the composer.
    pub fn select_position(&self, position: Coordinates) -> SyncResult<()> {
        {
            let mut inner = self.inner.lock();
            if matches!(inner.authoring, AuthoringState::Submitting { .. }) {
                debug!("Ignoring position change while a submission is in flight");
                return Err(SyncError::SubmissionInFlight);
            }
            inner.authoring = AuthoringState::PositionSelected {
                position,
                last_error: None
            };
        }

        self.view.open_composer(position);
        Ok(())
    }

    /// Discards the pending position. Returns `false` if there was nothing to
    /// cancel or a submission is already in flight.
    pub fn cancel(&self) -> bool {
        {
            let mut inner = self.inner.lock();
            match inner.authoring {
                AuthoringState::PositionSelected { .. } => inner.authoring = AuthoringState::Idle,
                AuthoringState::Idle => return false,
                AuthoringState::Submitting { .. } => {
                    debug!("In-flight submissions cannot be cancelled");
                    return false;
                }
            }
        }

        self.view.close_composer(ComposerOutcome::Cancelled);
        true
    }

    /// Submits `text` for the pending position.
    ///
    /// On success the server's note is appended to the mirror and the
    /// composer closes. On failure the mirror is unchanged, the composer stays
    /// open and the state returns to `PositionSelected` so the user can retry.
    /// A call made while another submission is outstanding sends nothing.
    /// Text that fails local validation is reported to the view and never
    /// sent.
    pub async fn submit(&self, text: &str) -> SyncResult<Note> {
        let (draft, position) = {
            let mut inner = self.inner.lock();
            let position = match &inner.authoring {
                AuthoringState::Idle => return Err(SyncError::NoPendingPosition),
                AuthoringState::Submitting { .. } => {
                    debug!("Ignoring submit while another is in flight");
                    return Err(SyncError::SubmissionInFlight);
                }
                AuthoringState::PositionSelected { position, .. } => *position
            };

            let draft = NewNote::at(position, text);
            if let Err(errors) = draft.validate() {
                drop(inner);
                let err = SyncError::Invalid(describe_validation_errors(&errors));
                debug!(error = %err, "Draft rejected locally");
                self.view.show_error(&err.to_string());
                return Err(err);
            }

            inner.authoring = AuthoringState::Submitting { position };
            (draft, position)
        };

        let guard = SubmitGuard {
            inner: &self.inner,
            position,
            armed: true
        };

        let outcome = match tokio::time::timeout(self.submit_timeout, self.gateway.create_note(&draft)).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout {
                timeout_ms: u64::try_from(self.submit_timeout.as_millis()).unwrap_or(u64::MAX)
            })
        };

        guard.disarm();

        match outcome {
            Ok(note) => {
                let markers = {
                    let mut inner = self.inner.lock();
                    // A load that raced this submit may already hold the note.
                    if !inner.mirror.iter().any(|n| n.id == note.id) {
                        inner.mirror.push(note.clone());
                    }
                    inner.authoring = AuthoringState::Idle;
                    inner.markers()
                };

                self.view.render_markers(&markers);
                self.view.close_composer(ComposerOutcome::Committed);
                info!(id = %note.id, "Note committed");
                Ok(note)
            }
            Err(e) => {
                let message = e.to_string();
                self.inner.lock().authoring = AuthoringState::PositionSelected {
                    position,
                    last_error: Some(message.clone())
                };

                warn!(error = %message, "Note submission failed");
                self.view.show_error(&message);
                Err(e.into())
            }
        }
    }

    /// Selects `(lat, lng)` and submits `text` there in one step.
    pub async fn submit_at(&self, lat: f64, lng: f64, text: &str) -> SyncResult<Note> {
        self.select_position(Coordinates::new(lat, lng))?;
        self.submit(text).await
    }

    /// Recenters the map on a geolocation fix. A failed lookup leaves the
    /// viewport where it is.
    pub fn apply_geolocation(&self, fix: Result<Coordinates, GeolocationError>) {
        match fix {
            Ok(center) => {
                let viewport = {
                    let mut inner = self.inner.lock();
                    inner.viewport.center = center;
                    inner.viewport
                };
                debug!(%center, "Recentering on geolocation fix");
                self.view.recenter(viewport);
            }
            Err(e) => info!(reason = %e, "No geolocation fix, keeping current viewport")
        }
    }

    /// Snapshot of the mirrored notes.
    #[must_use]
    pub fn notes(&self) -> Vec<Note> {
        self.inner.lock().mirror.clone()
    }

    #[must_use]
    pub fn state(&self) -> AuthoringState {
        self.inner.lock().authoring.clone()
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.inner.lock().viewport
    }
}
