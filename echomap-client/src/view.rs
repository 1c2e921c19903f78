//! Contract with the map-rendering collaborator.
//!
//! [`NoteSync`](crate::sync::NoteSync) never draws anything itself; it hands
//! markers, viewport changes and composer open/close signals to a
//! [`MapView`].

use chrono::{DateTime, Utc};
use echomap_core::{Coordinates, Note, NoteId};
use serde::Serialize;
use thiserror::Error;

/// Visible map region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub center: Coordinates,
    pub zoom: u8
}

/// What the map needs to draw one note marker and its detail popup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoteMarker {
    pub id: NoteId,
    pub position: Coordinates,
    pub text: String,
    pub posted_at: String
}

impl From<&Note> for NoteMarker {
    fn from(note: &Note) -> Self {
        Self {
            id: note.id.clone(),
            position: note.coordinates(),
            text: note.text.clone(),
            posted_at: human_timestamp(note.timestamp)
        }
    }
}

/// Renders a note timestamp for display, e.g. `2025-08-20 10:00:00 UTC`.
#[must_use]
pub fn human_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Why a geolocation lookup produced no fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("Location access denied")]
    PermissionDenied,
    #[error("Location unavailable")]
    PositionUnavailable,
    #[error("Location lookup timed out")]
    Timeout
}

/// Why the composer is being closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposerOutcome {
    /// The draft was accepted by the server.
    Committed,
    /// The user discarded the draft.
    Cancelled
}

/// Map-rendering collaborator driven by [`NoteSync`](crate::sync::NoteSync).
pub trait MapView: Send + Sync {
    /// Replace all note markers with `markers`.
    fn render_markers(&self, markers: &[NoteMarker]);

    /// Move the map to `viewport`.
    fn recenter(&self, viewport: Viewport);

    /// Show the note composer for a pending note at `position`.
    fn open_composer(&self, position: Coordinates);

    /// Hide the note composer.
    fn close_composer(&self, outcome: ComposerOutcome);

    /// Tell the user an operation failed; the composer stays as it is.
    fn show_error(&self, message: &str);
}

/// A view that draws nothing, for headless use.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullMapView;

impl MapView for NullMapView {
    fn render_markers(&self, _markers: &[NoteMarker]) {}

    fn recenter(&self, _viewport: Viewport) {}

    fn open_composer(&self, _position: Coordinates) {}

    fn close_composer(&self, _outcome: ComposerOutcome) {}

    fn show_error(&self, _message: &str) {}
}
