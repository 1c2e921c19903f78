//! Note data model and input validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use validator::{Validate, ValidationError, ValidationErrors};

/// Maximum length of a note body, counted in Unicode scalar values.
pub const MAX_TEXT_CHARS: usize = 280;

/// Store-assigned note identifier.
///
/// Opaque to clients: it may arrive as a JSON number or a JSON string, and
/// only equality is meaningful. The in-memory store hands out
/// [`NoteId::Num`] from a monotonic counter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NoteId {
    Num(u64),
    Str(String)
}

impl NoteId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self::Num(raw)
    }
}

impl From<u64> for NoteId {
    fn from(raw: u64) -> Self {
        Self::Num(raw)
    }
}

impl From<String> for NoteId {
    fn from(raw: String) -> Self {
        Self::Str(raw)
    }
}

impl From<&str> for NoteId {
    fn from(raw: &str) -> Self {
        Self::Str(raw.to_string())
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Num(n) => fmt::Display::fmt(n, f),
            Self::Str(s) => f.pad(s)
        }
    }
}

/// A point on the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64
}

impl Coordinates {
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.lat, self.lng)
    }
}

/// A geotagged note as held by the store and returned over the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub lat: f64,
    pub lng: f64,
    pub text: String,
    pub timestamp: DateTime<Utc>
}

impl Note {
    #[must_use]
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lng)
    }
}

/// Client-submitted payload for a new note.
///
/// Any `id` or `timestamp` present in the incoming JSON is dropped during
/// deserialization; both are assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct NewNote {
    #[validate(
        custom(function = "validate_finite"),
        range(min = -90.0, max = 90.0, message = "latitude must be within [-90, 90]")
    )]
    pub lat: f64,

    #[validate(
        custom(function = "validate_finite"),
        range(min = -180.0, max = 180.0, message = "longitude must be within [-180, 180]")
    )]
    pub lng: f64,

    #[validate(
        custom(function = "validate_not_blank"),
        length(max = 280, message = "text must be at most 280 characters")
    )]
    pub text: String
}

impl NewNote {
    pub fn new(lat: f64, lng: f64, text: impl Into<String>) -> Self {
        Self {
            lat,
            lng,
            text: text.into()
        }
    }

    #[must_use]
    pub fn at(position: Coordinates, text: impl Into<String>) -> Self {
        Self::new(position.lat, position.lng, text)
    }

    #[must_use]
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lng)
    }
}

fn validate_finite(value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::new("finite").with_message(Cow::Borrowed("must be a finite number")))
    }
}

fn validate_not_blank(text: &str) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        Err(ValidationError::new("not_blank").with_message(Cow::Borrowed("text must not be empty")))
    } else {
        Ok(())
    }
}

/// Renders validation errors as a single sorted, human-readable line.
#[must_use]
pub fn describe_validation_errors(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| {
                let reason = err
                    .message
                    .as_ref()
                    .map_or_else(|| err.code.to_string(), ToString::to_string);
                format!("{field}: {reason}")
            })
        })
        .collect();
    parts.sort();
    parts.join("; ")
}

/// Sample notes matching the public demo deployment.
#[must_use]
pub fn demo_notes() -> Vec<NewNote> {
    vec![
        NewNote::new(
            51.505,
            -0.09,
            "Welcome to EchoMap! This is a sample note in London."
        ),
        NewNote::new(
            48.8566,
            2.3522,
            "A note from Paris. Feel free to add your own!"
        ),
    ]
}
