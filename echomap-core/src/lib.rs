//! # EchoMap Core
//!
//! Data model and authoritative storage for geotagged notes.
//!
//! - [`note`]: `Note`, `NewNote`, identifiers and input validation
//! - [`store`]: the `NoteStore` trait and its in-memory implementation
//! - [`clock`]: time sources used to stamp new notes
//! - [`error`]: `NoteStoreError`
//!
//! A note is created exactly once, by a store, from a client-submitted
//! `{lat, lng, text}`. The store assigns `id` and `timestamp`; the collection
//! is append-only and lists in creation order.

pub mod clock;
pub mod error;
pub mod note;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{NoteStoreError, Result};
pub use note::{Coordinates, MAX_TEXT_CHARS, NewNote, Note, NoteId, demo_notes};
pub use store::{InMemoryNoteStore, NoteStore};
