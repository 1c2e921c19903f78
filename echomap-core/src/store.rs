//! Authoritative note storage.
//!
//! A [`NoteStore`] is the single source of truth for notes. Implementations
//! assign identity and creation time; callers only ever supply a
//! [`NewNote`]. The trait keeps room for a durable backend whose appends can
//! fail with [`NoteStoreError::Storage`], which the in-memory store never
//! produces.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info};
use validator::Validate;

use crate::clock::{Clock, SystemClock};
use crate::error::{NoteStoreError, Result};
use crate::note::{NewNote, Note, NoteId};

/// Storage backend for notes.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Returns every note in creation order.
    async fn list(&self) -> Result<Vec<Note>>;

    /// Validates `note`, stamps it with a fresh id and timestamp, appends it
    /// and returns the stored note.
    async fn create(&self, note: NewNote) -> Result<Note>;

    /// Number of stored notes.
    async fn len(&self) -> Result<usize>;
}

#[derive(Debug, Default)]
struct NoteLog {
    notes: Vec<Note>,
    last_id: u64,
    last_timestamp: Option<DateTime<Utc>>
}

impl NoteLog {
    // Called with the write lock held, so id and timestamp assignment and the
    // append are one step as far as readers are concerned.
    fn append(&mut self, note: NewNote, now: DateTime<Utc>) -> Result<Note> {
        let next_id = self
            .last_id
            .checked_add(1)
            .ok_or_else(|| NoteStoreError::storage("note id space exhausted"))?;

        let timestamp = match self.last_timestamp {
            Some(last) if last > now => last,
            _ => now
        };

        let stored = Note {
            id: NoteId::new(next_id),
            lat: note.lat,
            lng: note.lng,
            text: note.text,
            timestamp
        };

        self.notes.push(stored.clone());
        self.last_id = next_id;
        self.last_timestamp = Some(timestamp);
        Ok(stored)
    }
}

/// Process-local note store.
///
/// Appends are serialized behind a write lock; listing takes a read lock and
/// clones, so a reader never sees a note without its id or timestamp.
pub struct InMemoryNoteStore {
    log: RwLock<NoteLog>,
    clock: Arc<dyn Clock>
}

impl InMemoryNoteStore {
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            log: RwLock::new(NoteLog::default()),
            clock
        }
    }

    /// Creates a store pre-populated with `notes`, going through the regular
    /// create path so seeded notes get ids and timestamps like any other.
    pub fn seeded(notes: impl IntoIterator<Item = NewNote>) -> Result<Self> {
        let store = Self::new();
        for note in notes {
            store.append(note)?;
        }
        info!(count = store.log.read().notes.len(), "Seeded note store");
        Ok(store)
    }

    fn append(&self, note: NewNote) -> Result<Note> {
        note.validate()?;

        let mut log = self.log.write();
        let stored = log.append(note, self.clock.now())?;
        drop(log);

        debug!(id = %stored.id, lat = stored.lat, lng = stored.lng, "Created note");
        Ok(stored)
    }
}

impl Default for InMemoryNoteStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NoteStore for InMemoryNoteStore {
    async fn list(&self) -> Result<Vec<Note>> {
        Ok(self.log.read().notes.clone())
    }

    async fn create(&self, note: NewNote) -> Result<Note> {
        self.append(note)
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.log.read().notes.len())
    }
}
