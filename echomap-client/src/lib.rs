//! # EchoMap Client
//!
//! Client-side mirror of the note collection, for map views.
//!
//! - [`gateway`]: `NoteGateway` trait and the reqwest-backed `HttpNoteGateway`
//! - [`sync`]: `NoteSync`, the local mirror plus the one-note-at-a-time
//!   authoring flow
//! - [`view`]: the `MapView` collaborator contract that receives markers and
//!   composer signals
//! - [`terminal`]: a `MapView` that prints to the terminal, used by the
//!   `echomap` binary
//!
//! ```no_run
//! use echomap_client::{ClientConfig, HttpNoteGateway, NoteSync, NullMapView};
//! use std::sync::Arc;
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let config = ClientConfig::from_env();
//! let gateway = Arc::new(HttpNoteGateway::new(&config)?);
//! let sync = NoteSync::new(gateway, Arc::new(NullMapView), &config);
//!
//! sync.load().await?;
//! sync.submit_at(51.505, -0.09, "Hello from London").await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod gateway;
pub mod sync;
pub mod terminal;
pub mod view;

pub use config::ClientConfig;
pub use error::{SyncError, SyncResult, TransportError};
pub use gateway::{HttpNoteGateway, NoteGateway};
pub use sync::{AuthoringState, NoteSync};
pub use terminal::TerminalMapView;
pub use view::{ComposerOutcome, GeolocationError, MapView, NoteMarker, NullMapView, Viewport};
