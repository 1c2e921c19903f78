//! # EchoMap Server
//!
//! HTTP boundary in front of the authoritative note store.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐  GET/POST /notes  ┌─────────────────┐     ┌─────────────────┐
//! │   Map clients   │──────────────────►│  EchoMap server │────►│    NoteStore    │
//! │ (NoteSync, CLI) │◄──────────────────│  (This crate)   │     │   (in-memory)   │
//! └─────────────────┘   JSON notes      └─────────────────┘     └─────────────────┘
//! ```
//!
//! ## Endpoints
//!
//! - `GET /notes` - All notes in creation order (`[]` when empty)
//! - `POST /notes` - Create a note from `{lat, lng, text}`; `201` with the stored note
//! - `GET /health` - Health check with the current note count
//! - `GET /metrics` - Prometheus metrics endpoint
//!
//! Failures answer with `{message}`: `400` for malformed or invalid input,
//! `500` when the store cannot be read or appended to.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod state;
pub mod telemetry;

pub use error::ApiError;
pub use routes::create_router;
pub use server::NotesServer;
pub use state::{AppState, ServerConfig};
