//! HTTP request handlers for the EchoMap server.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::IntoResponse
};
use echomap_core::{NewNote, Note};
use serde::Serialize;
use std::sync::Arc;

use crate::error::{ApiError, Result};
use crate::state::AppState;
use crate::telemetry::{RequestTimer, Telemetry};

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub notes: Option<usize>
}

/// Health check endpoint.
///
/// Returns 200 with the current note count, or 503 if the store cannot be
/// read.
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.store.len().await {
        Ok(count) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy".to_string(),
                notes: Some(count)
            })
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Note store health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "unhealthy".to_string(),
                    notes: None
                })
            )
        }
    }
}

/// Prometheus metrics endpoint.
pub async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render()
        ),
        None => (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "text/plain")],
            "metrics disabled\n".to_string()
        )
    }
}

/// GET /notes
///
/// Returns every note in creation order; an empty store yields `[]`.
pub async fn list_notes(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Note>>> {
    let timer = RequestTimer::new("list_notes");

    let notes = state.store.list().await.inspect_err(|e| {
        tracing::error!(error = %e, "Failed to list notes");
    })?;

    Telemetry::record_listed(notes.len());
    tracing::debug!(count = notes.len(), "Returning notes");
    timer.finish();

    Ok(Json(notes))
}

/// POST /notes
///
/// Accepts `{lat, lng, text}`; any client-supplied `id` or `timestamp` is
/// discarded. Responds `201 Created` with the note as stored.
pub async fn create_note(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<NewNote>, JsonRejection>
) -> Result<(StatusCode, Json<Note>)> {
    let timer = RequestTimer::new("create_note");

    let result = match payload {
        Ok(Json(new_note)) => state.store.create(new_note).await.map_err(ApiError::from),
        Err(rejection) => Err(ApiError::from(rejection))
    };

    let note = match result {
        Ok(note) => note,
        Err(err) => {
            tracing::info!(error = %err, "Rejected note");
            Telemetry::record_rejected(err.kind());
            timer.finish();
            return Err(err);
        }
    };

    Telemetry::record_created();
    tracing::info!(id = %note.id, lat = note.lat, lng = note.lng, "Note created");
    timer.finish();

    Ok((StatusCode::CREATED, Json(note)))
}
