use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header}
};
use chrono::{DateTime, Utc};
use echomap_core::{InMemoryNoteStore, NewNote, Note, NoteStore, NoteStoreError};
use echomap_server::{AppState, ServerConfig, create_router};
use serde_json::{Value, json};
use std::collections::HashSet;
use std::sync::Arc;
use tower::ServiceExt;

fn app_with_store(store: Arc<dyn NoteStore>) -> Router {
    let config = ServerConfig::builder().metrics_enabled(false).build();
    create_router(Arc::new(AppState::with_store(store, config)))
}

fn app() -> Router {
    app_with_store(Arc::new(InMemoryNoteStore::new()))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, value)
}

fn get_notes() -> Request<Body> {
    Request::builder().uri("/notes").body(Body::empty()).unwrap()
}

fn post_notes(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/notes")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

fn post_json(value: &Value) -> Request<Body> {
    post_notes(value.to_string())
}

#[tokio::test]
async fn test_fresh_store_lists_empty_array() {
    let (status, body) = send(&app(), get_notes()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_create_returns_server_assigned_note() {
    let app = app();
    let before = Utc::now();

    let (status, body) = send(
        &app,
        post_json(&json!({"lat": 51.505, "lng": -0.09, "text": "Hello"}))
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body.get("id").is_some());
    assert_eq!(body["lat"], 51.505);
    assert_eq!(body["lng"], -0.09);
    assert_eq!(body["text"], "Hello");

    let timestamp: DateTime<Utc> = body["timestamp"].as_str().unwrap().parse().unwrap();
    assert!(timestamp >= before);
    assert!((Utc::now() - timestamp).num_seconds() < 5);
}

#[tokio::test]
async fn test_client_supplied_identity_is_overwritten() {
    let app = app();

    let (status, body) = send(
        &app,
        post_json(&json!({
            "id": "client-chosen",
            "timestamp": "1999-12-31T23:59:59Z",
            "lat": 10.0,
            "lng": 20.0,
            "text": "mine"
        }))
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_ne!(body["id"], "client-chosen");
    assert_ne!(body["timestamp"], "1999-12-31T23:59:59Z");
}

#[tokio::test]
async fn test_list_returns_every_created_note_in_order() {
    let app = app();
    let mut created = Vec::new();

    for i in 0..4 {
        let (status, body) = send(
            &app,
            post_json(&json!({"lat": 1.0, "lng": f64::from(i), "text": format!("note {i}")}))
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        created.push(serde_json::from_value::<Note>(body).unwrap());
    }

    let (status, body) = send(&app, get_notes()).await;
    assert_eq!(status, StatusCode::OK);

    let listed: Vec<Note> = serde_json::from_value(body).unwrap();
    assert_eq!(listed, created);
}

#[tokio::test]
async fn test_identical_rapid_creates_get_distinct_ids() {
    let app = app();
    let payload = json!({"lat": 0.0, "lng": 0.0, "text": "twin"});

    let (first, second) = tokio::join!(send(&app, post_json(&payload)), send(&app, post_json(&payload)));

    assert_eq!(first.0, StatusCode::CREATED);
    assert_eq!(second.0, StatusCode::CREATED);
    assert_ne!(first.1["id"], second.1["id"]);

    let (_, listed) = send(&app, get_notes()).await;
    let ids: HashSet<String> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["id"].to_string())
        .collect();
    assert_eq!(ids.len(), 2);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = app();

    let (status, body) = send(&app, post_notes("{not json")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());

    let (_, listed) = send(&app, get_notes()).await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn test_missing_field_is_bad_request() {
    let (status, body) = send(&app(), post_json(&json!({"lat": 1.0, "text": "no lng"}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "MALFORMED_BODY");
}

#[tokio::test]
async fn test_wrong_field_type_is_bad_request() {
    let (status, _) = send(
        &app(),
        post_json(&json!({"lat": "north", "lng": 0.0, "text": "typed"}))
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_note_is_rejected_with_message() {
    let app = app();

    for payload in [
        json!({"lat": 91.0, "lng": 0.0, "text": "too far north"}),
        json!({"lat": 0.0, "lng": -180.5, "text": "too far west"}),
        json!({"lat": 0.0, "lng": 0.0, "text": "   "}),
        json!({"lat": 0.0, "lng": 0.0, "text": "x".repeat(281)}),
    ] {
        let (status, body) = send(&app, post_json(&payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload: {payload}");
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert!(body["message"].as_str().unwrap().contains("Validation failed"));
    }

    let (_, listed) = send(&app, get_notes()).await;
    assert_eq!(listed, json!([]));
}

struct UnavailableStore;

#[async_trait]
impl NoteStore for UnavailableStore {
    async fn list(&self) -> echomap_core::Result<Vec<Note>> {
        Err(NoteStoreError::storage("backing medium unavailable"))
    }

    async fn create(&self, _note: NewNote) -> echomap_core::Result<Note> {
        Err(NoteStoreError::storage("backing medium unavailable"))
    }

    async fn len(&self) -> echomap_core::Result<usize> {
        Err(NoteStoreError::storage("backing medium unavailable"))
    }
}

#[tokio::test]
async fn test_storage_failure_is_internal_error() {
    let app = app_with_store(Arc::new(UnavailableStore));

    let (status, body) = send(&app, get_notes()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["message"].is_string());

    let (status, body) = send(
        &app,
        post_json(&json!({"lat": 0.0, "lng": 0.0, "text": "lost"}))
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "STORAGE_ERROR");
}

#[tokio::test]
async fn test_health_reports_note_count() {
    let store = Arc::new(InMemoryNoteStore::seeded(echomap_core::demo_notes()).unwrap());
    let (status, body) = send(
        &app_with_store(store),
        Request::builder().uri("/health").body(Body::empty()).unwrap()
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["notes"], 2);
}

#[tokio::test]
async fn test_health_unavailable_store() {
    let (status, body) = send(
        &app_with_store(Arc::new(UnavailableStore)),
        Request::builder().uri("/health").body(Body::empty()).unwrap()
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "unhealthy");
}

#[tokio::test]
async fn test_metrics_disabled_is_not_found() {
    let response = app()
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_metrics_enabled_renders_prometheus_text() {
    let recorder = metrics_exporter_prometheus::PrometheusBuilder::new().build_recorder();
    let config = ServerConfig::builder().build();
    let state = AppState::with_store(Arc::new(InMemoryNoteStore::new()), config)
        .with_metrics(recorder.handle());
    let app = create_router(Arc::new(state));

    let response = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/plain; version=0.0.4"
    );
}
