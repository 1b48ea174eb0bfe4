//! HTTP backend against a local axum server

mod common;

use axum::{Json, Router, http::StatusCode, routing::post};
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use common::wait_for_snapshot;
use live_commentary::config::{BackendConfig, EngineConfig};
use live_commentary::engine::LiveCommentaryEngine;
use live_commentary::errors::CommentaryError;
use live_commentary::models::{LiveCommentaryRequest, Subject};
use live_commentary::services::{CommentaryBackend, HttpCommentaryBackend};

async fn echo_commentary(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({
        "commentary": format!("{} at {}", body["videoId"].as_str().unwrap_or("?"), body["timestamp"]),
        "rawAction": format!("window {}", body["windowSize"]),
        "timestamp": body["timestamp"],
        "skipped": false
    }))
}

async fn spawn_server(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn backend_for(addr: SocketAddr) -> HttpCommentaryBackend {
    let config = BackendConfig {
        base_url: format!("http://{addr}/api"),
        ..BackendConfig::default()
    };
    HttpCommentaryBackend::new(&config).unwrap()
}

fn request(timestamp: f64) -> LiveCommentaryRequest {
    LiveCommentaryRequest {
        video_id: "abc".to_string(),
        timestamp,
        window_size: 5.0,
    }
}

#[tokio::test]
async fn test_success_body_is_normalized() {
    let addr = spawn_server(Router::new().route("/api/live-commentary", post(echo_commentary))).await;
    let backend = backend_for(addr);
    assert_eq!(backend.endpoint().path(), "/api/live-commentary");

    let result = backend.live_commentary(&request(12.5)).await.unwrap();
    assert_eq!(result.commentary.as_deref(), Some("abc at 12.5"));
    assert_eq!(result.raw_action.as_deref(), Some("window 5.0"));
    assert_eq!(result.timestamp, 12.5);
    assert!(!result.skipped);
    assert!(result.error.is_none());
}

#[tokio::test]
async fn test_server_error_becomes_skip() {
    let app = Router::new().route(
        "/api/live-commentary",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "server error") }),
    );
    let backend = backend_for(spawn_server(app).await);

    let result = backend.live_commentary(&request(3.0)).await.unwrap();
    assert!(result.skipped);
    assert_eq!(result.error.as_deref(), Some("server error"));
    assert!(result.commentary.is_none());
    assert_eq!(result.timestamp, 3.0);
}

#[tokio::test]
async fn test_json_error_field_wins_over_body() {
    let app = Router::new().route(
        "/api/live-commentary",
        post(|| async {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "error": "model overloaded", "message": "try later" })),
            )
        }),
    );
    let backend = backend_for(spawn_server(app).await);

    let result = backend.live_commentary(&request(0.0)).await.unwrap();
    assert!(result.skipped);
    assert_eq!(result.error.as_deref(), Some("model overloaded"));
}

#[tokio::test]
async fn test_malformed_success_body_is_empty_result() {
    let app = Router::new().route("/api/live-commentary", post(|| async { "definitely not json" }));
    let backend = backend_for(spawn_server(app).await);

    let result = backend.live_commentary(&request(7.0)).await.unwrap();
    assert!(result.commentary.is_none());
    assert!(!result.skipped);
    assert_eq!(result.timestamp, 7.0);
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let error = backend_for(addr).live_commentary(&request(0.0)).await.unwrap_err();
    assert!(matches!(error, CommentaryError::Transport { .. }));
    assert_eq!(error.kind(), "transport");
}

#[tokio::test]
async fn test_engine_shows_commentary_from_http_backend() {
    let addr = spawn_server(Router::new().route("/api/live-commentary", post(echo_commentary))).await;
    let engine =
        LiveCommentaryEngine::new(Arc::new(backend_for(addr)), EngineConfig::default()).unwrap();
    let mut snapshots = engine.subscribe();

    engine.set_subject(Some(Subject::from_id("match-42"))).await;
    engine.set_playback_time(65.0).await;
    engine.set_playing(true).await;

    let snapshot = tokio::time::timeout(
        Duration::from_secs(10),
        wait_for_snapshot(&mut snapshots, |s| s.current.is_some()),
    )
    .await
    .expect("commentary within 10s");

    let item = snapshot.current.unwrap();
    assert_eq!(item.text(), "match-42 at 65.0");
    assert_eq!(item.timestamp(), 65.0);
    assert_eq!(item.raw_action(), Some("window 5.0"));
    engine.shutdown().await;
}
