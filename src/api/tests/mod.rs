use super::*;
use crate::downloader::test_helpers::{create_test_downloader_with, test_config};
use crate::transport::MemoryTransport;
use crate::types::RemoteEntry;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tower::ServiceExt;


/// Router over `transport` with the test config
fn test_router(transport: &MemoryTransport) -> Router {
    test_router_with(transport, test_config())
}

fn test_router_with(transport: &MemoryTransport, config: Config) -> Router {
    let downloader = Arc::new(create_test_downloader_with(transport, config));
    let config = downloader.config.clone();
    create_router(downloader, config)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// Send `request` and return the status with the parsed JSON body
async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn test_api_server_spawns() {
    let transport = MemoryTransport::new();
    let mut config = test_config();
    // Port 0 = OS assigns a free port
    config.server.api.bind_address = "127.0.0.1:0".parse().unwrap();
    let downloader = Arc::new(create_test_downloader_with(&transport, config));
    let config = downloader.config.clone();

    let api_handle = tokio::spawn(async move { start_api_server(downloader, config).await });

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(!api_handle.is_finished(), "server exited early");

    api_handle.abort();
}

#[tokio::test]
async fn test_cors_enabled() {
    let app = test_router(&MemoryTransport::new());

    let request = Request::builder()
        .uri("/api/ftp/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}

#[tokio::test]
async fn test_cors_specific_origin() {
    let mut config = test_config();
    config.server.api.cors_origins = vec!["http://app.local".to_string()];
    let app = test_router_with(&MemoryTransport::new(), config);

    let request = Request::builder()
        .uri("/api/ftp/health")
        .header("Origin", "http://app.local")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("http://app.local")
    );
}

#[tokio::test]
async fn test_cors_disabled() {
    let mut config = test_config();
    config.server.api.cors_enabled = false;
    let app = test_router_with(&MemoryTransport::new(), config);

    let request = Request::builder()
        .uri("/api/ftp/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert!(
        response
            .headers()
            .get("access-control-allow-origin")
            .is_none()
    );
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = test_router(&MemoryTransport::new());

    let response = app.oneshot(get_request("/api/ftp/nope")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_spawn_api_server_method() {
    let transport = MemoryTransport::new();
    let mut config = test_config();
    config.server.api.bind_address = "127.0.0.1:0".parse().unwrap();
    let downloader = create_test_downloader_with(&transport, config);

    let api_handle = downloader.spawn_api_server();

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(!api_handle.is_finished(), "server exited early");

    api_handle.abort();
}
