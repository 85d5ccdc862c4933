// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! PageFetcher against a local HTTP server

use axum::{http::HeaderMap, http::StatusCode, routing::get, Router};
use docsynth::fetch::{FetchConfig, FetchError, FetchOutcome, PageFetcher, PageProvider};
use docsynth::version::USER_AGENT;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

const BIG_BODY_BYTES: usize = 900_000;

async fn spawn_server() -> SocketAddr {
    let app = Router::new()
        .route("/page", get(|| async { "<html><title>T</title><p>hello</p></html>" }))
        .route("/big", get(|| async { vec![b'a'; BIG_BODY_BYTES] }))
        .route("/error", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
        .route("/missing", get(|| async { (StatusCode::NOT_FOUND, "gone") }))
        .route("/empty", get(|| async { "" }))
        .route(
            "/ua",
            get(|headers: HeaderMap| async move {
                headers
                    .get("user-agent")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string()
            }),
        )
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "too late"
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn local_fetcher(config: FetchConfig) -> PageFetcher {
    PageFetcher::new(FetchConfig {
        block_private_hosts: false,
        ..config
    })
    .unwrap()
}

#[tokio::test]
async fn test_fetch_success() {
    let addr = spawn_server().await;
    let fetcher = local_fetcher(FetchConfig::default());

    let outcome = fetcher.fetch(&format!("http://{}/page", addr)).await;
    let bytes = outcome.into_bytes().expect("page should be fetched");
    assert!(String::from_utf8_lossy(&bytes).contains("hello"));
}

#[tokio::test]
async fn test_oversized_body_truncated_to_cap() {
    let addr = spawn_server().await;
    let fetcher = local_fetcher(FetchConfig::default());

    let outcome = fetcher.fetch(&format!("http://{}/big", addr)).await;
    let bytes = outcome.into_bytes().expect("page should be fetched");
    assert_eq!(bytes.len(), 800_000);
}

#[tokio::test]
async fn test_small_cap_applies() {
    let addr = spawn_server().await;
    let fetcher = local_fetcher(FetchConfig {
        max_page_bytes: 1_000,
        ..FetchConfig::default()
    });

    let bytes = fetcher
        .fetch(&format!("http://{}/big", addr))
        .await
        .into_bytes()
        .unwrap();
    assert_eq!(bytes.len(), 1_000);
}

#[tokio::test]
async fn test_error_status_is_unavailable() {
    let addr = spawn_server().await;
    let fetcher = local_fetcher(FetchConfig::default());

    match fetcher.fetch(&format!("http://{}/error", addr)).await {
        FetchOutcome::Unavailable(FetchError::HttpStatus(status, _)) => assert_eq!(status, 500),
        other => panic!("expected HTTP 500, got {:?}", other),
    }

    let missing = fetcher.fetch(&format!("http://{}/missing", addr)).await;
    assert!(matches!(
        missing,
        FetchOutcome::Unavailable(FetchError::HttpStatus(404, _))
    ));
}

#[tokio::test]
async fn test_empty_body_is_unavailable() {
    let addr = spawn_server().await;
    let fetcher = local_fetcher(FetchConfig::default());

    let outcome = fetcher.fetch(&format!("http://{}/empty", addr)).await;
    assert!(matches!(outcome, FetchOutcome::Unavailable(FetchError::Empty(_))));
}

#[tokio::test]
async fn test_user_agent_sent() {
    let addr = spawn_server().await;
    let fetcher = local_fetcher(FetchConfig::default());

    let bytes = fetcher
        .fetch(&format!("http://{}/ua", addr))
        .await
        .into_bytes()
        .unwrap();
    assert_eq!(String::from_utf8_lossy(&bytes), USER_AGENT);
}

#[tokio::test]
async fn test_timeout_is_unavailable() {
    let addr = spawn_server().await;
    let fetcher = local_fetcher(FetchConfig {
        timeout_secs: 1,
        ..FetchConfig::default()
    });

    let start = Instant::now();
    let outcome = fetcher.fetch(&format!("http://{}/slow", addr)).await;
    assert!(matches!(outcome, FetchOutcome::Unavailable(FetchError::Timeout(_))));
    assert!(start.elapsed() < Duration::from_secs(4));
}

#[tokio::test]
async fn test_private_hosts_blocked_by_default() {
    let addr = spawn_server().await;
    let fetcher = PageFetcher::new(FetchConfig::default()).unwrap();

    let outcome = fetcher.fetch(&format!("http://{}/page", addr)).await;
    assert!(matches!(outcome, FetchOutcome::Unavailable(FetchError::UnsafeUrl(_))));
}

#[tokio::test]
async fn test_connection_refused_is_unavailable() {
    // Bind then drop to get a port nothing listens on
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let fetcher = local_fetcher(FetchConfig::default());

    let outcome = fetcher.fetch(&format!("http://127.0.0.1:{}/", port)).await;
    assert!(matches!(outcome, FetchOutcome::Unavailable(FetchError::Http(_))));
}
