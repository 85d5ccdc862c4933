// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Synthesizer over real HTTP fetching from a local server

use axum::{routing::get, Router};
use docsynth::fetch::{FetchConfig, PageCache, PageFetcher};
use docsynth::index::DocumentReference;
use docsynth::sandbox::SandboxValidator;
use docsynth::synthesis::{Provenance, Synthesizer, NO_CODE_FOUND};
use std::net::SocketAddr;
use std::sync::Arc;

const GOOD_PAGE: &str = "<html><head><title>Squares</title></head><body>\
    <p>Compute squares</p>\
    <pre>```python\nprint([n * n for n in range(4)])\n```</pre></body></html>";

const BROKEN_PAGE: &str = "<html><body><pre>```python\ndef broken(:\n    pass\n```</pre></body></html>";

const PROSE_PAGE: &str = "<html><body><p>No code here</p></body></html>";

async fn spawn_server() -> SocketAddr {
    let app = Router::new()
        .route("/good/1", get(|| async { GOOD_PAGE }))
        .route("/good/2", get(|| async { GOOD_PAGE }))
        .route("/broken", get(|| async { BROKEN_PAGE }))
        .route("/prose", get(|| async { PROSE_PAGE }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn synthesizer() -> Synthesizer {
    let fetcher = PageFetcher::new(FetchConfig {
        block_private_hosts: false,
        ..FetchConfig::default()
    })
    .unwrap();
    Synthesizer::new(
        Arc::new(fetcher),
        Arc::new(PageCache::new(20)),
        SandboxValidator::default(),
    )
}

fn python_available() -> bool {
    std::process::Command::new("python3")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn reference(addr: SocketAddr, path: &str, snippet: &str) -> DocumentReference {
    DocumentReference::new("Doc", format!("http://{}{}", addr, path), snippet)
}

#[tokio::test]
async fn test_empty_references() {
    let result = synthesizer().synthesize("python", "squares", &[]).await;

    assert_eq!(result.answer, NO_CODE_FOUND);
    assert_eq!(result.confidence, 0.2);
    assert!(result.validation.is_none());
}

#[tokio::test]
async fn test_prose_pages_fall_back_to_snippets() {
    let addr = spawn_server().await;
    let result = synthesizer()
        .synthesize("python", "squares", &[reference(addr, "/prose", "See the tutorial")])
        .await;

    assert_eq!(result.answer, "See the tutorial");
    assert_eq!(result.confidence, 0.2);
    assert!(matches!(result.provenance[0], Provenance::Reference(_)));
}

#[tokio::test]
async fn test_validated_answer() {
    if !python_available() {
        eprintln!("python3 not found on PATH, skipping");
        return;
    }
    let addr = spawn_server().await;
    let refs = [
        reference(addr, "/good/1", ""),
        reference(addr, "/good/2", ""),
        reference(addr, "/missing", ""),
    ];
    let result = synthesizer().synthesize("python", "squares", &refs).await;

    let validation = result.validation.as_ref().unwrap();
    assert_eq!(validation.exec_ok, Some(true));
    assert!(validation.stdout.contains("[0, 1, 4, 9]"));

    // score 2 → 0.2 + 2/3, no penalty
    assert!((result.confidence - (0.2 + 2.0 / 3.0)).abs() < 1e-9);
    assert!(result.answer.starts_with("Top candidate (score=2.00, confidence=0.87):"));
    assert_eq!(result.provenance.len(), 2);
    assert!(!result.needs_review());
}

#[tokio::test]
async fn test_syntax_error_penalized() {
    if !python_available() {
        eprintln!("python3 not found on PATH, skipping");
        return;
    }
    let addr = spawn_server().await;
    let result = synthesizer()
        .synthesize("python", "broken", &[reference(addr, "/broken", "")])
        .await;

    let validation = result.validation.as_ref().unwrap();
    assert!(validation.syntax_error.is_some());
    assert_eq!(validation.exec_ok, None);
    // score 1 → 0.7, × 0.2
    assert!((result.confidence - 0.14).abs() < 1e-9);
    assert!(result.needs_review());
}
