// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! PageCache in front of a counting provider

use async_trait::async_trait;
use bytes::Bytes;
use docsynth::fetch::{FetchError, FetchOutcome, PageCache, PageProvider};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Serves "<url>" as the body and counts calls; "empty" URLs return nothing
#[derive(Default)]
struct CountingProvider {
    calls: AtomicUsize,
}

#[async_trait]
impl PageProvider for CountingProvider {
    async fn fetch(&self, url: &str) -> FetchOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if url.contains("empty") {
            FetchOutcome::Unavailable(FetchError::Empty(url.to_string()))
        } else {
            FetchOutcome::Fetched(Bytes::from(url.to_string()))
        }
    }
}

#[tokio::test]
async fn test_capacity_plus_one_evicts_first_inserted() {
    let cache = PageCache::new(20);
    let provider = CountingProvider::default();

    for i in 0..21 {
        let url = format!("https://docs.example/{}", i);
        assert!(cache.get_or_fetch(&provider, &url).await.is_fetched());
    }

    assert_eq!(cache.len(), 20);
    assert!(!cache.contains("https://docs.example/0"));
    assert!(cache.contains("https://docs.example/1"));
    assert!(cache.contains("https://docs.example/20"));
}

#[tokio::test]
async fn test_reads_do_not_reorder() {
    let cache = PageCache::new(2);
    let provider = CountingProvider::default();

    cache.get_or_fetch(&provider, "https://a").await;
    cache.get_or_fetch(&provider, "https://b").await;
    // Hit on the oldest entry must not protect it
    cache.get_or_fetch(&provider, "https://a").await;
    cache.get_or_fetch(&provider, "https://c").await;

    assert!(!cache.contains("https://a"));
    assert_eq!(cache.urls(), vec!["https://b".to_string(), "https://c".to_string()]);
}

#[tokio::test]
async fn test_hits_skip_provider() {
    let cache = PageCache::new(4);
    let provider = CountingProvider::default();

    for _ in 0..3 {
        let bytes = cache
            .get_or_fetch(&provider, "https://a")
            .await
            .into_bytes()
            .unwrap();
        assert_eq!(bytes, Bytes::from_static(b"https://a"));
    }

    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    let stats = cache.stats();
    assert_eq!(stats.hits, 2);
    assert_eq!(stats.misses, 1);
}

#[tokio::test]
async fn test_unavailable_pages_not_cached() {
    let cache = PageCache::new(4);
    let provider = CountingProvider::default();

    assert!(!cache.get_or_fetch(&provider, "https://empty").await.is_fetched());
    assert!(!cache.get_or_fetch(&provider, "https://empty").await.is_fetched());
    assert!(cache.is_empty());
    assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_concurrent_callers_share_cache() {
    let cache = Arc::new(PageCache::new(8));
    let provider = Arc::new(CountingProvider::default());

    let tasks: Vec<_> = (0..16)
        .map(|i| {
            let cache = cache.clone();
            let provider = provider.clone();
            tokio::spawn(async move {
                let url = format!("https://docs.example/{}", i % 4);
                cache.get_or_fetch(provider.as_ref(), &url).await.is_fetched()
            })
        })
        .collect();

    for task in tasks {
        assert!(task.await.unwrap());
    }
    assert_eq!(cache.len(), 4);
}
