// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Bounded FIFO cache of raw page bytes
//!
//! Entries are evicted strictly in insertion order once the cache is full.
//! Reads never reorder entries, so this is deliberately not an LRU.

use bytes::Bytes;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use tracing::debug;

use super::fetcher::{FetchOutcome, PageProvider};

/// A page held by the cache
#[derive(Debug, Clone)]
pub struct CachedPage {
    pub url: String,
    pub bytes: Bytes,
    /// Monotonic insertion sequence; lower means inserted earlier
    pub sequence: u64,
}

/// Page cache statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCacheStats {
    pub total: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<String, CachedPage>,
    order: VecDeque<String>,
    next_sequence: u64,
}

/// FIFO page cache fronting all network fetches
pub struct PageCache {
    state: Mutex<CacheState>,
    capacity: usize,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl PageCache {
    /// Create a new page cache holding at most `capacity` pages (minimum 1)
    pub fn new(capacity: usize) -> Self {
        Self {
            state: Mutex::new(CacheState::default()),
            capacity: capacity.max(1),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Look up a page without touching insertion order
    pub fn get(&self, url: &str) -> Option<Bytes> {
        let state = self.state.lock().ok()?;
        state.entries.get(url).map(|page| page.bytes.clone())
    }

    /// Insert a page, evicting the earliest-inserted entry when full.
    ///
    /// Returns the evicted URL, if any. Inserting a URL that is already
    /// cached keeps the existing entry and evicts nothing.
    pub fn insert(&self, url: &str, bytes: Bytes) -> Option<String> {
        let mut state = match self.state.lock() {
            Ok(s) => s,
            Err(_) => return None,
        };

        if state.entries.contains_key(url) {
            return None;
        }

        let mut evicted = None;
        if state.entries.len() >= self.capacity {
            if let Some(oldest) = state.order.pop_front() {
                state.entries.remove(&oldest);
                debug!("Evicted page from cache: {}", oldest);
                evicted = Some(oldest);
            }
        }

        let sequence = state.next_sequence;
        state.next_sequence += 1;
        state.order.push_back(url.to_string());
        state.entries.insert(
            url.to_string(),
            CachedPage {
                url: url.to_string(),
                bytes,
                sequence,
            },
        );

        evicted
    }

    /// Return cached bytes, or fetch through `provider` and cache non-empty results
    pub async fn get_or_fetch<P>(&self, provider: &P, url: &str) -> FetchOutcome
    where
        P: PageProvider + ?Sized,
    {
        if let Some(bytes) = self.get(url) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!("Page cache hit for: {}", url);
            return FetchOutcome::Fetched(bytes);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let outcome = provider.fetch(url).await;
        if let FetchOutcome::Fetched(bytes) = &outcome {
            if !bytes.is_empty() {
                self.insert(url, bytes.clone());
            }
        }
        outcome
    }

    /// Cached URLs, oldest first
    pub fn urls(&self) -> Vec<String> {
        match self.state.lock() {
            Ok(state) => state.order.iter().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn contains(&self, url: &str) -> bool {
        self.state
            .lock()
            .map(|state| state.entries.contains_key(url))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.state.lock().map(|state| state.entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Clear all cached pages
    pub fn clear(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.entries.clear();
            state.order.clear();
        }
    }

    /// Get cache statistics
    pub fn stats(&self) -> PageCacheStats {
        PageCacheStats {
            total: self.len(),
            capacity: self.capacity,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
