// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Document index and review queue seams
//!
//! The pipeline reads [`DocumentReference`]s from a [`DocumentIndex`] and
//! writes low-confidence answers to a [`review::ReviewQueue`]. Both are
//! traits so a persistent store can be plugged in; the in-memory
//! implementations here back the CLI and the tests.

pub mod memory;
pub mod review;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utils::truncate_chars;

pub use memory::InMemoryIndex;
pub use review::{InMemoryReviewQueue, ReviewEntry, ReviewQueue};

/// Maximum characters of a discovery snippet kept in the index
pub const MAX_INDEXED_SNIPPET_CHARS: usize = 1000;
/// Maximum characters of page text kept in the index
pub const MAX_INDEXED_CONTENT_CHARS: usize = 4000;

/// A reference to an indexed page, as handed to the synthesizer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentReference {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

impl DocumentReference {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        snippet: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            snippet: snippet.into(),
        }
    }
}

/// A crawled page stored in the index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexedDocument {
    pub topic: String,
    pub title: String,
    pub url: String,
    pub snippet: String,
    pub content: String,
    /// Discovery source, e.g. "duckduckgo"
    pub source: String,
    pub crawled: DateTime<Utc>,
}

impl IndexedDocument {
    /// Build a document stamped now, with snippet and content capped
    pub fn new(
        topic: &str,
        title: &str,
        url: &str,
        snippet: &str,
        content: &str,
        source: &str,
    ) -> Self {
        Self {
            topic: topic.to_string(),
            title: title.to_string(),
            url: url.to_string(),
            snippet: truncate_chars(snippet, MAX_INDEXED_SNIPPET_CHARS).to_string(),
            content: truncate_chars(content, MAX_INDEXED_CONTENT_CHARS).to_string(),
            source: source.to_string(),
            crawled: Utc::now(),
        }
    }

    pub fn reference(&self) -> DocumentReference {
        DocumentReference::new(&self.title, &self.url, &self.snippet)
    }
}

/// Errors from the document store seam
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Index storage error: {0}")]
    Storage(String),

    #[error("Review entry not found: {0}")]
    NotFound(u64),
}

/// Key-value and full-text lookup over crawled pages
#[async_trait]
pub trait DocumentIndex: Send + Sync {
    /// Insert a page; returns false when the URL is already indexed
    async fn insert(&self, document: IndexedDocument) -> Result<bool, IndexError>;

    /// Newest-first pages whose content or snippet contains `query`.
    ///
    /// Restricted to `topic`; when the topic has no match, all topics are
    /// searched instead.
    async fn search(
        &self,
        topic: &str,
        query: &str,
        limit: usize,
    ) -> Result<Vec<DocumentReference>, IndexError>;

    /// Number of indexed pages
    async fn len(&self) -> Result<usize, IndexError>;
}
