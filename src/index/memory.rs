// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! In-memory document index

use async_trait::async_trait;
use std::sync::RwLock;

use super::{DocumentIndex, DocumentReference, IndexError, IndexedDocument};

struct Entry {
    document: IndexedDocument,
    /// Insertion order, breaks ties between equal crawl timestamps
    sequence: u64,
}

/// Document index held in process memory, unique by URL
#[derive(Default)]
pub struct InMemoryIndex {
    entries: RwLock<Vec<Entry>>,
}

impl InMemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    fn matching(
        entries: &[Entry],
        topic: Option<&str>,
        needle: &str,
        limit: usize,
    ) -> Vec<DocumentReference> {
        let mut hits: Vec<&Entry> = entries
            .iter()
            .filter(|e| topic.map_or(true, |t| e.document.topic == t))
            .filter(|e| {
                e.document.content.to_lowercase().contains(needle)
                    || e.document.snippet.to_lowercase().contains(needle)
            })
            .collect();

        hits.sort_by(|a, b| {
            b.document
                .crawled
                .cmp(&a.document.crawled)
                .then(b.sequence.cmp(&a.sequence))
        });

        hits.into_iter()
            .take(limit)
            .map(|e| e.document.reference())
            .collect()
    }
}

#[async_trait]
impl DocumentIndex for InMemoryIndex {
    async fn insert(&self, document: IndexedDocument) -> Result<bool, IndexError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| IndexError::Storage(e.to_string()))?;

        if entries.iter().any(|e| e.document.url == document.url) {
            return Ok(false);
        }

        let sequence = entries.len() as u64;
        entries.push(Entry { document, sequence });
        Ok(true)
    }

    async fn search(
        &self,
        topic: &str,
        query: &str,
        limit: usize,
    ) -> Result<Vec<DocumentReference>, IndexError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| IndexError::Storage(e.to_string()))?;
        let needle = query.to_lowercase();

        let scoped = Self::matching(&entries, Some(topic), &needle, limit);
        if !scoped.is_empty() {
            return Ok(scoped);
        }
        Ok(Self::matching(&entries, None, &needle, limit))
    }

    async fn len(&self) -> Result<usize, IndexError> {
        self.entries
            .read()
            .map(|entries| entries.len())
            .map_err(|e| IndexError::Storage(e.to_string()))
    }
}
