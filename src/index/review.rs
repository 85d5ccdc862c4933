// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Review queue for answers that need a human look

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::RwLock;

use super::IndexError;

/// A queued answer awaiting review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewEntry {
    pub id: u64,
    pub chat_id: String,
    pub prompt: String,
    pub response: String,
    pub approved: bool,
    pub created: DateTime<Utc>,
}

#[async_trait]
pub trait ReviewQueue: Send + Sync {
    /// Queue a response; returns the new entry id
    async fn enqueue(&self, chat_id: &str, prompt: &str, response: &str)
        -> Result<u64, IndexError>;

    /// Unapproved entries, oldest first
    async fn pending(&self) -> Result<Vec<ReviewEntry>, IndexError>;

    async fn approve(&self, id: u64) -> Result<(), IndexError>;
}

#[derive(Default)]
pub struct InMemoryReviewQueue {
    entries: RwLock<Vec<ReviewEntry>>,
}

impl InMemoryReviewQueue {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReviewQueue for InMemoryReviewQueue {
    async fn enqueue(
        &self,
        chat_id: &str,
        prompt: &str,
        response: &str,
    ) -> Result<u64, IndexError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| IndexError::Storage(e.to_string()))?;
        let id = entries.len() as u64 + 1;
        entries.push(ReviewEntry {
            id,
            chat_id: chat_id.to_string(),
            prompt: prompt.to_string(),
            response: response.to_string(),
            approved: false,
            created: Utc::now(),
        });
        Ok(id)
    }

    async fn pending(&self) -> Result<Vec<ReviewEntry>, IndexError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| IndexError::Storage(e.to_string()))?;
        Ok(entries.iter().filter(|e| !e.approved).cloned().collect())
    }

    async fn approve(&self, id: u64) -> Result<(), IndexError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| IndexError::Storage(e.to_string()))?;
        let entry = entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(IndexError::NotFound(id))?;
        entry.approved = true;
        Ok(())
    }
}
