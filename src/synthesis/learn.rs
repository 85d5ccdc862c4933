// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Topic learning: discover tutorial pages, crawl them, index them

use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::config::SynthesisConfig;
use crate::extract::extract_page;
use crate::fetch::{FetchOutcome, PageCache, PageProvider};
use crate::index::{DocumentIndex, IndexError, IndexedDocument};
use crate::search::{SearchError, SearchRateLimiter, SearchService};

/// Suffix appended to a topic to form the discovery query
pub const LEARN_QUERY_SUFFIX: &str = "programming tutorial";

#[derive(Debug, Error)]
pub enum LearnError {
    #[error("Topic must not be empty")]
    EmptyTopic,

    #[error("No results found for: {0}")]
    NoResults(String),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Index(#[from] IndexError),
}

/// Summary of one learn run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnReport {
    pub topic: String,
    pub query: String,
    /// Results returned by discovery
    pub discovered: usize,
    /// Pages fetched and handed to the index
    pub crawled: usize,
    /// Pages the index did not already hold
    pub newly_indexed: usize,
}

/// Crawls discovery results for a topic into the document index
pub struct Learner {
    search: Arc<SearchService>,
    pages: Arc<dyn PageProvider>,
    cache: Arc<PageCache>,
    index: Arc<dyn DocumentIndex>,
    pacer: SearchRateLimiter,
    max_pages: usize,
}

impl Learner {
    pub fn new(
        search: Arc<SearchService>,
        pages: Arc<dyn PageProvider>,
        cache: Arc<PageCache>,
        index: Arc<dyn DocumentIndex>,
        config: &SynthesisConfig,
    ) -> Self {
        Self {
            search,
            pages,
            cache,
            index,
            pacer: SearchRateLimiter::with_period(config.request_delay()),
            max_pages: config.max_pages_per_learn,
        }
    }

    /// Discover "`<topic>` programming tutorial" and index up to
    /// `max_pages_per_learn` of the results under `topic`
    pub async fn learn(&self, topic: &str) -> Result<LearnReport, LearnError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(LearnError::EmptyTopic);
        }

        let query = format!("{} {}", topic, LEARN_QUERY_SUFFIX);
        let response = self.search.search(&query, None).await?;
        if response.results.is_empty() {
            return Err(LearnError::NoResults(query));
        }

        let mut report = LearnReport {
            topic: topic.to_string(),
            query,
            discovered: response.results.len(),
            crawled: 0,
            newly_indexed: 0,
        };

        for result in &response.results {
            if report.crawled >= self.max_pages {
                break;
            }

            // Cached pages cost no request
            if !self.cache.contains(&result.url) {
                self.pacer.wait().await;
            }

            let bytes = match self.cache.get_or_fetch(self.pages.as_ref(), &result.url).await {
                FetchOutcome::Fetched(bytes) => bytes,
                FetchOutcome::Unavailable(reason) => {
                    warn!("Skipping {}: {}", result.url, reason);
                    continue;
                }
            };

            let page = extract_page(&bytes);
            let document = IndexedDocument::new(
                topic,
                &page.title,
                &result.url,
                &result.snippet,
                &page.text,
                &result.source,
            );

            if self.index.insert(document).await? {
                report.newly_indexed += 1;
            } else {
                debug!("Already indexed: {}", result.url);
            }
            report.crawled += 1;
        }

        info!(
            "Learned {} pages for topic '{}' ({} new)",
            report.crawled, report.topic, report.newly_indexed
        );
        Ok(report)
    }
}
