// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Application wiring
//!
//! One [`PageCache`] and one [`PageProvider`] are shared by discovery,
//! learning and synthesis, so a page fetched while learning is served from
//! memory when the same topic is answered.

use std::sync::Arc;
use tracing::info;

use crate::config::DocSynthConfig;
use crate::fetch::{FetchError, PageCache, PageFetcher, PageProvider};
use crate::index::{DocumentIndex, InMemoryIndex, InMemoryReviewQueue, ReviewQueue};
use crate::sandbox::{SandboxValidator, ValidationReport};
use crate::search::{SearchError, SearchResponse, SearchService};
use crate::synthesis::{
    CodeHelp, CodeHelpAnswer, CodeHelpError, LearnError, LearnReport, Learner, Synthesizer,
};

/// The assembled pipeline
pub struct DocSynth {
    cache: Arc<PageCache>,
    search: Arc<SearchService>,
    index: Arc<dyn DocumentIndex>,
    reviews: Arc<dyn ReviewQueue>,
    validator: SandboxValidator,
    learner: Learner,
    codehelp: CodeHelp,
}

impl DocSynth {
    /// Network-backed pipeline with in-memory index and review queue
    pub fn new(config: DocSynthConfig) -> Result<Self, FetchError> {
        let fetcher = PageFetcher::new(config.fetch.clone())?;
        Ok(Self::with_components(
            config,
            Arc::new(fetcher),
            Arc::new(InMemoryIndex::new()),
            Arc::new(InMemoryReviewQueue::new()),
        ))
    }

    pub fn with_components(
        config: DocSynthConfig,
        pages: Arc<dyn PageProvider>,
        index: Arc<dyn DocumentIndex>,
        reviews: Arc<dyn ReviewQueue>,
    ) -> Self {
        let cache = Arc::new(PageCache::new(config.fetch.cache_capacity));
        let search = Arc::new(SearchService::new(
            config.search.clone(),
            pages.clone(),
            cache.clone(),
        ));
        let validator = SandboxValidator::new(config.sandbox.clone());
        let synthesizer = Arc::new(Synthesizer::new(
            pages.clone(),
            cache.clone(),
            validator.clone(),
        ));
        let learner = Learner::new(
            search.clone(),
            pages,
            cache.clone(),
            index.clone(),
            &config.synthesis,
        );
        let codehelp = CodeHelp::new(
            index.clone(),
            reviews.clone(),
            synthesizer,
            config.synthesis.index_result_limit,
        );

        info!(
            "Pipeline ready: cache capacity {}, sandbox timeout {}ms",
            config.fetch.cache_capacity, config.sandbox.timeout_ms
        );

        Self {
            cache,
            search,
            index,
            reviews,
            validator,
            learner,
            codehelp,
        }
    }

    pub async fn learn(&self, topic: &str) -> Result<LearnReport, LearnError> {
        self.learner.learn(topic).await
    }

    pub async fn codehelp(
        &self,
        chat_id: &str,
        language: &str,
        topic: &str,
    ) -> Result<CodeHelpAnswer, CodeHelpError> {
        self.codehelp.answer(chat_id, language, topic).await
    }

    pub async fn validate(&self, code: &str, language: &str) -> ValidationReport {
        self.validator.validate(code, language).await
    }

    pub async fn search(&self, query: &str) -> Result<SearchResponse, SearchError> {
        self.search.search(query, None).await
    }

    pub fn cache(&self) -> &Arc<PageCache> {
        &self.cache
    }

    pub fn index(&self) -> &Arc<dyn DocumentIndex> {
        &self.index
    }

    pub fn reviews(&self) -> &Arc<dyn ReviewQueue> {
        &self.reviews
    }
}
