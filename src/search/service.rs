// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Discovery service orchestration
//!
//! Coordinates search providers and rate limiting.

use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::config::SearchConfig;
use super::duckduckgo::DuckDuckGoProvider;
use super::provider::SearchProvider;
use super::rate_limiter::SearchRateLimiter;
use super::types::{SearchError, SearchResponse};
use crate::fetch::{PageCache, PageProvider};

/// Tries providers in priority order under a shared rate limit
pub struct SearchService {
    providers: Vec<Box<dyn SearchProvider>>,
    rate_limiter: SearchRateLimiter,
    config: SearchConfig,
}

impl SearchService {
    /// DuckDuckGo discovery over the shared page fetcher and cache
    pub fn new(config: SearchConfig, pages: Arc<dyn PageProvider>, cache: Arc<PageCache>) -> Self {
        debug!("DuckDuckGo provider enabled");
        Self::with_providers(
            config,
            vec![Box::new(DuckDuckGoProvider::new(pages, cache))],
        )
    }

    pub fn with_providers(
        config: SearchConfig,
        mut providers: Vec<Box<dyn SearchProvider>>,
    ) -> Self {
        // Lower priority value is tried first
        providers.sort_by_key(|p| p.priority());
        let rate_limiter = SearchRateLimiter::new(config.rate_limit_per_minute);

        Self {
            providers,
            rate_limiter,
            config,
        }
    }

    /// Run `query`, returning up to `num_results` (or the configured default) hits
    pub async fn search(
        &self,
        query: &str,
        num_results: Option<usize>,
    ) -> Result<SearchResponse, SearchError> {
        if !self.config.enabled {
            return Err(SearchError::SearchDisabled);
        }

        let num_results = num_results.unwrap_or(self.config.results_per_query);
        self.rate_limiter.check()?;

        let start = Instant::now();
        let mut last_error = None;

        for provider in &self.providers {
            if !provider.is_available() {
                continue;
            }

            debug!("Trying search provider: {}", provider.name());

            match provider.search(query, num_results).await {
                Ok(results) => {
                    let elapsed_ms = start.elapsed().as_millis() as u64;
                    info!(
                        "Search complete: {} results from {} in {}ms",
                        results.len(),
                        provider.name(),
                        elapsed_ms
                    );

                    return Ok(SearchResponse {
                        query: query.to_string(),
                        result_count: results.len(),
                        results,
                        search_time_ms: elapsed_ms,
                        provider: provider.name().to_string(),
                    });
                }
                Err(SearchError::InvalidQuery { reason }) => {
                    return Err(SearchError::InvalidQuery { reason });
                }
                Err(e) => {
                    warn!("Search provider {} failed: {}, trying next", provider.name(), e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| SearchError::ProviderUnavailable {
            provider: "all".to_string(),
            reason: "no provider available".to_string(),
        }))
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Names of the providers that can currently serve requests
    pub fn available_providers(&self) -> Vec<&str> {
        self.providers
            .iter()
            .filter(|p| p.is_available())
            .map(|p| p.name())
            .collect()
    }
}
