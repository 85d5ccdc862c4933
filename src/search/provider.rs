// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Search provider trait definition

use async_trait::async_trait;

use super::types::{SearchError, SearchResult};

/// Discovery step: turns a query into candidate URLs
///
/// Providers are tried in priority order by the [`super::SearchService`].
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Return at most `num_results` hits for `query`
    async fn search(
        &self,
        query: &str,
        num_results: usize,
    ) -> Result<Vec<SearchResult>, SearchError>;

    /// Provider name for logging
    fn name(&self) -> &'static str;

    /// Whether the provider can currently serve requests
    fn is_available(&self) -> bool;

    /// Lower is preferred. Default 100.
    fn priority(&self) -> u8 {
        100
    }
}
