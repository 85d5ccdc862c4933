// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Core types for page discovery

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single discovery hit from a search provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// Title of the result
    pub title: String,
    /// Resolved target URL (redirect wrappers removed)
    pub url: String,
    /// Snippet/description shown by the provider
    pub snippet: String,
    /// Source provider (e.g., "duckduckgo")
    pub source: String,
}

/// Response from a discovery query
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// The original query
    pub query: String,
    pub results: Vec<SearchResult>,
    /// Time taken in milliseconds
    pub search_time_ms: u64,
    /// Provider that returned the results
    pub provider: String,
    pub result_count: usize,
}

/// Errors that can occur during discovery
#[derive(Debug, Error)]
pub enum SearchError {
    /// Local request budget exhausted
    #[error("Rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// The provider's results page could not be fetched
    #[error("Provider {provider} unavailable: {reason}")]
    ProviderUnavailable { provider: String, reason: String },

    /// Invalid search query
    #[error("Invalid query: {reason}")]
    InvalidQuery { reason: String },

    /// Discovery is switched off in configuration
    #[error("Search disabled")]
    SearchDisabled,
}
