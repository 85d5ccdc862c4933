// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Page discovery
//!
//! Turns a free-text query into candidate documentation URLs. The default
//! provider scrapes DuckDuckGo's HTML results through the shared page cache;
//! queries are paced by a governor rate limiter.

pub mod config;
pub mod duckduckgo;
pub mod provider;
pub mod rate_limiter;
pub mod service;
pub mod types;

// Re-export commonly used types
pub use config::SearchConfig;
pub use duckduckgo::DuckDuckGoProvider;
pub use provider::SearchProvider;
pub use rate_limiter::SearchRateLimiter;
pub use service::SearchService;
pub use types::{SearchError, SearchResponse, SearchResult};
