// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Page fetching and caching
//!
//! ## Architecture
//!
//! ```text
//! URL → PageCache (FIFO, bounded) ──hit──→ bytes
//!            │ miss
//!            ↓
//!        PageFetcher (GET, timeout, size cap) → FetchOutcome
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let config = FetchConfig::from_env();
//! let fetcher = PageFetcher::new(config.clone())?;
//! let cache = PageCache::new(config.cache_capacity);
//!
//! match cache.get_or_fetch(&fetcher, "https://docs.python.org/3/").await {
//!     FetchOutcome::Fetched(bytes) => { /* parse */ }
//!     FetchOutcome::Unavailable(reason) => { /* skip */ }
//! }
//! ```

pub mod cache;
pub mod config;
pub mod fetcher;

pub use cache::{CachedPage, PageCache, PageCacheStats};
pub use config::FetchConfig;
pub use fetcher::{FetchError, FetchOutcome, PageFetcher, PageProvider, StaticPageProvider};
