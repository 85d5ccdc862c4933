// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for page fetching
//!
//! Defines settings for HTTP fetching, page-size caps, and the fetch cache.

use std::env;

/// Configuration for page fetching
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Wall-clock timeout per page fetch in seconds (default: 10)
    pub timeout_secs: u64,
    /// Maximum bytes read from a response body (default: 800_000)
    pub max_page_bytes: usize,
    /// Maximum pages held by the fetch cache (default: 20)
    pub cache_capacity: usize,
    /// Refuse loopback, private and link-local hosts (default: true)
    pub block_private_hosts: bool,
}

impl FetchConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            timeout_secs: env::var("DOCSYNTH_FETCH_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.timeout_secs),
            max_page_bytes: env::var("DOCSYNTH_MAX_PAGE_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_page_bytes),
            cache_capacity: env::var("DOCSYNTH_CACHE_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cache_capacity),
            block_private_hosts: env::var("DOCSYNTH_BLOCK_PRIVATE_HOSTS")
                .map(|v| v.to_lowercase() != "false")
                .unwrap_or(defaults.block_private_hosts),
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be at least 1".to_string());
        }
        if self.max_page_bytes == 0 {
            return Err("max_page_bytes must be at least 1".to_string());
        }
        if self.cache_capacity == 0 {
            return Err("cache_capacity must be at least 1".to_string());
        }
        Ok(())
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            max_page_bytes: 800_000,
            cache_capacity: 20,
            block_private_hosts: true,
        }
    }
}
