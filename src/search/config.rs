// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for page discovery

use std::env;

/// Configuration for page discovery
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Whether discovery is enabled
    pub enabled: bool,
    /// Rate limit (queries per minute)
    pub rate_limit_per_minute: u32,
    /// Results requested per query (default: 6)
    pub results_per_query: usize,
}

impl SearchConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            // Set DOCSYNTH_SEARCH_ENABLED=false to disable
            enabled: env::var("DOCSYNTH_SEARCH_ENABLED")
                .map(|v| v.to_lowercase() != "false")
                .unwrap_or(defaults.enabled),
            rate_limit_per_minute: env::var("DOCSYNTH_SEARCH_RATE_LIMIT_PER_MINUTE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.rate_limit_per_minute),
            results_per_query: defaults.results_per_query,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.rate_limit_per_minute == 0 {
            return Err("Rate limit must be greater than 0".to_string());
        }
        if self.results_per_query == 0 {
            return Err("results_per_query must be at least 1".to_string());
        }
        Ok(())
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            rate_limit_per_minute: 60,
            results_per_query: 6,
        }
    }
}
