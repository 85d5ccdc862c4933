// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for learning and answer synthesis

use std::env;
use std::time::Duration;

/// Bounds applied to `max_pages_per_learn`
pub const MIN_PAGES_PER_LEARN: usize = 2;
pub const MAX_PAGES_PER_LEARN: usize = 12;

/// Configuration for learning and answer synthesis
#[derive(Debug, Clone)]
pub struct SynthesisConfig {
    /// Pages crawled per learn request, clamped to [2, 12] (default: 6)
    pub max_pages_per_learn: usize,
    /// Minimum spacing between crawled pages in milliseconds (default: 1200)
    pub request_delay_ms: u64,
    /// References handed to the synthesizer per question (default: 6)
    pub index_result_limit: usize,
}

impl SynthesisConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_pages_per_learn: env::var("DOCSYNTH_MAX_PAGES_PER_LEARN")
                .ok()
                .and_then(|v| v.parse::<usize>().ok())
                .map(|pages| pages.clamp(MIN_PAGES_PER_LEARN, MAX_PAGES_PER_LEARN))
                .unwrap_or(defaults.max_pages_per_learn),
            request_delay_ms: env::var("DOCSYNTH_REQUEST_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.request_delay_ms),
            index_result_limit: env::var("DOCSYNTH_INDEX_RESULT_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.index_result_limit),
        }
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if !(MIN_PAGES_PER_LEARN..=MAX_PAGES_PER_LEARN).contains(&self.max_pages_per_learn) {
            return Err(format!(
                "max_pages_per_learn must be within {}..={}",
                MIN_PAGES_PER_LEARN, MAX_PAGES_PER_LEARN
            ));
        }
        if self.index_result_limit == 0 {
            return Err("index_result_limit must be at least 1".to_string());
        }
        Ok(())
    }
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            max_pages_per_learn: 6,
            request_delay_ms: 1200,
            index_result_limit: 6,
        }
    }
}
