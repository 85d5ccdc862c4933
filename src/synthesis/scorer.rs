// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Corroboration scoring
//!
//! A snippet that shows up on several pages, or on a reputable one, ranks
//! higher: `score = occurrences × mean(weight(distinct source))`.

use std::collections::HashMap;
use url::Url;

use super::types::{ScoredSnippet, SnippetCandidate};

/// Weight of a source whose host matches no entry
pub const DEFAULT_SOURCE_WEIGHT: f64 = 1.0;

/// Per-site trust weights keyed by a host label
#[derive(Debug, Clone, PartialEq)]
pub struct SourceWeights {
    /// Checked in order; the first key found among the host labels wins
    entries: Vec<(String, f64)>,
}

impl Default for SourceWeights {
    fn default() -> Self {
        Self::empty()
            .with_weight("tensorflow", 1.9)
            .with_weight("pytorch", 1.9)
            .with_weight("mdn", 1.8)
            .with_weight("freecodecamp", 1.6)
            .with_weight("stackoverflow", 1.5)
            .with_weight("github", 1.4)
            .with_weight("w3schools", 1.0)
            .with_weight("duckduckgo", 1.0)
    }
}

impl SourceWeights {
    /// No entries: every source weighs [`DEFAULT_SOURCE_WEIGHT`]
    pub fn empty() -> Self {
        Self { entries: Vec::new() }
    }

    /// Add or replace the weight for a host label
    pub fn with_weight(mut self, label: &str, weight: f64) -> Self {
        let label = label.to_lowercase();
        match self.entries.iter_mut().find(|(key, _)| *key == label) {
            Some(entry) => entry.1 = weight,
            None => self.entries.push((label, weight)),
        }
        self
    }

    /// Weight for a page URL, matched on the labels of its host
    pub fn weight_for(&self, url: &str) -> f64 {
        let Some(host) = Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_lowercase))
        else {
            return DEFAULT_SOURCE_WEIGHT;
        };

        self.entries
            .iter()
            .find(|(key, _)| host.split('.').any(|label| label == key))
            .map_or(DEFAULT_SOURCE_WEIGHT, |(_, weight)| *weight)
    }
}

/// Group candidates by trimmed text and rank them.
///
/// Highest score first; equal scores keep discovery order.
pub fn rank_candidates(candidates: &[SnippetCandidate], weights: &SourceWeights) -> Vec<ScoredSnippet> {
    let mut groups: Vec<ScoredSnippet> = Vec::new();
    let mut by_code: HashMap<&str, usize> = HashMap::new();

    for candidate in candidates {
        let code = candidate.code.trim();
        if code.is_empty() {
            continue;
        }

        let slot = *by_code.entry(code).or_insert_with(|| {
            groups.push(ScoredSnippet {
                code: code.to_string(),
                occurrences: 0,
                sources: Vec::new(),
                score: 0.0,
                first_seen: groups.len(),
            });
            groups.len() - 1
        });

        let group = &mut groups[slot];
        group.occurrences += 1;
        if !group.sources.contains(&candidate.url) {
            group.sources.push(candidate.url.clone());
        }
    }

    for group in &mut groups {
        let total: f64 = group.sources.iter().map(|url| weights.weight_for(url)).sum();
        let mean = total / group.sources.len().max(1) as f64;
        group.score = group.occurrences as f64 * mean;
    }

    // Stable: ties stay in first-seen order
    groups.sort_by(|a, b| b.score.total_cmp(&a.score));
    groups
}
