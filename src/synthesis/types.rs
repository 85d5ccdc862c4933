// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Core types for snippet synthesis

use serde::{Deserialize, Serialize};

use crate::index::DocumentReference;
use crate::sandbox::ValidationReport;

/// Confidence below which an answer is queued for review
pub const REVIEW_CONFIDENCE_THRESHOLD: f64 = 0.5;

/// A code snippet found on one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetCandidate {
    pub code: String,
    pub url: String,
    pub title: String,
}

/// A distinct snippet with its corroboration evidence
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredSnippet {
    /// Trimmed snippet text, the grouping key
    pub code: String,
    /// Every candidate with this text, repeats from one page included
    pub occurrences: usize,
    /// Distinct source URLs in the order first seen
    pub sources: Vec<String>,
    /// occurrences × mean weight of the distinct sources
    pub score: f64,
    /// Discovery position, the tie-break for equal scores
    pub first_seen: usize,
}

/// One provenance entry of a [`SynthesisResult`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Provenance {
    /// Source URL of the chosen snippet
    Url(String),
    /// A fetched reference, reported when no snippet was found
    Reference(DocumentReference),
}

impl Provenance {
    pub fn url(&self) -> &str {
        match self {
            Self::Url(url) => url,
            Self::Reference(reference) => &reference.url,
        }
    }
}

/// Confidence-scored answer with provenance
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesisResult {
    pub answer: String,
    pub provenance: Vec<Provenance>,
    /// Always within [0, 1]
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationReport>,
}

impl SynthesisResult {
    /// Low confidence or any failed validation step
    pub fn needs_review(&self) -> bool {
        if self.confidence < REVIEW_CONFIDENCE_THRESHOLD {
            return true;
        }
        self.validation.as_ref().map_or(false, |report| {
            report.has_syntax_error() || report.execution_failed() || report.timed_out
        })
    }
}
