// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Answer synthesis: fetch → extract → rank → validate
//!
//! `synthesize` never fails. Unavailable pages are skipped, a page set
//! without code yields the fallback answer, and sandbox problems land in the
//! validation report.

use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::scorer::{rank_candidates, SourceWeights};
use super::types::{Provenance, SnippetCandidate, SynthesisResult};
use crate::extract::{extract_page, extract_snippets};
use crate::fetch::{FetchOutcome, PageCache, PageProvider};
use crate::index::DocumentReference;
use crate::sandbox::{SandboxValidator, ValidationReport};
use crate::utils::truncate_chars;

/// Provenance entries reported per answer
pub const MAX_PROVENANCE: usize = 6;
/// Characters of the chosen snippet embedded in the answer
pub const MAX_ANSWER_CODE_CHARS: usize = 10_000;
/// Characters of a reference snippet kept in fallback provenance
pub const MAX_REFERENCE_SNIPPET_CHARS: usize = 400;

pub const NO_CODE_FOUND: &str = "No code found.";
pub const FALLBACK_CONFIDENCE: f64 = 0.2;

const CONFIDENCE_FLOOR: f64 = 0.2;
const CONFIDENCE_CAP: f64 = 0.99;
const SYNTAX_ERROR_FACTOR: f64 = 0.2;
const EXEC_FAILURE_FACTOR: f64 = 0.6;

/// `min(0.99, 0.2 + score / (1 + score))`
pub fn base_confidence(score: f64) -> f64 {
    let score = score.max(0.0);
    (CONFIDENCE_FLOOR + score / (1.0 + score)).min(CONFIDENCE_CAP)
}

/// Scale by 0.2 on a syntax error, otherwise by 0.6 on a failed run
pub fn apply_validation_penalty(confidence: f64, report: Option<&ValidationReport>) -> f64 {
    match report {
        Some(r) if r.has_syntax_error() => confidence * SYNTAX_ERROR_FACTOR,
        Some(r) if r.execution_failed() => confidence * EXEC_FAILURE_FACTOR,
        _ => confidence,
    }
}

/// Candidates and the references whose pages were fetched
#[derive(Debug, Default)]
struct Collected {
    candidates: Vec<SnippetCandidate>,
    fetched: Vec<DocumentReference>,
}

/// Composes the fetch cache, extractors, scorer and sandbox
pub struct Synthesizer {
    pages: Arc<dyn PageProvider>,
    cache: Arc<PageCache>,
    validator: SandboxValidator,
    weights: SourceWeights,
}

impl Synthesizer {
    pub fn new(
        pages: Arc<dyn PageProvider>,
        cache: Arc<PageCache>,
        validator: SandboxValidator,
    ) -> Self {
        Self {
            pages,
            cache,
            validator,
            weights: SourceWeights::default(),
        }
    }

    pub fn with_weights(mut self, weights: SourceWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn cache(&self) -> &Arc<PageCache> {
        &self.cache
    }

    /// Build an answer for `query` in `language` from `references`
    pub async fn synthesize(
        &self,
        language: &str,
        query: &str,
        references: &[DocumentReference],
    ) -> SynthesisResult {
        info!(
            "Synthesizing {} answer for '{}' from {} references",
            language,
            query,
            references.len()
        );

        let collected = self.collect(language, references).await;
        let ranked = rank_candidates(&collected.candidates, &self.weights);

        let Some(top) = ranked.first() else {
            info!("No snippets found across {} fetched pages", collected.fetched.len());
            return fallback(collected.fetched);
        };
        debug!(
            "Top snippet: score={:.2} occurrences={} sources={}",
            top.score,
            top.occurrences,
            top.sources.len()
        );

        let report = self.validator.validate(&top.code, language).await;
        let confidence = apply_validation_penalty(base_confidence(top.score), Some(&report));

        let answer = format!(
            "Top candidate (score={:.2}, confidence={:.2}):\n\n```{}\n{}\n```",
            top.score,
            confidence,
            language,
            truncate_chars(&top.code, MAX_ANSWER_CODE_CHARS)
        );

        info!(
            "Synthesis complete: {} candidates, confidence {:.2}",
            ranked.len(),
            confidence
        );

        SynthesisResult {
            answer,
            provenance: top
                .sources
                .iter()
                .take(MAX_PROVENANCE)
                .cloned()
                .map(Provenance::Url)
                .collect(),
            confidence,
            validation: Some(report),
        }
    }

    /// Fetch all pages concurrently, then record candidates in input order
    async fn collect(&self, language: &str, references: &[DocumentReference]) -> Collected {
        let outcomes = join_all(
            references
                .iter()
                .map(|reference| self.cache.get_or_fetch(self.pages.as_ref(), &reference.url)),
        )
        .await;

        let mut collected = Collected::default();
        for (reference, outcome) in references.iter().zip(outcomes) {
            match outcome {
                FetchOutcome::Fetched(bytes) => {
                    record_page(&mut collected, reference, &bytes, language);
                }
                FetchOutcome::Unavailable(reason) => {
                    warn!("Skipping {}: {}", reference.url, reason);
                }
            }
        }
        collected
    }
}

fn record_page(collected: &mut Collected, reference: &DocumentReference, bytes: &[u8], language: &str) {
    let page = extract_page(bytes);
    let title = if reference.title.trim().is_empty() {
        page.title
    } else {
        reference.title.clone()
    };

    let snippets = extract_snippets(&page.layout_text, language);
    debug!("{} snippets from {}", snippets.len(), reference.url);

    collected
        .candidates
        .extend(snippets.into_iter().map(|code| SnippetCandidate {
            code,
            url: reference.url.clone(),
            title: title.clone(),
        }));
    collected.fetched.push(DocumentReference::new(
        title,
        reference.url.clone(),
        truncate_chars(&reference.snippet, MAX_REFERENCE_SNIPPET_CHARS),
    ));
}

/// Answer from the references' own snippets when no code was found
fn fallback(fetched: Vec<DocumentReference>) -> SynthesisResult {
    let summary = fetched
        .iter()
        .take(MAX_PROVENANCE)
        .map(|reference| reference.snippet.trim())
        .filter(|snippet| !snippet.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n");

    SynthesisResult {
        answer: if summary.is_empty() {
            NO_CODE_FOUND.to_string()
        } else {
            summary
        },
        provenance: fetched
            .into_iter()
            .take(MAX_PROVENANCE)
            .map(Provenance::Reference)
            .collect(),
        confidence: FALLBACK_CONFIDENCE,
        validation: None,
    }
}
