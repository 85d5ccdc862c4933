// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Code help: answer a question from indexed documentation

use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use super::synthesizer::Synthesizer;
use super::types::SynthesisResult;
use crate::index::{DocumentIndex, IndexError, ReviewQueue};

#[derive(Debug, Error)]
pub enum CodeHelpError {
    #[error("No indexed docs for {language} '{topic}'. Learn the topic first.")]
    NoIndexedDocs { language: String, topic: String },

    #[error(transparent)]
    Index(#[from] IndexError),
}

/// Synthesized answer plus its review-queue ticket, if any
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeHelpAnswer {
    #[serde(flatten)]
    pub result: SynthesisResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_id: Option<u64>,
}

pub struct CodeHelp {
    index: Arc<dyn DocumentIndex>,
    reviews: Arc<dyn ReviewQueue>,
    synthesizer: Arc<Synthesizer>,
    result_limit: usize,
}

impl CodeHelp {
    pub fn new(
        index: Arc<dyn DocumentIndex>,
        reviews: Arc<dyn ReviewQueue>,
        synthesizer: Arc<Synthesizer>,
        result_limit: usize,
    ) -> Self {
        Self {
            index,
            reviews,
            synthesizer,
            result_limit,
        }
    }

    /// Look up `topic` among pages indexed under `language`, synthesize an
    /// answer, and queue it for review when it needs one
    pub async fn answer(
        &self,
        chat_id: &str,
        language: &str,
        topic: &str,
    ) -> Result<CodeHelpAnswer, CodeHelpError> {
        let language = language.trim().to_lowercase();
        let topic = topic.trim().to_lowercase();

        let references = self
            .index
            .search(&language, &topic, self.result_limit)
            .await?;
        if references.is_empty() {
            return Err(CodeHelpError::NoIndexedDocs { language, topic });
        }

        let result = self
            .synthesizer
            .synthesize(&language, &topic, &references)
            .await;

        let review_id = if result.needs_review() {
            let id = self.reviews.enqueue(chat_id, &topic, &result.answer).await?;
            info!(
                "Queued answer {} for review (confidence {:.2})",
                id, result.confidence
            );
            Some(id)
        } else {
            None
        };

        Ok(CodeHelpAnswer { result, review_id })
    }
}
