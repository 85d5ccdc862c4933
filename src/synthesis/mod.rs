// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Corroboration-based answer synthesis
//!
//! ## Architecture
//!
//! ```text
//! learn(topic):   SearchService → PageCache/PageFetcher → extract_page → DocumentIndex
//!
//! answer(lang, topic):
//!   DocumentIndex::search → Synthesizer
//!       ├─ fetch pages (join_all, input order)
//!       ├─ extract_snippets(layout_text, lang)
//!       ├─ rank_candidates (occurrences × mean source weight)
//!       └─ SandboxValidator::validate(top) → confidence
//!   → ReviewQueue when needs_review()
//! ```

pub mod codehelp;
pub mod config;
pub mod learn;
pub mod scorer;
pub mod synthesizer;
pub mod types;

pub use codehelp::{CodeHelp, CodeHelpAnswer, CodeHelpError};
pub use config::SynthesisConfig;
pub use learn::{LearnError, LearnReport, Learner};
pub use scorer::{rank_candidates, SourceWeights};
pub use synthesizer::{apply_validation_penalty, base_confidence, Synthesizer, NO_CODE_FOUND};
pub use types::{Provenance, ScoredSnippet, SnippetCandidate, SynthesisResult};
