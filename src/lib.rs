// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod app;
pub mod cli;
pub mod config;
pub mod extract;
pub mod fetch;
pub mod index;
pub mod sandbox;
pub mod search;
pub mod synthesis;
pub mod utils;
pub mod version;

// Re-export main types
pub use app::DocSynth;
pub use config::{ConfigError, DocSynthConfig};
pub use extract::{extract_page, extract_snippets, ExtractedPage};
pub use fetch::{FetchConfig, FetchError, FetchOutcome, PageCache, PageFetcher, PageProvider};
pub use index::{DocumentIndex, DocumentReference, IndexError, InMemoryIndex, ReviewQueue};
pub use sandbox::{SandboxConfig, SandboxValidator, ValidationReport};
pub use search::{SearchConfig, SearchError, SearchProvider, SearchResult, SearchService};
pub use synthesis::{CodeHelp, Learner, Provenance, SynthesisConfig, SynthesisResult, Synthesizer};
