// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Page content and code snippet extraction
//!
//! ```text
//! bytes → extract_page → ExtractedPage { title, text, layout_text }
//!                                              │
//!                     extract_snippets(layout_text, "python") → Vec<String>
//! ```

pub mod content;
pub mod snippets;

pub use content::{extract_page, ExtractedPage, UNTITLED};
pub use snippets::{extract_snippets, MIN_INDENT_BLOCK_CHARS};
