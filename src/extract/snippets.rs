// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Code snippet extraction from page text
//!
//! Three passes, accumulated in order and then deduplicated by exact
//! trimmed text (first occurrence wins):
//! 1. fenced blocks tagged with the language hint (case-insensitive)
//! 2. untagged fenced blocks
//! 3. indentation blocks (lines indented by at least four spaces)
//!
//! Line breaks may be real newlines or the two-character escape `\n`.

use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Minimum raw length of an indentation block, measured over the block as it
/// appears in the text: indented lines, their line breaks, and the line break
/// that introduces the block.
pub const MIN_INDENT_BLOCK_CHARS: usize = 20;

const INDENT: &str = "    ";

fn fence_regex() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        // Opening fence, optional tag, then a real or escaped line break
        Regex::new(r"(?s)```([A-Za-z0-9_+#.\-]*)[ \t]*(\r?\n|\\n)(.*?)```")
            .expect("fence pattern is valid")
    })
}

/// A fenced block found in the text
#[derive(Debug, Clone, PartialEq, Eq)]
struct FencedBlock {
    tag: String,
    body: String,
}

/// Extract distinct code snippets from `text`, hinted by `language_hint`
pub fn extract_snippets(text: &str, language_hint: &str) -> Vec<String> {
    let fenced = fenced_blocks(text);
    let hint = language_hint.trim();

    let tagged = fenced
        .iter()
        .filter(|block| !hint.is_empty() && block.tag.eq_ignore_ascii_case(hint))
        .map(|block| block.body.clone());
    let untagged = fenced
        .iter()
        .filter(|block| block.tag.is_empty())
        .map(|block| block.body.clone());

    let candidates: Vec<String> = tagged
        .chain(untagged)
        .chain(indented_blocks(text))
        .collect();

    dedup_trimmed(candidates)
}

fn fenced_blocks(text: &str) -> Vec<FencedBlock> {
    fence_regex()
        .captures_iter(text)
        .filter_map(|caps| {
            let tag = caps.get(1)?.as_str().to_string();
            let escaped = caps.get(2)?.as_str() == "\\n";
            let raw = caps.get(3)?.as_str();
            let body = if escaped {
                unescape_newlines(raw)
            } else {
                raw.to_string()
            };
            Some(FencedBlock { tag, body })
        })
        .collect()
}

fn unescape_newlines(raw: &str) -> String {
    raw.replace("\\r\\n", "\n").replace("\\n", "\n")
}

/// Split into lines, using escaped breaks only when the text has no real ones
fn split_lines(text: &str) -> Vec<&str> {
    if text.contains('\n') {
        text.split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .collect()
    } else {
        text.split("\\n").collect()
    }
}

fn starts_non_blank(line: &str) -> bool {
    line.chars().next().is_some_and(|c| !c.is_whitespace())
}

fn indented_blocks(text: &str) -> Vec<String> {
    let lines = split_lines(text);
    let mut blocks = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if !lines[i].starts_with(INDENT) {
            i += 1;
            continue;
        }

        // A block runs until the next line that starts with a non-blank character
        let start = i;
        let mut end = i + 1;
        while end < lines.len() && !starts_non_blank(lines[end]) {
            end += 1;
        }

        let block_lines = &lines[start..end];
        let introduced_by_break = usize::from(start > 0);
        let trailing_breaks = if end < lines.len() {
            block_lines.len()
        } else {
            block_lines.len() - 1
        };
        let raw_len = introduced_by_break
            + trailing_breaks
            + block_lines
                .iter()
                .map(|line| line.chars().count())
                .sum::<usize>();

        if raw_len >= MIN_INDENT_BLOCK_CHARS {
            let stripped = block_lines
                .iter()
                .map(|line| line.strip_prefix(INDENT).unwrap_or_else(|| line.trim_start()))
                .collect::<Vec<_>>()
                .join("\n");
            let stripped = stripped.trim();
            if !stripped.is_empty() {
                blocks.push(stripped.to_string());
            }
        }

        i = end;
    }

    blocks
}

fn dedup_trimmed(candidates: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut unique = Vec::new();
    for candidate in candidates {
        let trimmed = candidate.trim();
        if trimmed.is_empty() {
            continue;
        }
        if seen.insert(trimmed.to_string()) {
            unique.push(trimmed.to_string());
        }
    }
    unique
}
