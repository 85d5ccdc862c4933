// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTML content extraction
//!
//! Turns fetched page bytes into a title plus two text renderings:
//! - `text`: visible text with every whitespace run collapsed to one space
//! - `layout_text`: one line per block element, with source indentation kept
//!   only inside preformatted elements, for code scanning

use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};

use crate::utils::collapse_whitespace;

/// Title used when a page declares none
pub const UNTITLED: &str = "Untitled";

/// Elements whose text is never visible
const HIDDEN_ELEMENTS: &[&str] = &["head", "script", "style", "noscript", "template"];

/// Elements that end a line when closed
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption",
    "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main",
    "nav", "ol", "p", "pre", "section", "table", "tr", "ul",
];

/// Elements whose text keeps its source whitespace
const PREFORMATTED_ELEMENTS: &[&str] = &["pre", "code", "textarea", "listing", "xmp"];

/// Extracted page content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedPage {
    pub title: String,
    pub text: String,
    pub layout_text: String,
}

/// Parse page bytes as HTML and extract title and visible text.
///
/// Never fails: malformed markup yields whatever text the parser recovers.
pub fn extract_page(bytes: &[u8]) -> ExtractedPage {
    let html = String::from_utf8_lossy(bytes);
    let document = Html::parse_document(&html);

    let title = extract_title(&document).unwrap_or_else(|| UNTITLED.to_string());

    let mut layout_text = String::new();
    collect_visible_text(document.root_element(), false, &mut layout_text);

    ExtractedPage {
        title,
        text: collapse_whitespace(&layout_text),
        layout_text,
    }
}

/// Extract the trimmed `<title>`, if present and non-blank
fn extract_title(document: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|title| !title.is_empty())
}

fn collect_visible_text(element: ElementRef<'_>, preformatted: bool, out: &mut String) {
    let name = element.value().name();
    if HIDDEN_ELEMENTS.contains(&name) {
        return;
    }

    let block = BLOCK_ELEMENTS.contains(&name);
    if block {
        end_line(out);
    }
    let preformatted = preformatted || PREFORMATTED_ELEMENTS.contains(&name);

    for child in element.children() {
        match child.value() {
            Node::Text(text) if preformatted => out.push_str(text),
            Node::Text(text) => push_flowing(text, out),
            Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    collect_visible_text(child_element, preformatted, out);
                }
            }
            _ => {}
        }
    }

    if block {
        end_line(out);
    }
}

fn at_line_start(out: &str) -> bool {
    out.is_empty() || out.ends_with('\n')
}

/// Append text from ordinary markup flow.
///
/// Source indentation and line breaks are formatting of the HTML file, not of
/// the content: whitespace runs become one space and never open a line.
fn push_flowing(text: &str, out: &mut String) {
    let mut words = text.split_whitespace().peekable();
    if words.peek().is_none() {
        if !at_line_start(out) && !out.ends_with(' ') {
            out.push(' ');
        }
        return;
    }

    if text.starts_with(char::is_whitespace) && !at_line_start(out) && !out.ends_with(' ') {
        out.push(' ');
    }
    while let Some(word) = words.next() {
        out.push_str(word);
        if words.peek().is_some() {
            out.push(' ');
        }
    }
    if text.ends_with(char::is_whitespace) {
        out.push(' ');
    }
}

fn end_line(out: &mut String) {
    while out.ends_with(' ') {
        out.pop();
    }
    if !at_line_start(out) {
        out.push('\n');
    }
}
