// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Extraction feeding the corroboration scorer

use docsynth::extract::{extract_page, extract_snippets};
use docsynth::synthesis::{base_confidence, rank_candidates, SnippetCandidate, SourceWeights};

fn candidates_from(url: &str, html: &str, hint: &str) -> Vec<SnippetCandidate> {
    let page = extract_page(html.as_bytes());
    extract_snippets(&page.layout_text, hint)
        .into_iter()
        .map(|code| SnippetCandidate {
            code,
            url: url.to_string(),
            title: page.title.clone(),
        })
        .collect()
}

#[test]
fn test_worked_example() {
    let text = "```python\ncode1\n```\nSome text\n    code2\n    more\n";
    assert_eq!(extract_snippets(text, "python"), vec!["code1", "code2\nmore"]);
}

#[test]
fn test_escaped_newlines_recognized() {
    let text = r"```python\nprint('hi')\n```";
    assert_eq!(extract_snippets(text, "python"), vec!["print('hi')"]);
}

#[test]
fn test_short_indent_block_dropped() {
    let text = "intro\n    x = 1\nend\n";
    assert!(extract_snippets(text, "python").is_empty());
}

#[test]
fn test_corroborated_snippet_wins() {
    let shared = "<pre>```python\nsorted(items, key=len)\n```</pre>";
    let unique = "<pre>```python\nitems.sort()\n```</pre>";

    let mut candidates = Vec::new();
    candidates.extend(candidates_from(
        "https://blog.example/a",
        &format!("<html><body>{}</body></html>", unique),
        "python",
    ));
    candidates.extend(candidates_from(
        "https://stackoverflow.com/q/1",
        &format!("<html><body>{}</body></html>", shared),
        "python",
    ));
    candidates.extend(candidates_from(
        "https://github.com/x/y",
        &format!("<html><body>{}</body></html>", shared),
        "python",
    ));

    let ranked = rank_candidates(&candidates, &SourceWeights::default());
    assert_eq!(ranked[0].code, "sorted(items, key=len)");
    assert_eq!(ranked[0].occurrences, 2);
    // 2 × (1.5 + 1.4) / 2
    assert!((ranked[0].score - 2.9).abs() < 1e-9);
    assert_eq!(ranked[1].code, "items.sort()");
    assert!(base_confidence(ranked[0].score) > base_confidence(ranked[1].score));
}

#[test]
fn test_repeat_within_one_page_counts_once_per_occurrence() {
    // Dedup inside a page happens before scoring, so one page contributes once
    let html = "<html><body><pre>```python\nx = 1\n```</pre><pre>```python\nx = 1\n```</pre></body></html>";
    let candidates = candidates_from("https://a.example/", html, "python");
    assert_eq!(candidates.len(), 1);

    let ranked = rank_candidates(&candidates, &SourceWeights::empty());
    assert_eq!(ranked[0].occurrences, 1);
}

#[test]
fn test_pretty_printed_page_yields_only_code() {
    let html = "<html>\n  <body>\n    <p>Welcome to the Example Docs tutorial series</p>\n    <pre>```python\nprint(sum(range(10)))\n```</pre>\n    <p>Thanks for reading the Example Docs tutorial</p>\n  </body>\n</html>";
    let snippets: Vec<String> = candidates_from("https://a.example/", html, "python")
        .into_iter()
        .map(|candidate| candidate.code)
        .collect();
    assert_eq!(snippets, vec!["print(sum(range(10)))"]);
}

#[test]
fn test_indented_code_in_pre_still_found() {
    let html = "<html>\n  <body>\n    <p>Define a helper:</p>\n    <pre>\n    def area(r):\n        return 3.14 * r * r\n</pre>\n  </body>\n</html>";
    let snippets: Vec<String> = candidates_from("https://a.example/", html, "python")
        .into_iter()
        .map(|candidate| candidate.code)
        .collect();
    assert_eq!(snippets, vec!["def area(r):\n    return 3.14 * r * r"]);
}
