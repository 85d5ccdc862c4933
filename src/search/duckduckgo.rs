// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! DuckDuckGo search provider
//!
//! Queries DuckDuckGo's HTML interface. No API key required. The results
//! page is fetched through the shared page cache, so a repeated query within
//! the cache window costs no network round trip.

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use std::sync::{Arc, OnceLock};
use tracing::debug;
use url::Url;

use super::provider::SearchProvider;
use super::types::{SearchError, SearchResult};
use crate::fetch::{FetchOutcome, PageCache, PageProvider};
use crate::utils::collapse_whitespace;

pub const DDG_HTML_URL: &str = "https://html.duckduckgo.com/html/";

/// Upper bound on hits taken from one results page
pub const MAX_DDG_RESULTS: usize = 6;

const PROVIDER_NAME: &str = "duckduckgo";

/// Ancestor levels searched for a result's snippet
const SNIPPET_SEARCH_DEPTH: usize = 3;

fn result_link_selector() -> Option<&'static Selector> {
    static SELECTOR: OnceLock<Option<Selector>> = OnceLock::new();
    SELECTOR
        .get_or_init(|| Selector::parse(".result__a").ok())
        .as_ref()
}

fn result_snippet_selector() -> Option<&'static Selector> {
    static SELECTOR: OnceLock<Option<Selector>> = OnceLock::new();
    SELECTOR
        .get_or_init(|| Selector::parse(".result__snippet").ok())
        .as_ref()
}

/// DuckDuckGo search provider (no API key required)
pub struct DuckDuckGoProvider {
    pages: Arc<dyn PageProvider>,
    cache: Arc<PageCache>,
    endpoint: String,
}

impl DuckDuckGoProvider {
    pub fn new(pages: Arc<dyn PageProvider>, cache: Arc<PageCache>) -> Self {
        Self::with_endpoint(pages, cache, DDG_HTML_URL)
    }

    /// Use a different results endpoint (tests, mirrors)
    pub fn with_endpoint(
        pages: Arc<dyn PageProvider>,
        cache: Arc<PageCache>,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            pages,
            cache,
            endpoint: endpoint.into(),
        }
    }

    /// Results-page URL for `query`
    pub fn query_url(&self, query: &str) -> Result<String, SearchError> {
        Url::parse_with_params(&self.endpoint, &[("q", query)])
            .map(String::from)
            .map_err(|e| SearchError::InvalidQuery {
                reason: format!("bad endpoint {}: {}", self.endpoint, e),
            })
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoProvider {
    async fn search(
        &self,
        query: &str,
        num_results: usize,
    ) -> Result<Vec<SearchResult>, SearchError> {
        if query.trim().is_empty() {
            return Err(SearchError::InvalidQuery {
                reason: "empty query".to_string(),
            });
        }

        let url = self.query_url(query.trim())?;
        let html = match self.cache.get_or_fetch(self.pages.as_ref(), &url).await {
            FetchOutcome::Fetched(bytes) => bytes,
            FetchOutcome::Unavailable(e) => {
                return Err(SearchError::ProviderUnavailable {
                    provider: PROVIDER_NAME.to_string(),
                    reason: e.to_string(),
                })
            }
        };

        let results = parse_ddg_html(
            &String::from_utf8_lossy(&html),
            num_results.min(MAX_DDG_RESULTS),
        );
        debug!("DuckDuckGo returned {} results for: {}", results.len(), query);
        Ok(results)
    }

    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn is_available(&self) -> bool {
        true
    }

    fn priority(&self) -> u8 {
        50
    }
}

/// Extract result anchors, their titles and nearby snippets
pub fn parse_ddg_html(html: &str, max_results: usize) -> Vec<SearchResult> {
    let Some(links) = result_link_selector() else {
        return Vec::new();
    };
    let document = Html::parse_document(html);

    document
        .select(links)
        .filter_map(|anchor| {
            let url = anchor.value().attr("href").and_then(extract_ddg_url)?;
            let title = collapse_whitespace(&anchor.text().collect::<String>());
            if title.is_empty() {
                return None;
            }
            Some(SearchResult {
                title,
                url,
                snippet: find_snippet(anchor),
                source: PROVIDER_NAME.to_string(),
            })
        })
        .take(max_results)
        .collect()
}

/// Nearest `.result__snippet` belonging to the same result block
fn find_snippet(anchor: ElementRef<'_>) -> String {
    let (Some(links), Some(snippets)) = (result_link_selector(), result_snippet_selector()) else {
        return String::new();
    };
    for node in anchor.ancestors().take(SNIPPET_SEARCH_DEPTH) {
        let Some(block) = ElementRef::wrap(node) else {
            continue;
        };
        // Stop before climbing into a container of several results
        if block.select(links).count() > 1 {
            break;
        }
        if let Some(snippet) = block.select(snippets).next() {
            return collapse_whitespace(&snippet.text().collect::<String>());
        }
    }
    String::new()
}

/// Resolve DuckDuckGo's `/l/?uddg=<target>` redirect links
fn extract_ddg_url(href: &str) -> Option<String> {
    let base = Url::parse(DDG_HTML_URL).ok()?;
    let parsed = base.join(href).ok()?;

    if let Some((_, target)) = parsed.query_pairs().find(|(key, _)| key == "uddg") {
        let target = Url::parse(&target).ok()?;
        return matches!(target.scheme(), "http" | "https").then(|| target.to_string());
    }

    let is_ddg = parsed
        .host_str()
        .map_or(true, |host| host.ends_with("duckduckgo.com"));
    (!is_ddg && matches!(parsed.scheme(), "http" | "https")).then(|| parsed.to_string())
}
