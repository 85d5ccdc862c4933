// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Size-capped, timeout-bounded HTTP page fetching
//!
//! Every failure is soft: callers get [`FetchOutcome::Unavailable`] with the
//! reason attached and are expected to skip the page, never to abort.

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures::StreamExt;
use reqwest::Client;
use std::collections::HashMap;
use std::net::IpAddr;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};
use url::{Host, Url};

use super::config::FetchConfig;
use crate::version::USER_AGENT;

/// Why a page could not be fetched
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// Request timed out
    #[error("Timeout fetching: {0}")]
    Timeout(String),
    /// Transport-level HTTP error
    #[error("HTTP error: {0}")]
    Http(String),
    /// Non-success status code
    #[error("HTTP {0} for: {1}")]
    HttpStatus(u16, String),
    /// Body could not be read to completion
    #[error("Failed reading body of {url}: {message}")]
    Body { url: String, message: String },
    /// Response carried no bytes
    #[error("Empty response from: {0}")]
    Empty(String),
    /// URL is unsafe (localhost, private IP) or not http(s)
    #[error("Unsafe URL blocked: {0}")]
    UnsafeUrl(String),
    /// HTTP client could not be constructed
    #[error("HTTP client setup failed: {0}")]
    Client(String),
}

/// Result of a page fetch: either a non-empty payload or the reason it is unavailable
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    Fetched(Bytes),
    Unavailable(FetchError),
}

impl FetchOutcome {
    pub fn is_fetched(&self) -> bool {
        matches!(self, Self::Fetched(_))
    }

    /// Borrow the payload, if any
    pub fn bytes(&self) -> Option<&Bytes> {
        match self {
            Self::Fetched(bytes) => Some(bytes),
            Self::Unavailable(_) => None,
        }
    }

    pub fn into_bytes(self) -> Option<Bytes> {
        match self {
            Self::Fetched(bytes) => Some(bytes),
            Self::Unavailable(_) => None,
        }
    }
}

/// Anything that can turn a URL into page bytes
#[async_trait]
pub trait PageProvider: Send + Sync {
    async fn fetch(&self, url: &str) -> FetchOutcome;
}

/// HTTP page fetcher with a fixed User-Agent, timeout and body cap
pub struct PageFetcher {
    client: Client,
    config: FetchConfig,
}

impl PageFetcher {
    /// Create a new page fetcher
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self { client, config })
    }

    async fn try_fetch(&self, url: &str) -> Result<Bytes, FetchError> {
        if self.config.block_private_hosts && !Self::is_safe_url(url) {
            return Err(FetchError::UnsafeUrl(url.to_string()));
        }

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(url.to_string())
            } else {
                FetchError::Http(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16(), url.to_string()));
        }

        // Content-Length is only a hint; the cap is enforced on bytes actually read
        let cap = self.config.max_page_bytes;
        let hint = response.content_length().unwrap_or(0) as usize;
        let mut body = BytesMut::with_capacity(hint.min(cap));
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout(url.to_string())
                } else {
                    FetchError::Body {
                        url: url.to_string(),
                        message: e.to_string(),
                    }
                }
            })?;
            let remaining = cap - body.len();
            if chunk.len() >= remaining {
                body.extend_from_slice(&chunk[..remaining]);
                break;
            }
            body.extend_from_slice(&chunk);
        }

        if body.is_empty() {
            return Err(FetchError::Empty(url.to_string()));
        }

        Ok(body.freeze())
    }

    /// Check if URL is safe to fetch (http(s), not loopback/private/link-local)
    pub fn is_safe_url(url: &str) -> bool {
        let parsed = match Url::parse(url) {
            Ok(u) => u,
            Err(_) => return false,
        };

        if !["http", "https"].contains(&parsed.scheme()) {
            return false;
        }

        match parsed.host() {
            Some(Host::Domain(domain)) => {
                let domain = domain.to_lowercase();
                domain != "localhost" && !domain.ends_with(".localhost")
            }
            Some(Host::Ipv4(ip)) => Self::is_public_ip(IpAddr::V4(ip)),
            Some(Host::Ipv6(ip)) => Self::is_public_ip(IpAddr::V6(ip)),
            None => false,
        }
    }

    fn is_public_ip(ip: IpAddr) -> bool {
        match ip {
            IpAddr::V4(v4) => {
                !(v4.is_loopback()
                    || v4.is_private()
                    || v4.is_link_local()
                    || v4.is_unspecified()
                    || v4.is_broadcast())
            }
            IpAddr::V6(v6) => {
                // fc00::/7 unique-local, fe80::/10 link-local
                let first = v6.segments()[0];
                !(v6.is_loopback()
                    || v6.is_unspecified()
                    || (first & 0xfe00) == 0xfc00
                    || (first & 0xffc0) == 0xfe80)
            }
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

#[async_trait]
impl PageProvider for PageFetcher {
    async fn fetch(&self, url: &str) -> FetchOutcome {
        debug!("Fetching page: {}", url);
        match self.try_fetch(url).await {
            Ok(bytes) => {
                info!("Fetched {} bytes from: {}", bytes.len(), url);
                FetchOutcome::Fetched(bytes)
            }
            Err(e) => {
                debug!("Page unavailable: {}", e);
                FetchOutcome::Unavailable(e)
            }
        }
    }
}

/// Serves pages from a fixed in-memory map; useful for offline runs and tests
#[derive(Debug, Default, Clone)]
pub struct StaticPageProvider {
    pages: HashMap<String, Bytes>,
}

impl StaticPageProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: impl Into<String>, body: impl Into<Bytes>) -> Self {
        self.pages.insert(url.into(), body.into());
        self
    }
}

#[async_trait]
impl PageProvider for StaticPageProvider {
    async fn fetch(&self, url: &str) -> FetchOutcome {
        match self.pages.get(url) {
            Some(body) if !body.is_empty() => FetchOutcome::Fetched(body.clone()),
            Some(_) => FetchOutcome::Unavailable(FetchError::Empty(url.to_string())),
            None => FetchOutcome::Unavailable(FetchError::HttpStatus(404, url.to_string())),
        }
    }
}
