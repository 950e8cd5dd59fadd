//! The network seam for the cache manager.
//!
//! Routing policies are generic over [`Fetcher`] so they can be exercised
//! in tests without a network. [`HttpFetcher`] is the production
//! implementation backed by `reqwest`.

use std::future::Future;

use anyhow::Result;
use reqwest::{header, Client, Method};
use thiserror::Error;

/// HTTP request timeout in seconds.
/// 30s allows for slow responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Image extensions that get an inline placeholder on total failure.
const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "svg"];

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("network unavailable")]
    Offline,
}

/// An asset request as the page issues it. Identity is method + URL.
#[derive(Debug, Clone)]
pub struct AssetRequest {
    pub method: Method,
    pub url: String,
    pub accept: Option<String>,
}

impl AssetRequest {
    /// A plain GET for a static asset.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
            accept: None,
        }
    }

    /// A navigation request: a GET that accepts HTML.
    pub fn navigation(url: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
            accept: Some("text/html".to_string()),
        }
    }

    pub fn class(&self) -> RequestClass {
        if self
            .accept
            .as_deref()
            .map(|a| a.contains("text/html"))
            .unwrap_or(false)
        {
            return RequestClass::Navigation;
        }

        let path = self.url.split(['?', '#']).next().unwrap_or(&self.url);
        let extension = path.rsplit('.').next().unwrap_or("").to_ascii_lowercase();
        if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
            RequestClass::Image
        } else {
            RequestClass::Other
        }
    }
}

/// Request classes with distinct routing policies and failure placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestClass {
    /// HTML navigation: network-first.
    Navigation,
    /// Image asset: cache-first, inline SVG placeholder on failure.
    Image,
    /// Anything else: cache-first, generic failure response.
    Other,
}

/// A captured network response.
#[derive(Debug, Clone)]
pub struct FetchedResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// Abstraction over the live network fetch.
pub trait Fetcher: Send + Sync {
    fn fetch(
        &self,
        request: &AssetRequest,
    ) -> impl Future<Output = Result<FetchedResponse, FetchError>> + Send;
}

/// Production fetcher for the remote content origin.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
    base_url: String,
}

impl HttpFetcher {
    pub fn new(base_url: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client, base_url })
    }

    /// Resolve a relative asset path against the configured origin.
    /// Absolute URLs pass through unchanged.
    fn resolve(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            return url.to_string();
        }
        let path = url.trim_start_matches("./").trim_start_matches('/');
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(
        &self,
        request: &AssetRequest,
    ) -> impl Future<Output = Result<FetchedResponse, FetchError>> + Send {
        let url = self.resolve(&request.url);
        let client = self.client.clone();
        let method = request.method.clone();
        let accept = request.accept.clone();

        async move {
            let mut builder = client.request(method, &url);
            if let Some(accept) = accept {
                builder = builder.header(header::ACCEPT, accept);
            }
            let response = builder.send().await?;

            let status = response.status().as_u16();
            let content_type = response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(String::from);
            let body = response.bytes().await?.to_vec();

            Ok(FetchedResponse {
                status,
                content_type,
                body,
            })
        }
    }
}

/// Scheme + host of an absolute URL, or None for relative paths.
pub fn origin_of(url: &str) -> Option<String> {
    let (scheme, rest) = url
        .strip_prefix("https://")
        .map(|r| ("https://", r))
        .or_else(|| url.strip_prefix("http://").map(|r| ("http://", r)))?;
    let host = rest.split('/').next().unwrap_or(rest);
    Some(format!("{}{}", scheme, host))
}

/// Whether a requested URL belongs to the configured origin. Relative
/// paths are same-origin by construction.
pub fn is_same_origin(url: &str, base: &str) -> bool {
    match origin_of(url) {
        None => true,
        Some(origin) => origin_of(base).map(|b| origin == b).unwrap_or(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_class_navigation_from_accept() {
        assert_eq!(
            AssetRequest::navigation("index.html").class(),
            RequestClass::Navigation
        );
        // Without the accept header the same path is a plain asset
        assert_eq!(AssetRequest::get("index.html").class(), RequestClass::Other);
    }

    #[test]
    fn test_request_class_image_by_extension() {
        assert_eq!(AssetRequest::get("icons/icon-192.png").class(), RequestClass::Image);
        assert_eq!(AssetRequest::get("photo.JPG?size=2").class(), RequestClass::Image);
        assert_eq!(AssetRequest::get("app.css").class(), RequestClass::Other);
    }

    #[test]
    fn test_resolve_relative_and_absolute() {
        let fetcher = HttpFetcher::new("https://amor-fati.app/content/".to_string()).unwrap();
        assert_eq!(
            fetcher.resolve("./index.html"),
            "https://amor-fati.app/content/index.html"
        );
        assert_eq!(
            fetcher.resolve("https://other.example/x.png"),
            "https://other.example/x.png"
        );
    }

    #[test]
    fn test_same_origin() {
        let base = "https://amor-fati.app/content";
        assert!(is_same_origin("index.html", base));
        assert!(is_same_origin("https://amor-fati.app/other/path", base));
        assert!(!is_same_origin("https://cdn.example/x.png", base));
        assert!(!is_same_origin("http://amor-fati.app/content", base));
    }
}
