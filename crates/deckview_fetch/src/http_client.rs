//! HTTP content source.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;
use url::Url;

use crate::error::FetchError;
use crate::fetcher::{ContentSource, FetchedContent, content_type_hint};

/// Default timeout for HTTP requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default maximum response body size (10MB).
pub const DEFAULT_MAX_BODY_BYTES: u64 = 10 * 1024 * 1024;

/// Content types that say nothing about the document format.
const GENERIC_CONTENT_TYPES: &[&str] = &["text/plain", "application/octet-stream"];

/// Fetches slide content over plain HTTP GET.
///
/// Addresses are resolved against a base URL, so manifest paths such as
/// `/slides/intro.md` work as-is. A single pooled client is shared by every
/// request.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: Url,
    max_body_bytes: u64,
}

/// Builder for [`HttpFetcher`].
#[derive(Debug)]
pub struct HttpFetcherBuilder {
    base_url: String,
    timeout: Duration,
    max_body_bytes: u64,
}

impl HttpFetcher {
    /// Create a new builder for a fetcher rooted at `base_url`.
    pub fn builder(base_url: impl Into<String>) -> HttpFetcherBuilder {
        HttpFetcherBuilder {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    /// Returns the base URL addresses are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves a slide address to an absolute HTTP(S) URL.
    pub fn resolve(&self, address: &str) -> Result<Url, FetchError> {
        let url = self
            .base_url
            .join(address)
            .map_err(|e| FetchError::invalid_address(address, e.to_string()))?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            scheme => Err(FetchError::invalid_address(
                address,
                format!("unsupported scheme `{scheme}`"),
            )),
        }
    }

    async fn read_body(
        &self,
        address: &str,
        response: reqwest::Response,
    ) -> Result<Vec<u8>, FetchError> {
        let max = self.max_body_bytes;
        if let Some(len) = response.content_length()
            && len > max
        {
            return Err(FetchError::TooLarge {
                address: address.to_string(),
                size: len,
                max,
            });
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|source| FetchError::Network {
                address: address.to_string(),
                source,
            })?;
            let size = (bytes.len() + chunk.len()) as u64;
            if size > max {
                return Err(FetchError::TooLarge {
                    address: address.to_string(),
                    size,
                    max,
                });
            }
            bytes.extend_from_slice(&chunk);
        }

        Ok(bytes)
    }
}

#[async_trait]
impl ContentSource for HttpFetcher {
    async fn fetch(&self, address: &str) -> Result<FetchedContent, FetchError> {
        let url = self.resolve(address)?;
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Network {
                address: address.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                address: address.to_string(),
                status,
            });
        }

        let declared = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let content_type = declared_or_hint(declared, address);

        let bytes = self.read_body(address, response).await?;
        debug!(
            "Fetched {} ({} bytes, content type `{}`)",
            address,
            bytes.len(),
            content_type
        );

        Ok(FetchedContent {
            bytes,
            content_type,
        })
    }
}

/// Keeps the declared type unless it is missing or generic, in which case the
/// address extension may supply a better one.
fn declared_or_hint(declared: Option<String>, address: &str) -> String {
    let generic = match declared.as_deref() {
        None => true,
        Some(ct) => {
            let essence = ct.split(';').next().unwrap_or_default().trim();
            GENERIC_CONTENT_TYPES
                .iter()
                .any(|g| essence.eq_ignore_ascii_case(g))
        }
    };

    let hint = content_type_hint(address);
    if generic && !hint.is_empty() {
        hint.to_string()
    } else {
        declared.unwrap_or_default()
    }
}

impl HttpFetcherBuilder {
    /// Set timeout for HTTP requests.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set maximum accepted response body size.
    pub fn max_body_bytes(mut self, max: u64) -> Self {
        self.max_body_bytes = max;
        self
    }

    /// Build the HttpFetcher.
    pub fn build(self) -> Result<HttpFetcher, FetchError> {
        let base_url = Url::parse(&self.base_url)
            .map_err(|e| FetchError::invalid_address(&self.base_url, e.to_string()))?;

        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| FetchError::ClientBuild(e.to_string()))?;

        Ok(HttpFetcher {
            client,
            base_url,
            max_body_bytes: self.max_body_bytes,
        })
    }
}
