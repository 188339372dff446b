//! HTTP metadata fetcher.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use super::extract::{extract_metadata, sitemap_from_robots};
use super::MetadataRecord;
use crate::config::FetchConfig;

/// Page bodies beyond this many bytes are cut off before extraction
pub const MAX_PAGE_BYTES: usize = 5 * 1024 * 1024;

/// robots.txt bodies beyond this many bytes are cut off
pub const MAX_ROBOTS_TXT_BYTES: usize = 64 * 1024;

/// Errors from fetching a page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid URL '{0}'")]
    InvalidUrl(String),

    #[error("Request to {url} failed: {message}")]
    Request { url: String, message: String },

    #[error("{url} responded with HTTP {status}")]
    Status { url: String, status: u16 },
}

/// Source of page metadata
#[async_trait]
pub trait MetadataFetcher: Send + Sync {
    /// Fetch and analyze the page at `url`
    async fn fetch(&self, url: &str) -> Result<MetadataRecord, FetchError>;
}

/// Trim, default the scheme to https, and parse.
pub fn normalize_url(raw: &str) -> Result<Url, FetchError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FetchError::InvalidUrl(raw.to_string()));
    }

    let lower = trimmed.to_ascii_lowercase();
    let with_scheme = if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let url = Url::parse(&with_scheme).map_err(|_| FetchError::InvalidUrl(raw.to_string()))?;
    if url.host_str().map(str::is_empty).unwrap_or(true) {
        return Err(FetchError::InvalidUrl(raw.to_string()));
    }
    Ok(url)
}

/// Fetches pages over HTTP and probes robots.txt / sitemap
pub struct HttpMetadataFetcher {
    client: reqwest::Client,
    probe_robots: bool,
}

impl HttpMetadataFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| FetchError::Request {
                url: String::new(),
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            probe_robots: config.probe_robots,
        })
    }

    /// GET `url` and read at most `limit` bytes of the body
    async fn get_text(&self, url: &Url, limit: usize) -> Result<String, FetchError> {
        let mut response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchError::Request {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(|e| FetchError::Request {
            url: url.to_string(),
            message: e.to_string(),
        })? {
            let room = limit - body.len();
            if chunk.len() > room {
                body.extend_from_slice(&chunk[..room]);
                tracing::debug!(url = %url, limit, "Body truncated");
                break;
            }
            body.extend_from_slice(&chunk);
        }

        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    async fn exists(&self, url: &Url) -> bool {
        match self.client.get(url.clone()).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                tracing::debug!(url = %url, error = %e, "Probe failed");
                false
            }
        }
    }

    /// Fill robots.txt and sitemap state. Failures count as absent.
    async fn probe_crawl_files(&self, page: &Url, record: &mut MetadataRecord) {
        let Ok(robots_url) = page.join("/robots.txt") else {
            return;
        };

        let mut sitemap_url = None;
        match self.get_text(&robots_url, MAX_ROBOTS_TXT_BYTES).await {
            Ok(body) => {
                record.robots_txt_exists = true;
                sitemap_url = sitemap_from_robots(&body);
                record.robots_txt_content = Some(body);
            }
            Err(e) => {
                tracing::debug!(url = %robots_url, error = %e, "robots.txt not available");
            }
        }

        let sitemap = sitemap_url
            .and_then(|s| page.join(&s).ok())
            .or_else(|| page.join("/sitemap.xml").ok());

        if let Some(sitemap) = sitemap {
            record.sitemap_exists = self.exists(&sitemap).await;
            record.sitemap_url = Some(sitemap.to_string());
        }
    }
}

#[async_trait]
impl MetadataFetcher for HttpMetadataFetcher {
    async fn fetch(&self, url: &str) -> Result<MetadataRecord, FetchError> {
        let page = normalize_url(url)?;
        tracing::info!(url = %page, "Fetching page metadata");

        let html = self.get_text(&page, MAX_PAGE_BYTES).await?;
        let mut record = extract_metadata(&html, Some(&page));

        if self.probe_robots {
            self.probe_crawl_files(&page, &mut record).await;
        }

        tracing::debug!(
            url = %page,
            fields = record.present_fields().len(),
            robots_txt = record.robots_txt_exists,
            sitemap = record.sitemap_exists,
            "Extracted metadata"
        );
        Ok(record)
    }
}
