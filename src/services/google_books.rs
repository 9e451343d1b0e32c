//! Google Books API client
//!
//! Searches `GET {base}/volumes?q=<query>` and normalizes each volume into a
//! [`BookRecord`]. Every call goes upstream: no retries, caching or rate
//! limiting.
//!
//! Base URL: https://www.googleapis.com/books/v1

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::db::BookRecord;
use crate::error::UpstreamError;

/// Substituted when a volume lists no authors
pub const NO_AUTHOR_PLACEHOLDER: &str = "No author to display";

pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/books/v1";

/// Anything that can turn a free-text query into normalized books
#[async_trait]
pub trait BookSearch: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<BookRecord>, UpstreamError>;
}

// ============================================================================
// Wire types
// ============================================================================

/// Search response; `items` is absent when nothing matched
#[derive(Debug, Clone, Deserialize)]
pub struct VolumesResponse {
    #[serde(default)]
    pub items: Option<Vec<Volume>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    pub id: String,
    #[serde(default)]
    pub volume_info: VolumeInfo,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeInfo {
    pub title: Option<String>,
    pub authors: Option<Vec<String>>,
    pub description: Option<String>,
    pub image_links: Option<ImageLinks>,
    pub info_link: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLinks {
    pub thumbnail: Option<String>,
}

impl From<Volume> for BookRecord {
    fn from(volume: Volume) -> Self {
        let info = volume.volume_info;
        BookRecord {
            book_id: volume.id,
            authors: authors_or_placeholder(info.authors),
            description: info.description,
            image: info
                .image_links
                .and_then(|links| links.thumbnail)
                .unwrap_or_default(),
            link: info.info_link.unwrap_or_default(),
            title: info.title.unwrap_or_default(),
        }
    }
}

/// Authors list, or the single-entry placeholder when missing or empty
pub fn authors_or_placeholder(authors: Option<Vec<String>>) -> Vec<String> {
    match authors {
        Some(list) if !list.is_empty() => list,
        _ => vec![NO_AUTHOR_PLACEHOLDER.to_string()],
    }
}

/// Parse a raw response body into normalized books
pub fn parse_volumes(body: &str) -> Result<Vec<BookRecord>, UpstreamError> {
    let response: VolumesResponse =
        serde_json::from_str(body).map_err(|e| UpstreamError::Malformed(e.to_string()))?;

    Ok(response
        .items
        .unwrap_or_default()
        .into_iter()
        .map(BookRecord::from)
        .collect())
}

// ============================================================================
// Client
// ============================================================================

#[derive(Debug, Clone)]
pub struct GoogleBooksConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for GoogleBooksConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Google Books API client
pub struct GoogleBooksClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl GoogleBooksClient {
    pub fn new(config: GoogleBooksConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
        })
    }

    fn volumes_url(&self) -> String {
        format!("{}/volumes", self.base_url)
    }
}

#[async_trait]
impl BookSearch for GoogleBooksClient {
    async fn search(&self, query: &str) -> Result<Vec<BookRecord>, UpstreamError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        info!("Searching Google Books for '{}'", query);

        let mut params = vec![("q", query)];
        if let Some(key) = self.api_key.as_deref() {
            params.push(("key", key));
        }

        let response = self
            .client
            .get(self.volumes_url())
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "Google Books search failed");
            return Err(UpstreamError::Status(status));
        }

        let body = response.text().await?;
        let books = parse_volumes(&body)?;

        debug!(count = books.len(), "Google Books search returned results");
        Ok(books)
    }
}
