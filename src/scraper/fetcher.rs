use crate::model::{RawListing, SourceError};
use crate::scraper::traits::ListingSource;

use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

/// Shared HTTP client for feeds and detail pages.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(user_agent: &str, timeout_seconds: u64) -> Result<Self, SourceError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;

        Ok(Self { client })
    }

    pub async fn get_text(&self, url: &str) -> Result<String, SourceError> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(SourceError::InvalidResponse(
                response.status().as_u16(),
                url.to_string(),
            ));
        }

        Ok(response.text().await?)
    }
}

fn tag_source(mut listings: Vec<RawListing>, name: &str) -> Vec<RawListing> {
    for listing in listings.iter_mut() {
        if listing.source.is_empty() {
            listing.source = name.to_string();
        }
    }
    listings
}

/// Listings served as a JSON array over HTTP.
pub struct JsonFeedSource {
    name: String,
    url: String,
    client: HttpClient,
}

impl JsonFeedSource {
    pub fn new(name: impl Into<String>, url: impl Into<String>, client: HttpClient) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            client,
        }
    }
}

#[async_trait::async_trait]
impl ListingSource for JsonFeedSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_listings(&self) -> Result<Vec<RawListing>, SourceError> {
        let body = self.client.get_text(&self.url).await?;
        let listings: Vec<RawListing> = serde_json::from_str(&body)?;
        info!("{}: fetched {} listings from feed", self.name, listings.len());
        Ok(tag_source(listings, &self.name))
    }
}

/// Listings written to disk as a JSON array by an external link scraper.
pub struct FileSource {
    name: String,
    path: PathBuf,
}

impl FileSource {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

#[async_trait::async_trait]
impl ListingSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_listings(&self) -> Result<Vec<RawListing>, SourceError> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        let listings: Vec<RawListing> = serde_json::from_str(&content)?;
        info!(
            "{}: read {} listings from {}",
            self.name,
            listings.len(),
            self.path.display()
        );
        Ok(tag_source(listings, &self.name))
    }
}
