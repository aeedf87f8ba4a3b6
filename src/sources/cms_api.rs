use crate::traits::{ContentSource, Query};
use crate::types::{FeedError, FetchConfig, Page, RawDocument, Result};
use async_trait::async_trait;
use backoff::{backoff::Backoff, exponential::ExponentialBackoff};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// HTTP-backed `ContentSource` over a Prismic-style document search API.
///
/// The first page is requested through `{api_url}/documents/search` with a
/// document-type predicate; every later page is fetched through the absolute
/// `next_page` URL the API returned, carried verbatim as the cursor.
pub struct CmsApiSource {
    client: Client,
    api_url: String,
    access_token: Option<String>,
    config: FetchConfig,
}

/// Wire envelope of a search response.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<RawDocument>,
    #[serde(default)]
    next_page: Option<String>,
}

impl CmsApiSource {
    pub fn new(api_url: impl Into<String>, config: FetchConfig) -> Result<Self> {
        let api_url = api_url.into();
        Url::parse(&api_url)?;

        let redirect_policy = if config.follow_redirects {
            reqwest::redirect::Policy::limited(config.max_redirects)
        } else {
            reqwest::redirect::Policy::none()
        };

        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(redirect_policy)
            .build()
            .map_err(|e| FeedError::SourceUnavailable(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url,
            access_token: None,
            config,
        })
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Build the search URL for the first page of a query.
    pub fn search_url(&self, query: &Query, page_size: u32) -> Result<Url> {
        let base = format!("{}/documents/search", self.api_url.trim_end_matches('/'));
        let mut url = Url::parse(&base)?;

        let predicate = format!("[[at(document.type,\"{}\")]]", query.document_type);
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("q", &predicate);
            if !query.fields.is_empty() {
                pairs.append_pair("fetch", &query.fields.join(","));
            }
            pairs.append_pair("pageSize", &page_size.to_string());
            if let Some(token) = &self.access_token {
                pairs.append_pair("access_token", token);
            }
        }
        Ok(url)
    }

    async fn get_with_retry(&self, url: &Url) -> Result<String> {
        let mut backoff: ExponentialBackoff<backoff::SystemClock> = ExponentialBackoff {
            current_interval: Duration::from_secs(self.config.retry_delay_seconds),
            initial_interval: Duration::from_secs(self.config.retry_delay_seconds),
            max_interval: Duration::from_secs(self.config.retry_delay_seconds * 32),
            multiplier: 2.0,
            max_elapsed_time: Some(Duration::from_secs(self.config.retry_delay_seconds * 60)),
            ..Default::default()
        };

        let mut last_error: Option<FeedError> = None;

        for attempt in 0..=self.config.max_retries {
            match self.client.get(url.clone()).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response.text().await?);
                    }

                    let error = FeedError::SourceUnavailable(format!(
                        "HTTP {}: {}",
                        status,
                        status.canonical_reason().unwrap_or("Unknown")
                    ));

                    // Client errors other than 429 will not improve on retry.
                    if status.is_client_error() && status != reqwest::StatusCode::TOO_MANY_REQUESTS {
                        return Err(error);
                    }
                    last_error = Some(error);
                }
                Err(e) => {
                    last_error = Some(FeedError::from(e));
                }
            }

            if attempt < self.config.max_retries {
                if let Some(delay) = backoff.next_backoff() {
                    warn!("Attempt {} failed for {}, retrying in {:?}", attempt + 1, url, delay);
                    tokio::time::sleep(delay).await;
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| FeedError::SourceUnavailable("request failed".to_string())))
    }
}

/// Decode a search response body into a `Page`.
pub fn parse_search_body(body: &str) -> Result<Page> {
    let envelope: SearchResponse = serde_json::from_str(body)
        .map_err(|e| FeedError::MalformedResponse(format!("bad search envelope: {}", e)))?;
    Ok(Page {
        items: envelope.results,
        next_cursor: envelope.next_page,
    })
}

#[async_trait]
impl ContentSource for CmsApiSource {
    fn source_name(&self) -> String {
        match Url::parse(&self.api_url) {
            Ok(parsed) => match parsed.domain() {
                Some(domain) => format!("CMS API ({})", domain),
                None => "CMS API".to_string(),
            },
            Err(_) => "CMS API".to_string(),
        }
    }

    async fn fetch_page(&self, query: &Query, cursor: Option<&str>, page_size: u32) -> Result<Page> {
        let url = match cursor {
            Some(next_page) => Url::parse(next_page)?,
            None => self.search_url(query, page_size)?,
        };

        debug!("Fetching page: {}", url);
        let body = self.get_with_retry(&url).await?;
        let page = parse_search_body(&body)?;

        info!(
            "Fetched page with {} documents from {} (has_more: {})",
            page.items.len(),
            self.source_name(),
            page.next_cursor.is_some()
        );
        Ok(page)
    }

    async fn health_check(&self) -> Result<bool> {
        let url = Url::parse(&self.api_url)?;
        let response = self.client.get(url).send().await?;
        Ok(response.status().is_success())
    }
}
