//! Haokan REST client with rate limiting.
//!
//! Wraps the two public endpoints the monitor needs: the author listing
//! (`/web/author/listall`, cursor-paginated by `ctime`) and author info
//! (`/haokan/ui-web/author/info`, keyed by any of the author's video ids).
//!
//! # Example
//!
//! ```ignore
//! use playwatch_haokan::{HaokanClient, HaokanClientConfig};
//!
//! #[tokio::main]
//! async fn main() -> playwatch_haokan::Result<()> {
//!     let client = HaokanClient::new(HaokanClientConfig::default())?;
//!     let page = client.fetch_listing_page("1844117067895852", None, 20).await?;
//!     println!("{} videos, more: {}", page.entries.len(), page.has_more);
//!     Ok(())
//! }
//! ```

use crate::error::{HaokanError, Result};
use crate::source::VideoSource;
use crate::types::{AuthorInfo, ListingPage, RawAuthorInfoResponse, RawListingResponse};
use async_trait::async_trait;
use governor::{Quota, RateLimiter};
use nonzero_ext::nonzero;
use playwatch_core::HaokanConfig;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER, USER_AGENT};
use reqwest::Client;
use std::num::NonZeroU32;
use std::sync::Arc;

// =============================================================================
// Constants
// =============================================================================

/// Author listing endpoint.
pub const HAOKAN_LISTING_URL: &str = "https://haokan.baidu.com/web/author/listall";

/// Author info endpoint.
pub const HAOKAN_AUTHOR_INFO_URL: &str = "https://haokan.baidu.com/haokan/ui-web/author/info";

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for the Haokan client.
#[derive(Debug, Clone)]
pub struct HaokanClientConfig {
    /// Listing endpoint URL.
    pub listing_url: String,

    /// Author info endpoint URL.
    pub author_info_url: String,

    /// `video_type` query parameter.
    pub video_type: String,

    /// Requests per minute limit.
    pub requests_per_minute: NonZeroU32,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for HaokanClientConfig {
    fn default() -> Self {
        Self {
            listing_url: HAOKAN_LISTING_URL.to_string(),
            author_info_url: HAOKAN_AUTHOR_INFO_URL.to_string(),
            video_type: "haokan|tabhubVideo".to_string(),
            requests_per_minute: nonzero!(60u32),
            timeout_secs: 10,
        }
    }
}

impl From<&HaokanConfig> for HaokanClientConfig {
    fn from(config: &HaokanConfig) -> Self {
        Self {
            listing_url: config.listing_url.clone(),
            author_info_url: config.author_info_url.clone(),
            video_type: config.video_type.clone(),
            requests_per_minute: NonZeroU32::new(config.requests_per_minute)
                .unwrap_or(nonzero!(60u32)),
            timeout_secs: config.timeout_secs,
        }
    }
}

impl HaokanClientConfig {
    /// Points both endpoints at `base` (useful for testing).
    #[must_use]
    pub fn with_base_url(mut self, base: &str) -> Self {
        let base = base.trim_end_matches('/');
        self.listing_url = format!("{base}/web/author/listall");
        self.author_info_url = format!("{base}/haokan/ui-web/author/info");
        self
    }

    /// Sets the rate limit.
    #[must_use]
    pub fn with_rate_limit(mut self, requests_per_minute: NonZeroU32) -> Self {
        self.requests_per_minute = requests_per_minute;
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

// =============================================================================
// HaokanClient
// =============================================================================

/// Haokan listing API client.
///
/// All requests go through a shared rate limiter and carry browser-like
/// headers; the platform rejects bare clients.
pub struct HaokanClient {
    /// Configuration.
    config: HaokanClientConfig,

    /// HTTP client.
    http: Client,

    /// Rate limiter.
    rate_limiter: Arc<
        RateLimiter<
            governor::state::NotKeyed,
            governor::state::InMemoryState,
            governor::clock::DefaultClock,
        >,
    >,
}

impl std::fmt::Debug for HaokanClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HaokanClient")
            .field("listing_url", &self.config.listing_url)
            .field("requests_per_minute", &self.config.requests_per_minute)
            .finish_non_exhaustive()
    }
}

impl HaokanClient {
    /// Creates a new client with the given configuration.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn new(config: HaokanClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json, text/plain, */*"));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("zh-CN,zh;q=0.9,en;q=0.8"));
        headers.insert(REFERER, HeaderValue::from_static("https://haokan.baidu.com/"));

        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| HaokanError::Configuration(format!("failed to build HTTP client: {e}")))?;

        let quota = Quota::per_minute(config.requests_per_minute);
        let rate_limiter = Arc::new(RateLimiter::direct(quota));

        Ok(Self {
            config,
            http,
            rate_limiter,
        })
    }

    /// Returns the listing endpoint URL.
    #[must_use]
    pub fn listing_url(&self) -> &str {
        &self.config.listing_url
    }

    /// Validates an account or video id before it is sent upstream.
    ///
    /// Ids are numeric on the platform; anything outside `[A-Za-z0-9_-]` is
    /// rejected rather than retried.
    fn validate_identifier(id: &str) -> Result<&str> {
        if id.is_empty() {
            return Err(HaokanError::InvalidRequest("identifier cannot be empty".to_string()));
        }

        if !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
            return Err(HaokanError::InvalidRequest(format!(
                "invalid identifier: must contain only alphanumeric, hyphen, or underscore: {id}"
            )));
        }

        if id.len() > 64 {
            return Err(HaokanError::InvalidRequest(format!(
                "invalid identifier: exceeds maximum length of 64: {}",
                id.len()
            )));
        }

        Ok(id)
    }

    /// Waits for the rate limiter and performs a GET with query parameters.
    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        self.rate_limiter.until_ready().await;

        tracing::debug!(url, ?query, "GET");

        let response = self.http.get(url).query(query).send().await?;
        Self::handle_response(response).await
    }

    /// Handles API response, converting errors appropriately.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();

        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return Err(HaokanError::rate_limit(retry_after));
        }

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(HaokanError::api(status.as_u16(), text));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    // =========================================================================
    // Endpoints
    // =========================================================================

    /// Fetches one page of an author's listing.
    ///
    /// # Arguments
    /// * `account_id` - The author's `app_id`
    /// * `cursor` - `ctime` from the previous page, `None` for the first page
    /// * `page_size` - Number of items requested (`rn`)
    ///
    /// # Errors
    /// Returns error if the request fails or the platform reports a non-zero `errno`.
    pub async fn fetch_listing_page(
        &self,
        account_id: &str,
        cursor: Option<&str>,
        page_size: u32,
    ) -> Result<ListingPage> {
        let account_id = Self::validate_identifier(account_id)?;

        let mut query = vec![
            ("app_id", account_id.to_string()),
            ("video_type", self.config.video_type.clone()),
            ("rn", page_size.to_string()),
        ];
        if let Some(cursor) = cursor {
            query.push(("ctime", cursor.to_string()));
        }

        let response: RawListingResponse = self.get(&self.config.listing_url, &query).await?;

        if response.errno != 0 {
            return Err(HaokanError::platform(response.errno, response.errmsg));
        }

        Ok(response.data.unwrap_or_default().into())
    }

    /// Fetches author profile information via one of the author's videos.
    ///
    /// Returns `Ok(None)` when the platform answers but has no author data.
    ///
    /// # Errors
    /// Returns error if the request fails or the platform reports a non-zero status.
    pub async fn fetch_author_info(&self, sample_video_id: &str) -> Result<Option<AuthorInfo>> {
        let video_id = Self::validate_identifier(sample_video_id)?;
        let query = [("vid", video_id.to_string())];

        let response: RawAuthorInfoResponse =
            self.get(&self.config.author_info_url, &query).await?;

        if response.status != 0 {
            return Err(HaokanError::platform(response.status, "author info unavailable"));
        }

        Ok(response
            .data
            .and_then(|d| d.response)
            .map(AuthorInfo::from))
    }
}

#[async_trait]
impl VideoSource for HaokanClient {
    async fn fetch_listing_page(
        &self,
        account_id: &str,
        cursor: Option<&str>,
        page_size: u32,
    ) -> Result<ListingPage> {
        HaokanClient::fetch_listing_page(self, account_id, cursor, page_size).await
    }

    async fn fetch_author_info(&self, sample_video_id: &str) -> Result<Option<AuthorInfo>> {
        HaokanClient::fetch_author_info(self, sample_video_id).await
    }
}
