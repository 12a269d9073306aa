use std::time::Duration;

use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use sitelens_core::error::AppError;
use sitelens_core::traits::PageFetcher;
use sitelens_core::WebsiteData;
use url::Url;

use crate::html::parse_page;

/// Desktop browser User-Agent sent with every page request, to get past
/// basic bot blocking.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/117.0.0.0 Safari/537.36";

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Page fetcher using reqwest and scraper.
///
/// Issues one GET per call with the configured headers and timeout, then
/// reduces the HTML to [`WebsiteData`]. Any failure (bad URL, connect error,
/// timeout, non-2xx) is returned as [`WebsiteData::fetch_failed`].
#[derive(Clone)]
pub struct WebContentFetcher {
    client: Client,
    timeout: Duration,
}

impl WebContentFetcher {
    pub fn new() -> Result<Self, AppError> {
        Self::with_headers(default_headers(DEFAULT_USER_AGENT)?, DEFAULT_FETCH_TIMEOUT)
    }

    pub fn with_headers(headers: HeaderMap, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::HttpError(e.to_string()))?;

        Ok(Self {
            client,
            timeout,
        })
    }

    /// Downloads the raw HTML body of `url`.
    pub async fn fetch_html(&self, url: &str) -> Result<String, AppError> {
        validate_scheme(url)?;

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                AppError::timed_out(self.timeout)
            } else if e.is_connect() {
                AppError::NetworkError(format!("Connection failed: {e}"))
            } else {
                AppError::HttpError(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::HttpError(format!(
                "HTTP {} for {}",
                status.as_u16(),
                url
            )));
        }

        response.text().await.map_err(|e| {
            if e.is_timeout() {
                AppError::timed_out(self.timeout)
            } else {
                AppError::HttpError(format!("Failed to read response body: {e}"))
            }
        })
    }
}

impl PageFetcher for WebContentFetcher {
    async fn fetch(&self, url: &str) -> WebsiteData {
        match self.fetch_html(url).await {
            Ok(html) => {
                tracing::debug!(%url, bytes = html.len(), "Fetched HTML");
                parse_page(url, &html)
            }
            Err(e) => {
                tracing::warn!(%url, error = %e, "Page fetch failed");
                WebsiteData::fetch_failed(url, &e)
            }
        }
    }
}

/// Header map carrying only the given User-Agent.
pub fn default_headers(user_agent: &str) -> Result<HeaderMap, AppError> {
    let value = HeaderValue::from_str(user_agent)
        .map_err(|e| AppError::ConfigError(format!("Invalid User-Agent '{user_agent}': {e}")))?;
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, value);
    Ok(headers)
}

/// Only `http` and `https` URLs are fetched.
fn validate_scheme(url: &str) -> Result<(), AppError> {
    let parsed = Url::parse(url).map_err(|e| AppError::HttpError(format!("Invalid URL: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(AppError::HttpError(format!(
            "URL scheme '{scheme}' is not allowed (only http/https)"
        ))),
    }
}
