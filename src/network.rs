use std::time::Duration;

use reqwest::header::LOCATION;
use reqwest::redirect::Policy;
use thiserror::Error;

const CONNECT_TIMEOUT_SECS: u64 = 10;
const POOL_IDLE_PER_HOST: usize = 16;
const POOL_IDLE_TIMEOUT_SECS: u64 = 30;

/// Errors a single fetch can produce. All of them are terminal for the URL
/// in question and none of them stops the crawl.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request timeout")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("failed to read response body: {0}")]
    Body(String),

    #[error("request failed: {0}")]
    Request(String),
}

/// Response data the crawl logic needs from one fetch.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub status_code: u16,

    /// Raw Location header value, present on redirect responses that carry
    /// one. Not resolved here; the crawl logic joins it against the URL it
    /// was fetched from.
    pub location: Option<String>,

    /// Response body, read for 2xx responses only. Other statuses are
    /// classified from the status line and headers alone.
    pub body: Option<String>,
}

/// HTTP client tuned for manual redirect handling.
///
/// Redirect following is disabled at the client level, so 3xx responses
/// come back as-is and the redirect budget stays under the caller's
/// control.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .pool_max_idle_per_host(POOL_IDLE_PER_HOST)
            .pool_idle_timeout(Duration::from_secs(POOL_IDLE_TIMEOUT_SECS))
            .tcp_nodelay(true)
            .redirect(Policy::none())
            .build()?;

        Ok(Self { client })
    }

    /// Fetch one URL without following redirects.
    pub async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(Self::classify_error)?;

        let status_code = response.status().as_u16();
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.trim().to_string());

        let body = if (200..300).contains(&status_code) {
            let text = response.text().await.map_err(|error| {
                if error.is_timeout() {
                    FetchError::Timeout
                } else {
                    FetchError::Body(error.to_string())
                }
            })?;
            Some(text)
        } else {
            None
        };

        Ok(FetchedPage {
            status_code,
            location,
            body,
        })
    }

    fn classify_error(error: reqwest::Error) -> FetchError {
        if error.is_timeout() {
            FetchError::Timeout
        } else if error.is_connect() {
            FetchError::Connect(error.to_string())
        } else {
            FetchError::Request(error.to_string())
        }
    }
}
