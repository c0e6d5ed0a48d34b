use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};

/// Many institutional sources reject default HTTP clients, so requests carry
/// a browser-like identity.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const FEED_ACCEPT: &str =
    "application/rss+xml, application/xml, text/xml, application/atom+xml, */*";

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP {0}")]
    Status(u16),
    #[error("request timed out")]
    TimedOut,
    #[error("{0}")]
    Transport(String),
}

/// Transport abstraction so the ingestion pipeline can be exercised with
/// scripted payloads instead of live sources.
pub trait FeedFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Production fetcher over a blocking reqwest client with a bounded
/// per-request timeout.
pub struct HttpFeedFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFeedFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(FEED_ACCEPT));

        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(BROWSER_USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(|err| FetchError::Transport(err.to_string()))?;

        Ok(Self { client })
    }
}

impl FeedFetcher for HttpFeedFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self.client.get(url).send().map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let bytes = response.bytes().map_err(map_transport_error)?;
        Ok(bytes.to_vec())
    }
}

fn map_transport_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::TimedOut
    } else {
        FetchError::Transport(err.to_string())
    }
}
