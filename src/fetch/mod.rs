use crate::config::LoaderConfig;
use crate::error::LoaderError;
use async_trait::async_trait;
use log::debug;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use std::time::Duration;

mod charset;

pub use charset::decode_html;

/// Supplies decoded page HTML for a URL.
#[async_trait]
pub trait HtmlFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, LoaderError>;
}

/// HTTP fetcher over `reqwest` with charset negotiation.
pub struct RequestFetcher {
    client: Client,
}

impl RequestFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, LoaderError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self { client })
    }

    pub fn from_config(config: &LoaderConfig) -> Result<Self, LoaderError> {
        Self::new(Duration::from_secs(config.timeout), &config.user_agent)
    }
}

#[async_trait]
impl HtmlFetcher for RequestFetcher {
    async fn fetch(&self, url: &str) -> Result<String, LoaderError> {
        let parsed = Url::parse(url).map_err(|_| LoaderError::InvalidUrl(url.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(LoaderError::InvalidUrl(url.to_string()));
        }

        debug!("Fetching {url}");
        let response = self.client.get(parsed).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoaderError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(LoaderError::EmptyBody);
        }
        debug!("Fetched {} bytes from {url}", bytes.len());

        decode_html(&bytes, content_type.as_deref()).ok_or(LoaderError::EncodingFailed)
    }
}
