use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::config::HttpConfig;

/// A single GET request against either an absolute URL or `base_url + path`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchRequest {
    pub path: String,
    pub base_url: Option<String>,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
}

impl FetchRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Looks up a query parameter by key.
    #[must_use]
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn url(&self) -> Result<Url> {
        let raw = match &self.base_url {
            Some(base) => format!(
                "{}/{}",
                base.trim_end_matches('/'),
                self.path.trim_start_matches('/')
            ),
            None => self.path.clone(),
        };

        let mut url = Url::parse(&raw).with_context(|| format!("Invalid request URL: {raw}"))?;

        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &self.query {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }
}

/// Fetch capability used by every pipeline stage.
///
/// Implementations return the response body as text and fail on transport
/// errors or non-2xx statuses.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, request: FetchRequest) -> Result<String>;
}

pub async fn fetch_json<T: DeserializeOwned>(
    fetcher: &dyn Fetcher,
    request: FetchRequest,
) -> Result<T> {
    let path = request.path.clone();
    let body = fetcher.fetch(request).await?;
    serde_json::from_str(&body).with_context(|| format!("Failed to decode response from {path}"))
}

#[derive(Clone)]
pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    #[must_use]
    pub fn new(config: &HttpConfig) -> Self {
        Self {
            client: Client::builder()
                .user_agent(&config.user_agent)
                .timeout(config.request_timeout())
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }
}

#[async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, request: FetchRequest) -> Result<String> {
        let url = request.url()?;
        debug!(url = %url, "Fetching");

        let mut builder = self.client.get(url.clone());
        for (key, value) in &request.headers {
            builder = builder.header(key, value);
        }

        let response = builder
            .send()
            .await
            .with_context(|| format!("Request to {} failed", url.path()))?;

        let status = response.status();
        if !status.is_success() {
            bail!("{} returned HTTP {}", url.path(), status);
        }

        Ok(response.text().await?)
    }
}
