//! Scripted in-memory fetcher shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use mirrarr::clients::{FetchRequest, Fetcher};
use mirrarr::config::{Config, ProviderConfig, StatusCheck};
use mirrarr::services::MirrorEmbed;

pub const BOOTSTRAP_URL: &str = "https://bootstrap.test/";
pub const PROXY_URL: &str = "https://proxy.test/m3u8-proxy";
pub const SITE_URL: &str = "https://site.test";
pub const API_URL: &str = "https://api.test/mirror";

enum Reply {
    Body(String),
    Fail(String),
}

/// Answers requests from a table keyed by path and sorted query pairs.
#[derive(Default)]
pub struct ScriptedFetcher {
    routes: HashMap<String, Reply>,
    requests: Mutex<Vec<FetchRequest>>,
    delay: Option<Duration>,
}

fn route_key(path: &str, query: &[(&str, &str)]) -> String {
    let mut pairs: Vec<String> = query.iter().map(|(k, v)| format!("{k}={v}")).collect();
    pairs.sort();
    if pairs.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{}", pairs.join("&"))
    }
}

fn request_key(request: &FetchRequest) -> String {
    let query: Vec<(&str, &str)> = request
        .query
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    route_key(&request.path, &query)
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every request sleeps for `delay` (tokio time) before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn on(mut self, path: &str, query: &[(&str, &str)], body: &str) -> Self {
        self.routes
            .insert(route_key(path, query), Reply::Body(body.to_string()));
        self
    }

    pub fn fail(mut self, path: &str, query: &[(&str, &str)], message: &str) -> Self {
        self.routes
            .insert(route_key(path, query), Reply::Fail(message.to_string()));
        self
    }

    /// Routes the bootstrap endpoint to `token`.
    pub fn token(self, token: &str) -> Self {
        self.on(BOOTSTRAP_URL, &[], token)
    }

    pub fn requests(&self) -> Vec<FetchRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Request keys in the order they were made.
    pub fn request_keys(&self) -> Vec<String> {
        self.requests().iter().map(request_key).collect()
    }

    pub fn count(&self, path: &str) -> usize {
        self.requests().iter().filter(|r| r.path == path).count()
    }
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, request: FetchRequest) -> Result<String> {
        let key = request_key(&request);
        self.requests.lock().unwrap().push(request);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match self.routes.get(&key) {
            Some(Reply::Body(body)) => Ok(body.clone()),
            Some(Reply::Fail(message)) => Err(anyhow!("{message}")),
            None => bail!("no scripted route for {key}"),
        }
    }
}

pub fn test_provider(status_check: StatusCheck) -> ProviderConfig {
    ProviderConfig {
        id: "testmirror".to_string(),
        name: Some("Test Mirror".to_string()),
        rank: 100,
        base_url: SITE_URL.to_string(),
        api_base_url: API_URL.to_string(),
        status_check,
        enabled: true,
    }
}

pub fn test_config() -> Config {
    let mut config = Config::default();
    config.session.bootstrap_url = BOOTSTRAP_URL.to_string();
    config.proxy.url = PROXY_URL.to_string();
    config.providers = vec![test_provider(StatusCheck::Flag)];
    config
}

pub fn embed(fetcher: &Arc<ScriptedFetcher>) -> MirrorEmbed {
    let config = test_config();
    MirrorEmbed::new(
        config.providers[0].clone(),
        &config,
        Arc::clone(fetcher) as Arc<dyn Fetcher>,
    )
}

/// Target file the proxy URL in `playlist` points at.
pub fn proxied_file(playlist: &str) -> Option<String> {
    let url = url::Url::parse(playlist).ok()?;
    url.query_pairs()
        .find(|(k, _)| k == "url")
        .map(|(_, v)| v.into_owned())
}
