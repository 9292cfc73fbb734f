use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;
use url::Url;

use crate::constants::defaults;
use crate::models::mirror::SearchResponse;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub http: HttpConfig,

    pub session: SessionConfig,

    pub proxy: ProxyConfig,

    pub progress: ProgressConfig,

    pub source: SourceConfig,

    pub providers: Vec<ProviderConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: String,

    pub log_format: LogFormat,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            worker_threads: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub user_agent: String,

    /// Request timeout in seconds (default: 30)
    pub request_timeout_seconds: u32,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::USER_AGENT.to_string(),
            request_timeout_seconds: 30,
        }
    }
}

impl HttpConfig {
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.request_timeout_seconds))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Endpoint returning the percent-encoded session hash.
    pub bootstrap_url: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            bootstrap_url: defaults::BOOTSTRAP_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// HLS proxy that final manifest URLs are routed through.
    pub url: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            url: defaults::PROXY_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressConfig {
    pub tick_interval_ms: u64,

    pub step: u8,

    pub initial: u8,

    /// Highest value the timer reports on its own; must stay below 100.
    pub ceiling: u8,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 100,
            step: 5,
            initial: 10,
            ceiling: 90,
        }
    }
}

impl ProgressConfig {
    #[must_use]
    pub const fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub id: String,

    pub name: String,

    pub rank: i32,

    pub enabled: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            id: "whvxMirrors".to_string(),
            name: "Netflix & Prime".to_string(),
            rank: 550,
            enabled: true,
        }
    }
}

/// How a provider signals a usable search response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusCheck {
    /// Valid only when `status == "y"`.
    Flag,
    /// Any successful response is valid.
    Always,
}

impl StatusCheck {
    #[must_use]
    pub fn accepts(self, response: &SearchResponse) -> bool {
        match self {
            Self::Flag => response.status.as_deref() == Some("y"),
            Self::Always => true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub rank: i32,

    /// Public site URL; playlist files are relative to it.
    pub base_url: String,

    /// Base URL the JSON endpoints are requested through.
    pub api_base_url: String,

    pub status_check: StatusCheck,

    #[serde(default = "default_true")]
    pub enabled: bool,
}

const fn default_true() -> bool {
    true
}

impl ProviderConfig {
    #[must_use]
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| self.id.to_uppercase())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            http: HttpConfig::default(),
            session: SessionConfig::default(),
            proxy: ProxyConfig::default(),
            progress: ProgressConfig::default(),
            source: SourceConfig::default(),
            providers: vec![
                ProviderConfig {
                    id: "netmirror".to_string(),
                    name: None,
                    rank: 300,
                    base_url: defaults::MIRROR_SITE_URL.to_string(),
                    api_base_url: "https://filmueproxy.vercel.app/iosmirror.cc:443".to_string(),
                    status_check: StatusCheck::Flag,
                    enabled: true,
                },
                ProviderConfig {
                    id: "primemirror".to_string(),
                    name: None,
                    rank: 290,
                    base_url: defaults::MIRROR_SITE_URL.to_string(),
                    api_base_url: "https://filmueproxy.vercel.app/iosmirror.cc:443/pv"
                        .to_string(),
                    status_check: StatusCheck::Always,
                    enabled: true,
                },
            ],
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        paths.push(PathBuf::from("config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("mirrarr").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".mirrarr").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.session.bootstrap_url).context("Invalid session bootstrap URL")?;
        Url::parse(&self.proxy.url).context("Invalid proxy URL")?;

        if self.progress.step == 0 {
            anyhow::bail!("Progress step must be > 0");
        }

        if self.progress.ceiling >= 100 || self.progress.initial > self.progress.ceiling {
            anyhow::bail!("Progress must satisfy initial <= ceiling < 100");
        }

        if self.progress.tick_interval_ms == 0 {
            anyhow::bail!("Progress tick interval must be > 0");
        }

        let mut seen = HashSet::new();
        for provider in &self.providers {
            if !seen.insert(provider.id.as_str()) {
                anyhow::bail!("Duplicate provider id '{}'", provider.id);
            }

            Url::parse(&provider.base_url)
                .with_context(|| format!("Invalid base_url for provider '{}'", provider.id))?;
            Url::parse(&provider.api_base_url)
                .with_context(|| format!("Invalid api_base_url for provider '{}'", provider.id))?;
        }

        Ok(())
    }

    #[must_use]
    pub fn find_provider(&self, id: &str) -> Option<&ProviderConfig> {
        self.providers.iter().find(|p| p.id == id)
    }

    /// Enabled providers, highest rank first.
    #[must_use]
    pub fn enabled_providers(&self) -> Vec<&ProviderConfig> {
        let mut providers: Vec<_> = self.providers.iter().filter(|p| p.enabled).collect();
        providers.sort_by(|a, b| b.rank.cmp(&a.rank));
        providers
    }
}
