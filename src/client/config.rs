//! Client configuration: defaults, YAML files and environment overrides.

use crate::pipeline::DEFAULT_STREAM_BUFFER;
use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_BASE_URL: &str = "https://api.mistral.ai/v1";

/// Transport and streaming settings.
///
/// Every field has a default, so a YAML file only needs the keys it changes:
///
/// ```yaml
/// base_url: http://localhost:8080/v1
/// timeout_secs: 60
/// stream_buffer: 8
/// ```
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    /// Per-request timeout for one-shot calls. Streams are not bounded by it.
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub pool_max_idle_per_host: usize,
    pub pool_idle_timeout_secs: u64,
    pub proxy: Option<String>,
    /// Capacity of the channel between a stream's driving task and its consumer
    pub stream_buffer: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout_secs: 30,
            connect_timeout_secs: 10,
            pool_max_idle_per_host: 32,
            pool_idle_timeout_secs: 90,
            proxy: None,
            stream_buffer: DEFAULT_STREAM_BUFFER,
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("pool_max_idle_per_host", &self.pool_max_idle_per_host)
            .field("pool_idle_timeout_secs", &self.pool_idle_timeout_secs)
            .field("proxy", &self.proxy)
            .field("stream_buffer", &self.stream_buffer)
            .finish()
    }
}

impl ClientConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid client config: {}", e),
                ErrorContext::new().with_source("client_config"),
            )
        })
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&raw).map_err(|e| match e {
            Error::Configuration { message, context } => Error::Configuration {
                message: format!("{} ({})", message, path.display()),
                context,
            },
            other => other,
        })
    }

    /// Apply `MISTRAL_*` environment overrides.
    ///
    /// - `MISTRAL_API_KEY`
    /// - `MISTRAL_BASE_URL`
    /// - `MISTRAL_HTTP_TIMEOUT_SECS`
    /// - `MISTRAL_PROXY_URL`
    /// - `MISTRAL_STREAM_BUFFER`
    pub fn apply_env(self) -> Self {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    pub(crate) fn apply_env_with(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = var("MISTRAL_API_KEY") {
            self.api_key = Some(key);
        }
        if let Some(url) = var("MISTRAL_BASE_URL") {
            self.base_url = url;
        }
        if let Some(secs) = var("MISTRAL_HTTP_TIMEOUT_SECS").and_then(|s| s.parse().ok()) {
            self.timeout_secs = secs;
        }
        if let Some(proxy) = var("MISTRAL_PROXY_URL") {
            self.proxy = Some(proxy);
        }
        if let Some(n) = var("MISTRAL_STREAM_BUFFER").and_then(|s| s.parse().ok()) {
            self.stream_buffer = n;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(Error::configuration_with_context(
                "base_url must not be empty",
                ErrorContext::new().with_field("config.base_url"),
            ));
        }
        if self.stream_buffer == 0 {
            return Err(Error::configuration_with_context(
                "stream_buffer must be at least 1",
                ErrorContext::new()
                    .with_field("config.stream_buffer")
                    .with_hint("use 1 for lock-step delivery"),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(Error::configuration_with_context(
                "timeout_secs must be at least 1",
                ErrorContext::new().with_field("config.timeout_secs"),
            ));
        }
        Ok(())
    }
}
