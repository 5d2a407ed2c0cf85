use super::config::ClientConfig;
use super::core::MistralClient;
use crate::transport::{HttpTransport, Transport};
use crate::Result;
use std::path::PathBuf;
use std::sync::Arc;

/// Builder for [`MistralClient`].
///
/// Settings resolve in order, later wins: base [`ClientConfig`] (or defaults),
/// YAML file, `MISTRAL_*` environment, then the explicit setters below.
pub struct MistralClientBuilder {
    config: Option<ClientConfig>,
    config_file: Option<PathBuf>,
    read_env: bool,
    api_key: Option<String>,
    base_url: Option<String>,
    timeout_secs: Option<u64>,
    stream_buffer: Option<usize>,
    transport: Option<Arc<dyn Transport>>,
}

impl MistralClientBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            config_file: None,
            read_env: true,
            api_key: None,
            base_url: None,
            timeout_secs: None,
            stream_buffer: None,
            transport: None,
        }
    }

    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Load settings from a YAML file at build time.
    pub fn config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Skip `MISTRAL_*` environment overrides.
    pub fn ignore_env(mut self) -> Self {
        self.read_env = false;
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Override the API base URL (mock servers, proxies, self-hosted gateways).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    pub fn stream_buffer(mut self, capacity: usize) -> Self {
        self.stream_buffer = Some(capacity);
        self
    }

    /// Use a custom transport instead of the reqwest one built from config.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn build(self) -> Result<MistralClient> {
        let mut config = match self.config_file {
            Some(path) => ClientConfig::from_yaml_file(path)?,
            None => self.config.unwrap_or_default(),
        };
        if self.read_env {
            config = config.apply_env();
        }
        if let Some(key) = self.api_key {
            config.api_key = Some(key);
        }
        if let Some(url) = self.base_url {
            config.base_url = url;
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout_secs = secs;
        }
        if let Some(n) = self.stream_buffer {
            config.stream_buffer = n;
        }
        config.validate()?;

        let transport: Arc<dyn Transport> = match self.transport {
            Some(t) => t,
            None => Arc::new(HttpTransport::new(&config)?),
        };

        Ok(MistralClient {
            transport,
            api_key: config.api_key,
            stream_buffer: config.stream_buffer,
        })
    }
}

impl Default for MistralClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
