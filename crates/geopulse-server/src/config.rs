//! Environment-driven server configuration.
//!
//! All settings are read once at startup and passed explicitly to the
//! components that need them; no client is initialized from globals.

use anyhow::{Context, Result};
use std::time::Duration;

use geopulse_geo::LlmResolverConfig;

const DEFAULT_BIND: &str = "127.0.0.1:8000";
const DEFAULT_RESOLVER_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to.
    pub bind: String,
    /// OpenAI API key for the LLM geocoding resolver.
    pub api_key: String,
    /// Chat model used for geocoding; `None` keeps the resolver default.
    pub model: Option<String>,
    /// Override for the OpenAI base URL (testing, proxies).
    pub base_url: Option<String>,
    /// Timeout for a single resolver call.
    pub resolver_timeout: Duration,
}

impl ServerConfig {
    /// Read configuration from the environment.
    ///
    /// # Errors
    ///
    /// Fails if `OPENAI_API_KEY` is missing or empty.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .context("OPENAI_API_KEY must be set")?;

        let timeout_secs = match std::env::var("GEOPULSE_RESOLVER_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .context("GEOPULSE_RESOLVER_TIMEOUT_SECS must be an integer")?,
            Err(_) => DEFAULT_RESOLVER_TIMEOUT_SECS,
        };

        Ok(Self {
            bind: std::env::var("GEOPULSE_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string()),
            api_key,
            model: std::env::var("GEOPULSE_MODEL").ok(),
            base_url: std::env::var("GEOPULSE_OPENAI_URL").ok(),
            resolver_timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Resolver configuration derived from the server settings.
    pub fn resolver_config(&self) -> LlmResolverConfig {
        let mut config = LlmResolverConfig::new(self.api_key.clone());
        config.timeout = self.resolver_timeout;
        if let Some(model) = &self.model {
            config = config.with_model(model.clone());
        }
        if let Some(base_url) = &self.base_url {
            config = config.with_base_url(base_url.clone());
        }
        config
    }
}
