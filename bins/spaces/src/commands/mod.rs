//! Command implementations

pub mod geo;
pub mod health;
pub mod nearby;
pub mod spaces;

use crate::OutputFormat;
use spaces_api_client::{ClientConfig, SpacesClient};
use spaces_core::config::Config;
use std::path::Path;
use tracing::debug;

/// Shared state for every command
pub struct Context {
    pub config: Config,
    pub format: OutputFormat,
    api_url: Option<String>,
}

impl Context {
    pub fn load(
        path: Option<&Path>,
        format: OutputFormat,
        api_url: Option<String>,
    ) -> spaces_core::Result<Self> {
        let config = Config::load(path)?;
        match &config.path {
            Some(p) => debug!(path = %p.display(), "loaded configuration"),
            None => debug!("using default configuration"),
        }
        Ok(Self {
            config,
            format,
            api_url,
        })
    }

    pub fn json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Client for the configured API.
    ///
    /// The base URL comes from `--api-url`/`SPACES_API_URL`, then `[api]`.
    /// Token, environment and retry policy come from the environment.
    pub fn client(&self) -> anyhow::Result<SpacesClient> {
        let api = &self.config.schema.api;
        let from_env = ClientConfig::from_env()?;
        let mut config = ClientConfig::from_schema(api)
            .with_base_url(self.api_url.clone().unwrap_or_else(|| api.base_url.clone()))
            .with_retry(from_env.retry);
        config.environment = from_env.environment;
        if let Some(token) = from_env.id_token {
            config = config.with_id_token(token);
        }
        if std::env::var_os("SPACES_TIMEOUT_SECS").is_some() {
            config = config.with_timeout(from_env.timeout);
        }
        Ok(SpacesClient::with_config(config)?)
    }
}
