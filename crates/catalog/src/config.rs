//! Configuration loading and validation for the catalog service.
//!
//! All values are read from environment variables at startup (a `.env` file in
//! the working directory is honoured). The process exits with a clear error
//! message if any variable is present but invalid.

use anyhow::{Context, Result};
use serde::Deserialize;

/// Deployment flavour of the running process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppEnv {
    /// Error responses carry diagnostic detail for 500s.
    Development,
    #[default]
    Production,
}

impl AppEnv {
    pub fn is_development(self) -> bool {
        self == AppEnv::Development
    }
}

/// Validated catalog service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Port the HTTP server listens on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Shared secret expected in the `x-api-key` header.
    ///
    /// When absent, no request under `/api` can be authenticated.
    #[serde(default)]
    pub api_key: Option<String>,

    /// `development` or `production`.
    #[serde(default)]
    pub app_env: AppEnv,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_port() -> u16 {
    3000
}
fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or fails validation.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    fn validate(&self) -> Result<()> {
        if let Some(key) = &self.api_key {
            if key.trim().is_empty() {
                anyhow::bail!("API_KEY must not be blank when set");
            }
        }
        if self.log_level.trim().is_empty() {
            anyhow::bail!("LOG_LEVEL must not be empty");
        }
        Ok(())
    }
}
