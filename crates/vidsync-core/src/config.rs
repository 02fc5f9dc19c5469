//! Configuration module
//!
//! Registry connection settings, loaded from the environment with sensible
//! defaults. The CLI loads `.env` via dotenvy before calling `from_env`.

use anyhow::{bail, Context, Result};
use std::env;

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;

/// Connection settings for the external video registry.
#[derive(Clone, Debug)]
pub struct RegistryConfig {
    /// Base URL of the registry API, e.g. `https://studio.example.org/api/val/v0`.
    pub base_url: String,
    /// Optional bearer token sent with every request.
    pub token: Option<String>,
    pub timeout_secs: u64,
}

impl RegistryConfig {
    /// Read configuration from `VIDSYNC_REGISTRY_URL`, `VIDSYNC_REGISTRY_TOKEN`,
    /// and `VIDSYNC_HTTP_TIMEOUT_SECS`. Missing values are left for `validate`
    /// to reject, so callers can layer CLI overrides on top first.
    pub fn from_env() -> Result<Self> {
        let base_url = env::var("VIDSYNC_REGISTRY_URL").unwrap_or_default();
        let token = env::var("VIDSYNC_REGISTRY_TOKEN")
            .ok()
            .filter(|t| !t.is_empty());
        let timeout_secs = match env::var("VIDSYNC_HTTP_TIMEOUT_SECS") {
            Ok(value) => value
                .parse()
                .context("Invalid VIDSYNC_HTTP_TIMEOUT_SECS, expected seconds")?,
            Err(_) => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        Ok(Self {
            base_url,
            token,
            timeout_secs,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            bail!("Registry base URL is not set. Set VIDSYNC_REGISTRY_URL or pass --registry-url");
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            bail!("Registry base URL must be http(s): {}", self.base_url);
        }
        if self.timeout_secs == 0 {
            bail!("HTTP timeout must be greater than zero");
        }
        Ok(())
    }
}
