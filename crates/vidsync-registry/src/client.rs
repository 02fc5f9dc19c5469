//! HTTP client for the external video registry.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use vidsync_core::models::CanonicalVideoRecord;
use vidsync_core::RegistryConfig;

use crate::{RegistryApi, RegistryError, RegistryResult};

/// One page of the paginated video listing.
#[derive(Debug, Deserialize)]
struct VideoPage {
    results: Vec<CanonicalVideoRecord>,
    next: Option<String>,
}

/// Reqwest-backed `RegistryApi` implementation with optional bearer auth.
#[derive(Clone, Debug)]
pub struct RegistryClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl RegistryClient {
    pub fn new(config: RegistryConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token,
        })
    }

    /// Create a client from VIDSYNC_REGISTRY_URL / VIDSYNC_REGISTRY_TOKEN.
    pub fn from_env() -> Result<Self> {
        Self::new(RegistryConfig::from_env()?)
    }

    fn request(&self, url: &str) -> RequestBuilder {
        let builder = self.client.get(url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

#[async_trait]
impl RegistryApi for RegistryClient {
    async fn list_course_videos(
        &self,
        course_id: &str,
    ) -> RegistryResult<Vec<CanonicalVideoRecord>> {
        let url = format!("{}/videos/", self.base_url);
        tracing::debug!(course_id, url = %url, "fetching registry records");
        let mut response = self
            .request(&url)
            .query(&[("course", course_id)])
            .send()
            .await?;

        let mut records = Vec::new();
        let mut pages = 0usize;
        loop {
            let status = response.status();
            if status == StatusCode::FORBIDDEN {
                tracing::error!(course_id, "permission denied by the registry");
                return Err(RegistryError::PermissionDenied);
            }
            if !status.is_success() {
                tracing::error!(course_id, status = status.as_u16(), "registry unavailable");
                return Err(RegistryError::Unavailable {
                    status: status.as_u16(),
                });
            }

            let page: VideoPage = response
                .json()
                .await
                .map_err(|err| RegistryError::InvalidResponse(err.to_string()))?;
            records.extend(page.results);
            pages += 1;

            match page.next {
                Some(next) => response = self.request(&next).send().await?,
                None => break,
            }
        }

        tracing::info!(
            course_id,
            pages,
            records = records.len(),
            "fetched registry records"
        );
        Ok(records)
    }

    async fn get_video(&self, canonical_id: &str) -> RegistryResult<CanonicalVideoRecord> {
        let url = format!("{}/videos/{}", self.base_url, canonical_id);
        tracing::debug!(canonical_id, "looking up registry record");
        let response = self.request(&url).send().await?;

        match response.status() {
            status if status.is_success() => response
                .json()
                .await
                .map_err(|err| RegistryError::InvalidResponse(err.to_string())),
            StatusCode::FORBIDDEN => Err(RegistryError::PermissionDenied),
            StatusCode::NOT_FOUND => Err(RegistryError::RecordNotFound(canonical_id.to_string())),
            status => Err(RegistryError::LookupFailed {
                status: status.as_u16(),
            }),
        }
    }
}
