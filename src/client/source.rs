//! Where the client provider gets its manifest from.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::photo::Manifest;

/// Failure kinds a manifest fetch can end in. Each one maps to its own
/// user-facing message in the provider.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("failed to load manifest: {0}")]
    Status(u16),
    #[error("malformed manifest: {0}")]
    Decode(String),
}

#[async_trait]
pub trait ManifestSource: Send + Sync {
    /// Fetch the current manifest. `force_refresh` asks every cache on the
    /// way to be bypassed.
    async fn fetch(&self, force_refresh: bool) -> Result<Manifest, FetchError>;
}

/// Fetches `/api/manifest` from a running portfolio server.
#[derive(Clone, Debug)]
pub struct HttpManifestSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpManifestSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn manifest_url(&self, force_refresh: bool) -> String {
        if force_refresh {
            format!("{}/api/manifest?refresh=true", self.base_url)
        } else {
            format!("{}/api/manifest", self.base_url)
        }
    }
}

#[async_trait]
impl ManifestSource for HttpManifestSource {
    async fn fetch(&self, force_refresh: bool) -> Result<Manifest, FetchError> {
        let cache_control = if force_refresh {
            "no-cache"
        } else {
            "max-age=300"
        };
        let response = self
            .client
            .get(self.manifest_url(force_refresh))
            .header(reqwest::header::ACCEPT, "application/json")
            .header(reqwest::header::CACHE_CONTROL, cache_control)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        response
            .json::<Manifest>()
            .await
            .map_err(|err| FetchError::Decode(err.to_string()))
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Network(err.to_string())
    }
}
