//! Object store collaborator.
//!
//! The portfolio never owns image bytes: it lists keys in a bucket and, for
//! the proxy route, reads one object back. `PhotoStore` is the seam; the
//! production implementation talks to an R2 bucket over the S3 API.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::{StreamExt, stream};
use s3::{Bucket, Region, creds::Credentials, error::S3Error};
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

use crate::{
    config::StoreConfig,
    models::object::{ObjectBody, ObjectSummary},
};

const MAX_OBJECT_KEY_LEN: usize = 1024;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("object `{0}` not found")]
    NotFound(String),
    #[error("invalid object key")]
    InvalidKey,
    #[error("store credentials rejected: {0}")]
    Credentials(String),
    #[error("store returned status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("store request failed: {0}")]
    Upstream(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Read-only view of the photo bucket.
#[async_trait]
pub trait PhotoStore: Send + Sync {
    /// List up to `max_keys` objects from the bucket root.
    async fn list_objects(&self, max_keys: usize) -> StoreResult<Vec<ObjectSummary>>;

    /// Fetch a single object by key.
    async fn get_object(&self, key: &str) -> StoreResult<ObjectBody>;
}

/// Reject keys that could escape the bucket or confuse the store.
///
/// Empty keys, keys starting with `/`, keys containing `..`, control bytes or
/// backslashes, and keys over 1024 bytes are refused.
pub fn ensure_key_safe(key: &str) -> StoreResult<()> {
    if key.is_empty() || key.len() > MAX_OBJECT_KEY_LEN {
        return Err(StoreError::InvalidKey);
    }
    if key.starts_with('/') || key.contains("..") {
        return Err(StoreError::InvalidKey);
    }
    if key.bytes().any(|b| b.is_ascii_control() || b == b'\\') {
        return Err(StoreError::InvalidKey);
    }
    Ok(())
}

/// Cloudflare R2 bucket accessed through the S3 API.
pub struct R2Store {
    bucket: Box<Bucket>,
}

impl R2Store {
    /// Build the bucket handle from configuration.
    ///
    /// No network I/O happens here; bad credentials only surface on the first
    /// request.
    pub fn new(cfg: &StoreConfig) -> StoreResult<Self> {
        let credentials = Credentials::new(
            Some(&cfg.access_key_id),
            Some(&cfg.secret_access_key),
            None,
            None,
            None,
        )
        .map_err(|err| StoreError::Credentials(err.to_string()))?;

        let region = Region::R2 {
            account_id: cfg.account_id.clone(),
        };

        let bucket = Bucket::new(&cfg.bucket_name, region, credentials)
            .map_err(map_s3_error)?
            .with_path_style();

        Ok(Self { bucket })
    }
}

#[async_trait]
impl PhotoStore for R2Store {
    async fn list_objects(&self, max_keys: usize) -> StoreResult<Vec<ObjectSummary>> {
        let (page, status) = self
            .bucket
            .list_page(String::new(), None, None, None, Some(max_keys))
            .await
            .map_err(map_s3_error)?;

        if !(200..300).contains(&status) {
            return Err(StoreError::Status {
                status,
                message: "list objects failed".into(),
            });
        }

        debug!("listed {} objects from {}", page.contents.len(), page.name);

        Ok(page
            .contents
            .into_iter()
            .map(|obj| ObjectSummary {
                last_modified: DateTime::parse_from_rfc3339(&obj.last_modified)
                    .ok()
                    .map(|ts| ts.with_timezone(&Utc)),
                key: obj.key,
                size: obj.size,
            })
            .collect())
    }

    async fn get_object(&self, key: &str) -> StoreResult<ObjectBody> {
        ensure_key_safe(key)?;

        let response = self.bucket.get_object(key).await.map_err(|err| match err {
            S3Error::HttpFailWithBody(404, _) => StoreError::NotFound(key.to_string()),
            other => map_s3_error(other),
        })?;

        match response.status_code() {
            200..=299 => {}
            404 => return Err(StoreError::NotFound(key.to_string())),
            status => {
                return Err(StoreError::Status {
                    status,
                    message: format!("get object `{key}` failed"),
                });
            }
        }

        let headers: HashMap<String, String> = response.headers();
        let content_type = header_value(&headers, "content-type");
        let bytes = response.bytes().clone();
        let content_length = Some(bytes.len() as u64);

        Ok(ObjectBody {
            content_type,
            content_length,
            stream: stream::once(async move { Ok(bytes) }).boxed(),
        })
    }
}

fn header_value(headers: &HashMap<String, String>, name: &str) -> Option<String> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.clone())
}

fn map_s3_error(err: S3Error) -> StoreError {
    match err {
        S3Error::HttpFailWithBody(status, body) => StoreError::Status {
            status,
            message: body,
        },
        other => StoreError::Upstream(other.to_string()),
    }
}
