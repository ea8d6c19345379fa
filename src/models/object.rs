//! Represents objects as seen through the photo bucket listing.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};

use crate::services::object_store::StoreError;

/// A single entry returned by a bucket listing.
///
/// The key drives manifest generation; size and modification time feed the
/// usage report.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ObjectSummary {
    /// Object key (path-like identifier within the bucket).
    pub key: String,

    /// Size in bytes.
    pub size: u64,

    /// Timestamp when the object was last modified, if the store reported one.
    pub last_modified: Option<DateTime<Utc>>,
}

impl ObjectSummary {
    pub fn new(key: impl Into<String>, size: u64) -> Self {
        Self {
            key: key.into(),
            size,
            last_modified: None,
        }
    }
}

/// Body stream of a fetched object.
pub type ObjectStream = BoxStream<'static, Result<Bytes, StoreError>>;

/// An object fetched for proxying back to a client.
pub struct ObjectBody {
    /// Content type recorded by the store, if any.
    pub content_type: Option<String>,

    /// Length in bytes when known up front.
    pub content_length: Option<u64>,

    /// The object payload.
    pub stream: ObjectStream,
}

impl std::fmt::Debug for ObjectBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectBody")
            .field("content_type", &self.content_type)
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}
