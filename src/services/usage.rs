//! Bucket storage usage, summed from a listing.
//!
//! Reports total bytes and object count against a storage allowance and
//! warns once usage passes [`ALERT_RATIO`] of it.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::models::object::ObjectSummary;

/// R2 free-tier storage allowance.
pub const DEFAULT_STORAGE_LIMIT_BYTES: u64 = 10 * 1024 * 1024 * 1024;

/// Fraction of the allowance past which usage is reported as a warning.
pub const ALERT_RATIO: f64 = 0.8;

/// Object count at which the bucket is flagged as crowded.
pub const OBJECT_COUNT_WARNING: usize = 1000;

const MIB: f64 = 1024.0 * 1024.0;

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UsageReport {
    pub total_bytes: u64,
    pub total_objects: usize,
    /// `0` means no allowance is enforced.
    pub storage_limit_bytes: u64,
    /// Most recent modification time reported by the listing.
    pub last_upload: Option<DateTime<Utc>>,
}

impl UsageReport {
    pub fn from_objects(objects: &[ObjectSummary], storage_limit_bytes: u64) -> Self {
        Self {
            total_bytes: objects.iter().map(|o| o.size).sum(),
            total_objects: objects.len(),
            storage_limit_bytes,
            last_upload: objects.iter().filter_map(|o| o.last_modified).max(),
        }
    }

    /// Share of the allowance in use, `0.0` without an allowance.
    pub fn storage_ratio(&self) -> f64 {
        if self.storage_limit_bytes == 0 {
            0.0
        } else {
            self.total_bytes as f64 / self.storage_limit_bytes as f64
        }
    }

    pub fn near_storage_limit(&self) -> bool {
        self.storage_ratio() > ALERT_RATIO
    }

    pub fn many_objects(&self) -> bool {
        self.total_objects >= OBJECT_COUNT_WARNING
    }

    /// Emit the report through `tracing`, at `warn` for anything past a
    /// threshold.
    pub fn log(&self) {
        info!(
            "bucket usage: {:.2} MiB in {} objects ({:.2}% of allowance)",
            self.total_bytes as f64 / MIB,
            self.total_objects,
            self.storage_ratio() * 100.0
        );
        if self.near_storage_limit() {
            warn!(
                "storage usage at {:.2}% of {:.2} GiB allowance; consider cleaning up or upgrading",
                self.storage_ratio() * 100.0,
                self.storage_limit_bytes as f64 / (MIB * 1024.0)
            );
        }
        if self.many_objects() {
            warn!(
                "bucket holds {} or more objects; listings are truncated at one page",
                self.total_objects
            );
        }
    }
}
