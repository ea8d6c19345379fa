//! Wire types for the photo manifest and the documents derived from it.
//!
//! Field names are camelCase on the wire (`totalPhotos`, `previewSrc`, ...)
//! because the gallery front end consumes them directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Folder reserved for rotating banner images.
pub const HERO_CATEGORY: &str = "hero";

/// Category assigned to keys that sit at the bucket root.
pub const UNCATEGORIZED: &str = "uncategorized";

/// Whether `category` is the reserved hero folder.
///
/// Only the two spellings the bucket has ever used are recognised.
pub fn is_hero_category(category: &str) -> bool {
    category == HERO_CATEGORY || category == "Hero"
}

/// A photo derived from one object key.
///
/// Nothing here is persisted: every field is recomputed whenever a manifest
/// is generated.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    /// `{category}-{filename without extension}`.
    pub id: String,

    /// Full-resolution URL.
    pub src: String,

    /// Small grid preview.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_src: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile_preview_src: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tablet_preview_src: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desktop_preview_src: Option<String>,

    /// Humanized filename.
    pub alt: String,

    /// First path segment of the key, or `uncategorized`.
    pub category: String,

    /// Same value as `category`; kept for older front-end builds.
    #[serde(default)]
    pub folder: String,

    /// Basename of the key.
    pub filename: String,

    /// Placeholder: the time the manifest was generated, not a real upload time.
    #[serde(default)]
    pub uploaded_at: Option<DateTime<Utc>>,

    /// Placeholder: a synthetic display count, not a persisted counter.
    #[serde(default)]
    pub views: u32,
}

impl Photo {
    pub fn is_hero(&self) -> bool {
        is_hero_category(&self.category)
    }

    /// Whether this photo belongs to `category`, checking both the category
    /// and the folder field.
    pub fn in_category(&self, category: &str) -> bool {
        self.category == category || self.folder == category
    }
}

/// Photo count for a single category.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct CategoryCount {
    pub name: String,
    pub count: usize,
}

/// Summary block attached to a generated manifest.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ManifestMeta {
    /// Categories joined with `", "`.
    pub categories: String,
    pub total_categories: usize,
    pub total_photos: usize,
    pub category_counts: Vec<CategoryCount>,
}

/// The computed document describing every listed photo.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub generated: DateTime<Utc>,
    pub total_photos: usize,
    /// Distinct non-hero categories in alphabetical order.
    pub categories: Vec<String>,
    pub photos: Vec<Photo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ManifestMeta>,
}

impl Manifest {
    /// A manifest with no photos, stamped at `generated`.
    pub fn empty(generated: DateTime<Utc>) -> Self {
        Self {
            generated,
            total_photos: 0,
            categories: Vec::new(),
            photos: Vec::new(),
            meta: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }
}

/// SEO metadata served by `/api/meta`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub title: String,
    pub description: String,
    pub keywords: String,
    pub categories: Vec<String>,
    pub total_photos: usize,
    pub category_counts: Vec<CategoryCount>,
    pub generated: DateTime<Utc>,
}

/// Response body of `POST /api/update-manifest`.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UpdateManifestResponse {
    pub message: String,
    pub manifest: Manifest,
    pub photos_found: usize,
    /// Number of categories, not their names.
    pub categories: usize,
}
