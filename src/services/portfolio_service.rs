//! PortfolioService: the request-facing side of the manifest pipeline.
//!
//! Owns the injected [`PhotoStore`] and the build settings; every call lists
//! the bucket once and recomputes its document. Nothing is cached here:
//! caching is left to HTTP `Cache-Control` and to the client provider.

use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info};

use crate::{
    config::ManifestConfig,
    models::{
        object::ObjectBody,
        photo::{CategoryCount, Manifest, PageMeta, is_hero_category},
    },
    services::{
        manifest_builder::{self, BuildOptions},
        object_store::{PhotoStore, StoreError, StoreResult, ensure_key_safe},
        usage::UsageReport,
    },
};

const DEFAULT_CATEGORY_PHRASE: &str = "Landscapes, Portraits";
const DEFAULT_FEATURE_PHRASE: &str = "stunning landscapes, portraits, and street photography";

#[derive(Clone)]
pub struct PortfolioService {
    store: Arc<dyn PhotoStore>,
    build: BuildOptions,
    max_keys: usize,
    cache_max_age: u64,
    storage_limit_bytes: u64,
    brand: String,
}

impl PortfolioService {
    pub fn new(
        store: Arc<dyn PhotoStore>,
        bucket_name: impl Into<String>,
        public_url: impl Into<String>,
        cfg: &ManifestConfig,
    ) -> Self {
        Self {
            store,
            build: BuildOptions::new(bucket_name, public_url).with_photo_limit(cfg.photo_limit),
            max_keys: cfg.max_keys,
            cache_max_age: cfg.cache_max_age,
            storage_limit_bytes: cfg.storage_limit_bytes,
            brand: cfg.brand.clone(),
        }
    }

    /// `Cache-Control` value for generated documents.
    ///
    /// A forced refresh must bypass every intermediate cache.
    pub fn cache_control(&self, force_refresh: bool) -> String {
        if force_refresh {
            "no-cache, no-store, must-revalidate".to_string()
        } else {
            format!("public, max-age={}", self.cache_max_age)
        }
    }

    /// List the bucket and return the raw keys.
    async fn list_keys(&self) -> StoreResult<Vec<String>> {
        let objects = self.store.list_objects(self.max_keys).await.map_err(|err| {
            error!("error scanning photo bucket: {}", err);
            err
        })?;
        Ok(objects.into_iter().map(|obj| obj.key).collect())
    }

    /// Generate a fresh manifest from the current bucket listing.
    ///
    /// An empty bucket yields an empty manifest; a failing listing is an
    /// error, never an empty result.
    pub async fn generate_manifest(&self) -> StoreResult<Manifest> {
        let keys = self.list_keys().await?;
        let manifest =
            manifest_builder::build_manifest(&keys, &self.build, Utc::now(), &mut rand::rng());

        if manifest.is_empty() {
            info!("no photos found in bucket {}", self.build.bucket_name);
        } else {
            info!(
                "generated manifest with {} photos and {} categories",
                manifest.total_photos,
                manifest.categories.len()
            );
        }
        Ok(manifest)
    }

    /// SEO metadata derived from the current listing.
    pub async fn page_meta(&self) -> StoreResult<PageMeta> {
        let keys = self.list_keys().await?;
        let selected = manifest_builder::select_image_keys(&keys, &self.build);
        Ok(build_page_meta(&selected, &self.brand))
    }

    /// Fetch one object for the photo proxy.
    pub async fn fetch_photo(&self, key: &str) -> StoreResult<ObjectBody> {
        ensure_key_safe(key)?;
        self.store.get_object(key).await.map_err(|err| {
            if !matches!(err, StoreError::NotFound(_)) {
                error!("error fetching photo {}: {}", key, err);
            }
            err
        })
    }

    /// Sum sizes over one listing page, every object counted, and log the
    /// result.
    pub async fn usage_report(&self) -> StoreResult<UsageReport> {
        let objects = self.store.list_objects(self.max_keys).await.map_err(|err| {
            error!("error checking bucket usage: {}", err);
            err
        })?;
        let report = UsageReport::from_objects(&objects, self.storage_limit_bytes);
        report.log();
        Ok(report)
    }

    /// Cheap reachability probe used by the readiness check.
    pub async fn probe_store(&self) -> StoreResult<()> {
        self.store.list_objects(1).await.map(|_| ())
    }
}

/// Render title, description and keywords for a set of image paths.
pub fn build_page_meta(image_paths: &[String], brand: &str) -> PageMeta {
    let mut counts: Vec<CategoryCount> = Vec::new();
    for path in image_paths {
        let category = manifest_builder::category_of(path);
        if is_hero_category(category) {
            continue;
        }
        match counts.iter_mut().find(|c| c.name == category) {
            Some(entry) => entry.count += 1,
            None => counts.push(CategoryCount {
                name: category.to_string(),
                count: 1,
            }),
        }
    }
    counts.sort_by(|a, b| manifest_builder::natural_cmp(&a.name, &b.name));

    let categories: Vec<String> = counts.iter().map(|c| c.name.clone()).collect();
    let category_list = categories.join(", ");
    let total_photos = image_paths.len();

    let title = format!(
        "Professional Photography Portfolio | {} | {}",
        if categories.is_empty() {
            DEFAULT_CATEGORY_PHRASE
        } else {
            category_list.as_str()
        },
        brand
    );
    let description = format!(
        "Professional photography portfolio featuring {}. {}+ high-quality photos.",
        if categories.is_empty() {
            DEFAULT_FEATURE_PHRASE
        } else {
            category_list.as_str()
        },
        total_photos
    );
    let mut keywords = vec![
        "photography".to_string(),
        "photography portfolio".to_string(),
    ];
    keywords.extend(categories.iter().map(|c| format!("{c} photography")));
    keywords.push(brand.to_string());
    keywords.push("professional photographer".to_string());

    PageMeta {
        title,
        description,
        keywords: keywords.join(", "),
        categories,
        total_photos,
        category_counts: counts,
        generated: Utc::now(),
    }
}
