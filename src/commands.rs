//! One-shot commands run instead of the server.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{info, warn};

use crate::{
    models::photo::Manifest,
    services::{portfolio_service::PortfolioService, usage::UsageReport},
};

/// List the bucket and write the manifest as pretty JSON to `out`, creating
/// parent directories as needed.
///
/// An empty bucket writes nothing and returns `None`, leaving any previous
/// file in place.
pub async fn generate_manifest_file(
    service: &PortfolioService,
    out: &Path,
) -> Result<Option<Manifest>> {
    let manifest = service
        .generate_manifest()
        .await
        .context("listing photo bucket")?;

    if manifest.is_empty() {
        warn!("no images found in bucket; {} left untouched", out.display());
        return Ok(None);
    }

    let json = serde_json::to_vec_pretty(&manifest).context("serializing manifest")?;
    if let Some(dir) = out.parent().filter(|d| !d.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("creating {}", dir.display()))?;
    }
    tokio::fs::write(out, json)
        .await
        .with_context(|| format!("writing {}", out.display()))?;

    info!(
        "manifest with {} photos written to {} (categories: {})",
        manifest.total_photos,
        out.display(),
        manifest.categories.join(", ")
    );
    Ok(Some(manifest))
}

/// Compute and log bucket usage.
pub async fn report_usage(service: &PortfolioService) -> Result<UsageReport> {
    service
        .usage_report()
        .await
        .context("listing bucket for usage")
}
