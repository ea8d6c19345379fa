//! Client-side photo state.
//!
//! `PhotoProvider` holds the last manifest the gallery fetched and answers
//! the views the UI needs (all photos, per category, hero banner, category
//! list). Loads go through a TTL cache and a bounded timeout, and at most one
//! fetch runs at a time.
//!
//! State machine: `Idle -> Loading -> Ready | Error`, re-entering `Loading`
//! on every load that is not served from cache.

use std::{
    collections::BTreeSet,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
    time::Duration,
};
use tokio::{sync::Mutex, time::Instant};
use tracing::{debug, warn};

use super::source::{FetchError, ManifestSource};
use crate::{models::photo::Photo, services::manifest_builder::natural_cmp};

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(8);

pub const NO_PHOTOS_MESSAGE: &str = "No photos found. Please upload photos to the bucket.";
pub const TIMEOUT_MESSAGE: &str = "Request timed out. Please check your connection and try again.";
pub const NETWORK_MESSAGE: &str = "Network error. Please check your connection and try again.";
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load photos. Please try refreshing the page.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Ready,
    /// Carries the message shown next to the "Try Again" button.
    Error(String),
}

/// What a call to [`PhotoProvider::load`] ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Served from the in-memory cache, no request made.
    Cached,
    /// Fetched a manifest with photos.
    Fetched,
    /// Fetched successfully but the manifest had no photos.
    Empty,
    /// The fetch failed or timed out.
    Failed,
}

/// User-facing message for a failed fetch.
pub fn error_message(err: &FetchError) -> &'static str {
    match err {
        FetchError::Timeout => TIMEOUT_MESSAGE,
        FetchError::Network(_) => NETWORK_MESSAGE,
        FetchError::Status(_) | FetchError::Decode(_) => LOAD_FAILED_MESSAGE,
    }
}

#[derive(Debug)]
struct Snapshot {
    state: LoadState,
    photos: Vec<Photo>,
    last_fetch: Option<Instant>,
}

pub struct PhotoProvider<S> {
    source: S,
    ttl: Duration,
    timeout: Duration,
    snapshot: RwLock<Snapshot>,
    in_flight: Mutex<()>,
}

impl<S: ManifestSource> PhotoProvider<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            ttl: DEFAULT_CACHE_TTL,
            timeout: DEFAULT_FETCH_TIMEOUT,
            snapshot: RwLock::new(Snapshot {
                state: LoadState::Idle,
                photos: Vec::new(),
                last_fetch: None,
            }),
            in_flight: Mutex::new(()),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load the manifest unless a successful load happened within the TTL.
    ///
    /// `force_refresh` always issues a request. Concurrent callers queue on
    /// the in-flight guard, so a burst of loads costs one request.
    pub async fn load(&self, force_refresh: bool) -> LoadOutcome {
        let _in_flight = self.in_flight.lock().await;

        if !force_refresh && self.is_fresh() {
            debug!("serving photos from cache");
            return LoadOutcome::Cached;
        }

        self.write().state = LoadState::Loading;

        let fetch = self.source.fetch(force_refresh);
        let result = match tokio::time::timeout(self.timeout, fetch).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout),
        };

        let mut snapshot = self.write();
        match result {
            Ok(manifest) if manifest.photos.is_empty() => {
                debug!("manifest contained no photos");
                snapshot.photos.clear();
                snapshot.last_fetch = None;
                snapshot.state = LoadState::Error(NO_PHOTOS_MESSAGE.into());
                LoadOutcome::Empty
            }
            Ok(manifest) => {
                debug!("loaded {} photos", manifest.photos.len());
                snapshot.photos = manifest
                    .photos
                    .into_iter()
                    .map(with_fallback_sources)
                    .collect();
                snapshot.last_fetch = Some(Instant::now());
                snapshot.state = LoadState::Ready;
                LoadOutcome::Fetched
            }
            Err(err) => {
                warn!("error loading photos: {}", err);
                snapshot.photos.clear();
                snapshot.last_fetch = None;
                snapshot.state = LoadState::Error(error_message(&err).into());
                LoadOutcome::Failed
            }
        }
    }

    /// User-triggered reload that bypasses the cache.
    pub async fn refresh(&self) -> LoadOutcome {
        self.load(true).await
    }

    fn is_fresh(&self) -> bool {
        let snapshot = self.read();
        match snapshot.last_fetch {
            Some(at) => !snapshot.photos.is_empty() && at.elapsed() < self.ttl,
            None => false,
        }
    }

    pub fn state(&self) -> LoadState {
        self.read().state.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.read().state == LoadState::Loading
    }

    pub fn error(&self) -> Option<String> {
        match &self.read().state {
            LoadState::Error(message) => Some(message.clone()),
            _ => None,
        }
    }

    /// Every loaded photo, hero banners included.
    pub fn photos(&self) -> Vec<Photo> {
        self.read().photos.clone()
    }

    /// Photos for the main gallery: everything except hero banners.
    pub fn all_photos(&self) -> Vec<Photo> {
        self.filtered(|p| !p.is_hero())
    }

    pub fn hero_photos(&self) -> Vec<Photo> {
        self.filtered(Photo::is_hero)
    }

    pub fn photos_by_category(&self, category: &str) -> Vec<Photo> {
        self.filtered(|p| p.in_category(category))
    }

    /// Distinct non-hero categories, alphabetical ignoring case.
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self
            .read()
            .photos
            .iter()
            .filter(|p| !p.is_hero() && !p.category.is_empty())
            .map(|p| p.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        categories.sort_by(|a, b| natural_cmp(a, b));
        categories
    }

    fn filtered(&self, keep: impl Fn(&Photo) -> bool) -> Vec<Photo> {
        self.read()
            .photos
            .iter()
            .filter(|&p| keep(p))
            .cloned()
            .collect()
    }

    fn read(&self) -> RwLockReadGuard<'_, Snapshot> {
        self.snapshot.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Snapshot> {
        self.snapshot.write().unwrap_or_else(|e| e.into_inner())
    }
}

/// Fill missing responsive variants from `previewSrc`, then `src`.
fn with_fallback_sources(mut photo: Photo) -> Photo {
    let fallback = photo
        .preview_src
        .clone()
        .unwrap_or_else(|| photo.src.clone());
    for slot in [
        &mut photo.mobile_preview_src,
        &mut photo.tablet_preview_src,
        &mut photo.desktop_preview_src,
    ] {
        if slot.is_none() {
            *slot = Some(fallback.clone());
        }
    }
    if photo.folder.is_empty() {
        photo.folder = photo.category.clone();
    }
    photo
}
