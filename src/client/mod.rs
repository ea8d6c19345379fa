//! Client side of the portfolio: fetching and caching the manifest, and the
//! UI state the gallery pages are driven by.

pub mod gallery;
pub mod provider;
pub mod responsive;
pub mod source;

pub use provider::{LoadOutcome, LoadState, PhotoProvider};
pub use source::{FetchError, HttpManifestSource, ManifestSource};
