use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::{env, fmt, path::PathBuf};

use crate::services::{manifest_builder::DEFAULT_PHOTO_LIMIT, usage::DEFAULT_STORAGE_LIMIT_BYTES};

/// Listing page size requested from the bucket.
pub const DEFAULT_MAX_KEYS: usize = 1000;

/// Default `max-age` of cached manifest responses, in seconds.
pub const DEFAULT_CACHE_MAX_AGE: u64 = 300;

pub const DEFAULT_BRAND: &str = "Photography Portfolio";

/// Where `generate` writes the manifest for static hosting.
pub const DEFAULT_MANIFEST_PATH: &str = "public/photos/manifest.json";

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub command: Command,
    pub host: String,
    pub port: u16,
    pub store: StoreConfig,
    pub manifest: ManifestConfig,
}

/// Credentials and addressing for the photo bucket.
#[derive(Clone)]
pub struct StoreConfig {
    pub account_id: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub bucket_name: String,
    /// Public origin photos are served from, e.g. `https://photos.example.com`.
    pub public_url: String,
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("account_id", &self.account_id)
            .field("access_key_id", &"<redacted>")
            .field("secret_access_key", &"<redacted>")
            .field("bucket_name", &self.bucket_name)
            .field("public_url", &self.public_url)
            .finish()
    }
}

/// Knobs for manifest generation, caching and usage reporting.
#[derive(Debug, Clone)]
pub struct ManifestConfig {
    pub max_keys: usize,
    pub photo_limit: usize,
    pub cache_max_age: u64,
    pub storage_limit_bytes: u64,
    /// Site name appended to generated page titles and keywords.
    pub brand: String,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            max_keys: DEFAULT_MAX_KEYS,
            photo_limit: DEFAULT_PHOTO_LIMIT,
            cache_max_age: DEFAULT_CACHE_MAX_AGE,
            storage_limit_bytes: DEFAULT_STORAGE_LIMIT_BYTES,
            brand: DEFAULT_BRAND.into(),
        }
    }
}

/// Command-line + environment configuration.
#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Photo portfolio manifest API")]
pub struct Args {
    /// Host to bind to (overrides PORTFOLIO_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides PORTFOLIO_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Bucket holding the photos (overrides R2_BUCKET_NAME)
    #[arg(long)]
    pub bucket: Option<String>,

    /// Public base URL photos are served from (overrides R2_BUCKET_URL)
    #[arg(long)]
    pub public_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// What the binary does once configured. Defaults to `serve`.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq, Default)]
pub enum Command {
    /// Run the HTTP API
    #[default]
    Serve,
    /// List the bucket once and write the manifest to disk
    Generate {
        /// Output file
        #[arg(short, long, value_name = "FILE", default_value = DEFAULT_MANIFEST_PATH)]
        out: PathBuf,
    },
    /// Report bucket storage usage, warning near the allowance
    Usage,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig.
    pub fn from_env_and_args() -> Result<Self> {
        let args = Args::parse();
        Self::from_lookup(args, |name| env::var(name).ok())
    }

    /// Build the config from parsed args and a variable lookup.
    ///
    /// Store credentials have no defaults: a missing one is an error naming
    /// the variable.
    pub fn from_lookup<F>(args: Args, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let required = |name: &str| {
            var(name).with_context(|| format!("missing required environment variable {name}"))
        };

        let env_host = var("PORTFOLIO_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let env_port = parse_var(&var, "PORTFOLIO_PORT", 3000u16)?;

        let bucket_name = match args.bucket {
            Some(bucket) => bucket,
            None => required("R2_BUCKET_NAME")?,
        };

        let public_url = match args
            .public_url
            .or_else(|| var("R2_BUCKET_URL"))
            .or_else(|| var("CURRENT_DOMAIN").map(|domain| format!("https://photos.{domain}")))
        {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => bail!("missing required environment variable R2_BUCKET_URL or CURRENT_DOMAIN"),
        };

        let store = StoreConfig {
            account_id: required("R2_ACCOUNT_ID")?,
            access_key_id: required("R2_ACCESS_KEY_ID")?,
            secret_access_key: required("R2_SECRET_ACCESS_KEY")?,
            bucket_name,
            public_url,
        };

        let manifest = ManifestConfig {
            max_keys: parse_var(&var, "PORTFOLIO_MAX_KEYS", DEFAULT_MAX_KEYS)?.clamp(1, 1000),
            photo_limit: parse_var(&var, "PORTFOLIO_PHOTO_LIMIT", DEFAULT_PHOTO_LIMIT)?,
            cache_max_age: parse_var(&var, "PORTFOLIO_CACHE_MAX_AGE", DEFAULT_CACHE_MAX_AGE)?,
            storage_limit_bytes: parse_var(
                &var,
                "PORTFOLIO_STORAGE_LIMIT_BYTES",
                DEFAULT_STORAGE_LIMIT_BYTES,
            )?,
            brand: var("PORTFOLIO_BRAND").unwrap_or_else(|| DEFAULT_BRAND.into()),
        };

        Ok(Self {
            command: args.command.unwrap_or_default(),
            host: args.host.unwrap_or(env_host),
            port: args.port.unwrap_or(env_port),
            store,
            manifest,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<F, T>(var: &F, name: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match var(name) {
        Some(value) => value
            .trim()
            .parse::<T>()
            .with_context(|| format!("parsing {name} value `{value}`")),
        None => Ok(default),
    }
}
