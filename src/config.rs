use anyhow::{Context, Result};
use clap::Parser;
use std::{env, str::FromStr};

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub bucket: String,
    pub storage_dir: String,
    pub database_url: String,
    pub key_prefix: String,
    pub link_prefix: String,
    pub max_list_keys: usize,
    pub listing_max_age: u64,
    pub object_max_age: u64,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug)]
#[command(author, version, about = "Read-only HTTP file browser over an object store bucket")]
pub struct Args {
    /// Host to bind to (overrides BUCKET_BROWSER_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Bucket to expose (overrides BUCKET_BROWSER_BUCKET)
    #[arg(long)]
    pub bucket: Option<String>,

    /// Directory holding object payloads (overrides BUCKET_BROWSER_STORAGE_DIR)
    #[arg(long)]
    pub storage_dir: Option<String>,

    /// Catalog database URL (overrides BUCKET_BROWSER_DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Key prefix that URL paths are resolved under (overrides BUCKET_BROWSER_KEY_PREFIX)
    #[arg(long)]
    pub key_prefix: Option<String>,

    /// URL prefix of file links, empty to disable (overrides BUCKET_BROWSER_LINK_PREFIX)
    #[arg(long)]
    pub link_prefix: Option<String>,

    /// Most keys one listing may enumerate (overrides BUCKET_BROWSER_MAX_LIST_KEYS)
    #[arg(long)]
    pub max_list_keys: Option<usize>,

    /// Cache max-age of listings in seconds (overrides BUCKET_BROWSER_LISTING_MAX_AGE)
    #[arg(long)]
    pub listing_max_age: Option<u64>,

    /// Cache max-age of objects in seconds (overrides BUCKET_BROWSER_OBJECT_MAX_AGE)
    #[arg(long)]
    pub object_max_age: Option<u64>,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig.
    pub fn from_env_and_args() -> Result<Self> {
        Self::merge(Args::parse())
    }

    fn merge(args: Args) -> Result<Self> {
        // --- Environment fallback ---
        let env_host = env::var("BUCKET_BROWSER_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let env_port = env_parse("PORT", 8080)?;
        let env_bucket =
            env::var("BUCKET_BROWSER_BUCKET").unwrap_or_else(|_| "versatiles".into());
        let env_storage =
            env::var("BUCKET_BROWSER_STORAGE_DIR").unwrap_or_else(|_| "./data/objects".into());
        let env_db = env::var("BUCKET_BROWSER_DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://./data/meta/object_store.db".into());
        let env_key_prefix =
            env::var("BUCKET_BROWSER_KEY_PREFIX").unwrap_or_else(|_| "download/".into());
        let env_link_prefix =
            env::var("BUCKET_BROWSER_LINK_PREFIX").unwrap_or_else(|_| "/download".into());
        let env_max_keys = env_parse("BUCKET_BROWSER_MAX_LIST_KEYS", 10_000)?;
        let env_listing_age = env_parse("BUCKET_BROWSER_LISTING_MAX_AGE", 3600)?;
        let env_object_age = env_parse("BUCKET_BROWSER_OBJECT_MAX_AGE", 7 * 24 * 3600)?;

        // --- Merge ---
        let cfg = Self {
            host: args.host.unwrap_or(env_host),
            port: args.port.unwrap_or(env_port),
            bucket: args.bucket.unwrap_or(env_bucket),
            storage_dir: args.storage_dir.unwrap_or(env_storage),
            database_url: args.database_url.unwrap_or(env_db),
            key_prefix: args.key_prefix.unwrap_or(env_key_prefix),
            link_prefix: normalize_link_prefix(&args.link_prefix.unwrap_or(env_link_prefix)),
            max_list_keys: args.max_list_keys.unwrap_or(env_max_keys),
            listing_max_age: args.listing_max_age.unwrap_or(env_listing_age),
            object_max_age: args.object_max_age.unwrap_or(env_object_age),
        };

        if cfg.max_list_keys == 0 {
            anyhow::bail!("max list keys must be at least 1");
        }

        Ok(cfg)
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Read and parse `name`, falling back to `default` when it is unset.
fn env_parse<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .with_context(|| format!("parsing {} value `{}`", name, value)),
        Err(env::VarError::NotPresent) => Ok(default),
        Err(err) => Err(err).with_context(|| format!("reading {}", name)),
    }
}

/// `download/` and `/download` both become `/download`; `/` and the empty
/// string disable the prefix.
fn normalize_link_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}
