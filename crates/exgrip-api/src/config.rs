use anyhow::{Context, Result};
use confyg::{env, Confygery};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use exgrip_search::{FetchOptions, RankerOptions};

/// Configuration for the exgrip services.
///
/// Configuration is loaded from multiple sources with the following priority:
/// 1. CLI arguments (highest priority)
/// 2. Environment variables (EXGRIP_* prefix)
/// 3. Config file (~/.config/exgrip/config.toml)
/// 4. Built-in defaults (lowest priority)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the SQLite combination catalog.
    ///
    /// Can be set via:
    /// - CLI: --db /path/to/db
    /// - ENV: EXGRIP_DATABASE_PATH
    /// - Config: database_path = "/path/to/db"
    /// - Default: ~/.local/share/exgrip/catalog.db
    #[serde(default = "default_db_path")]
    pub database_path: PathBuf,

    /// Listen address of the catalog lookup service.
    #[serde(default = "default_catalog_addr")]
    pub catalog_addr: SocketAddr,

    /// Listen address of the image search service.
    #[serde(default = "default_search_addr")]
    pub search_addr: SocketAddr,

    /// Number of images returned by a search.
    #[serde(default = "default_top_k", deserialize_with = "lenient::deserialize")]
    pub top_k: usize,

    /// Timeout for a single image download, in seconds.
    #[serde(
        default = "default_fetch_timeout_secs",
        deserialize_with = "lenient::deserialize"
    )]
    pub fetch_timeout_secs: u64,

    /// Retries for transient download failures.
    #[serde(
        default = "default_fetch_retries",
        deserialize_with = "lenient::deserialize"
    )]
    pub fetch_retries: usize,

    #[serde(
        default = "default_max_concurrent_fetches",
        deserialize_with = "lenient::deserialize"
    )]
    pub max_concurrent_fetches: usize,

    /// Rank the remaining images when some fail, instead of failing the
    /// request.
    #[serde(default, deserialize_with = "lenient::deserialize")]
    pub skip_failed_images: bool,

    /// Where the embedding model files are cached. Defaults to the
    /// backend's own cache directory.
    #[serde(default)]
    pub model_cache_dir: Option<PathBuf>,

    /// One of trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_true", deserialize_with = "lenient::deserialize")]
    pub log_coloured: bool,

    #[serde(default, deserialize_with = "lenient::deserialize")]
    pub log_report_caller: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_db_path(),
            catalog_addr: default_catalog_addr(),
            search_addr: default_search_addr(),
            top_k: default_top_k(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            fetch_retries: default_fetch_retries(),
            max_concurrent_fetches: default_max_concurrent_fetches(),
            skip_failed_images: false,
            model_cache_dir: None,
            log_level: default_log_level(),
            log_coloured: true,
            log_report_caller: false,
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Searches for config file at: ~/.config/exgrip/config.toml
    /// Reads environment variables with EXGRIP_ prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        let config_path = config_file_path();

        let mut builder = Confygery::new().context("Failed to create config builder")?;

        if config_path.exists() {
            let path_str = config_path
                .to_str()
                .ok_or_else(|| anyhow::anyhow!("Config path contains invalid UTF-8"))?;
            builder
                .add_file(path_str)
                .context("Failed to load config file")?;
        }

        let env_opts = env::Options::with_top_level("exgrip");
        builder
            .add_env(env_opts)
            .context("Failed to load environment variables")?;

        let config: Self = builder.build().context("Failed to build configuration")?;

        Ok(config)
    }

    /// Load configuration with custom database path.
    ///
    /// This is used when the --db CLI flag is provided.
    pub fn load_with_db_path(db_path: PathBuf) -> Result<Self> {
        let mut config = Self::load()?;
        config.database_path = db_path;
        Ok(config)
    }

    #[must_use]
    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            timeout: Duration::from_secs(self.fetch_timeout_secs),
            retries: self.fetch_retries,
            ..FetchOptions::default()
        }
    }

    #[must_use]
    pub fn ranker_options(&self) -> RankerOptions {
        RankerOptions {
            top_k: self.top_k,
            max_concurrent_fetches: self.max_concurrent_fetches,
            skip_failed: self.skip_failed_images,
        }
    }
}

/// Accept numbers and booleans either natively or as strings, since
/// environment variables always arrive as strings.
mod lenient {
    use serde::de::{self, Deserializer};
    use serde::Deserialize;
    use std::fmt::Display;
    use std::str::FromStr;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw<T> {
        Native(T),
        Text(String),
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + FromStr,
        T::Err: Display,
    {
        match Raw::<T>::deserialize(deserializer)? {
            Raw::Native(value) => Ok(value),
            Raw::Text(text) => text.trim().parse().map_err(de::Error::custom),
        }
    }
}

fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("exgrip")
        .join("catalog.db")
}

fn default_catalog_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8000))
}

fn default_search_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8001))
}

const fn default_top_k() -> usize {
    5
}

const fn default_fetch_timeout_secs() -> u64 {
    30
}

const fn default_fetch_retries() -> usize {
    2
}

const fn default_max_concurrent_fetches() -> usize {
    8
}

fn default_log_level() -> String {
    String::from("info")
}

const fn default_true() -> bool {
    true
}

/// Get the config file path.
///
/// Returns:
/// - Linux: ~/.config/exgrip/config.toml
/// - macOS: ~/Library/Application Support/exgrip/config.toml
/// - Windows: %APPDATA%\exgrip\config.toml
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("exgrip")
        .join("config.toml")
}

/// Get the example config file content.
pub fn example_config() -> &'static str {
    r#"# EXGRIP Services Configuration File
#
# Configuration is loaded from multiple sources with the following priority:
# 1. CLI arguments (highest priority)
# 2. Environment variables (EXGRIP_* prefix)
# 3. This config file
# 4. Built-in defaults (lowest priority)

# Path to the SQLite combination catalog
#
# Can also be set via:
# - CLI: exgrip --db /custom/path.db serve-catalog
# - Environment: EXGRIP_DATABASE_PATH=/custom/path.db
#
# Default: Platform-specific data directory
#database_path = "/path/to/custom/catalog.db"

# Listen addresses
catalog_addr = "0.0.0.0:8000"
search_addr = "0.0.0.0:8001"

# Image search
top_k = 5
fetch_timeout_secs = 30
fetch_retries = 2
max_concurrent_fetches = 8

# When true, images that fail to download or decode are left out of the
# ranking instead of failing the whole request.
skip_failed_images = false

# Embedding model cache (defaults to the backend's cache directory)
#model_cache_dir = "/var/cache/exgrip/models"

# Logging
log_level = "info"
log_coloured = true
log_report_caller = false
"#
}

/// Create default config file if it doesn't exist.
///
/// Returns true if a new file was created, false if it already existed.
pub fn ensure_config_file() -> Result<bool> {
    let config_path = config_file_path();

    if config_path.exists() {
        return Ok(false);
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    std::fs::write(&config_path, example_config()).context("Failed to write config file")?;

    Ok(true)
}
