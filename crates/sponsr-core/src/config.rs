//! Configuration types for the insights feed.
//!
//! Values are layered: built-in defaults, then an optional TOML file
//! (`~/.config/sponsr/config.toml`), then environment variables and CLI flags
//! applied by the binary.
//!
//! ```toml
//! [sanity]
//! project_id = "abc123"
//! dataset = "production"
//!
//! [listing]
//! page_size = 6
//!
//! [http]
//! timeout_secs = 30
//! max_retries = 3
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::AppError;

/// Default dataset queried when none is configured.
pub const DEFAULT_DATASET: &str = "production";

/// Query API version pinned by the site.
pub const DEFAULT_API_VERSION: &str = "2024-01-01";

/// HTTP client configuration for the content API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    pub timeout: Duration,
    pub max_retries: u32,
    pub retry_base_delay: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_retries: 3,
            retry_base_delay: Duration::from_millis(500),
        }
    }
}

/// Pagination settings for the insights listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingConfig {
    pub page_size: usize,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self { page_size: 6 }
    }
}

/// Content backend (Sanity) project settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SanityConfig {
    /// Project id; `None` means no backend and fallback content only.
    pub project_id: Option<String>,
    pub dataset: String,
    pub api_version: String,
    /// Query through the edge cache (`apicdn`) rather than the live API.
    pub use_cdn: bool,
}

impl Default for SanityConfig {
    fn default() -> Self {
        Self {
            project_id: None,
            dataset: DEFAULT_DATASET.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            use_cdn: true,
        }
    }
}

impl SanityConfig {
    pub fn is_configured(&self) -> bool {
        self.project_id
            .as_deref()
            .is_some_and(|id| !id.trim().is_empty())
    }
}

/// Aggregated site configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteConfig {
    pub sanity: SanityConfig,
    pub listing: ListingConfig,
    pub http: HttpConfig,
}

/// On-disk shape of the config file. Every section and key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    sanity: SanityConfig,
    listing: ListingSection,
    http: HttpSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ListingSection {
    page_size: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct HttpSection {
    timeout_secs: Option<u64>,
    max_retries: Option<u32>,
    retry_base_delay_ms: Option<u64>,
}

impl From<ConfigFile> for SiteConfig {
    fn from(file: ConfigFile) -> Self {
        let defaults = SiteConfig::default();
        SiteConfig {
            sanity: file.sanity,
            listing: ListingConfig {
                page_size: file
                    .listing
                    .page_size
                    .filter(|size| *size > 0)
                    .unwrap_or(defaults.listing.page_size),
            },
            http: HttpConfig {
                timeout: file
                    .http
                    .timeout_secs
                    .map(Duration::from_secs)
                    .unwrap_or(defaults.http.timeout),
                max_retries: file.http.max_retries.unwrap_or(defaults.http.max_retries),
                retry_base_delay: file
                    .http
                    .retry_base_delay_ms
                    .map(Duration::from_millis)
                    .unwrap_or(defaults.http.retry_base_delay),
            },
        }
    }
}

/// Returns `~/.config/sponsr/config.toml`, or `None` when the platform has
/// no config directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("sponsr").join("config.toml"))
}

/// Loads the site configuration from `path`.
///
/// A missing file is not an error: defaults are returned.
pub fn load_site_config(path: &Path) -> Result<SiteConfig, AppError> {
    if !path.exists() {
        tracing::debug!("No config file at {}, using defaults", path.display());
        return Ok(SiteConfig::default());
    }

    let raw = std::fs::read_to_string(path)
        .map_err(|e| AppError::ConfigError(format!("{}: {}", path.display(), e)))?;
    let file: ConfigFile = toml::from_str(&raw)
        .map_err(|e| AppError::ConfigError(format!("{}: {}", path.display(), e)))?;

    Ok(file.into())
}
