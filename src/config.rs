//! CLI configuration: a TOML file with `SALESDESK_*` environment overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub listing: ListingConfig,

    #[serde(default)]
    pub lookups: LookupsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend connection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Accept self-signed certificates (development backends only)
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

fn default_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
            accept_invalid_certs: false,
        }
    }
}

/// Table paging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ListingConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    #[serde(default = "default_page_size_options")]
    pub page_size_options: Vec<usize>,
}

fn default_page_size() -> usize {
    10
}

fn default_page_size_options() -> Vec<usize> {
    vec![5, 10, 25, 50]
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            page_size_options: default_page_size_options(),
        }
    }
}

impl ListingConfig {
    /// `requested` if it is offered by `page_size_options` (an empty list
    /// offers any positive size), `page_size` when nothing was requested.
    pub fn resolve_page_size(&self, requested: Option<usize>) -> Option<usize> {
        match requested {
            None => Some(self.page_size),
            Some(0) => None,
            Some(size) if self.page_size_options.is_empty() => Some(size),
            Some(size) => self.page_size_options.contains(&size).then_some(size),
        }
    }
}

/// Selection-list fetch configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LookupsConfig {
    #[serde(default = "default_lookup_page_size")]
    pub page_size: u32,
}

fn default_lookup_page_size() -> u32 {
    crate::api::DEFAULT_LOOKUP_PAGE_SIZE
}

impl Default for LookupsConfig {
    fn default() -> Self {
        Self {
            page_size: default_lookup_page_size(),
        }
    }
}

/// `level` is an `EnvFilter` directive; `format` is `pretty` or `json`
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Candidate files in lookup order
    pub fn search_paths() -> Vec<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("salesdesk").join("config.toml"))
            .into_iter()
            .chain([
                PathBuf::from("/etc/salesdesk/config.toml"),
                PathBuf::from("./config.toml"),
            ])
            .collect()
    }

    /// Parse one TOML file; absent tables and keys take their defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        toml::from_str(&raw).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Defaults plus `SALESDESK_*` variables
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides();
        config
    }

    /// [`Config::load`] followed by the `SALESDESK_*` variables
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        Self::load(path).map(|mut config| {
            config.apply_env_overrides();
            config
        })
    }

    /// First readable file from [`Config::search_paths`], else [`Config::from_env`].
    pub fn load_default() -> Self {
        Self::load_first(&Self::search_paths())
    }

    /// First of `paths` that exists and parses, else [`Config::from_env`].
    /// A file that fails to parse is skipped with a warning.
    pub fn load_first(paths: &[PathBuf]) -> Self {
        let found = paths.iter().filter(|p| p.exists()).find_map(|path| {
            match Self::load_with_env(path) {
                Ok(config) => {
                    tracing::info!(path = %path.display(), "Config loaded");
                    Some(config)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping config file");
                    None
                }
            }
        });

        found.unwrap_or_else(|| {
            tracing::debug!("No config file found; using defaults and environment");
            Self::from_env()
        })
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply `SALESDESK_*` overrides read through `var`. Values that do not
    /// parse, and a page size of 0, leave the setting unchanged.
    pub fn apply_overrides<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = var("SALESDESK_API_URL") {
            self.api.base_url = url;
        }
        if let Some(raw) = var("SALESDESK_REQUEST_TIMEOUT") {
            match raw.parse() {
                Ok(secs) => self.api.request_timeout_secs = secs,
                Err(_) => tracing::warn!(value = %raw, "Ignoring SALESDESK_REQUEST_TIMEOUT"),
            }
        }
        if let Some(raw) = var("SALESDESK_PAGE_SIZE") {
            match raw.parse() {
                Ok(size) if size > 0 => self.listing.page_size = size,
                _ => tracing::warn!(value = %raw, "Ignoring SALESDESK_PAGE_SIZE"),
            }
        }
        if let Some(level) = var("SALESDESK_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("SALESDESK_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("invalid config in {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Annotated config file with every setting at its default
pub fn generate_default_config() -> String {
    r#"# SalesDesk Configuration
#
# Overridden by:
# - SALESDESK_API_URL
# - SALESDESK_REQUEST_TIMEOUT
# - SALESDESK_PAGE_SIZE
# - SALESDESK_LOG_LEVEL
# - SALESDESK_LOG_FORMAT

[api]
# Backend base URL, including the /api prefix
base_url = "http://localhost:5000/api"

# Seconds before a request is abandoned
request_timeout_secs = 30

# Accept self-signed TLS certificates (development only)
accept_invalid_certs = false

[listing]
# Rows per page in customer and order tables
page_size = 10

# Page sizes offered by the page-size selector
page_size_options = [5, 10, 25, 50]

[lookups]
# Page size used to fetch employees, shippers and products in one request
page_size = 1000

[logging]
# Filter directive, e.g. "info" or "salesdesk=debug"
level = "info"

# "pretty" or "json"; logs go to stderr
format = "pretty"
"#
    .to_string()
}
