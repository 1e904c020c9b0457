//! Layered configuration: built-in defaults, an optional TOML file, then
//! command-line flags and environment variables.

use std::path::{Path, PathBuf};
use std::time::Duration;

use catsync_fetch::ClientSettings;
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_URL: &str = "https://live-app-catalog.ledger.com/api/v1/apps";
pub const DEFAULT_CATALOG_PATH: &str = "live-app-catalog.json";
pub const DEFAULT_ETAG_PATH: &str = "etag.txt";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        path:   PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid catalog URL {url:?}: {source}")]
    InvalidUrl {
        url:    String,
        #[source]
        source: url::ParseError,
    },

    #[error("unsupported URL scheme {0:?}, expected http or https")]
    UnsupportedScheme(String),
}

/// One source of settings. Every field is optional; later layers win.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigLayer {
    pub url:          Option<String>,
    pub catalog:      Option<PathBuf>,
    pub etag:         Option<PathBuf>,
    pub timeout_secs: Option<u64>,
    pub user_agent:   Option<String>,
}

impl ConfigLayer {
    pub fn from_toml_str(path: &Path, content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(path, &content)
    }

    /// Overlay `other` on top of `self`.
    pub fn merge(self, other: ConfigLayer) -> ConfigLayer {
        ConfigLayer {
            url:          other.url.or(self.url),
            catalog:      other.catalog.or(self.catalog),
            etag:         other.etag.or(self.etag),
            timeout_secs: other.timeout_secs.or(self.timeout_secs),
            user_agent:   other.user_agent.or(self.user_agent),
        }
    }
}

/// Fully resolved settings for one sync run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    pub url:          String,
    pub catalog_path: PathBuf,
    pub etag_path:    PathBuf,
    pub timeout:      Option<Duration>,
    pub user_agent:   Option<String>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            url:          DEFAULT_URL.to_owned(),
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            etag_path:    PathBuf::from(DEFAULT_ETAG_PATH),
            timeout:      None,
            user_agent:   None,
        }
    }
}

impl SyncConfig {
    /// Apply `layer` over the defaults and validate the result.
    pub fn resolve(layer: ConfigLayer) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let url = layer.url.unwrap_or(defaults.url);
        validate_url(&url)?;

        Ok(Self {
            url,
            catalog_path: layer.catalog.unwrap_or(defaults.catalog_path),
            etag_path: layer.etag.unwrap_or(defaults.etag_path),
            timeout: layer.timeout_secs.map(Duration::from_secs),
            user_agent: layer.user_agent,
        })
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            timeout:    self.timeout,
            user_agent: self.user_agent.clone(),
        }
    }
}

fn validate_url(raw: &str) -> Result<(), ConfigError> {
    let parsed = url::Url::parse(raw).map_err(|source| ConfigError::InvalidUrl {
        url: raw.to_owned(),
        source,
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::UnsupportedScheme(other.to_owned())),
    }
}
