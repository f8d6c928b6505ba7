//! Configuration management for Newswire.
//!
//! Configuration is read once at startup from a TOML file (`./config.toml`
//! unless overridden on the command line). A bad config is fatal: nothing is
//! polled and nothing is served until it loads and validates.

pub mod interval;

pub use interval::Interval;

use std::fs;
use std::io::Write;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::domain::FeedSource;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Main configuration struct.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Feeds to poll.
    pub rss: Vec<FeedEntry>,
    /// Global polling period, applied to every feed without its own.
    pub request_period: Interval,
    pub storage: StorageConfig,
    pub server: ServerConfig,
    pub fetch: FetchConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rss: Vec::new(),
            request_period: Interval::default(),
            storage: StorageConfig::default(),
            server: ServerConfig::default(),
            fetch: FetchConfig::default(),
        }
    }
}

/// A feed in the `rss` list: either a bare URL or a table with its own period.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum FeedEntry {
    Url(String),
    Detailed {
        url: String,
        #[serde(default)]
        request_period: Option<Interval>,
    },
}

impl FeedEntry {
    pub fn url(&self) -> &str {
        match self {
            FeedEntry::Url(url) => url,
            FeedEntry::Detailed { url, .. } => url,
        }
    }

    fn request_period(&self) -> Option<&Interval> {
        match self {
            FeedEntry::Url(_) => None,
            FeedEntry::Detailed { request_period, .. } => request_period.as_ref(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite database file.
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("newswire.db"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen: SocketAddr,
    /// Front-end assets served for every path the API does not claim.
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([0, 0, 0, 0], 80)),
            static_dir: PathBuf::from("./webapp"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: concat!("newswire/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load and validate configuration from `path`.
    ///
    /// Missing fields use their defaults; a missing file is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.sources()?;
        Ok(config)
    }

    /// Resolve the configured feeds into sources, validating every URL and
    /// every interval.
    pub fn sources(&self) -> Result<Vec<FeedSource>, ConfigError> {
        let default_period = self
            .request_period
            .to_duration()
            .map_err(|reason| ConfigError::InvalidInterval {
                context: "request_period".to_string(),
                reason,
            })?;

        self.rss
            .iter()
            .map(|entry| {
                let url = validate_feed_url(entry.url())?;
                let interval = match entry.request_period() {
                    Some(period) => {
                        period
                            .to_duration()
                            .map_err(|reason| ConfigError::InvalidInterval {
                                context: url.clone(),
                                reason,
                            })?
                    }
                    None => default_period,
                };
                Ok(FeedSource::new(url, interval))
            })
            .collect()
    }

    /// Write the commented default config to `path`.
    pub fn write_default(path: &Path, force: bool) -> Result<(), ConfigError> {
        if path.exists() && !force {
            return Err(ConfigError::AlreadyExists(path.to_path_buf()));
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> &'static str {
        r##"# Newswire configuration

# Feeds to poll. Entries are either a URL or a table with its own period:
#   { url = "https://example.com/rss", request_period = "30m" }
rss = [
    "https://habr.com/ru/rss/hub/go/all/?fl=ru",
    "https://habr.com/ru/rss/best/daily/?fl=ru",
]

# Polling period for every feed. A number is minutes; strings accept
# "30s", "5m", "1h" and "1d".
request_period = 5

[storage]
# SQLite database file
path = "newswire.db"

[server]
listen = "0.0.0.0:80"
# Front-end served for every path outside the API
static_dir = "./webapp"

[fetch]
timeout_secs = 10
"##
    }
}

fn validate_feed_url(raw: &str) -> Result<String, ConfigError> {
    let parsed = Url::parse(raw).map_err(|e| ConfigError::InvalidFeedUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(raw.to_string()),
        other => Err(ConfigError::InvalidFeedUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid feed URL {url}: {reason}")]
    InvalidFeedUrl { url: String, reason: String },

    #[error("Invalid interval for {context}: {reason}")]
    InvalidInterval { context: String, reason: String },

    #[error("Config file already exists at {0} (use --force to overwrite)")]
    AlreadyExists(PathBuf),
}
