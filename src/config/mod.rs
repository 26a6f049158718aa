//! Configuration module for the catalog census

use serde::Deserialize;
use config::{Config, ConfigError, Environment, File, Map};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Default pagination cap per category
pub const DEFAULT_MAX_PAGES: u32 = 49;

/// Environment variables read into [`Settings`], matched case-sensitively
const ENV_KEYS: [&str; 11] = [
    "host",
    "api_host",
    "login",
    "apikey",
    "max_pages",
    "request_timeout_secs",
    "connect_timeout_secs",
    "requests_per_minute",
    "max_retries",
    "output_dir",
    "legacy_column_names",
];

/// Errors raised while loading or validating settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to load configuration")]
    Load(#[from] ConfigError),

    #[error("Required setting `{0}` is not set")]
    Missing(&'static str),

    #[error("Setting `{key}` is not an absolute http(s) URL: {value}")]
    InvalidUrl { key: &'static str, value: String },

    #[error("Invalid value for `{key}`: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

/// Main application settings
///
/// Built once at startup and handed to every component by reference.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Public storefront base URL, prefixed to category page paths
    pub host: String,
    /// Catalog API base URL
    pub api_host: String,
    /// Value of the `login` header
    pub login: String,
    /// Value of the `APIKEY` header
    pub apikey: String,

    /// Maximum number of product pages fetched per category
    pub max_pages: u32,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    /// Client-side throttle, 0 disables it
    pub requests_per_minute: u32,
    /// Retries per request on transport failure, 0 disables them
    pub max_retries: u32,

    /// Directory the spreadsheet is written to
    pub output_dir: PathBuf,
    /// Keep the historical `parrent_id` / `items_count` header spellings
    pub legacy_column_names: bool,
}

impl Settings {
    /// Load configuration from files and environment variables
    ///
    /// Configuration priority (highest to lowest):
    /// 1. Environment variables (`login`, `apikey`, `host`, `api_host`, ...)
    /// 2. config/local.toml (gitignored)
    /// 3. config/default.toml
    pub fn load() -> Result<Self, SettingsError> {
        let config_dir = std::env::var("CONFIG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config"));

        Self::load_from(&config_dir, std::env::vars())
    }

    /// Load from `config_dir` and the given variables.
    ///
    /// Only the exact lowercase names in [`ENV_KEYS`] are taken, so an
    /// unrelated `HOST` never shadows `host`.
    pub fn load_from(
        config_dir: &Path,
        vars: impl IntoIterator<Item = (String, String)>,
    ) -> Result<Self, SettingsError> {
        let owned: Map<String, String> = vars
            .into_iter()
            .filter(|(key, _)| ENV_KEYS.contains(&key.as_str()))
            .collect();

        let builder = Config::builder()
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            .add_source(File::from(config_dir.join("local.toml")).required(false))
            .add_source(Environment::default().source(Some(owned)));

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings that would send requests with undefined credentials
    pub fn validate(&self) -> Result<(), SettingsError> {
        for (key, value) in [
            ("host", &self.host),
            ("api_host", &self.api_host),
            ("login", &self.login),
            ("apikey", &self.apikey),
        ] {
            if value.trim().is_empty() {
                return Err(SettingsError::Missing(key));
            }
        }

        for (key, value) in [("host", &self.host), ("api_host", &self.api_host)] {
            match Url::parse(value) {
                Ok(url) if matches!(url.scheme(), "http" | "https") => {}
                _ => {
                    return Err(SettingsError::InvalidUrl {
                        key,
                        value: value.clone(),
                    })
                }
            }
        }

        if self.max_pages == 0 {
            return Err(SettingsError::InvalidValue {
                key: "max_pages",
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(())
    }

    /// API base URL without a trailing slash
    pub fn api_base(&self) -> &str {
        self.api_host.trim_end_matches('/')
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            host: String::new(),
            api_host: String::new(),
            login: String::new(),
            apikey: String::new(),
            max_pages: DEFAULT_MAX_PAGES,
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
            requests_per_minute: 0,
            max_retries: 0,
            output_dir: PathBuf::from("."),
            legacy_column_names: true,
        }
    }
}
