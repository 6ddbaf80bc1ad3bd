//! Configuration
//!
//! Read from `named-param.toml` in the working directory, falling back to
//! `<config dir>/named-param/config.toml`. The database URL can always be
//! overridden by `NAMED_PARAM_DATABASE_URL`.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::NamedParamResult;
use crate::parser::PlaceholderStyle;

/// Environment variable that overrides `database_url`.
pub const DATABASE_URL_ENV: &str = "NAMED_PARAM_DATABASE_URL";

const LOCAL_CONFIG: &str = "named-param.toml";

/// Connection and rewriting settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Database connection URL
    pub database_url: Option<String>,

    /// Marker emitted for each named parameter
    pub placeholder: PlaceholderStyle,

    /// Pool size
    pub max_connections: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            placeholder: PlaceholderStyle::Question,
            max_connections: 5,
        }
    }
}

impl Config {
    /// Create a new configuration builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Parse a TOML document.
    pub fn from_toml(content: &str) -> NamedParamResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Read a TOML config file.
    pub fn from_file(path: impl AsRef<Path>) -> NamedParamResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    /// The first config file that exists, if any.
    pub fn find_file() -> Option<PathBuf> {
        let local = PathBuf::from(LOCAL_CONFIG);
        if local.exists() {
            return Some(local);
        }
        dirs::config_dir()
            .map(|dir| dir.join("named-param").join("config.toml"))
            .filter(|path| path.exists())
    }

    /// Load the config file (or defaults) and apply the environment override.
    pub fn load() -> NamedParamResult<Self> {
        let mut config = match Self::find_file() {
            Some(path) => {
                tracing::debug!("Loading config from {}", path.display());
                Self::from_file(&path)?
            }
            None => Self::default(),
        };
        if let Ok(url) = std::env::var(DATABASE_URL_ENV) {
            config.database_url = Some(url);
        }
        Ok(config)
    }
}

/// Builder for Config
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Start from an existing configuration.
    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    /// Set the database URL
    pub fn database(mut self, url: impl Into<String>) -> Self {
        self.config.database_url = Some(url.into());
        self
    }

    /// Set the placeholder style
    pub fn placeholder(mut self, style: PlaceholderStyle) -> Self {
        self.config.placeholder = style;
        self
    }

    /// Set the pool size
    pub fn max_connections(mut self, n: u32) -> Self {
        self.config.max_connections = n;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Config {
        self.config
    }
}
