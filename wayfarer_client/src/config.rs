//! Client configuration.
//!
//! Built-in defaults, then a TOML file, then the environment, then command-line flags;
//! each later layer overrides the earlier ones.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SERVER_URL: &str = "http://localhost/api";
pub const SERVER_URL_ENV: &str = "WAYFARER_SERVER_URL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// Base url every endpoint path is joined onto.
    pub server_url: String,
    /// Per-request timeout. Unset (or 0) means requests wait as long as the transport does.
    pub request_timeout_secs: Option<u64>,
    pub skip_intro: bool,
    /// Keep rustyline input history between runs.
    pub history: bool,
    /// Send log records here instead of stderr.
    pub log_file: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            request_timeout_secs: None,
            skip_intro: false,
            history: true,
            log_file: None,
        }
    }
}

/// Values supplied on the command line. `None`/`false` leaves the lower layers alone.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub server_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub skip_intro: bool,
}

impl ClientConfig {
    /// Parse a configuration file's contents.
    ///
    /// # Errors
    /// - on malformed TOML or unknown keys
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("parsing client configuration")
    }

    /// # Errors
    /// - if the file cannot be read or parsed
    pub fn load_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).with_context(|| format!("reading config file {}", path.display()))?;
        let config = Self::from_toml(&text).with_context(|| format!("in config file {}", path.display()))?;
        info!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Resolve the effective configuration from all layers.
    ///
    /// # Errors
    /// - if an explicitly named file, or an existing default file, cannot be loaded
    pub fn resolve(explicit: Option<&Path>, overrides: Overrides) -> Result<Self> {
        Self::resolve_with(
            explicit,
            default_config_path().as_deref(),
            env::var(SERVER_URL_ENV).ok(),
            overrides,
        )
    }

    /// [`ClientConfig::resolve`] with the default path and environment supplied by the caller.
    ///
    /// # Errors
    /// - see [`ClientConfig::resolve`]
    pub fn resolve_with(
        explicit: Option<&Path>,
        fallback: Option<&Path>,
        env_server_url: Option<String>,
        overrides: Overrides,
    ) -> Result<Self> {
        let mut config = match (explicit, fallback) {
            (Some(path), _) => Self::load_file(path)?,
            (None, Some(path)) if path.is_file() => Self::load_file(path)?,
            _ => Self::default(),
        };

        if let Some(url) = env_server_url.filter(|url| !url.trim().is_empty()) {
            info!("server url taken from {SERVER_URL_ENV}");
            config.server_url = url;
        }
        if let Some(url) = overrides.server_url {
            config.server_url = url;
        }
        if let Some(secs) = overrides.timeout_secs {
            config.request_timeout_secs = Some(secs);
        }
        config.skip_intro |= overrides.skip_intro;
        Ok(config)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

/// `<config_dir>/wayfarer/config.toml`, where the platform has a config directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|base| base.join("wayfarer").join("config.toml"))
}
