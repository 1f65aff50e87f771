//! Configuration
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a two-layer resolution:
//! 1. An explicit path, or the override in the data dir
//!    (~/.local/share/renew/config/renew.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Values missing from an override keep their defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::catalog::SortKey;
use crate::error::{Error, Result};
use crate::spend::SpendMode;

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/renew.toml");

const APP_DIR: &str = "renew";

/// Resolved configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Subscription store path
    pub data_file: PathBuf,
    pub sort: SortKey,
    pub spend_mode: SpendMode,
    /// Default window for upcoming charges
    pub upcoming_days: u32,
    pub server: ServerSettings,
}

/// Server bind and CORS settings
#[derive(Debug, Clone, PartialEq)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            allowed_origins: vec![],
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: resolve_data_file("subscriptions.json"),
            sort: SortKey::default(),
            spend_mode: SpendMode::default(),
            upcoming_days: 30,
            server: ServerSettings::default(),
        }
    }
}

impl Config {
    /// Load the override from the data dir if present, else the defaults
    pub fn load() -> Result<Self> {
        load_config(None)
    }

    /// Load from an explicit path (defaults if the file does not exist)
    pub fn load_from(path: &Path) -> Result<Self> {
        load_config(Some(path))
    }

    /// Parse config from TOML content layered over the embedded defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        let mut config = Config::default();
        apply_raw(&mut config, parse_raw(DEFAULT_CONFIG)?);
        apply_raw(&mut config, parse_raw(content)?);
        Ok(config)
    }
}

/// Renew's data directory (~/.local/share/renew on Linux)
pub fn data_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join(APP_DIR))
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    data_dir().map(|d| d.join("config").join("renew.toml"))
}

fn resolve_data_file(file: &str) -> PathBuf {
    let path = PathBuf::from(file);
    if path.is_absolute() {
        return path;
    }
    match data_dir() {
        Some(dir) => dir.join(path),
        None => path,
    }
}

fn load_config(override_path: Option<&Path>) -> Result<Config> {
    let path = match override_path {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_path(),
    };

    match path {
        Some(path) if path.exists() => {
            debug!(path = %path.display(), "Loading config override");
            let content = fs::read_to_string(&path)
                .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
            Config::from_toml(&content)
        }
        _ => Config::from_toml(""),
    }
}

/// Raw config structure for TOML parsing
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    data: Option<RawData>,
    display: Option<RawDisplay>,
    forecast: Option<RawForecast>,
    server: Option<RawServer>,
}

#[derive(Debug, Deserialize)]
struct RawData {
    file: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawDisplay {
    sort: Option<String>,
    spend_mode: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawForecast {
    upcoming_days: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawServer {
    host: Option<String>,
    port: Option<u16>,
    allowed_origins: Option<Vec<String>>,
}

fn parse_raw(content: &str) -> Result<RawConfig> {
    toml::from_str(content).map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))
}

fn apply_raw(config: &mut Config, raw: RawConfig) {
    if let Some(data) = raw.data {
        if let Some(file) = data.file {
            config.data_file = resolve_data_file(&file);
        }
    }

    if let Some(display) = raw.display {
        if let Some(sort) = display.sort {
            match sort.parse() {
                Ok(key) => config.sort = key,
                Err(e) => warn!("{}; keeping {}", e, config.sort),
            }
        }
        if let Some(mode) = display.spend_mode {
            match mode.parse() {
                Ok(mode) => config.spend_mode = mode,
                Err(e) => warn!("{}; keeping {}", e, config.spend_mode),
            }
        }
    }

    if let Some(forecast) = raw.forecast {
        if let Some(days) = forecast.upcoming_days {
            config.upcoming_days = days;
        }
    }

    if let Some(server) = raw.server {
        if let Some(host) = server.host {
            config.server.host = host;
        }
        if let Some(port) = server.port {
            config.server.port = port;
        }
        if let Some(origins) = server.allowed_origins {
            config.server.allowed_origins = origins;
        }
    }
}
