//! Configuration loading and database path resolution
//!
//! Database path priority order:
//! 1. Command-line argument (highest priority)
//! 2. `CHMS_DATABASE` environment variable
//! 3. `database_path` in the TOML config file
//! 4. OS-dependent compiled default (fallback)
//!
//! A missing or unreadable TOML file is never fatal: a warning is logged
//! and compiled defaults are used.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable overriding the database location
pub const DATABASE_ENV_VAR: &str = "CHMS_DATABASE";

/// Contents of `config.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// SQLite database file
    pub database_path: Option<PathBuf>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// `[logging]` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default tracing filter when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Values used when nothing else is configured
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub database_path: PathBuf,
    pub log_level: String,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        // ~/.local/share/chms, ~/Library/Application Support/chms, %LOCALAPPDATA%\chms
        let data_dir = dirs::data_local_dir()
            .map(|d| d.join("chms"))
            .unwrap_or_else(|| PathBuf::from("./chms_data"));

        Self {
            database_path: data_dir.join("chms.db"),
            log_level: default_log_level(),
        }
    }
}

/// Platform config file location (`<config_dir>/chms/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("chms").join("config.toml"))
}

/// Parse a TOML config file, failing on any read or parse error
pub fn read_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Load the TOML config with graceful degradation
///
/// `explicit` is the `--config` argument. When it is absent the platform
/// location is tried; a file that does not exist there is not worth a
/// warning.
pub fn load_toml_config(explicit: Option<&Path>) -> TomlConfig {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => match default_config_path() {
            Some(p) if p.exists() => p,
            _ => {
                debug!("No config file found, using compiled defaults");
                return TomlConfig::default();
            }
        },
    };

    match read_toml_config(&path) {
        Ok(config) => {
            info!("Loaded config from {}", path.display());
            config
        }
        Err(e) => {
            warn!("{} - using compiled defaults", e);
            TomlConfig::default()
        }
    }
}

/// Resolves the database file following the priority order above
pub struct DatabasePathResolver {
    cli_arg: Option<PathBuf>,
    toml_path: Option<PathBuf>,
}

impl DatabasePathResolver {
    pub fn new(cli_arg: Option<PathBuf>, toml_config: &TomlConfig) -> Self {
        Self {
            cli_arg,
            toml_path: toml_config.database_path.clone(),
        }
    }

    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = &self.cli_arg {
            return path.clone();
        }

        if let Ok(path) = std::env::var(DATABASE_ENV_VAR) {
            if !path.trim().is_empty() {
                return PathBuf::from(path);
            }
        }

        if let Some(path) = &self.toml_path {
            return path.clone();
        }

        CompiledDefaults::for_current_platform().database_path
    }
}
