// ABOUTME: Persisted installer configuration and runtime settings
// The config file holds a single APPIMAGE_DIR = "path" TOML line

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

pub mod settings;

pub use settings::Settings;

/// Key written to the configuration file
pub const DIRECTORY_KEY: &str = "APPIMAGE_DIR";

/// Config file location relative to the home directory
pub const CONFIG_FILE: &str = ".config/teabag.conf";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("{DIRECTORY_KEY} not found in {}", path.display())]
    MissingKey { path: PathBuf },

    #[error("failed to serialize config: {0}")]
    Encode(#[from] toml::ser::Error),

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Where installed AppImages live
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallerConfig {
    #[serde(rename = "APPIMAGE_DIR")]
    pub appimage_dir: PathBuf,
}

impl InstallerConfig {
    pub fn new(appimage_dir: impl Into<PathBuf>) -> Self {
        Self {
            appimage_dir: appimage_dir.into(),
        }
    }

    /// Load the config at `path`; `Ok(None)` means it does not exist yet
    pub fn load(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let parse_error = |source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        };

        // Unknown keys are ignored
        let table: toml::Table = toml::from_str(&content).map_err(parse_error)?;
        if !table.contains_key(DIRECTORY_KEY) {
            return Err(ConfigError::MissingKey {
                path: path.to_path_buf(),
            });
        }
        let config: Self = toml::Value::Table(table).try_into().map_err(parse_error)?;

        info!("Loaded AppImage directory {:?} from {:?}", config.appimage_dir, path);
        Ok(Some(config))
    }

    /// Write the config to `path`, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let write_error = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_error)?;
        }

        let content = toml::to_string(self)?;
        fs::write(path, content).map_err(write_error)?;

        info!("Saved AppImage directory {:?} to {:?}", self.appimage_dir, path);
        Ok(())
    }
}

/// Expand a leading `~` to `home`
pub fn expand_tilde(input: &str, home: &Path) -> PathBuf {
    if input == "~" {
        home.to_path_buf()
    } else if let Some(rest) = input.strip_prefix("~/") {
        home.join(rest)
    } else {
        PathBuf::from(input)
    }
}
