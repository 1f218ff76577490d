//! Tool configuration: which sync file the commands operate on.
//!
//! The config is a small YAML document (`syncfile: <path>`) stored at
//! `$HOME/.dotlink.yaml` unless overridden.  A missing file is an empty
//! config, so first use needs no setup beyond `dotlink init`.
pub mod sync_file;

pub use sync_file::{SYNC_FILE_NAME, locate_sync_file, resolve_sync_file};

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name of the default config, relative to the home directory.
pub const CONFIG_FILE_NAME: &str = ".dotlink.yaml";

/// Persisted tool configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Absolute path of the sync file recorded by `init`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub syncfile: Option<PathBuf>,
}

impl Config {
    /// The configured sync file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotInitialised`] if `init` has not been run.
    pub fn require_sync_file(&self) -> Result<&Path, ConfigError> {
        self.syncfile.as_deref().ok_or(ConfigError::NotInitialised)
    }
}

/// A [`Config`] bound to the file it was read from.
#[derive(Debug)]
pub struct ConfigFile {
    path: PathBuf,
    /// The loaded configuration.
    pub config: Config,
}

impl ConfigFile {
    /// Read the config at `path`.
    ///
    /// A missing file, an empty file, or a YAML `null` document all yield an
    /// empty [`Config`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file exists but cannot be read, or
    /// [`ConfigError::Parse`] if it is not a valid config document.
    pub fn open(path: &Path) -> Result<Self, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let config = if text.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str::<Option<Config>>(&text)
                .map_err(|e| ConfigError::Parse {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?
                .unwrap_or_default()
        };

        tracing::debug!(
            path = %path.display(),
            initialised = config.syncfile.is_some(),
            "loaded config"
        );
        Ok(Self {
            path: path.to_path_buf(),
            config,
        })
    }

    /// Path this config was read from and will be saved to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the config file with the current values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Serialize`] if encoding fails or
    /// [`ConfigError::Io`] if the file cannot be written.
    pub fn save(&self) -> Result<(), ConfigError> {
        let text = serde_yaml::to_string(&self.config).map_err(|e| ConfigError::Serialize {
            message: e.to_string(),
        })?;
        fs::write(&self.path, text).map_err(|source| ConfigError::Io {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!(path = %self.path.display(), "saved config");
        Ok(())
    }
}

/// Default config location: `$HOME/.dotlink.yaml` (`%USERPROFILE%` on
/// Windows).
///
/// Returns `None` if no home directory variable is set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    let home = if cfg!(target_os = "windows") {
        std::env::var("USERPROFILE").or_else(|_| std::env::var("HOME"))
    } else {
        std::env::var("HOME")
    };
    home.ok().map(|h| PathBuf::from(h).join(CONFIG_FILE_NAME))
}
