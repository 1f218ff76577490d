//! Subcommand orchestration.
//!
//! Each subcommand module exposes a `run` entry point that converts typed
//! errors into [`anyhow::Error`] with context for the user.
pub mod add;
pub mod init;
pub mod sync;
pub mod version;

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use crate::cli::GlobalOpts;
use crate::config::{ConfigFile, default_config_path};
use crate::error::SchemaError;

/// Resolve the config path from `--conf`/`DOTLINK_CONFIG` or the default
/// location.
///
/// # Errors
///
/// Returns an error if no path was given and the home directory is unknown.
pub fn config_path(global: &GlobalOpts) -> Result<PathBuf> {
    if let Some(ref conf) = global.conf {
        return Ok(conf.clone());
    }
    default_config_path()
        .context("cannot determine home directory. Use --conf or set DOTLINK_CONFIG")
}

/// Open the config file selected by `global`.
///
/// # Errors
///
/// Returns an error if the path cannot be determined or the file cannot be
/// read or parsed.
pub fn open_config(global: &GlobalOpts) -> Result<ConfigFile> {
    let path = config_path(global)?;
    ConfigFile::open(&path).with_context(|| format!("loading config {}", path.display()))
}

/// Convert a [`SchemaError`] into an [`anyhow::Error`], adding advice for
/// sync files that fail to decode.
pub(crate) fn schema_error(err: SchemaError, path: &Path) -> anyhow::Error {
    let advice = match err {
        SchemaError::Parse { .. } => format!(
            "sync file {} is malformed; fix it or run `dotlink init` again",
            path.display()
        ),
        _ => format!("sync file {}", path.display()),
    };
    anyhow::Error::new(err).context(advice)
}
