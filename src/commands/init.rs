//! Command: record the sync file of a dotfiles directory in the config.
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};

use super::{open_config, schema_error};
use crate::cli::{GlobalOpts, InitOpts};
use crate::config::{SYNC_FILE_NAME, locate_sync_file};
use crate::logging::Log;
use crate::schema;

/// Run the init command and return the recorded sync file path.
///
/// The config is only written once the sync file has been found.
///
/// # Errors
///
/// Returns an error if the working directory has no sync file (and
/// `--create` was not given), or the config cannot be read or saved.
pub fn run(global: &GlobalOpts, opts: &InitOpts, log: &Arc<dyn Log>) -> Result<PathBuf> {
    let workdir = match opts.workdir {
        Some(ref dir) => dir.clone(),
        None => std::env::current_dir().context("reading current directory")?,
    };

    log.stage("Locating sync file");
    if opts.create {
        let candidate = workdir.join(SYNC_FILE_NAME);
        schema::read_or_create(&candidate).map_err(|e| schema_error(e, &candidate))?;
    }
    let sync_file = locate_sync_file(&workdir)?;
    log.info(&format!("found {}", sync_file.display()));

    let mut conf = open_config(global)?;
    if conf.config.syncfile.as_deref() == Some(sync_file.as_path()) {
        log.debug("config already points at this sync file");
    }
    conf.config.syncfile = Some(sync_file.clone());
    conf.save()
        .with_context(|| format!("saving config {}", conf.path().display()))?;
    log.info(&format!("config saved to {}", conf.path().display()));

    Ok(sync_file)
}
