//! Command: register a new entry in the sync file.
use std::sync::Arc;

use anyhow::{Context as _, Result};

use super::{open_config, schema_error};
use crate::cli::{AddOpts, GlobalOpts};
use crate::config::{SYNC_FILE_NAME, resolve_sync_file};
use crate::logging::Log;
use crate::registration::register_in_file;
use crate::schema::Schema;

/// Run the add command and return the updated schema.
///
/// Writes to the configured sync file, or to `dotlink.yaml` in the current
/// directory when `init` has not been run.
///
/// # Errors
///
/// Returns an error if either value is empty, or the sync file cannot be
/// read, decoded or written.
pub fn run(global: &GlobalOpts, opts: &AddOpts, log: &Arc<dyn Log>) -> Result<Schema> {
    let conf = open_config(global)?;
    let sync_file = match conf.config.syncfile {
        Some(ref path) => path.clone(),
        None => {
            let cwd = std::env::current_dir().context("reading current directory")?;
            log.warn(&format!(
                "config not initialised; using {SYNC_FILE_NAME} in the current directory"
            ));
            resolve_sync_file(&conf.config, &cwd)
        }
    };

    log.stage("Registering entry");
    let schema = register_in_file(&sync_file, &opts.source, &opts.target)
        .map_err(|e| schema_error(e, &sync_file))?;
    log.info(&format!(
        "added {} -> {} ({} entries in {})",
        opts.target,
        opts.source,
        schema.len(),
        sync_file.display()
    ));
    Ok(schema)
}
