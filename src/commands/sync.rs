//! Command: reconcile the filesystem with the configured sync file.
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use super::{open_config, schema_error};
use crate::cli::{GlobalOpts, SyncOpts};
use crate::logging::Log;
use crate::reconcile::{self, Context, RunResult};
use crate::schema;

/// Run the sync command.
///
/// Conflicts are reported as warnings and do not fail the command.
///
/// # Errors
///
/// Returns an error if the config is not initialised, the sync file cannot
/// be loaded, or at least one entry failed with an I/O error.
pub fn run(global: &GlobalOpts, opts: &SyncOpts, log: &Arc<dyn Log>) -> Result<()> {
    let result = reconcile_configured(global, opts.dry_run, log)?;
    let failures = result.failure_count();
    if failures > 0 {
        anyhow::bail!("{failures} entry(ies) failed");
    }
    Ok(())
}

/// Load the configured sync file and reconcile it, returning the per-entry
/// results.  Relative sources resolve against the sync file's directory.
///
/// # Errors
///
/// Returns an error if the config is not initialised or the sync file
/// cannot be loaded.  Per-entry failures are reported in the result.
pub fn reconcile_configured(
    global: &GlobalOpts,
    dry_run: bool,
    log: &Arc<dyn Log>,
) -> Result<RunResult> {
    let conf = open_config(global)?;
    let sync_file = conf.config.require_sync_file()?;

    log.stage("Loading sync file");
    let schema = schema::load(sync_file).map_err(|e| schema_error(e, sync_file))?;
    log.info(&format!(
        "{} entries in {}",
        schema.len(),
        sync_file.display()
    ));

    log.stage("Reconciling symlinks");
    let base_dir = base_dir(sync_file);
    let ctx = Context::new(Arc::clone(log), dry_run);
    let result = reconcile::reconcile(&schema, &base_dir, &ctx);

    log.stage("Summary");
    log.info(&result.summary());
    Ok(result)
}

/// Directory relative sources resolve against: the sync file's parent.
fn base_dir(sync_file: &Path) -> PathBuf {
    sync_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}
