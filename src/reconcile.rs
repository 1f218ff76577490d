//! Reconciliation engine: bring the filesystem into agreement with a schema.
//!
//! Entries are processed strictly in schema order.  Each entry is resolved,
//! classified and corrected independently; a conflict or an I/O failure on
//! one entry is recorded in its [`EntryReport`] and the run moves on to the
//! next entry.  Changes already applied are never rolled back.
use std::mem;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::LinkError;
use crate::logging::Log;
use crate::operations::{FileSystemOps, NodeKind, SystemFileSystemOps};
use crate::paths;
use crate::resources::LinkState;
use crate::resources::symlink::SymlinkResource;
use crate::schema::{Schema, SyncEntry};

/// Shared context for a reconciliation run.
pub struct Context {
    /// Logger for per-entry output.
    pub log: Arc<dyn Log>,
    /// Filesystem operation abstraction (injectable for testing).
    pub fs_ops: Arc<dyn FileSystemOps>,
    /// Classify and report only; perform no mutations.
    pub dry_run: bool,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("log", &"<dyn Log>")
            .field("fs_ops", &self.fs_ops)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl Context {
    /// Create a context operating on the real filesystem.
    #[must_use]
    pub fn new(log: Arc<dyn Log>, dry_run: bool) -> Self {
        Self {
            log,
            fs_ops: Arc::new(SystemFileSystemOps),
            dry_run,
        }
    }

    /// Replace the filesystem backend.
    #[must_use]
    pub fn with_fs_ops(mut self, fs_ops: Arc<dyn FileSystemOps>) -> Self {
        self.fs_ops = fs_ops;
        self
    }
}

/// What happened (or, in a dry run, would happen) to one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A new symlink was created.
    Created,
    /// The existing symlink already pointed at the source.
    Unchanged,
    /// A symlink pointing elsewhere was replaced.
    Replaced,
    /// A non-symlink occupies the destination and was left untouched.
    Conflict {
        /// Type of the occupying node.
        kind: NodeKind,
    },
}

impl Outcome {
    /// Whether two outcomes are the same variant, ignoring conflict details.
    #[must_use]
    pub fn same_kind(self, other: Self) -> bool {
        mem::discriminant(&self) == mem::discriminant(&other)
    }
}

/// Result of reconciling a single entry.
#[derive(Debug)]
pub struct EntryReport {
    /// Destination path as written in the schema.
    pub destination: PathBuf,
    /// Source after resolution against the base directory.
    pub source: PathBuf,
    /// Outcome, or the I/O failure that aborted this entry.
    pub result: Result<Outcome, LinkError>,
}

/// Aggregated per-entry results of one run, in schema order.
#[derive(Debug, Default)]
pub struct RunResult {
    /// One report per schema entry.
    pub reports: Vec<EntryReport>,
    /// Whether this run was a dry run.
    pub dry_run: bool,
}

impl RunResult {
    /// `true` when no entry failed with an I/O error.  Conflicts do not
    /// count as failures.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failure_count() == 0
    }

    /// Number of entries that failed with an I/O error.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.reports.iter().filter(|r| r.result.is_err()).count()
    }

    /// Number of entries blocked by a non-symlink.
    #[must_use]
    pub fn conflict_count(&self) -> usize {
        self.count(Outcome::Conflict {
            kind: NodeKind::Other,
        })
    }

    /// Number of entries with the given outcome variant.
    ///
    /// Conflicts are counted regardless of the blocking node's kind.
    #[must_use]
    pub fn count(&self, outcome: Outcome) -> usize {
        self.reports
            .iter()
            .filter(|r| r.result.as_ref().is_ok_and(|o| o.same_kind(outcome)))
            .count()
    }

    /// The failed entries, in schema order.
    pub fn failures(&self) -> impl Iterator<Item = (&Path, &LinkError)> {
        self.reports
            .iter()
            .filter_map(|r| r.result.as_ref().err().map(|e| (r.destination.as_path(), e)))
    }

    /// One-line summary of the run.
    ///
    /// # Examples
    ///
    /// ```
    /// use dotlink::reconcile::RunResult;
    ///
    /// let result = RunResult::default();
    /// assert_eq!(
    ///     result.summary(),
    ///     "0 entries: 0 created, 0 replaced, 0 unchanged, 0 conflicts, 0 failed"
    /// );
    /// ```
    #[must_use]
    pub fn summary(&self) -> String {
        let prefix = if self.dry_run { "[dry run] " } else { "" };
        format!(
            "{prefix}{} entries: {} created, {} replaced, {} unchanged, {} conflicts, {} failed",
            self.reports.len(),
            self.count(Outcome::Created),
            self.count(Outcome::Replaced),
            self.count(Outcome::Unchanged),
            self.conflict_count(),
            self.failure_count(),
        )
    }
}

/// Reconcile every entry of `schema`, resolving relative sources against
/// `base_dir`.
///
/// Never fails as a whole: per-entry errors are returned inside the
/// [`RunResult`].
#[must_use]
pub fn reconcile(schema: &Schema, base_dir: &Path, ctx: &Context) -> RunResult {
    tracing::debug!(entries = schema.len(), base = %base_dir.display(), "reconciling schema");
    let reports = schema
        .into_iter()
        .map(|entry| reconcile_entry(entry, base_dir, ctx))
        .collect();
    RunResult {
        reports,
        dry_run: ctx.dry_run,
    }
}

fn reconcile_entry(entry: &SyncEntry, base_dir: &Path, ctx: &Context) -> EntryReport {
    let resource = SymlinkResource::new(
        paths::resolve(&entry.source, base_dir),
        PathBuf::from(&entry.destination),
    );
    let result = process(&resource, ctx);
    if let Err(e) = &result {
        ctx.log.error(&e.to_string());
    }
    EntryReport {
        destination: resource.target,
        source: resource.source,
        result,
    }
}

fn process(resource: &SymlinkResource, ctx: &Context) -> Result<Outcome, LinkError> {
    let desc = resource.description();
    let state = resource.current_state(ctx.fs_ops.as_ref())?;

    match &state {
        LinkState::Correct => ctx.log.debug(&format!("ok: {desc}")),
        LinkState::Blocked { kind } => ctx.log.warn(&format!(
            "conflict: {} is a {}, not a symlink; left untouched",
            resource.target.display(),
            kind.describe()
        )),
        LinkState::Missing if ctx.dry_run => ctx.log.dry_run(&format!("would link {desc}")),
        LinkState::Incorrect { current } if ctx.dry_run => ctx.log.dry_run(&format!(
            "would relink {desc} (currently {})",
            current.display()
        )),
        LinkState::Missing | LinkState::Incorrect { .. } => {}
    }

    if ctx.dry_run {
        return Ok(state.outcome());
    }

    let outcome = resource.apply(&state, ctx.fs_ops.as_ref())?;
    match (&state, outcome) {
        (_, Outcome::Created) => ctx.log.info(&format!("linked {desc}")),
        (LinkState::Incorrect { current }, Outcome::Replaced) => ctx.log.info(&format!(
            "relinked {desc} (was {})",
            current.display()
        )),
        _ => {}
    }
    Ok(outcome)
}
