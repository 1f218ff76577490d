// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed workspace (a dotfiles repo holding
// the sync file, a fake home directory for link destinations, and a config
// file) plus a fluent builder so each test can set up an isolated
// environment without repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use dotlink::cli::GlobalOpts;
use dotlink::config::{ConfigFile, SYNC_FILE_NAME};
use dotlink::logging::Log;
use dotlink::schema::{self, Schema, SyncEntry};

/// A [`Log`] that records `(level, message)` pairs.
#[derive(Debug, Default)]
pub struct RecordingLog {
    entries: Mutex<Vec<(&'static str, String)>>,
}

impl RecordingLog {
    fn push(&self, level: &'static str, msg: &str) {
        self.entries
            .lock()
            .expect("log lock")
            .push((level, msg.to_string()));
    }

    /// Messages recorded at `level`.
    pub fn at(&self, level: &str) -> Vec<String> {
        self.entries
            .lock()
            .expect("log lock")
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }
}

impl Log for RecordingLog {
    fn stage(&self, msg: &str) {
        self.push("stage", msg);
    }
    fn info(&self, msg: &str) {
        self.push("info", msg);
    }
    fn debug(&self, msg: &str) {
        self.push("debug", msg);
    }
    fn warn(&self, msg: &str) {
        self.push("warn", msg);
    }
    fn error(&self, msg: &str) {
        self.push("error", msg);
    }
    fn dry_run(&self, msg: &str) {
        self.push("dry_run", msg);
    }
}

/// An isolated workspace backed by a [`tempfile::TempDir`].
///
/// Layout:
/// - `repo/`        dotfiles directory holding the sync file and sources
/// - `home/`        destination directory for links
/// - `conf.yaml`    config file passed through `--conf`
pub struct Workspace {
    /// Temporary directory containing everything.
    pub root: tempfile::TempDir,
    /// Recorder passed to commands.
    pub recorder: Arc<RecordingLog>,
}

impl Workspace {
    /// Create an empty workspace with `repo/` and `home/` directories.
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        std::fs::create_dir_all(root.path().join("repo")).expect("create repo dir");
        std::fs::create_dir_all(root.path().join("home")).expect("create home dir");
        Self {
            root,
            recorder: Arc::new(RecordingLog::default()),
        }
    }

    /// The dotfiles directory.
    pub fn repo(&self) -> PathBuf {
        dunce::canonicalize(self.root.path().join("repo")).expect("canonical repo")
    }

    /// The fake home directory.
    pub fn home(&self) -> PathBuf {
        dunce::canonicalize(self.root.path().join("home")).expect("canonical home")
    }

    /// Path of the sync file inside the repo.
    pub fn sync_file(&self) -> PathBuf {
        self.repo().join(SYNC_FILE_NAME)
    }

    /// Path of the config file.
    pub fn config_path(&self) -> PathBuf {
        self.root.path().join("conf.yaml")
    }

    /// Global options pointing at this workspace's config.
    pub fn global(&self) -> GlobalOpts {
        GlobalOpts {
            conf: Some(self.config_path()),
        }
    }

    /// The recorder as a trait object, ready to hand to a command.
    pub fn log(&self) -> Arc<dyn Log> {
        self.recorder.clone()
    }

    /// The schema currently stored in the sync file.
    pub fn load_schema(&self) -> Schema {
        schema::load(&self.sync_file()).expect("load schema")
    }

    /// The sync file recorded in the config, if any.
    pub fn configured_sync_file(&self) -> Option<PathBuf> {
        ConfigFile::open(&self.config_path())
            .expect("open config")
            .config
            .syncfile
    }

    /// Absolute path of `name` under `home/`.
    pub fn home_path(&self, name: &str) -> PathBuf {
        self.home().join(name)
    }

    /// Target of the symlink at `path`, or `None` if it is not a symlink.
    pub fn link_target(path: &Path) -> Option<PathBuf> {
        std::fs::symlink_metadata(path)
            .ok()
            .filter(|m| m.file_type().is_symlink())
            .and_then(|_| std::fs::read_link(path).ok())
    }
}

/// Fluent builder for [`Workspace`].
pub struct WorkspaceBuilder {
    ws: Workspace,
    entries: Vec<SyncEntry>,
    initialised: bool,
}

impl WorkspaceBuilder {
    /// Begin building an empty workspace.
    pub fn new() -> Self {
        Self {
            ws: Workspace::new(),
            entries: Vec::new(),
            initialised: false,
        }
    }

    /// Write a source file `repo/<name>`.
    pub fn with_source(self, name: &str) -> Self {
        std::fs::write(self.ws.repo().join(name), name).expect("write source file");
        self
    }

    /// Add a sync entry whose destination is `home/<dest>`.
    pub fn with_entry(mut self, source: &str, dest: &str) -> Self {
        let destination = self.ws.home_path(dest);
        self.entries.push(SyncEntry::new(
            source,
            destination.to_string_lossy().into_owned(),
        ));
        self
    }

    /// Record the sync file in the config, as `init` would.
    pub fn initialised(mut self) -> Self {
        self.initialised = true;
        self
    }

    /// Write the sync file (and config, if initialised) and return the
    /// workspace.
    pub fn build(self) -> Workspace {
        let schema = Schema::from(self.entries);
        schema::save(&schema, &self.ws.sync_file()).expect("write sync file");
        if self.initialised {
            let mut conf = ConfigFile::open(&self.ws.config_path()).expect("open config");
            conf.config.syncfile = Some(self.ws.sync_file());
            conf.save().expect("save config");
        }
        self.ws
    }
}
