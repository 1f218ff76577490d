//! Filesystem operation abstractions for dependency injection.
//!
//! Provides the [`FileSystemOps`] trait so that the reconciliation engine can
//! be unit-tested without touching the real filesystem.  Production code uses
//! [`SystemFileSystemOps`]; tests use `MockFileSystemOps`.

use std::io;
use std::path::{Path, PathBuf};

/// Type of a filesystem node as reported by `lstat` (symlinks not followed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// The node is itself a symbolic link (dangling or not).
    Symlink,
    /// A regular file.
    File,
    /// A real directory.
    Directory,
    /// Anything else (socket, FIFO, device, ...).
    Other,
}

impl NodeKind {
    /// Classify a [`std::fs::FileType`] obtained from `symlink_metadata`.
    #[must_use]
    pub fn from_file_type(ft: std::fs::FileType) -> Self {
        if ft.is_symlink() {
            Self::Symlink
        } else if ft.is_file() {
            Self::File
        } else if ft.is_dir() {
            Self::Directory
        } else {
            Self::Other
        }
    }

    /// Short human-readable name used in log messages.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Symlink => "symlink",
            Self::File => "regular file",
            Self::Directory => "directory",
            Self::Other => "special file",
        }
    }
}

/// Abstraction over the filesystem calls used by the reconciliation engine.
///
/// None of these methods follow symlinks at `path`.
pub trait FileSystemOps: Send + Sync + std::fmt::Debug {
    /// Return the type of the node at `path`, or `None` if nothing exists there.
    ///
    /// # Errors
    ///
    /// Returns an error for any failure other than "not found".
    fn node_kind(&self, path: &Path) -> io::Result<Option<NodeKind>>;

    /// Read the target of the symbolic link at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is not a symlink or cannot be read.
    fn read_link(&self, path: &Path) -> io::Result<PathBuf>;

    /// Remove the symbolic link at `path` (never its target).
    ///
    /// # Errors
    ///
    /// Returns an error if removal fails.
    fn remove_link(&self, path: &Path) -> io::Result<()>;

    /// Create a symbolic link at `link` pointing to `target`.
    ///
    /// # Errors
    ///
    /// Returns an error if the link cannot be created.
    fn create_symlink(&self, target: &Path, link: &Path) -> io::Result<()>;
}

/// Production [`FileSystemOps`] implementation that delegates to [`std::fs`].
#[derive(Debug, Default)]
pub struct SystemFileSystemOps;

impl FileSystemOps for SystemFileSystemOps {
    fn node_kind(&self, path: &Path) -> io::Result<Option<NodeKind>> {
        match std::fs::symlink_metadata(path) {
            Ok(meta) => Ok(Some(NodeKind::from_file_type(meta.file_type()))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        std::fs::read_link(path)
    }

    fn remove_link(&self, path: &Path) -> io::Result<()> {
        remove_symlink(path)
    }

    fn create_symlink(&self, target: &Path, link: &Path) -> io::Result<()> {
        #[cfg(unix)]
        {
            std::os::unix::fs::symlink(target, link)
        }

        #[cfg(windows)]
        {
            if target.is_dir() {
                std::os::windows::fs::symlink_dir(target, link)
            } else {
                std::os::windows::fs::symlink_file(target, link)
            }
        }
    }
}

/// Remove a symlink, handling platform differences.
///
/// On Windows, directory symlinks must be removed with `remove_dir`, and
/// `symlink_metadata().is_dir()` is `false` for them, so the raw
/// `FILE_ATTRIBUTE_DIRECTORY` flag is checked instead.
fn remove_symlink(path: &Path) -> io::Result<()> {
    #[cfg(windows)]
    {
        use std::os::windows::fs::MetadataExt;
        let meta = std::fs::symlink_metadata(path)?;
        if meta.file_attributes() & 0x10 != 0 {
            return std::fs::remove_dir(path);
        }
    }
    std::fs::remove_file(path)
}

/// In-memory [`FileSystemOps`] for unit tests.
///
/// Pre-configure nodes with the builder-style methods, then pass
/// `Arc::new(mock)` into a [`Context`](crate::reconcile::Context).  Every
/// successful mutation is counted so tests can assert that a run touched
/// nothing.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MockFileSystemOps {
    nodes: std::sync::Mutex<std::collections::HashMap<PathBuf, MockNode>>,
    failing_creates: std::collections::HashSet<PathBuf>,
    failing_inspects: std::collections::HashSet<PathBuf>,
    mutations: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
#[derive(Debug, Clone, PartialEq, Eq)]
enum MockNode {
    File,
    Directory,
    Symlink(PathBuf),
}

#[cfg(test)]
#[allow(clippy::expect_used)]
impl MockFileSystemOps {
    /// Create an empty mock filesystem.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(self, path: impl Into<PathBuf>, node: MockNode) -> Self {
        self.nodes
            .lock()
            .expect("mock nodes poisoned")
            .insert(path.into(), node);
        self
    }

    /// Add a regular file at `path`.
    #[must_use]
    pub fn with_file(self, path: impl Into<PathBuf>) -> Self {
        self.insert(path, MockNode::File)
    }

    /// Add a directory at `path`.
    #[must_use]
    pub fn with_dir(self, path: impl Into<PathBuf>) -> Self {
        self.insert(path, MockNode::Directory)
    }

    /// Add a symlink at `path` pointing to `target`.
    #[must_use]
    pub fn with_symlink(self, path: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        self.insert(path, MockNode::Symlink(target.into()))
    }

    /// Make every `create_symlink` at `path` fail with `PermissionDenied`.
    #[must_use]
    pub fn with_failing_create(mut self, path: impl Into<PathBuf>) -> Self {
        self.failing_creates.insert(path.into());
        self
    }

    /// Make every `node_kind` query for `path` fail with `PermissionDenied`.
    #[must_use]
    pub fn with_failing_inspect(mut self, path: impl Into<PathBuf>) -> Self {
        self.failing_inspects.insert(path.into());
        self
    }

    /// Target of the symlink at `path`, if one exists.
    #[must_use]
    pub fn link_target(&self, path: &Path) -> Option<PathBuf> {
        match self.nodes.lock().expect("mock nodes poisoned").get(path) {
            Some(MockNode::Symlink(t)) => Some(t.clone()),
            _ => None,
        }
    }

    /// Whether any node exists at `path`.
    #[must_use]
    pub fn exists(&self, path: &Path) -> bool {
        self.nodes
            .lock()
            .expect("mock nodes poisoned")
            .contains_key(path)
    }

    /// Number of successful create/remove calls so far.
    #[must_use]
    pub fn mutation_count(&self) -> usize {
        self.mutations.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
impl FileSystemOps for MockFileSystemOps {
    fn node_kind(&self, path: &Path) -> io::Result<Option<NodeKind>> {
        if self.failing_inspects.contains(path) {
            return Err(io::Error::from(io::ErrorKind::PermissionDenied));
        }
        Ok(self
            .nodes
            .lock()
            .expect("mock nodes poisoned")
            .get(path)
            .map(|node| match node {
                MockNode::File => NodeKind::File,
                MockNode::Directory => NodeKind::Directory,
                MockNode::Symlink(_) => NodeKind::Symlink,
            }))
    }

    fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        self.link_target(path)
            .ok_or_else(|| io::Error::from(io::ErrorKind::InvalidInput))
    }

    fn remove_link(&self, path: &Path) -> io::Result<()> {
        let mut nodes = self.nodes.lock().expect("mock nodes poisoned");
        match nodes.get(path) {
            Some(MockNode::Symlink(_)) => {
                nodes.remove(path);
                self.mutations
                    .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                Ok(())
            }
            Some(_) => Err(io::Error::from(io::ErrorKind::InvalidInput)),
            None => Err(io::Error::from(io::ErrorKind::NotFound)),
        }
    }

    fn create_symlink(&self, target: &Path, link: &Path) -> io::Result<()> {
        if self.failing_creates.contains(link) {
            return Err(io::Error::from(io::ErrorKind::PermissionDenied));
        }
        let mut nodes = self.nodes.lock().expect("mock nodes poisoned");
        if nodes.contains_key(link) {
            return Err(io::Error::from(io::ErrorKind::AlreadyExists));
        }
        nodes.insert(link.to_path_buf(), MockNode::Symlink(target.to_path_buf()));
        self.mutations
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Ok(())
    }
}
