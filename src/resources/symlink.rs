//! Symlink resource.
use std::path::PathBuf;

use super::LinkState;
use crate::error::{LinkError, LinkOperation};
use crate::operations::{FileSystemOps, NodeKind};
use crate::reconcile::Outcome;

/// A symlink that should exist at `target` and point to `source`.
#[derive(Debug, Clone)]
pub struct SymlinkResource {
    /// The resolved source (what the symlink points to).
    pub source: PathBuf,
    /// The destination path (where the symlink must exist).
    pub target: PathBuf,
}

impl SymlinkResource {
    /// Create a new symlink resource.
    #[must_use]
    pub const fn new(source: PathBuf, target: PathBuf) -> Self {
        Self { source, target }
    }

    /// Human-readable description of this resource.
    #[must_use]
    pub fn description(&self) -> String {
        format!("{} -> {}", self.target.display(), self.source.display())
    }

    /// Classify the node at `target` without following symlinks.
    ///
    /// A dangling symlink is still a symlink and is compared by target.  The
    /// target comparison is exact: neither side is canonicalized.
    ///
    /// # Errors
    ///
    /// Returns a [`LinkError`] if the destination cannot be inspected or an
    /// existing link cannot be read.
    pub fn current_state(&self, fs: &dyn FileSystemOps) -> Result<LinkState, LinkError> {
        let kind = fs
            .node_kind(&self.target)
            .map_err(|e| LinkError::io(LinkOperation::Inspect, &self.target, e))?;

        match kind {
            None => Ok(LinkState::Missing),
            Some(NodeKind::Symlink) => {
                let current = fs
                    .read_link(&self.target)
                    .map_err(|e| LinkError::io(LinkOperation::ReadLink, &self.target, e))?;
                if current.as_os_str() == self.source.as_os_str() {
                    Ok(LinkState::Correct)
                } else {
                    Ok(LinkState::Incorrect { current })
                }
            }
            Some(kind) => Ok(LinkState::Blocked { kind }),
        }
    }

    /// Apply the action `state` calls for and return the resulting outcome.
    ///
    /// `Missing` creates the link; `Incorrect` removes the old link and then
    /// creates the new one; `Correct` and `Blocked` touch nothing.  If the
    /// removal succeeds but the creation fails, the destination is left
    /// absent.
    ///
    /// # Errors
    ///
    /// Returns a [`LinkError`] naming the step that failed.
    pub fn apply(&self, state: &LinkState, fs: &dyn FileSystemOps) -> Result<Outcome, LinkError> {
        match state {
            LinkState::Missing => self.create(fs)?,
            LinkState::Incorrect { .. } => {
                fs.remove_link(&self.target)
                    .map_err(|e| LinkError::io(LinkOperation::Remove, &self.target, e))?;
                self.create(fs)?;
            }
            LinkState::Correct | LinkState::Blocked { .. } => {}
        }
        Ok(state.outcome())
    }

    fn create(&self, fs: &dyn FileSystemOps) -> Result<(), LinkError> {
        fs.create_symlink(&self.source, &self.target)
            .map_err(|e| LinkError::io(LinkOperation::Create, &self.target, e))
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::operations::MockFileSystemOps;
    use std::path::Path;

    fn resource() -> SymlinkResource {
        SymlinkResource::new(PathBuf::from("/repo/bashrc"), PathBuf::from("/home/u/.bashrc"))
    }

    #[test]
    fn description_names_both_paths() {
        let d = resource().description();
        assert_eq!(d, "/home/u/.bashrc -> /repo/bashrc");
    }

    #[test]
    fn missing_when_nothing_at_target() {
        let fs = MockFileSystemOps::new();
        assert_eq!(resource().current_state(&fs).unwrap(), LinkState::Missing);
    }

    #[test]
    fn correct_when_link_points_to_source() {
        let fs = MockFileSystemOps::new().with_symlink("/home/u/.bashrc", "/repo/bashrc");
        assert_eq!(resource().current_state(&fs).unwrap(), LinkState::Correct);
    }

    #[test]
    fn incorrect_when_link_points_elsewhere() {
        let fs = MockFileSystemOps::new().with_symlink("/home/u/.bashrc", "/old/bashrc");
        assert_eq!(
            resource().current_state(&fs).unwrap(),
            LinkState::Incorrect {
                current: PathBuf::from("/old/bashrc")
            }
        );
    }

    #[test]
    fn comparison_is_not_canonicalized() {
        let fs = MockFileSystemOps::new().with_symlink("/home/u/.bashrc", "/repo/./bashrc");
        assert!(matches!(
            resource().current_state(&fs).unwrap(),
            LinkState::Incorrect { .. }
        ));
    }

    #[test]
    fn blocked_when_regular_file_or_directory() {
        let fs = MockFileSystemOps::new().with_file("/home/u/.bashrc");
        assert_eq!(
            resource().current_state(&fs).unwrap(),
            LinkState::Blocked {
                kind: NodeKind::File
            }
        );

        let fs = MockFileSystemOps::new().with_dir("/home/u/.bashrc");
        assert_eq!(
            resource().current_state(&fs).unwrap(),
            LinkState::Blocked {
                kind: NodeKind::Directory
            }
        );
    }

    #[test]
    fn inspect_failure_is_reported() {
        let fs = MockFileSystemOps::new().with_failing_inspect("/home/u/.bashrc");
        let err = resource().current_state(&fs).unwrap_err();
        assert_eq!(err.operation(), LinkOperation::Inspect);
    }

    #[test]
    fn apply_missing_creates_link() {
        let fs = MockFileSystemOps::new();
        let outcome = resource().apply(&LinkState::Missing, &fs).unwrap();
        assert_eq!(outcome, Outcome::Created);
        assert_eq!(
            fs.link_target(Path::new("/home/u/.bashrc")),
            Some(PathBuf::from("/repo/bashrc"))
        );
    }

    #[test]
    fn apply_incorrect_replaces_link() {
        let fs = MockFileSystemOps::new().with_symlink("/home/u/.bashrc", "/old/bashrc");
        let r = resource();
        let state = r.current_state(&fs).unwrap();
        assert_eq!(r.apply(&state, &fs).unwrap(), Outcome::Replaced);
        assert_eq!(
            fs.link_target(Path::new("/home/u/.bashrc")),
            Some(PathBuf::from("/repo/bashrc"))
        );
        assert_eq!(fs.mutation_count(), 2);
    }

    #[test]
    fn apply_blocked_touches_nothing() {
        let fs = MockFileSystemOps::new().with_file("/home/u/.bashrc");
        let state = LinkState::Blocked {
            kind: NodeKind::File,
        };
        assert_eq!(
            resource().apply(&state, &fs).unwrap(),
            Outcome::Conflict {
                kind: NodeKind::File
            }
        );
        assert_eq!(fs.mutation_count(), 0);
    }

    #[test]
    fn create_failure_is_propagated() {
        let fs = MockFileSystemOps::new().with_failing_create("/home/u/.bashrc");
        let err = resource().apply(&LinkState::Missing, &fs).unwrap_err();
        assert_eq!(err.operation(), LinkOperation::Create);
    }

    #[test]
    fn failed_create_after_remove_leaves_destination_absent() {
        let fs = MockFileSystemOps::new()
            .with_symlink("/home/u/.bashrc", "/old/bashrc")
            .with_failing_create("/home/u/.bashrc");
        let r = resource();
        let state = r.current_state(&fs).unwrap();
        let err = r.apply(&state, &fs).unwrap_err();
        assert_eq!(err.operation(), LinkOperation::Create);
        assert!(!fs.exists(Path::new("/home/u/.bashrc")));
    }
}
