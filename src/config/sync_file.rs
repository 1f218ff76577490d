//! Locating the sync file.
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::Config;
use crate::error::ConfigError;

/// Name of the schema file `init` looks for.
pub const SYNC_FILE_NAME: &str = "dotlink.yaml";

/// Find [`SYNC_FILE_NAME`] directly inside `workdir` and return its
/// absolute path.
///
/// Only a regular file (or a symlink to one) qualifies; subdirectories are
/// not searched. A symlinked sync file is not followed: the returned path
/// stays in `workdir`, which is the base for relative sources.
///
/// # Errors
///
/// Returns [`ConfigError::SyncFileNotFound`] if there is no such file, or
/// [`ConfigError::Io`] if `workdir` cannot be inspected.
pub fn locate_sync_file(workdir: &Path) -> Result<PathBuf, ConfigError> {
    let candidate = workdir.join(SYNC_FILE_NAME);
    let not_found = || ConfigError::SyncFileNotFound {
        name: SYNC_FILE_NAME.to_string(),
        dir: workdir.to_path_buf(),
    };

    match fs::metadata(&candidate) {
        Ok(meta) if meta.is_file() => {}
        Ok(_) => return Err(not_found()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(not_found()),
        Err(source) => {
            return Err(ConfigError::Io {
                path: candidate,
                source,
            });
        }
    }

    let dir = dunce::canonicalize(workdir).map_err(|source| ConfigError::Io {
        path: workdir.to_path_buf(),
        source,
    })?;
    Ok(dir.join(SYNC_FILE_NAME))
}

/// The sync file `add` should write to: the configured one, or
/// [`SYNC_FILE_NAME`] in `cwd` when none is configured.
#[must_use]
pub fn resolve_sync_file(config: &Config, cwd: &Path) -> PathBuf {
    config
        .syncfile
        .clone()
        .unwrap_or_else(|| cwd.join(SYNC_FILE_NAME))
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn locate_finds_file_and_returns_absolute_path() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join(SYNC_FILE_NAME), "").unwrap();

        let found = locate_sync_file(tmp.path()).unwrap();
        assert!(found.is_absolute());
        assert_eq!(found, dunce::canonicalize(tmp.path()).unwrap().join(SYNC_FILE_NAME));
    }

    #[test]
    fn locate_reports_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let err = locate_sync_file(tmp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::SyncFileNotFound { .. }));
        assert!(err.to_string().contains(SYNC_FILE_NAME));
    }

    #[test]
    fn locate_ignores_directory_with_matching_name() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join(SYNC_FILE_NAME)).unwrap();
        let err = locate_sync_file(tmp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::SyncFileNotFound { .. }));
    }

    #[test]
    fn locate_does_not_search_subdirectories() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join("nested")).unwrap();
        fs::write(tmp.path().join("nested").join(SYNC_FILE_NAME), "").unwrap();
        assert!(locate_sync_file(tmp.path()).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn locate_keeps_symlinked_file_in_workdir() {
        let tmp = tempfile::tempdir().unwrap();
        let repo = tmp.path().join("repo");
        let store = tmp.path().join("store");
        fs::create_dir(&repo).unwrap();
        fs::create_dir(&store).unwrap();
        fs::write(store.join(SYNC_FILE_NAME), "").unwrap();
        std::os::unix::fs::symlink(store.join(SYNC_FILE_NAME), repo.join(SYNC_FILE_NAME))
            .unwrap();

        let found = locate_sync_file(&repo).unwrap();
        assert_eq!(found, dunce::canonicalize(&repo).unwrap().join(SYNC_FILE_NAME));
    }

    #[cfg(unix)]
    #[test]
    fn locate_rejects_dangling_symlink() {
        let tmp = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink(tmp.path().join("gone"), tmp.path().join(SYNC_FILE_NAME))
            .unwrap();
        let err = locate_sync_file(tmp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::SyncFileNotFound { .. }));
    }

    #[test]
    fn resolve_prefers_configured_file() {
        let config = Config {
            syncfile: Some(PathBuf::from("/repo/dotlink.yaml")),
        };
        assert_eq!(
            resolve_sync_file(&config, Path::new("/elsewhere")),
            PathBuf::from("/repo/dotlink.yaml")
        );
    }

    #[test]
    fn resolve_falls_back_to_cwd() {
        assert_eq!(
            resolve_sync_file(&Config::default(), Path::new("/work")),
            Path::new("/work").join(SYNC_FILE_NAME)
        );
    }
}
