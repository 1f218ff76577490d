//! Source path resolution.
use std::path::{Path, PathBuf};

/// Resolve an entry source against `base_dir`.
///
/// Absolute sources are returned unchanged.  Relative sources are joined onto
/// `base_dir` without any normalization: `..` components are kept and no
/// symlinks are followed.
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use dotlink::paths::resolve;
///
/// let base = Path::new("/home/u/dotfiles");
/// assert_eq!(resolve("bashrc", base), PathBuf::from("/home/u/dotfiles/bashrc"));
/// assert_eq!(resolve("/etc/hosts", base), PathBuf::from("/etc/hosts"));
/// ```
#[must_use]
pub fn resolve(source: impl AsRef<Path>, base_dir: &Path) -> PathBuf {
    let source = source.as_ref();
    if source.is_absolute() {
        source.to_path_buf()
    } else {
        base_dir.join(source)
    }
}
