//! Filesystem operation abstractions for dependency injection.
//!
//! Provides the [`FileSystemOps`] trait so that status reads, discovery and
//! reconciliation can be unit-tested without touching the real filesystem.
//! Production code uses [`SystemFileSystemOps`]; tests use
//! `MockFileSystemOps`, an in-memory tree that records every mutation.

use std::io;
use std::path::{Path, PathBuf};

use crate::resources::symlink;

/// What occupies a path, without following a final symlink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    /// Nothing is there.
    Missing,
    /// A regular file (or anything that is not a directory or symlink).
    File,
    /// A real directory.
    Dir,
    /// A symbolic link with its raw, unresolved referent.
    Symlink(PathBuf),
}

/// Abstraction over the filesystem calls made by the engine.
///
/// Every mutating method is a single filesystem call; none of them recurse
/// or delete non-empty directories.
pub trait FileSystemOps: Send + Sync + std::fmt::Debug {
    /// Inspect `path` without following a final symlink.
    ///
    /// Unreadable entries are reported as [`EntryKind::Missing`].
    fn entry(&self, path: &Path) -> EntryKind;

    /// Returns `true` if `path` exists, following symlinks.
    fn exists(&self, path: &Path) -> bool;

    /// Returns `true` if `path` is a directory, following symlinks.
    fn is_dir(&self, path: &Path) -> bool;

    /// Returns the immediate child paths inside `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` cannot be opened or read as a directory.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>>;

    /// Remove the file, symlink or empty directory at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if removal fails.
    fn remove(&self, path: &Path) -> io::Result<()>;

    /// Create `path` and any missing parents.
    ///
    /// # Errors
    ///
    /// Returns an error if a component cannot be created. An already existing
    /// directory is not an error.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Create a symlink at `link` pointing to `source`.
    ///
    /// # Errors
    ///
    /// Returns an error if `link` is occupied or its parent is missing.
    fn symlink(&self, source: &Path, link: &Path) -> io::Result<()>;

    /// Read a UTF-8 file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Whether `a` and `b` name the same directory entry once the symlinks in
    /// their parent directories are resolved. A final symlink is not followed.
    fn same_entry(&self, a: &Path, b: &Path) -> bool;
}

/// Production [`FileSystemOps`] implementation that delegates to [`std::fs`].
#[derive(Debug, Default)]
pub struct SystemFileSystemOps;

impl FileSystemOps for SystemFileSystemOps {
    fn entry(&self, path: &Path) -> EntryKind {
        let Ok(meta) = std::fs::symlink_metadata(path) else {
            return EntryKind::Missing;
        };
        if meta.file_type().is_symlink() {
            std::fs::read_link(path).map_or(EntryKind::File, EntryKind::Symlink)
        } else if meta.is_dir() {
            EntryKind::Dir
        } else {
            EntryKind::File
        }
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        std::fs::read_dir(path)?
            .map(|e| e.map(|entry| entry.path()))
            .collect()
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        symlink::remove_entry(path)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn symlink(&self, source: &Path, link: &Path) -> io::Result<()> {
        symlink::create_symlink(source, link)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn same_entry(&self, a: &Path, b: &Path) -> bool {
        let resolve = |p: &Path| -> Option<PathBuf> {
            let name = p.file_name()?;
            let parent = p.parent().filter(|d| !d.as_os_str().is_empty())?;
            dunce::canonicalize(parent).ok().map(|dir| dir.join(name))
        };
        if symlink::paths_equal(a, b) {
            return true;
        }
        match (resolve(a), resolve(b)) {
            (Some(a), Some(b)) => symlink::paths_equal(&a, &b),
            _ => false,
        }
    }
}

#[cfg(test)]
pub use mock::{MockEntry, MockFileSystemOps};


#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn system_entry_kinds() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("f");
        std::fs::write(&file, "x").unwrap();
        let ops = SystemFileSystemOps;

        assert_eq!(ops.entry(&file), EntryKind::File);
        assert_eq!(ops.entry(dir.path()), EntryKind::Dir);
        assert_eq!(ops.entry(&dir.path().join("none")), EntryKind::Missing);
    }

    #[cfg(unix)]
    #[test]
    fn system_entry_reports_dangling_symlink() {
        let dir = tempfile::tempdir().unwrap();
        let link = dir.path().join("l");
        let ops = SystemFileSystemOps;
        ops.symlink(&dir.path().join("gone"), &link).unwrap();

        assert_eq!(ops.entry(&link), EntryKind::Symlink(dir.path().join("gone")));
        assert!(!ops.exists(&link));
        ops.remove(&link).unwrap();
        assert_eq!(ops.entry(&link), EntryKind::Missing);
    }

    #[test]
    fn system_remove_refuses_non_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("sub");
        std::fs::create_dir(&sub).unwrap();
        std::fs::write(sub.join("f"), "x").unwrap();

        assert!(SystemFileSystemOps.remove(&sub).is_err());
        assert!(sub.join("f").exists());
    }

    #[test]
    fn system_read_dir_lists_children() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a"), "").unwrap();
        std::fs::create_dir(dir.path().join("b")).unwrap();
        let mut entries = SystemFileSystemOps.read_dir(dir.path()).unwrap();
        entries.sort();
        assert_eq!(entries, vec![dir.path().join("a"), dir.path().join("b")]);
    }

    #[test]
    fn mock_symlink_requires_parent_and_free_slot() {
        let fs = MockFileSystemOps::new().with_file("/home/u/.bashrc", "");
        assert!(fs.symlink(Path::new("/s"), Path::new("/home/u/.bashrc")).is_err());
        assert!(fs.symlink(Path::new("/s"), Path::new("/nope/x")).is_err());
        fs.symlink(Path::new("/s"), Path::new("/home/u/.vimrc")).unwrap();
        assert_eq!(
            fs.entry(Path::new("/home/u/.vimrc")),
            EntryKind::Symlink(PathBuf::from("/s"))
        );
    }

    #[test]
    fn mock_exists_follows_symlinks() {
        let fs = MockFileSystemOps::new()
            .with_file("/src/a", "x")
            .with_symlink("/t/a", "/src/a")
            .with_symlink("/t/b", "/src/missing");
        assert!(fs.exists(Path::new("/t/a")));
        assert!(!fs.exists(Path::new("/t/b")));
        assert!(!fs.is_dir(Path::new("/t/a")));
        assert!(fs.is_dir(Path::new("/t")));
    }

    #[test]
    fn mock_read_dir_and_remove() {
        let fs = MockFileSystemOps::new()
            .with_file("/d/a", "")
            .with_file("/d/sub/b", "");
        assert_eq!(
            fs.read_dir(Path::new("/d")).unwrap(),
            vec![PathBuf::from("/d/a"), PathBuf::from("/d/sub")]
        );
        assert!(fs.remove(Path::new("/d/sub")).is_err());
        fs.remove(Path::new("/d/sub/b")).unwrap();
        fs.remove(Path::new("/d/sub")).unwrap();
        assert_eq!(fs.entry(Path::new("/d/sub")), EntryKind::Missing);
    }

    #[test]
    fn mock_create_dir_all_is_idempotent() {
        let fs = MockFileSystemOps::new();
        fs.create_dir_all(Path::new("/a/b")).unwrap();
        fs.create_dir_all(Path::new("/a/b")).unwrap();
        assert!(fs.is_dir(Path::new("/a")));
        assert_eq!(fs.get("/a/b"), Some(MockEntry::Dir));
    }

    #[test]
    fn mock_racing_dir_appears_and_reports_already_exists() {
        let fs = MockFileSystemOps::new().with_racing_dir("/a/b");
        let err = fs.create_dir_all(Path::new("/a/b")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert!(fs.is_dir(Path::new("/a/b")));
    }

    #[cfg(unix)]
    #[test]
    fn system_same_entry_sees_through_symlinked_parent() {
        let tmp = tempfile::tempdir().unwrap();
        let real = tmp.path().join("dots");
        std::fs::create_dir(&real).unwrap();
        std::fs::write(real.join("f"), "x").unwrap();
        std::os::unix::fs::symlink(&real, tmp.path().join("alias")).unwrap();

        let ops = SystemFileSystemOps;
        assert!(ops.same_entry(&tmp.path().join("alias/f"), &real.join("f")));
        assert!(ops.same_entry(&real.join("f"), &real.join("f")));
        assert!(!ops.same_entry(&real.join("g"), &real.join("f")));
        assert!(!ops.same_entry(&tmp.path().join("nowhere/f"), &real.join("f")));
    }

    #[test]
    fn mock_failure_injection() {
        let fs = MockFileSystemOps::new()
            .with_file("/t/x", "")
            .with_failure("/t/x");
        let err = fs.remove(Path::new("/t/x")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
    }
}
