//! A single source → target mapping.
use std::io;
use std::path::{Path, PathBuf};

use super::LinkStatus;
use super::symlink::paths_equal;
use crate::error::LinkError;
use crate::operations::{EntryKind, FileSystemOps};

/// One dotfile and where its symlink belongs.
///
/// Paths are fixed at discovery; the status is read from the filesystem on
/// every call and never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    rel_path: String,
    source_path: PathBuf,
    target_dir: PathBuf,
    target_path: PathBuf,
}

impl Link {
    /// Link for `rel_path` (components separated by `/`) whose symlink lives
    /// at `target_dir/rel_path`.
    #[must_use]
    pub fn new(
        rel_path: impl Into<String>,
        source_path: impl Into<PathBuf>,
        target_dir: impl Into<PathBuf>,
    ) -> Self {
        let rel_path = rel_path.into();
        let target_dir = target_dir.into();
        let target_path = rel_path
            .split('/')
            .fold(target_dir.clone(), |path, part| path.join(part));
        Self {
            rel_path,
            source_path: source_path.into(),
            target_dir,
            target_path,
        }
    }

    /// Path relative to the dotfiles root, `/`-separated.
    #[must_use]
    pub fn rel_path(&self) -> &str {
        &self.rel_path
    }

    /// Absolute path of the real file.
    #[must_use]
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Resolved target directory the relative path is appended to.
    #[must_use]
    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }

    /// Where the symlink belongs.
    #[must_use]
    pub fn target_path(&self) -> &Path {
        &self.target_path
    }

    /// Directory that must exist before the symlink can be created.
    #[must_use]
    pub fn target_parent(&self) -> &Path {
        self.target_path.parent().unwrap_or(&self.target_dir)
    }

    /// Current state of the target path.
    #[must_use]
    pub fn status(&self, fs: &dyn FileSystemOps) -> LinkStatus {
        match fs.entry(&self.target_path) {
            EntryKind::Missing => LinkStatus::NoLink,
            EntryKind::Symlink(referent) if paths_equal(&referent, &self.source_path) => {
                LinkStatus::Linked
            }
            EntryKind::Symlink(_) | EntryKind::File | EntryKind::Dir => LinkStatus::Invalid,
        }
    }

    /// Referent of the symlink at the target path, dangling or not.
    #[must_use]
    pub fn existing_target_path(&self, fs: &dyn FileSystemOps) -> Option<PathBuf> {
        match fs.entry(&self.target_path) {
            EntryKind::Symlink(referent) => Some(referent),
            _ => None,
        }
    }

    /// Whether the target path resolves to the source file itself, which
    /// happens when a configured `path` points back into the dotfiles tree.
    /// Such a link must never be replaced.
    #[must_use]
    pub fn targets_source(&self, fs: &dyn FileSystemOps) -> bool {
        fs.same_entry(&self.target_path, &self.source_path)
    }

    /// Create the symlink `target_path → source_path`.
    ///
    /// # Errors
    ///
    /// - [`LinkError::TargetExists`] if anything, including a dangling
    ///   symlink, occupies the target path.
    /// - [`LinkError::SourceMissing`] if the source file is gone.
    /// - [`LinkError::TargetDirectoryMissing`] if the target's parent is not
    ///   a directory.
    /// - [`LinkError::Io`] if the symlink call itself fails.
    pub fn link(&self, fs: &dyn FileSystemOps) -> Result<(), LinkError> {
        if fs.entry(&self.target_path) != EntryKind::Missing {
            return Err(LinkError::TargetExists(self.target_path.clone()));
        }
        if !fs.exists(&self.source_path) {
            return Err(LinkError::SourceMissing(self.source_path.clone()));
        }
        if !fs.is_dir(self.target_parent()) {
            return Err(LinkError::TargetDirectoryMissing(
                self.target_parent().to_path_buf(),
            ));
        }
        fs.symlink(&self.source_path, &self.target_path)
            .map_err(|e| match e.kind() {
                io::ErrorKind::AlreadyExists => LinkError::TargetExists(self.target_path.clone()),
                _ => LinkError::io("linking", &self.target_path, e),
            })
    }
}
