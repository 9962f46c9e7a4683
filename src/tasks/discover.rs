//! Walk the dotfiles directory and build one [`Link`] per file.
use std::path::{Path, PathBuf};

use crate::config::{ConfigStore, IgnoreList};
use crate::error::{DotfilesError, LinkError};
use crate::operations::{EntryKind, FileSystemOps};
use crate::platform::Environment;
use crate::resources::Link;

/// Discover every linkable file under `root`, sorted by relative path.
///
/// Entries whose file name is on the ignore list are skipped, and ignored
/// directories are not descended into. Symlinked directories are not
/// followed; symlinks to files are treated as files.
///
/// # Errors
///
/// Returns [`DotfilesError::RootMissing`] if `root` is not a directory, an
/// error if a directory cannot be read, or a platform error if a file has no
/// configured target directory and the platform has no default.
pub fn discover(
    root: &Path,
    store: &ConfigStore,
    ignore: &IgnoreList,
    env: &Environment,
    fs: &dyn FileSystemOps,
) -> Result<Vec<Link>, DotfilesError> {
    if !fs.is_dir(root) {
        return Err(DotfilesError::RootMissing(root.to_path_buf()));
    }

    let mut links = Vec::new();
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        let children = fs
            .read_dir(&dir)
            .map_err(|e| LinkError::io("reading directory", &dir, e))?;
        for child in children {
            let Some(name) = child.file_name().map(|n| n.to_string_lossy()) else {
                continue;
            };
            if ignore.contains(&name) {
                continue;
            }
            match fs.entry(&child) {
                EntryKind::Dir => pending.push(child),
                EntryKind::Symlink(_) if fs.is_dir(&child) => {}
                EntryKind::Missing => {}
                EntryKind::File | EntryKind::Symlink(_) => {
                    let rel_path = relative_path(root, &child);
                    let target_dir = target_dir_for(&rel_path, store, env)?;
                    links.push(Link::new(rel_path, child, target_dir));
                }
            }
        }
    }

    links.sort_by(|a, b| a.rel_path().cmp(b.rel_path()));
    Ok(links)
}

/// Target directory for `rel_path`: the most specific configured `path`,
/// expanded, or the platform default.
///
/// # Errors
///
/// Returns a platform error when nothing is configured and the platform has
/// no default.
pub fn target_dir_for(
    rel_path: &str,
    store: &ConfigStore,
    env: &Environment,
) -> Result<PathBuf, DotfilesError> {
    match store.get_platform_property("file", Some(rel_path), "path", env.platform()) {
        Some(raw) => Ok(env.expand(raw)),
        None => Ok(env.default_root(rel_path)?),
    }
}

/// `/`-joined path of `path` below `root`.
fn relative_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
