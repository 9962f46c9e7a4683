//! Platform-specific symlink primitives.
use std::io;
use std::path::{Path, PathBuf};

/// Compare two paths for equality, handling UNC prefix normalization on Windows.
#[must_use]
pub fn paths_equal(a: &Path, b: &Path) -> bool {
    let normalize = |p: &Path| -> PathBuf {
        #[cfg(windows)]
        {
            let s = p.to_string_lossy();
            if let Some(stripped) = s.strip_prefix(r"\\?\") {
                return PathBuf::from(stripped);
            }
        }
        p.to_path_buf()
    };

    normalize(a) == normalize(b)
}

/// Create a symlink at `link` pointing to `source`.
///
/// # Errors
///
/// Returns the underlying OS error, e.g. `AlreadyExists` when `link` is
/// occupied.
pub fn create_symlink(source: &Path, link: &Path) -> io::Result<()> {
    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(source, link)
    }

    #[cfg(windows)]
    {
        if source.is_dir() {
            std::os::windows::fs::symlink_dir(source, link)
        } else {
            std::os::windows::fs::symlink_file(source, link)
        }
    }

    #[cfg(not(any(unix, windows)))]
    {
        let _ = (source, link);
        Err(io::Error::from(io::ErrorKind::Unsupported))
    }
}

/// Remove a file, symlink or empty directory.
///
/// On Windows, directory symlinks must be removed with `remove_dir`, and
/// `symlink_metadata().is_dir()` is `false` for them, so the raw attribute is
/// checked instead. An access-denied `remove_dir` is retried through
/// `cmd /c rmdir`.
///
/// # Errors
///
/// Returns the underlying OS error; non-empty directories are never removed.
pub fn remove_entry(path: &Path) -> io::Result<()> {
    let meta = std::fs::symlink_metadata(path)?;
    if is_dir_like(&meta) {
        match std::fs::remove_dir(path) {
            Ok(()) => Ok(()),
            #[cfg(windows)]
            Err(e) if e.raw_os_error() == Some(5) => remove_dir_fallback(path),
            Err(e) => Err(e),
        }
    } else {
        std::fs::remove_file(path)
    }
}

fn is_dir_like(meta: &std::fs::Metadata) -> bool {
    #[cfg(windows)]
    {
        use std::os::windows::fs::MetadataExt;
        meta.file_attributes() & 0x10 != 0 // FILE_ATTRIBUTE_DIRECTORY
    }
    #[cfg(not(windows))]
    {
        meta.is_dir()
    }
}

#[cfg(windows)]
fn remove_dir_fallback(path: &Path) -> io::Result<()> {
    const CREATE_NO_WINDOW: u32 = 0x0800_0000;
    use std::os::windows::process::CommandExt;
    let output = std::process::Command::new("cmd")
        .arg("/c")
        .arg("rmdir")
        .arg("/q")
        .arg(path)
        .creation_flags(CREATE_NO_WINDOW)
        .output()?;
    if output.status.success() {
        Ok(())
    } else {
        Err(io::Error::other(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ))
    }
}
