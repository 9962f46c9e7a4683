//! Filenames excluded from discovery.
use std::collections::BTreeSet;
use std::path::PathBuf;

use super::store::ConfigStore;
use crate::error::{ConfigError, DotfilesError};
use crate::operations::FileSystemOps;
use crate::platform::Environment;

/// File looked up inside a directory-valued ignore path.
pub const IGNORE_FILE_NAME: &str = ".dotignore";

/// Set of bare filenames (not paths) skipped during discovery.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreList {
    names: BTreeSet<String>,
}

impl IgnoreList {
    /// One filename per non-blank line, trimmed.
    #[must_use]
    pub fn parse(content: &str) -> Self {
        content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect()
    }

    /// Location of the ignore file.
    ///
    /// `[ignore]` `path_<platform>` or `path` when set, otherwise the user
    /// configuration directory. A directory resolves to its `.dotignore`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration directory cannot be determined.
    pub fn resolve_path(
        store: &ConfigStore,
        env: &Environment,
        fs: &dyn FileSystemOps,
    ) -> Result<PathBuf, DotfilesError> {
        let path = match store.get_platform_property("ignore", None, "path", env.platform()) {
            Some(configured) => env.expand(configured),
            None => env.config_dir()?,
        };
        if fs.is_dir(&path) {
            Ok(path.join(IGNORE_FILE_NAME))
        } else {
            Ok(path)
        }
    }

    /// Resolve and read the ignore file. A missing file is an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be resolved or the file exists but
    /// cannot be read.
    pub fn load(
        store: &ConfigStore,
        env: &Environment,
        fs: &dyn FileSystemOps,
    ) -> Result<Self, DotfilesError> {
        let path = Self::resolve_path(store, env, fs)?;
        if !fs.exists(&path) {
            return Ok(Self::default());
        }
        let content = fs
            .read_to_string(&path)
            .map_err(|source| ConfigError::Io { path, source })?;
        Ok(Self::parse(&content))
    }

    /// Whether `name` is ignored.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Number of ignored names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether nothing is ignored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for IgnoreList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}
