//! Layered `.dotconfig` configuration and the ignore list.
pub mod ignore;
pub mod ini;
pub mod store;
pub mod validation;

pub use ignore::IgnoreList;
pub use store::{ConfigSource, ConfigStore};

use std::path::{Path, PathBuf};

use crate::error::DotfilesError;
use crate::operations::FileSystemOps;
use crate::platform::Environment;

/// Name of the user override file inside the configuration directory.
pub const USER_CONFIG_FILE_NAME: &str = ".dotconfig";

/// Everything read from configuration at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path of the user layer, whether or not it exists.
    pub user_config: PathBuf,
    /// Bundled defaults overlaid by the user layer.
    pub store: ConfigStore,
    /// Filenames skipped by discovery.
    pub ignore: IgnoreList,
}

impl Config {
    /// Default location of the user layer for `env`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration directory cannot be determined.
    pub fn default_user_config(env: &Environment) -> Result<PathBuf, DotfilesError> {
        Ok(env.config_dir()?.join(USER_CONFIG_FILE_NAME))
    }

    /// Load the bundled defaults, the user layer at `user_config` and the
    /// ignore list it points to.
    ///
    /// # Errors
    ///
    /// Returns an error if any file fails to read or parse.
    pub fn load(
        user_config: &Path,
        env: &Environment,
        fs: &dyn FileSystemOps,
    ) -> Result<Self, DotfilesError> {
        let store = ConfigStore::load_layered(user_config, fs)?;
        let ignore = IgnoreList::load(&store, env, fs)?;
        Ok(Self {
            user_config: user_config.to_path_buf(),
            store,
            ignore,
        })
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::operations::MockFileSystemOps;
    use crate::platform::Platform;

    #[test]
    fn load_reads_both_layers_and_ignore_list() {
        let env = Environment::new(Platform::from_identifier("darwin"), "/")
            .with_var("HOME", "/Users/u");
        let fs = MockFileSystemOps::new()
            .with_file("/Users/u/.dotconfig", "[file \"x\"]\npath = /opt\n")
            .with_file("/Users/u/.dotignore", ".DS_Store\n");

        let user_config = Config::default_user_config(&env).unwrap();
        assert_eq!(user_config, PathBuf::from("/Users/u/.dotconfig"));

        let config = Config::load(&user_config, &env, &fs).unwrap();
        assert_eq!(config.store.get_property("file", Some("x"), "path"), Some("/opt"));
        assert_eq!(config.store.get_property("file", Some("y"), "path"), Some("~"));
        assert!(config.ignore.contains(".DS_Store"));
    }
}
