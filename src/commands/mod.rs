//! Subcommand orchestration.
pub mod completions;
pub mod edit;
pub mod info;
pub mod link;
pub mod list;
pub mod version;

use std::path::PathBuf;

use anyhow::{Context as _, Result};

use crate::cli::GlobalOpts;
use crate::config::Config;
use crate::config::validation::validate_all;
use crate::error::{DotfilesError, LinkError};
use crate::logging::Log;
use crate::operations::{FileSystemOps, SystemFileSystemOps};
use crate::platform::Environment;
use crate::resources::Link;
use crate::tasks::discover;

/// Shared state produced by the common command setup sequence.
///
/// Resolves the dotfiles directory, loads both configuration layers and the
/// ignore list, and discovers every link, so that each command does not have
/// to repeat the boilerplate.
#[derive(Debug)]
pub struct CommandSetup {
    /// Process environment used for every path expansion.
    pub env: Environment,
    /// Canonical dotfiles directory.
    pub root: PathBuf,
    /// Loaded configuration.
    pub config: Config,
    /// Discovered links, sorted by relative path.
    pub links: Vec<Link>,
}

impl CommandSetup {
    /// Run the setup sequence against the real filesystem.
    ///
    /// # Errors
    ///
    /// Returns an error if the dotfiles directory is missing, configuration
    /// fails to load, or discovery fails.
    pub fn init(global: &GlobalOpts, env: Environment, log: &dyn Log) -> Result<Self> {
        Self::init_with(global, env, &SystemFileSystemOps, log)
    }

    /// Run the setup sequence with an explicit environment and filesystem.
    ///
    /// # Errors
    ///
    /// See [`init`](Self::init).
    pub fn init_with(
        global: &GlobalOpts,
        env: Environment,
        fs: &dyn FileSystemOps,
        log: &dyn Log,
    ) -> Result<Self> {
        let root = resolve_root(global, &env, fs)?;
        log.debug(&format!("dotfiles directory: {}", root.display()));

        let user_config = match &global.config {
            Some(path) => env.expand(path),
            None => Config::default_user_config(&env)?,
        };
        log.debug(&format!("user configuration: {}", user_config.display()));
        let config = Config::load(&user_config, &env, fs)?;
        log.debug(&format!(
            "{} configuration section(s)",
            config.store.sections().len()
        ));
        log.debug(&format!("{} ignored name(s)", config.ignore.len()));

        let links = discover(&root, &config.store, &config.ignore, &env, fs)?;
        log.debug(&format!("{} file(s) discovered", links.len()));

        let warnings = validate_all(&config.store, links.iter().map(Link::rel_path));
        if !warnings.is_empty() {
            log.warn(&format!(
                "found {} configuration warning(s):",
                warnings.len()
            ));
            for warning in &warnings {
                log.warn(&format!("  {warning}"));
            }
        }
        for link in links.iter().filter(|link| link.targets_source(fs)) {
            log.warn(&format!(
                "target path of {} is the source file itself; it will not be linked",
                link.rel_path()
            ));
        }

        Ok(Self {
            env,
            root,
            config,
            links,
        })
    }

    /// The link whose relative path is `rel_path` (`\` accepted as separator).
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::NotFound`] if no discovered file matches.
    pub fn find(&self, rel_path: &str) -> Result<&Link, LinkError> {
        let wanted = rel_path.replace('\\', "/");
        self.links
            .iter()
            .find(|link| link.rel_path() == wanted)
            .ok_or(LinkError::NotFound(wanted))
    }
}

/// Expand the `--directory` / `DOTFILES_PATH` value, require it to exist and
/// canonicalise it.
///
/// # Errors
///
/// Returns an error if no directory was given or it does not exist.
pub fn resolve_root(
    global: &GlobalOpts,
    env: &Environment,
    fs: &dyn FileSystemOps,
) -> Result<PathBuf> {
    let raw = global.directory.as_deref().context(
        "no dotfiles directory given; pass --directory or set DOTFILES_PATH",
    )?;
    let root = env.expand(raw);
    if !fs.is_dir(&root) {
        return Err(DotfilesError::RootMissing(root).into());
    }
    Ok(dunce::canonicalize(&root).unwrap_or(root))
}

/// Left-align `rows` into columns separated by `padding` spaces.
///
/// Widths count characters, ANSI codes included. Trailing whitespace is
/// dropped from each line.
#[must_use]
pub fn format_columns(rows: &[Vec<String>], padding: usize) -> String {
    let mut widths: Vec<usize> = Vec::new();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            let len = cell.chars().count();
            match widths.get_mut(i) {
                Some(width) => *width = (*width).max(len),
                None => widths.push(len),
            }
        }
    }

    let mut out = String::new();
    for row in rows {
        let mut line = String::new();
        for (cell, width) in row.iter().zip(&widths) {
            line.push_str(cell);
            let pad = width + padding - cell.chars().count();
            line.extend(std::iter::repeat_n(' ', pad));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::logging::{Level, RecordingLog};
    use crate::operations::MockFileSystemOps;
    use crate::platform::Platform;

    fn env() -> Environment {
        Environment::new(Platform::from_identifier("darwin"), "/work").with_var("HOME", "/home/u")
    }

    fn global(directory: Option<&str>) -> GlobalOpts {
        GlobalOpts {
            directory: directory.map(str::to_string),
            config: None,
        }
    }

    fn tree() -> MockFileSystemOps {
        MockFileSystemOps::new()
            .with_file("/dots/.bashrc", "")
            .with_file("/dots/app/config", "")
            .with_file("/dots/README.md", "")
            .with_file("/home/u/.dotignore", "README.md\n")
    }

    #[test]
    fn init_discovers_links_and_applies_ignore_list() {
        let log = RecordingLog::default();
        let setup = CommandSetup::init_with(&global(Some("/dots")), env(), &tree(), &log).unwrap();

        let rel: Vec<&str> = setup.links.iter().map(Link::rel_path).collect();
        assert_eq!(rel, [".bashrc", "app/config"]);
        assert_eq!(setup.config.ignore.len(), 1);
        assert!(log.messages(Level::Warn).is_empty());
        assert!(
            log.messages(Level::Debug)
                .contains(&"2 file(s) discovered".to_string())
        );
    }

    #[test]
    fn init_expands_directory() {
        let fs = tree().with_file("/home/u/dots/x", "");
        let setup =
            CommandSetup::init_with(&global(Some("~/dots")), env(), &fs, &RecordingLog::default())
                .unwrap();
        assert_eq!(setup.links[0].rel_path(), "x");
    }

    #[test]
    fn missing_directory_is_fatal() {
        let err = CommandSetup::init_with(
            &global(Some("/nope")),
            env(),
            &tree(),
            &RecordingLog::default(),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Dotfiles directory '/nope' does not exist");
    }

    #[test]
    fn directory_is_required() {
        let err = CommandSetup::init_with(&global(None), env(), &tree(), &RecordingLog::default())
            .unwrap_err();
        assert!(err.to_string().contains("DOTFILES_PATH"));
    }

    #[test]
    fn explicit_config_file_is_used() {
        let fs = tree().with_file("/work/custom.conf", "[file \"app/config\"]\npath = /etc\n");
        let opts = GlobalOpts {
            directory: Some("/dots".to_string()),
            config: Some("custom.conf".to_string()),
        };
        let setup = CommandSetup::init_with(&opts, env(), &fs, &RecordingLog::default()).unwrap();
        assert_eq!(setup.config.user_config, PathBuf::from("/work/custom.conf"));
        assert_eq!(
            setup.find("app/config").unwrap().target_dir(),
            std::path::Path::new("/etc")
        );
    }

    #[test]
    fn config_warnings_are_logged() {
        let fs = tree().with_file(
            "/home/u/.dotconfig",
            "[file \"gone\"]\npath = /x\n[fiel]\npath = /y\n",
        );
        let log = RecordingLog::default();
        CommandSetup::init_with(&global(Some("/dots")), env(), &fs, &log).unwrap();

        let warnings = log.messages(Level::Warn);
        assert_eq!(warnings[0], "found 2 configuration warning(s):");
        assert_eq!(warnings.len(), 3);
    }

    #[test]
    fn target_pointing_into_dotfiles_is_warned() {
        let fs = tree().with_file("/home/u/.dotconfig", "[file \"app/config\"]\npath = /dots\n");
        let log = RecordingLog::default();
        CommandSetup::init_with(&global(Some("/dots")), env(), &fs, &log).unwrap();

        assert_eq!(
            log.messages(Level::Warn),
            ["target path of app/config is the source file itself; it will not be linked"]
        );
    }

    #[test]
    fn parse_errors_are_fatal() {
        let fs = tree().with_file("/home/u/.dotconfig", "path = ~\n");
        let result =
            CommandSetup::init_with(&global(Some("/dots")), env(), &fs, &RecordingLog::default());
        assert!(result.is_err());
    }

    #[test]
    fn columns_are_padded_to_widest_cell() {
        let rows = vec![
            vec!["a".to_string(), "long value".to_string(), "x".to_string()],
            vec!["wider".to_string(), "v".to_string(), "y".to_string()],
        ];
        insta::assert_snapshot!(format_columns(&rows, 2), @r"
        a      long value  x
        wider  v           y
        ");
    }

    #[test]
    fn columns_handle_ragged_rows() {
        let rows = vec![vec!["a".to_string()], vec!["b".to_string(), "c".to_string()]];
        assert_eq!(format_columns(&rows, 2), "a\nb  c\n");
        assert_eq!(format_columns(&[], 2), "");
    }

    #[test]
    fn find_accepts_backslashes_and_reports_unknown() {
        let setup =
            CommandSetup::init_with(&global(Some("/dots")), env(), &tree(), &RecordingLog::default())
                .unwrap();
        assert_eq!(setup.find("app\\config").unwrap().rel_path(), "app/config");
        let err = setup.find("nope").unwrap_err();
        assert_eq!(err.to_string(), "Unable to find link with relative path nope");
    }
}
