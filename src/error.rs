//! Domain-specific error types for the dotfiles engine.
//!
//! Internal modules return typed errors (e.g. [`ConfigError`], [`LinkError`])
//! while command handlers at the CLI boundary convert them to
//! [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! DotfilesError
//! ├── Config(ConfigError)     .dotconfig parsing and reading
//! ├── Link(LinkError)         per-link failures (target exists, source missing, …)
//! ├── Platform(PlatformError) unresolvable default directories
//! ├── RootMissing             dotfiles directory does not exist
//! └── EditorNotFound          no editor could be determined for `edit`
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the dotfiles engine.
#[derive(Error, Debug)]
pub enum DotfilesError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A single link operation failed.
    #[error(transparent)]
    Link(#[from] LinkError),

    /// A platform-dependent location could not be resolved.
    #[error(transparent)]
    Platform(#[from] PlatformError),

    /// The dotfiles directory does not exist.
    #[error("Dotfiles directory '{}' does not exist", .0.display())]
    RootMissing(PathBuf),

    /// No editor could be determined or the configured one is not installed.
    #[error("Unable to find default editor{}", editor_suffix(.0.as_deref()))]
    EditorNotFound(Option<String>),
}

fn editor_suffix(editor: Option<&str>) -> String {
    editor.map(|e| format!(" '{e}'")).unwrap_or_default()
}

/// Errors raised while loading layered `.dotconfig` sources.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A `[...]` line does not match the `[name]` / `[name "sub"]` grammar.
    #[error("{origin}:{line}: section is invalid: '{text}'")]
    InvalidSection {
        /// Name of the source being parsed (file path or `<default>`).
        origin: String,
        /// 1-based line number.
        line: usize,
        /// The offending line, comments stripped.
        text: String,
    },

    /// A non-header line without a `=` delimiter.
    #[error("{origin}:{line}: parameter is invalid: '{text}'")]
    InvalidProperty {
        /// Name of the source being parsed.
        origin: String,
        /// 1-based line number.
        line: usize,
        /// The offending line, comments stripped.
        text: String,
    },

    /// A `key = value` line that appears before any section header.
    #[error("{origin}:{line}: parameter must be part of a section: '{text}'")]
    PropertyOutsideSection {
        /// Name of the source being parsed.
        origin: String,
        /// 1-based line number.
        line: usize,
        /// The offending line, comments stripped.
        text: String,
    },

    /// A configuration or ignore file exists but could not be read.
    #[error("IO error reading config file {}: {source}", path.display())]
    Io {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors raised by link creation and lookup.
#[derive(Error, Debug)]
pub enum LinkError {
    /// Something already occupies the target path.
    #[error("Target path {} already exists", .0.display())]
    TargetExists(PathBuf),

    /// The source file vanished after discovery.
    #[error("Source path {} does not exist", .0.display())]
    SourceMissing(PathBuf),

    /// The directory that should hold the link does not exist.
    #[error("Target directory {} does not exist", .0.display())]
    TargetDirectoryMissing(PathBuf),

    /// No discovered link has the requested relative path.
    #[error("Unable to find link with relative path {0}")]
    NotFound(String),

    /// A filesystem call failed.
    #[error("{action} {}: {source}", path.display())]
    Io {
        /// What was being attempted (e.g. `"removing"`).
        action: &'static str,
        /// Path the operation was applied to.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors raised while resolving platform-dependent locations.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// Neither configuration nor the platform provide a target directory.
    #[error("No target directory configured for {rel_path} and platform '{platform}' has no default")]
    NoDefaultRoot {
        /// Relative path of the file being resolved.
        rel_path: String,
        /// Platform identifier (e.g. `"freebsd"`).
        platform: String,
    },

    /// The home directory could not be determined from the environment.
    #[error("Unable to determine the home directory (HOME is not set)")]
    NoHomeDirectory,
}

impl LinkError {
    /// Wrap an [`std::io::Error`] with the action and path it relates to.
    #[must_use]
    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }
}
