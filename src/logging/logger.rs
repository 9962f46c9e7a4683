//! [`Log`] implementation backed by `tracing`.
use std::path::{Path, PathBuf};

use super::subscriber::{PREVIEW_TARGET, STAGE_TARGET};
use super::types::Log;
use super::utils::log_file_path;
use crate::platform::Environment;

/// Implement the methods of [`Log`] by delegating to inherent methods of the
/// same name on the implementing type.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Structured logger with preview awareness.
///
/// Messages go through the global `tracing` subscriber, which also appends
/// them to the per-command log file in the user cache directory, regardless
/// of the verbose flag.
#[derive(Debug)]
pub struct Logger {
    log_file: Option<PathBuf>,
}

#[allow(clippy::unused_self)]
impl Logger {
    /// Logger for `command`, whose log file lives in `env`'s cache directory.
    ///
    /// Pass [`log_path`](Self::log_path) to
    /// [`init_subscriber`](super::subscriber::init_subscriber) to create the
    /// file.
    #[must_use]
    pub fn new(env: &Environment, command: &str) -> Self {
        Self {
            log_file: log_file_path(env, command),
        }
    }

    /// Logger whose log file lives at `path`.
    #[must_use]
    pub fn with_log_file(path: impl Into<PathBuf>) -> Self {
        Self {
            log_file: Some(path.into()),
        }
    }

    /// Return the log file path, if one could be determined.
    #[must_use]
    pub fn log_path(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header.
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (console only when verbose; always in the file).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log an action that preview mode decided on but did not apply.
    pub fn preview(&self, msg: &str) {
        tracing::info!(target: PREVIEW_TARGET, "{msg}");
    }
}

impl Log for Logger {
    forward_log_methods!(stage, info, debug, warn, error, preview);
}
