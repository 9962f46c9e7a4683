//! Shared state for link discovery and reconciliation.
use std::sync::Arc;

use crate::logging::Log;
use crate::operations::{FileSystemOps, SystemFileSystemOps};
use crate::prompt::Prompt;

/// How reconciliation treats conflicts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkOptions {
    /// Create missing directories and replace existing targets without asking.
    pub force: bool,
    /// Ask before every change.
    pub interactive: bool,
    /// Decide and report, but never touch the filesystem.
    pub preview: bool,
}

/// Shared context for a reconciliation pass.
pub struct Context {
    /// Filesystem operation abstraction (injectable for testing).
    pub fs_ops: Arc<dyn FileSystemOps>,
    /// Logger for per-link outcomes.
    pub log: Arc<dyn Log>,
    /// Confirmation source for interactive mode.
    pub prompt: Arc<dyn Prompt>,
    /// Mode flags.
    pub options: LinkOptions,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("fs_ops", &self.fs_ops)
            .field("log", &"<dyn Log>")
            .field("prompt", &"<dyn Prompt>")
            .field("options", &self.options)
            .finish()
    }
}

impl Context {
    /// Context backed by the real filesystem.
    #[must_use]
    pub fn new(log: Arc<dyn Log>, prompt: Arc<dyn Prompt>, options: LinkOptions) -> Self {
        Self {
            fs_ops: Arc::new(SystemFileSystemOps),
            log,
            prompt,
            options,
        }
    }

    /// Create a copy of this context with a different [`FileSystemOps`] implementation.
    #[must_use]
    pub fn with_fs_ops(&self, fs_ops: Arc<dyn FileSystemOps>) -> Self {
        Self {
            fs_ops,
            log: Arc::clone(&self.log),
            prompt: Arc::clone(&self.prompt),
            options: self.options,
        }
    }

    /// Create a copy of this context with different mode flags.
    #[must_use]
    pub fn with_options(&self, options: LinkOptions) -> Self {
        Self {
            fs_ops: Arc::clone(&self.fs_ops),
            log: Arc::clone(&self.log),
            prompt: Arc::clone(&self.prompt),
            options,
        }
    }
}
