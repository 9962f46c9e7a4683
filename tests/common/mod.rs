// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed dotfiles tree, home directory and
// configuration directory, plus a fluent builder so each integration test
// can set up an isolated environment without repeating filesystem
// boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use dotfiles_link::cli::GlobalOpts;
use dotfiles_link::commands::CommandSetup;
use dotfiles_link::logging::Log;
use dotfiles_link::operations::SystemFileSystemOps;
use dotfiles_link::platform::{Environment, Platform};
use dotfiles_link::prompt::DeclinePrompt;
use dotfiles_link::tasks::{Context, LinkOptions};

/// [`Log`] that discards everything.
#[derive(Debug, Default)]
pub struct NullLog;

impl Log for NullLog {
    fn stage(&self, _msg: &str) {}
    fn info(&self, _msg: &str) {}
    fn debug(&self, _msg: &str) {}
    fn warn(&self, _msg: &str) {}
    fn error(&self, _msg: &str) {}
    fn preview(&self, _msg: &str) {}
}

/// An isolated dotfiles setup backed by a [`tempfile::TempDir`].
///
/// Layout under the temporary directory:
/// - `dots/`   the dotfiles directory
/// - `home/`   `$HOME`
/// - `config/` `$XDG_CONFIG_HOME`, holding `.dotconfig` and `.dotignore`
pub struct IntegrationTestContext {
    /// Keeps the temporary directory alive.
    pub tmp: tempfile::TempDir,
    /// Canonical path of the temporary directory.
    pub base: PathBuf,
    /// Platform identifier used for path resolution.
    pub platform: String,
}

impl IntegrationTestContext {
    /// Create empty `dots/`, `home/` and `config/` directories.
    pub fn new() -> Self {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let base = dunce::canonicalize(tmp.path()).expect("canonicalize temp dir");
        for dir in ["dots", "home", "config"] {
            std::fs::create_dir_all(base.join(dir)).expect("create layout dir");
        }
        Self {
            tmp,
            base,
            platform: "linux".to_string(),
        }
    }

    /// The dotfiles directory.
    pub fn dots(&self) -> PathBuf {
        self.base.join("dots")
    }

    /// The fake home directory.
    pub fn home(&self) -> PathBuf {
        self.base.join("home")
    }

    /// The fake user configuration directory.
    pub fn config_dir(&self) -> PathBuf {
        self.base.join("config")
    }

    /// Environment pointing `HOME` and `XDG_CONFIG_HOME` into the sandbox.
    pub fn env(&self) -> Environment {
        Environment::new(Platform::from_identifier(&self.platform), &self.base)
            .with_var("HOME", self.home().display().to_string())
            .with_var("XDG_CONFIG_HOME", self.config_dir().display().to_string())
    }

    /// Global options naming the sandboxed dotfiles directory.
    pub fn global(&self) -> GlobalOpts {
        GlobalOpts {
            directory: Some(self.dots().display().to_string()),
            config: None,
        }
    }

    /// Run the startup sequence against the sandbox.
    pub fn setup(&self) -> CommandSetup {
        CommandSetup::init_with(&self.global(), self.env(), &SystemFileSystemOps, &NullLog)
            .expect("command setup")
    }

    /// Reconciliation context on the real filesystem that answers no to
    /// every prompt.
    pub fn context(&self, options: LinkOptions) -> Context {
        Context::new(Arc::new(NullLog), Arc::new(DeclinePrompt), options)
    }

    /// Absolute path of `rel` inside the home directory.
    pub fn home_path(&self, rel: &str) -> PathBuf {
        self.home().join(rel)
    }
}

/// Fluent builder for [`IntegrationTestContext`].
pub struct TestContextBuilder {
    ctx: IntegrationTestContext,
}

impl TestContextBuilder {
    /// Begin building a new, empty sandbox.
    pub fn new() -> Self {
        Self {
            ctx: IntegrationTestContext::new(),
        }
    }

    /// Write a dotfile at `dots/<rel>`.
    pub fn with_dotfile(self, rel: &str, content: &str) -> Self {
        write(&self.ctx.dots().join(rel), content);
        self
    }

    /// Write the user `.dotconfig`.
    pub fn with_user_config(self, content: &str) -> Self {
        write(&self.ctx.config_dir().join(".dotconfig"), content);
        self
    }

    /// Write the default `.dotignore`.
    pub fn with_ignore(self, content: &str) -> Self {
        write(&self.ctx.config_dir().join(".dotignore"), content);
        self
    }

    /// Write a file at `home/<rel>`.
    pub fn with_home_file(self, rel: &str, content: &str) -> Self {
        write(&self.ctx.home_path(rel), content);
        self
    }

    /// Resolve paths as if running on `platform` (`darwin`, `linux`, ...).
    pub fn on_platform(mut self, platform: &str) -> Self {
        self.ctx.platform = platform.to_string();
        self
    }

    /// Finish building and return the configured context.
    pub fn build(self) -> IntegrationTestContext {
        self.ctx
    }
}

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent dir");
    }
    std::fs::write(path, content).expect("write file");
}
