//! External process launching for `edit`.
use anyhow::{Context as _, Result};
use std::path::Path;
use std::process::Command;

use crate::error::DotfilesError;
use crate::platform::{Environment, Os};

/// Abstraction over process execution so commands can be tested without
/// spawning anything.
#[cfg_attr(test, mockall::automock)]
pub trait Executor: Send + Sync + std::fmt::Debug {
    /// Whether `program` resolves on `PATH` (or is an existing path).
    fn which(&self, program: &str) -> bool;

    /// Run `program` attached to the terminal and wait for it to exit.
    ///
    /// Returns the exit code, `None` if the process was killed by a signal.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned.
    fn run_interactive(&self, program: &str, args: &[String]) -> Result<Option<i32>>;
}

/// [`Executor`] that spawns real processes.
#[derive(Debug, Default)]
pub struct SystemExecutor;

impl Executor for SystemExecutor {
    fn which(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }

    fn run_interactive(&self, program: &str, args: &[String]) -> Result<Option<i32>> {
        let status = Command::new(program)
            .args(args)
            .status()
            .with_context(|| format!("failed to execute: {program}"))?;
        Ok(status.code())
    }
}

/// Program plus leading arguments used to open a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorCommand {
    /// Executable name or path.
    pub program: String,
    /// Arguments placed before the file path.
    pub args: Vec<String>,
}

impl EditorCommand {
    /// `$EDITOR` split on whitespace, otherwise the platform's opener.
    ///
    /// # Errors
    ///
    /// Returns [`DotfilesError::EditorNotFound`] when neither applies.
    pub fn resolve(env: &Environment) -> Result<Self, DotfilesError> {
        if let Some(editor) = env.var("EDITOR") {
            let mut words = editor.split_whitespace().map(str::to_string);
            if let Some(program) = words.next() {
                return Ok(Self {
                    program,
                    args: words.collect(),
                });
            }
        }
        match env.platform().os() {
            Os::Darwin => Ok(Self::bare("open")),
            Os::Linux => Ok(Self::bare("xdg-open")),
            // `start` treats the first quoted argument as a window title
            Os::Windows => Ok(Self {
                program: "cmd".to_string(),
                args: vec!["/C".to_string(), "start".to_string(), String::new()],
            }),
            Os::Other => Err(DotfilesError::EditorNotFound(None)),
        }
    }

    fn bare(program: &str) -> Self {
        Self {
            program: program.to_string(),
            args: Vec::new(),
        }
    }

    /// Full argument list for opening `file`.
    #[must_use]
    pub fn args_for(&self, file: &Path) -> Vec<String> {
        let mut args = self.args.clone();
        args.push(file.display().to_string());
        args
    }

    /// Open `file` and wait for the editor to exit.
    ///
    /// # Errors
    ///
    /// Returns [`DotfilesError::EditorNotFound`] if the program is not on
    /// `PATH`, or an error if it cannot be spawned.
    pub fn open(&self, file: &Path, executor: &dyn Executor) -> Result<Option<i32>> {
        if !executor.which(&self.program) {
            return Err(DotfilesError::EditorNotFound(Some(self.program.clone())).into());
        }
        executor.run_interactive(&self.program, &self.args_for(file))
    }
}
