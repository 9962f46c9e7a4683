//! Yes/no confirmation for interactive reconciliation.
use std::io;

use anyhow::{Context as _, Result};
use dialoguer::Confirm;

/// Asks the user to confirm an action.
#[cfg_attr(test, mockall::automock)]
pub trait Prompt: Send + Sync {
    /// Ask `message`; `true` means yes.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be read or written.
    fn confirm(&self, message: &str) -> Result<bool>;
}

/// [`Prompt`] on the controlling terminal, answering with a single `y` or
/// `n` key.
///
/// Escape, `q`, or running without a terminal counts as no.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn confirm(&self, message: &str) -> Result<bool> {
        let answer = Confirm::new()
            .with_prompt(message)
            .default(false)
            .show_default(true)
            .interact_opt();
        interpret(answer)
    }
}

/// Map a confirmation result to an answer; only unexpected terminal
/// failures are errors.
fn interpret(answer: dialoguer::Result<Option<bool>>) -> Result<bool> {
    match answer {
        Ok(choice) => Ok(choice.unwrap_or(false)),
        Err(dialoguer::Error::IO(err)) if err.kind() == io::ErrorKind::NotConnected => Ok(false),
        Err(err) => Err(err).context("failed to read confirmation"),
    }
}

/// [`Prompt`] for non-interactive runs; never called by reconciliation
/// unless interactive mode is on, and answers no.
#[derive(Debug, Default)]
pub struct DeclinePrompt;

impl Prompt for DeclinePrompt {
    fn confirm(&self, _message: &str) -> Result<bool> {
        Ok(false)
    }
}
