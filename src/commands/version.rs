//! Command: print version information.
use std::io::{self, Write};

use anyhow::{Context as _, Result};

/// Print the dotfiles version to stdout.
///
/// # Errors
///
/// Returns an error if stdout cannot be written.
pub fn run() -> Result<()> {
    write_version(&mut io::stdout().lock())
}

/// Write `dotfiles <version>` to `out`.
///
/// # Errors
///
/// Returns an error if `out` cannot be written.
pub fn write_version(out: &mut impl Write) -> Result<()> {
    writeln!(out, "dotfiles {}", crate::version()).context("writing output")
}
