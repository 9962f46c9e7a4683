//! Command: print shell completions.
use std::io::{self, Write};

use clap::CommandFactory as _;

use crate::cli::{Cli, CompletionsOpts};

/// Print the completion script for the requested shell to stdout.
pub fn run(opts: &CompletionsOpts) {
    write_completions(opts, &mut io::stdout().lock());
}

/// Write the completion script for the requested shell to `out`.
pub fn write_completions(opts: &CompletionsOpts, out: &mut impl Write) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(opts.shell, &mut cmd, name, out);
}
