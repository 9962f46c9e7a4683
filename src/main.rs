//! `dotfiles` command-line entry point.
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context as _;
use clap::Parser;

use dotfiles_link::cli::{Cli, Command};
use dotfiles_link::commands;
use dotfiles_link::logging::{Logger, init_subscriber};
use dotfiles_link::platform::Environment;

fn main() -> anyhow::Result<ExitCode> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();
    let env = Environment::from_process().context("reading the current directory")?;
    let log = Arc::new(Logger::new(&env, args.command.name()));
    init_subscriber(args.verbose, log.log_path());

    let result = match &args.command {
        Command::Link(opts) => commands::link::run(&args.global, opts, env, &log),
        Command::List(opts) => commands::list::run(&args.global, opts, env, &log),
        Command::Info(opts) => commands::info::run(&args.global, opts, env, &log),
        Command::Edit(opts) => commands::edit::run(&args.global, opts, env, &log),
        Command::Completions(opts) => {
            commands::completions::run(opts);
            Ok(())
        }
        Command::Version => commands::version::run(),
    };

    match result {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            log.error(&format!("{err:#}"));
            Ok(ExitCode::FAILURE)
        }
    }
}
