//! Dotfiles link manager.
//!
//! Maps files in a dotfiles directory to their target locations with
//! symbolic links, driven by a small layered configuration format
//! (`.dotconfig`) with per-file and per-platform target overrides.
//!
//! The public API is organised into layers:
//!
//! - **[`config`]**: parse the bundled and user `.dotconfig` layers and the ignore list
//! - **[`resources`]**: the [`Link`](resources::Link) entity and its live status
//! - **[`tasks`]**: discovery of links and reconciliation of their on-disk state
//! - **[`commands`]**: top-level subcommand orchestration (`link`, `list`, `info`, `edit`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod logging;
pub mod operations;
pub mod platform;
pub mod prompt;
pub mod resources;
pub mod tasks;

/// Version reported by `dotfiles version` and in log headers: the
/// build-time `DOTFILES_VERSION` (from `git describe`) or the package version.
#[must_use]
pub const fn version() -> &'static str {
    match option_env!("DOTFILES_VERSION") {
        Some(version) => version,
        None => env!("CARGO_PKG_VERSION"),
    }
}
