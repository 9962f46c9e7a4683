//! Log file location, ANSI stripping and timestamps.
use std::path::PathBuf;

use crate::platform::{Environment, Os};

/// Remove ANSI CSI sequences (`ESC [ ... final`) from `s`.
pub(super) fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\x1b' {
            out.push(c);
            continue;
        }
        if chars.next_if_eq(&'[').is_some() {
            // parameters and intermediates run until a final byte in '@'..='~'
            for inner in chars.by_ref() {
                if ('@'..='~').contains(&inner) {
                    break;
                }
            }
        }
    }
    out
}

/// Per-user cache directory for dotfiles logs.
///
/// `%LOCALAPPDATA%\dotfiles` on Windows, `~/Library/Caches/dotfiles` on
/// macOS, otherwise `$XDG_CACHE_HOME/dotfiles` or `~/.cache/dotfiles`.
pub(super) fn cache_dir(env: &Environment) -> Option<PathBuf> {
    let non_empty = |name| env.var(name).filter(|v| !v.is_empty());
    let base = match env.platform().os() {
        Os::Windows => non_empty("LOCALAPPDATA")
            .map(|dir| env.expand(dir))
            .or_else(|| env.home_dir().map(|h| h.join("AppData").join("Local")))?,
        Os::Darwin => env.home_dir()?.join("Library").join("Caches"),
        Os::Linux | Os::Other => non_empty("XDG_CACHE_HOME")
            .map(|dir| env.expand(dir))
            .or_else(|| env.home_dir().map(|h| h.join(".cache")))?,
    };
    Some(base.join("dotfiles"))
}

/// `<cache dir>/<command>.log`.
pub(super) fn log_file_path(env: &Environment, command: &str) -> Option<PathBuf> {
    Some(cache_dir(env)?.join(format!("{command}.log")))
}

/// Current UTC time, `YYYY-MM-DD HH:MM:SS`.
pub(super) fn utc_datetime() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Current UTC time, `HH:MM:SS`.
pub(super) fn utc_time() -> String {
    chrono::Utc::now().format("%H:%M:%S").to_string()
}
