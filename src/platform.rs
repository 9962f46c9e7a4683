//! Platform detection and the explicit process environment.
//!
//! Nothing below the command layer reads ambient globals: the current
//! platform, environment variables and working directory travel in an
//! [`Environment`] value so that resolution can be exercised for any
//! simulated platform.
use std::collections::HashMap;
use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::error::PlatformError;

/// Operating system family, as far as target resolution cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    /// macOS (`darwin`).
    Darwin,
    /// Linux (`linux`, `linux2`).
    Linux,
    /// Windows (`win32`, `cygwin`).
    Windows,
    /// Any other identifier; usable in `path_<id>` keys but without defaults.
    Other,
}

/// Platform information for the current system.
///
/// The identifier is the string used to build `path_<identifier>` keys, so
/// `Platform::from_identifier("linux2")` looks up `path_linux2` while still
/// behaving as Linux for default directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    os: Os,
    identifier: String,
}

impl Platform {
    /// Detect the current platform.
    #[must_use]
    pub fn detect() -> Self {
        let identifier = if cfg!(target_os = "macos") {
            "darwin"
        } else if cfg!(target_os = "linux") {
            "linux"
        } else if cfg!(target_os = "windows") {
            "win32"
        } else {
            std::env::consts::OS
        };
        Self::from_identifier(identifier)
    }

    /// Build a platform from an identifier such as `darwin`, `linux` or `win32`.
    #[must_use]
    pub fn from_identifier(identifier: &str) -> Self {
        let os = match identifier {
            "darwin" => Os::Darwin,
            "linux" | "linux2" => Os::Linux,
            "win32" | "cygwin" => Os::Windows,
            _ => Os::Other,
        };
        Self {
            os,
            identifier: identifier.to_string(),
        }
    }

    /// Operating system family.
    #[must_use]
    pub const fn os(&self) -> Os {
        self.os
    }

    /// Identifier used for platform-qualified keys.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Platform-qualified variant of a configuration key (`path` → `path_linux`).
    #[must_use]
    pub fn qualified_key(&self, key: &str) -> String {
        format!("{key}_{}", self.identifier)
    }

    /// Whether this platform is a Windows flavour.
    #[must_use]
    pub fn is_windows(&self) -> bool {
        self.os == Os::Windows
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.identifier)
    }
}

/// Explicit snapshot of the environment the engine resolves paths against.
#[derive(Debug, Clone)]
pub struct Environment {
    platform: Platform,
    vars: HashMap<String, String>,
    cwd: PathBuf,
}

impl Environment {
    /// Capture the running process: detected platform, variables and cwd.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be determined.
    pub fn from_process() -> std::io::Result<Self> {
        Ok(Self {
            platform: Platform::detect(),
            vars: std::env::vars().collect(),
            cwd: std::env::current_dir()?,
        })
    }

    /// An environment with no variables set.
    #[must_use]
    pub fn new(platform: Platform, cwd: impl Into<PathBuf>) -> Self {
        Self {
            platform,
            vars: HashMap::new(),
            cwd: cwd.into(),
        }
    }

    /// Set a variable.
    #[must_use]
    pub fn with_var(mut self, name: &str, value: impl Into<String>) -> Self {
        self.vars.insert(name.to_string(), value.into());
        self
    }

    /// The platform paths are resolved for.
    #[must_use]
    pub const fn platform(&self) -> &Platform {
        &self.platform
    }

    /// Working directory relative paths are anchored to.
    #[must_use]
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Look up a variable.
    #[must_use]
    pub fn var(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// The user's home directory (`USERPROFILE` first on Windows, then `HOME`).
    #[must_use]
    pub fn home_dir(&self) -> Option<PathBuf> {
        let candidates: &[&str] = if self.platform.is_windows() {
            &["USERPROFILE", "HOME"]
        } else {
            &["HOME"]
        };
        candidates
            .iter()
            .find_map(|name| self.var(name).filter(|v| !v.is_empty()))
            .map(PathBuf::from)
    }

    /// Expand `~`, `$VAR`, `${VAR}` (and `%VAR%` on Windows), then make the
    /// result absolute against the working directory and normalise `.`/`..`.
    ///
    /// Unknown variables are left untouched.
    #[must_use]
    pub fn expand(&self, raw: &str) -> PathBuf {
        let home = self.home_dir();
        let user_expanded = expand_user(raw, home.as_deref());
        let expanded = expand_vars(
            &user_expanded,
            |name| self.var(name).map(str::to_string),
            self.platform.is_windows(),
        );
        let path = PathBuf::from(expanded);
        if path.is_absolute() {
            normalize(&path)
        } else {
            normalize(&self.cwd.join(path))
        }
    }

    /// Directory holding the user's `.dotconfig` (and, by default, `.dotignore`).
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::NoHomeDirectory`] if the location falls back to
    /// the home directory and no home directory is known.
    pub fn config_dir(&self) -> Result<PathBuf, PlatformError> {
        match self.platform.os() {
            Os::Windows => self.app_data_dir(),
            Os::Linux => self.xdg_config_dir(),
            Os::Darwin | Os::Other => self.home_dir().ok_or(PlatformError::NoHomeDirectory),
        }
    }

    /// Target directory used when no `path` key applies to `rel_path`.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::NoDefaultRoot`] on unrecognised platforms and
    /// [`PlatformError::NoHomeDirectory`] when the home directory is unknown.
    pub fn default_root(&self, rel_path: &str) -> Result<PathBuf, PlatformError> {
        match self.platform.os() {
            Os::Darwin => self.home_dir().ok_or(PlatformError::NoHomeDirectory),
            Os::Linux => self.xdg_config_dir(),
            Os::Windows => self.app_data_dir(),
            Os::Other => Err(PlatformError::NoDefaultRoot {
                rel_path: rel_path.to_string(),
                platform: self.platform.to_string(),
            }),
        }
    }

    fn xdg_config_dir(&self) -> Result<PathBuf, PlatformError> {
        match self.var("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
            Some(dir) => Ok(self.expand(dir)),
            None => self
                .home_dir()
                .map(|home| home.join(".config"))
                .ok_or(PlatformError::NoHomeDirectory),
        }
    }

    fn app_data_dir(&self) -> Result<PathBuf, PlatformError> {
        match self.var("APPDATA").filter(|v| !v.is_empty()) {
            Some(dir) => Ok(self.expand(dir)),
            None => self
                .home_dir()
                .map(|home| home.join("AppData").join("Roaming"))
                .ok_or(PlatformError::NoHomeDirectory),
        }
    }
}

/// Replace a leading `~` or `~/` with `home`. `~user` forms are left alone.
fn expand_user(raw: &str, home: Option<&Path>) -> String {
    let Some(home) = home else {
        return raw.to_string();
    };
    if raw == "~" {
        return home.to_string_lossy().into_owned();
    }
    raw.strip_prefix("~/")
        .or_else(|| raw.strip_prefix("~\\"))
        .map_or_else(
            || raw.to_string(),
            |rest| home.join(rest).to_string_lossy().into_owned(),
        )
}

/// Substitute `$NAME`, `${NAME}` and, when `percent` is set, `%NAME%`.
fn expand_vars(raw: &str, lookup: impl Fn(&str) -> Option<String>, percent: bool) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(idx) = rest.find(|c| c == '$' || (percent && c == '%')) {
        let (head, tail) = rest.split_at(idx);
        out.push_str(head);
        let (sigil, after) = tail.split_at(1);

        let (name, consumed) = if sigil == "$" {
            if let Some(braced) = after.strip_prefix('{') {
                braced
                    .split_once('}')
                    .map_or(("", 0), |(name, _)| (name, name.len() + 2))
            } else {
                let end = after
                    .find(|c: char| !(c.is_alphanumeric() || c == '_'))
                    .unwrap_or(after.len());
                let (name, _) = after.split_at(end);
                (name, end)
            }
        } else {
            after
                .split_once('%')
                .map_or(("", 0), |(name, _)| (name, name.len() + 1))
        };

        match (!name.is_empty()).then(|| lookup(name)).flatten() {
            Some(value) => {
                out.push_str(&value);
                rest = after.get(consumed..).unwrap_or_default();
            }
            None => {
                out.push_str(sigil);
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Lexically resolve `.` and `..` components. `..` at the root stays at the root.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => result.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                let at_root = result.parent().is_none();
                if !at_root {
                    result.pop();
                }
            }
            Component::Normal(part) => result.push(part),
        }
    }
    result
}
