//! Layered section store and property resolution.
use std::path::Path;

use super::ini::{self, Section};
use crate::error::ConfigError;
use crate::operations::FileSystemOps;
use crate::platform::Platform;

/// Defaults compiled into the binary, loaded before the user's file.
pub const BUNDLED_DEFAULTS: &str = include_str!("../../conf/default.dotconfig");

/// Origin reported for errors in [`BUNDLED_DEFAULTS`].
pub const BUNDLED_ORIGIN: &str = "<default>";

/// One configuration layer: text plus a name for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSource {
    /// File path or `<default>`.
    pub origin: String,
    /// Raw `.dotconfig` text.
    pub text: String,
}

impl ConfigSource {
    /// A source from in-memory text.
    #[must_use]
    pub fn new(origin: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            text: text.into(),
        }
    }

    /// The bundled defaults.
    #[must_use]
    pub fn bundled() -> Self {
        Self::new(BUNDLED_ORIGIN, BUNDLED_DEFAULTS)
    }

    /// Read a source from `path`; a missing file yields `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file exists but cannot be read.
    pub fn from_file(path: &Path, fs: &dyn FileSystemOps) -> Result<Option<Self>, ConfigError> {
        if !fs.exists(path) {
            return Ok(None);
        }
        let text = fs.read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Some(Self::new(path.display().to_string(), text)))
    }
}

/// Ordered, immutable collection of sections, at most one per identity.
///
/// # Examples
///
/// ```
/// use dotfiles_link::config::{ConfigSource, ConfigStore};
///
/// let store = ConfigStore::load(&[
///     ConfigSource::new("defaults", "[file]\npath = ~\n"),
///     ConfigSource::new("user", "[file \"app/config\"]\npath = /etc\n"),
/// ])
/// .unwrap();
/// assert_eq!(store.get_property("file", Some("app/config"), "path"), Some("/etc"));
/// assert_eq!(store.get_property("file", Some("other"), "path"), Some("~"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    sections: Vec<Section>,
}

impl ConfigStore {
    /// Parse `sources` in order. A section replaces any earlier section with
    /// the same `(name, subsection)` identity as a whole.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] raised by the line grammar.
    pub fn load(sources: &[ConfigSource]) -> Result<Self, ConfigError> {
        let mut store = Self::default();
        for source in sources {
            for section in ini::parse_sections_from_str(&source.text, &source.origin)? {
                store.add_section(section);
            }
        }
        Ok(store)
    }

    /// Bundled defaults layered under the file at `user_config`, if present.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if either layer fails to read or parse.
    pub fn load_layered(user_config: &Path, fs: &dyn FileSystemOps) -> Result<Self, ConfigError> {
        let mut sources = vec![ConfigSource::bundled()];
        sources.extend(ConfigSource::from_file(user_config, fs)?);
        Self::load(&sources)
    }

    fn add_section(&mut self, section: Section) {
        if let Some(pos) = self
            .sections
            .iter()
            .position(|s| s.is(&section.name, section.subsection.as_deref()))
        {
            self.sections.remove(pos);
        }
        self.sections.push(section);
    }

    /// Resolve `key` for `(name, subsection)`.
    ///
    /// The section whose subsection equals `subsection` wins when it defines
    /// `key`, wherever it sits in the store. Otherwise the global section of
    /// `name` supplies the value.
    #[must_use]
    pub fn get_property(&self, name: &str, subsection: Option<&str>, key: &str) -> Option<&str> {
        let mut fallback = None;
        for section in self.sections.iter().filter(|s| s.name == name) {
            if section.subsection.as_deref() == subsection {
                if let Some(value) = section.get(key) {
                    return Some(value);
                }
            } else if fallback.is_none() && section.subsection.is_none() {
                fallback = section.get(key);
            }
        }
        fallback
    }

    /// Resolve `<key>_<platform>` first, then `key`.
    #[must_use]
    pub fn get_platform_property(
        &self,
        name: &str,
        subsection: Option<&str>,
        key: &str,
        platform: &Platform,
    ) -> Option<&str> {
        self.get_property(name, subsection, &platform.qualified_key(key))
            .or_else(|| self.get_property(name, subsection, key))
    }

    /// Section with the exact identity, or with `subsection` omitted, the
    /// first section called `name`.
    #[must_use]
    pub fn get_section(&self, name: &str, subsection: Option<&str>) -> Option<&Section> {
        self.sections.iter().find(|s| match subsection {
            Some(_) => s.is(name, subsection),
            None => s.name == name,
        })
    }

    /// All sections in load order.
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }
}
