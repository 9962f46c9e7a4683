//! `.dotconfig` line grammar.
use std::collections::BTreeMap;

use crate::error::ConfigError;

/// A parsed `[name]` or `[name "subsection"]` section.
///
/// # Examples
///
/// ```
/// use dotfiles_link::config::ini::parse_sections_from_str;
///
/// let sections = parse_sections_from_str("[file \"app/config\"]\npath = /etc\n", "x").unwrap();
/// assert_eq!(sections[0].name, "file");
/// assert_eq!(sections[0].subsection.as_deref(), Some("app/config"));
/// assert_eq!(sections[0].get("path"), Some("/etc"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Section name (`file`, `ignore`, ...).
    pub name: String,
    /// Quoted subsection, `None` for the global section of that name.
    pub subsection: Option<String>,
    /// Trimmed key → trimmed value. A repeated key keeps the last value.
    pub properties: BTreeMap<String, String>,
    /// Where the section was read from, for diagnostics.
    pub origin: String,
}

impl Section {
    /// Value of `key` in this section.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// Whether this section has the identity `(name, subsection)`.
    #[must_use]
    pub fn is(&self, name: &str, subsection: Option<&str>) -> bool {
        self.name == name && self.subsection.as_deref() == subsection
    }
}

/// Parse `.dotconfig` content into sections, in file order.
///
/// Text from `;` to the end of a line is a comment. Sections with the same
/// identity are all returned; replacement happens when they are added to a
/// [`ConfigStore`](super::store::ConfigStore).
///
/// Values may contain `=`; only the first one delimits the key:
///
/// ```
/// use dotfiles_link::config::ini::parse_sections_from_str;
///
/// let sections = parse_sections_from_str("[a]\nk = x=y ; note\n", "x").unwrap();
/// assert_eq!(sections[0].get("k"), Some("x=y"));
/// ```
///
/// # Errors
///
/// Returns [`ConfigError`] for a malformed header, a line without `=`, or a
/// property that precedes every header. `origin` and the 1-based line number
/// are carried in the error.
pub fn parse_sections_from_str(content: &str, origin: &str) -> Result<Vec<Section>, ConfigError> {
    let mut sections = Vec::new();
    let mut current: Option<Section> = None;

    for (idx, raw) in content.lines().enumerate() {
        let line = strip_comment(raw).trim();
        if line.is_empty() {
            continue;
        }

        if line.starts_with('[') {
            let Some((name, subsection)) = parse_section_header(line) else {
                return Err(ConfigError::InvalidSection {
                    origin: origin.to_string(),
                    line: idx + 1,
                    text: line.to_string(),
                });
            };
            if let Some(section) = current.take() {
                sections.push(section);
            }
            current = Some(Section {
                name,
                subsection,
                properties: BTreeMap::new(),
                origin: origin.to_string(),
            });
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            return Err(ConfigError::InvalidProperty {
                origin: origin.to_string(),
                line: idx + 1,
                text: line.to_string(),
            });
        };
        let Some(section) = current.as_mut() else {
            return Err(ConfigError::PropertyOutsideSection {
                origin: origin.to_string(),
                line: idx + 1,
                text: line.to_string(),
            });
        };
        section
            .properties
            .insert(key.trim().to_string(), value.trim().to_string());
    }

    if let Some(section) = current {
        sections.push(section);
    }

    Ok(sections)
}

fn strip_comment(line: &str) -> &str {
    line.split_once(';').map_or(line, |(before, _)| before)
}

/// Parse `[name]` or `[name "subsection"]`, whitespace tolerant.
///
/// The name must be non-empty and free of whitespace and quotes; the
/// subsection is everything between the first and the last quote.
fn parse_section_header(line: &str) -> Option<(String, Option<String>)> {
    let inner = line.strip_prefix('[')?.strip_suffix(']')?.trim();

    let (name, subsection) = match inner.split_once('"') {
        Some((name, rest)) => {
            if name.trim_end().len() == name.len() {
                // name and quote must be separated by whitespace
                return None;
            }
            let subsection = rest.strip_suffix('"')?;
            (name.trim(), Some(subsection.to_string()))
        }
        None => (inner, None),
    };

    if name.is_empty() || name.contains(char::is_whitespace) {
        return None;
    }
    Some((name.to_string(), subsection))
}
