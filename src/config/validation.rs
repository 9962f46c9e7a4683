//! Non-fatal configuration checks run after discovery.
use std::collections::HashSet;
use std::fmt;

use super::store::ConfigStore;

/// Section names the engine reads.
pub const KNOWN_SECTIONS: &[&str] = &["file", "ignore"];

/// A validation warning detected during configuration loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The configuration source (file path or `<default>`).
    pub source: String,
    /// The section that triggered the warning.
    pub item: String,
    /// Human-readable warning message.
    pub message: String,
}

impl ValidationWarning {
    /// Build a warning.
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        item: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            item: item.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.source, self.item, self.message)
    }
}

/// Trait for configuration validators.
pub trait ConfigValidator {
    /// Validate the store and return any warnings found.
    fn validate(&self, store: &ConfigStore) -> Vec<ValidationWarning>;

    /// Human-readable name for this validator.
    fn name(&self) -> &'static str;
}

/// Flags sections the engine never reads.
#[derive(Debug, Default)]
pub struct SectionNameValidator;

impl ConfigValidator for SectionNameValidator {
    fn validate(&self, store: &ConfigStore) -> Vec<ValidationWarning> {
        store
            .sections()
            .iter()
            .filter_map(|section| {
                (!KNOWN_SECTIONS.contains(&section.name.as_str())).then(|| {
                    ValidationWarning::new(
                        &section.origin,
                        header(&section.name, section.subsection.as_deref()),
                        "unknown section name",
                    )
                })
            })
            .collect()
    }

    fn name(&self) -> &'static str {
        "sections"
    }
}

/// Checks the `[ignore]` section the ignore list is read from.
#[derive(Debug, Default)]
pub struct IgnoreSectionValidator;

impl ConfigValidator for IgnoreSectionValidator {
    fn validate(&self, store: &ConfigStore) -> Vec<ValidationWarning> {
        let Some(section) = store.get_section("ignore", None) else {
            return Vec::new();
        };
        let item = header(&section.name, section.subsection.as_deref());
        let mut warnings = Vec::new();
        if section.subsection.is_some() {
            warnings.push(ValidationWarning::new(
                &section.origin,
                &item,
                "ignore section does not take a subsection",
            ));
        }
        let sets_path = section
            .properties
            .keys()
            .any(|key| key == "path" || key.starts_with("path_"));
        if !sets_path {
            warnings.push(ValidationWarning::new(
                &section.origin,
                &item,
                "ignore section sets no path; the default location is used",
            ));
        }
        warnings
    }

    fn name(&self) -> &'static str {
        "ignore"
    }
}

/// Flags `[file "<rel_path>"]` sections that match no discovered file.
#[derive(Debug)]
pub struct FileSectionValidator<'a> {
    rel_paths: HashSet<&'a str>,
}

impl<'a> FileSectionValidator<'a> {
    /// Validator over the relative paths produced by discovery.
    #[must_use]
    pub fn new(rel_paths: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            rel_paths: rel_paths.into_iter().collect(),
        }
    }
}

impl ConfigValidator for FileSectionValidator<'_> {
    fn validate(&self, store: &ConfigStore) -> Vec<ValidationWarning> {
        store
            .sections()
            .iter()
            .filter(|s| s.name == "file")
            .filter_map(|s| {
                let sub = s.subsection.as_deref()?;
                (!self.rel_paths.contains(sub)).then(|| {
                    ValidationWarning::new(
                        &s.origin,
                        header(&s.name, Some(sub)),
                        "no file with this relative path in the dotfiles directory",
                    )
                })
            })
            .collect()
    }

    fn name(&self) -> &'static str {
        "files"
    }
}

/// Run every validator.
#[must_use]
pub fn validate_all<'a>(
    store: &ConfigStore,
    rel_paths: impl IntoIterator<Item = &'a str>,
) -> Vec<ValidationWarning> {
    let validators: [&dyn ConfigValidator; 3] = [
        &SectionNameValidator,
        &IgnoreSectionValidator,
        &FileSectionValidator::new(rel_paths),
    ];
    validators.iter().flat_map(|v| v.validate(store)).collect()
}

fn header(name: &str, subsection: Option<&str>) -> String {
    subsection.map_or_else(|| format!("[{name}]"), |sub| format!("[{name} \"{sub}\"]"))
}
