//! Command: show everything known about one file.
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context as _, Result};
use serde::Serialize;

use super::{CommandSetup, format_columns};
use crate::cli::{GlobalOpts, InfoOpts};
use crate::logging::Logger;
use crate::operations::{FileSystemOps, SystemFileSystemOps};
use crate::platform::Environment;
use crate::resources::{Link, LinkStatus};

const CONTENTS_SEPARATOR: &str = "--------------------------------------------------------";

/// Snapshot of a link for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkInfo {
    /// Path relative to the dotfiles directory.
    pub rel_path: String,
    /// Live status.
    pub status: LinkStatus,
    /// Real file.
    pub source_path: PathBuf,
    /// Where the symlink belongs.
    pub target_path: PathBuf,
    /// Referent of a symlink found at the target path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existing_target_path: Option<PathBuf>,
    /// Source file contents, trailing whitespace removed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contents: Option<String>,
}

impl LinkInfo {
    /// Read the live state of `link`.
    ///
    /// # Errors
    ///
    /// Returns an error if `include_contents` is set and the source file
    /// cannot be read.
    pub fn gather(link: &Link, fs: &dyn FileSystemOps, include_contents: bool) -> Result<Self> {
        let contents = if include_contents {
            let text = fs
                .read_to_string(link.source_path())
                .with_context(|| format!("reading {}", link.source_path().display()))?;
            Some(text.trim_end().to_string())
        } else {
            None
        };
        Ok(Self {
            rel_path: link.rel_path().to_string(),
            status: link.status(fs),
            source_path: link.source_path().to_path_buf(),
            target_path: link.target_path().to_path_buf(),
            existing_target_path: link.existing_target_path(fs),
            contents,
        })
    }
}

/// Run the info command.
///
/// # Errors
///
/// Returns an error if setup fails, the file is unknown, or output fails.
pub fn run(global: &GlobalOpts, opts: &InfoOpts, env: Environment, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(global, env, log)?;
    let link = setup.find(&opts.file)?;
    let info = LinkInfo::gather(link, &SystemFileSystemOps, opts.contents)?;
    write_info(&mut io::stdout().lock(), &info, opts.json)
}

/// Write `info` as aligned label/value rows, or as a JSON object.
///
/// # Errors
///
/// Returns an error if `out` cannot be written.
pub fn write_info(out: &mut impl Write, info: &LinkInfo, json: bool) -> Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, info).context("writing JSON")?;
        writeln!(out).context("writing output")?;
        return Ok(());
    }

    let mut rows = vec![
        row("Relative Path:", info.rel_path.clone()),
        row("Status:", info.status.label().to_string()),
        row("Source Path:", info.source_path.display().to_string()),
        row("Target Path:", info.target_path.display().to_string()),
    ];
    if let Some(existing) = &info.existing_target_path {
        rows.push(row(
            "  Existing Target Source Path:",
            existing.display().to_string(),
        ));
    }
    out.write_all(format_columns(&rows, 2).as_bytes())
        .context("writing output")?;

    if let Some(contents) = &info.contents {
        write!(out, "\n{CONTENTS_SEPARATOR}\n\n{contents}\n").context("writing output")?;
    }
    Ok(())
}

fn row(label: &str, value: String) -> Vec<String> {
    vec![label.to_string(), value]
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::operations::MockFileSystemOps;

    fn link() -> Link {
        Link::new("app/config", "/dots/app/config", "/home/u")
    }

    fn render(info: &LinkInfo, json: bool) -> String {
        let mut out = Vec::new();
        write_info(&mut out, info, json).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn rows_for_unlinked_file() {
        let fs = MockFileSystemOps::new().with_file("/dots/app/config", "x");
        let info = LinkInfo::gather(&link(), &fs, false).unwrap();
        insta::assert_snapshot!(render(&info, false), @r"
        Relative Path:  app/config
        Status:         NOLINK
        Source Path:    /dots/app/config
        Target Path:    /home/u/app/config
        ");
    }

    #[test]
    fn existing_referent_and_contents() {
        let fs = MockFileSystemOps::new()
            .with_file("/dots/app/config", "key = value\n\n\n")
            .with_symlink("/home/u/app/config", "/old/config");
        let info = LinkInfo::gather(&link(), &fs, true).unwrap();
        assert_eq!(info.status, LinkStatus::Invalid);
        assert_eq!(info.contents.as_deref(), Some("key = value"));
        insta::assert_snapshot!(render(&info, false), @r"
        Relative Path:                  app/config
        Status:                         INVALID
        Source Path:                    /dots/app/config
        Target Path:                    /home/u/app/config
          Existing Target Source Path:  /old/config

        --------------------------------------------------------

        key = value
        ");
    }

    #[test]
    fn json_omits_absent_fields() {
        let fs = MockFileSystemOps::new()
            .with_file("/dots/app/config", "")
            .with_symlink("/home/u/app/config", "/dots/app/config");
        let info = LinkInfo::gather(&link(), &fs, false).unwrap();
        insta::assert_snapshot!(render(&info, true), @r#"
        {
          "rel_path": "app/config",
          "status": "linked",
          "source_path": "/dots/app/config",
          "target_path": "/home/u/app/config",
          "existing_target_path": "/dots/app/config"
        }
        "#);
    }

    #[test]
    fn unreadable_contents_is_error() {
        let fs = MockFileSystemOps::new();
        let err = LinkInfo::gather(&link(), &fs, true).unwrap_err();
        assert!(err.to_string().contains("reading /dots/app/config"));
    }
}
