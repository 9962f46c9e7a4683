//! Command: list discovered files with their status.
use std::io::{self, IsTerminal as _, Write};
use std::path::Path;

use anyhow::{Context as _, Result};
use serde::Serialize;

use super::{CommandSetup, format_columns};
use crate::cli::{GlobalOpts, ListOpts};
use crate::logging::Logger;
use crate::operations::{FileSystemOps, SystemFileSystemOps};
use crate::platform::Environment;
use crate::resources::{Link, LinkStatus};

/// One row of `list` output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListEntry<'a> {
    /// Live status.
    pub status: LinkStatus,
    /// Path relative to the dotfiles directory.
    pub rel_path: &'a str,
    /// Directory the relative path is appended to.
    pub target_dir: &'a Path,
}

/// Run the list command.
///
/// # Errors
///
/// Returns an error if setup fails or stdout cannot be written.
pub fn run(global: &GlobalOpts, opts: &ListOpts, env: Environment, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(global, env, log)?;
    let entries = list_entries(&setup.links, &SystemFileSystemOps, opts.status);
    let stdout = io::stdout();
    let color = stdout.is_terminal();
    let mut out = stdout.lock();
    write_list(&mut out, &entries, opts.json, color)
}

/// Entries for `links` in relative-path order, optionally restricted to one
/// status.
#[must_use]
pub fn list_entries<'a>(
    links: &'a [Link],
    fs: &dyn FileSystemOps,
    filter: Option<LinkStatus>,
) -> Vec<ListEntry<'a>> {
    let mut entries: Vec<ListEntry<'a>> = links
        .iter()
        .map(|link| ListEntry {
            status: link.status(fs),
            rel_path: link.rel_path(),
            target_dir: link.target_dir(),
        })
        .filter(|entry| filter.is_none_or(|status| entry.status == status))
        .collect();
    entries.sort_by(|a, b| a.rel_path.cmp(b.rel_path));
    entries
}

/// Write `entries` as aligned `[symbol]  rel_path  target_dir` columns, or as
/// a JSON array.
///
/// # Errors
///
/// Returns an error if `out` cannot be written.
pub fn write_list(
    out: &mut impl Write,
    entries: &[ListEntry<'_>],
    json: bool,
    color: bool,
) -> Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, entries).context("writing JSON")?;
        writeln!(out).context("writing output")?;
        return Ok(());
    }

    let rows: Vec<Vec<String>> = entries
        .iter()
        .map(|entry| {
            let marker = if color {
                entry.status.colored_marker()
            } else {
                format!("[{}]", entry.status.symbol())
            };
            vec![
                marker,
                entry.rel_path.to_string(),
                entry.target_dir.display().to_string(),
            ]
        })
        .collect();
    out.write_all(format_columns(&rows, 2).as_bytes())
        .context("writing output")?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::operations::MockFileSystemOps;

    fn links() -> Vec<Link> {
        vec![
            Link::new("z/last", "/dots/z/last", "/home/u"),
            Link::new(".bashrc", "/dots/.bashrc", "/home/u"),
            Link::new("app/config", "/dots/app/config", "/etc"),
        ]
    }

    fn fs() -> MockFileSystemOps {
        MockFileSystemOps::new()
            .with_symlink("/home/u/.bashrc", "/dots/.bashrc")
            .with_file("/etc/app/config", "foreign")
    }

    fn render(entries: &[ListEntry<'_>], json: bool, color: bool) -> String {
        let mut out = Vec::new();
        write_list(&mut out, entries, json, color).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn entries_are_sorted_with_live_status() {
        let links = links();
        let entries = list_entries(&links, &fs(), None);
        let summary: Vec<(LinkStatus, &str)> =
            entries.iter().map(|e| (e.status, e.rel_path)).collect();
        assert_eq!(
            summary,
            [
                (LinkStatus::Linked, ".bashrc"),
                (LinkStatus::Invalid, "app/config"),
                (LinkStatus::NoLink, "z/last"),
            ]
        );
    }

    #[test]
    fn filter_keeps_one_status() {
        let links = links();
        let entries = list_entries(&links, &fs(), Some(LinkStatus::NoLink));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].rel_path, "z/last");
    }

    #[test]
    fn plain_columns() {
        let links = links();
        let entries = list_entries(&links, &fs(), None);
        insta::assert_snapshot!(render(&entries, false, false), @r"
        [✓]  .bashrc     /home/u
        [×]  app/config  /etc
        [ ]  z/last      /home/u
        ");
    }

    #[test]
    fn colored_markers() {
        let links = links();
        let entries = list_entries(&links, &fs(), Some(LinkStatus::Linked));
        assert_eq!(
            render(&entries, false, true),
            "\x1b[92m[✓]\x1b[0m  .bashrc  /home/u\n"
        );
    }

    #[test]
    fn json_output() {
        let links = links();
        let entries = list_entries(&links, &fs(), Some(LinkStatus::Invalid));
        insta::assert_snapshot!(render(&entries, true, false), @r#"
        [
          {
            "status": "invalid",
            "rel_path": "app/config",
            "target_dir": "/etc"
          }
        ]
        "#);
    }

    #[test]
    fn empty_list_prints_nothing() {
        assert_eq!(render(&[], false, false), "");
    }
}
