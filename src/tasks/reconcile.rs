//! Decide and apply the action for each selected link.
//!
//! | status  | default           | `force`  | `interactive`         |
//! |---------|-------------------|----------|-----------------------|
//! | NOLINK  | link              | link     | ask, then link        |
//! | LINKED  | skip              | relink   | ask, then relink      |
//! | INVALID | skip              | replace  | ask, then replace     |
//!
//! A missing target directory is created under `force`, offered under
//! `interactive`, and otherwise skips the link. `preview` runs the same
//! decisions and reports them without touching the filesystem. A link whose
//! target path resolves to its own source file is always skipped.
use std::collections::HashSet;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::Result;

use super::context::Context;
use crate::error::LinkError;
use crate::operations::FileSystemOps;
use crate::resources::{Link, LinkStatus};

/// Why a link was left alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The requested relative path matches no discovered file.
    NotFound,
    /// The directory that would hold the link is missing.
    DirectoryMissing(PathBuf),
    /// The target is already the correct symlink.
    AlreadyLinked,
    /// Something else occupies the target.
    AlreadyExists,
    /// The user answered no.
    Declined,
    /// The target path is the source file itself.
    TargetIsSource,
}

/// What reconciliation did (or, in preview, would do) for one link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    /// A new symlink was created.
    Linked,
    /// An existing correct symlink was replaced.
    Relinked,
    /// A foreign entry was removed and replaced by the symlink.
    Overwritten,
    /// Nothing was changed.
    Skipped(SkipReason),
    /// A filesystem call failed.
    Failed(String),
}

/// Result of reconciling one requested link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkReport {
    /// Relative path as requested.
    pub rel_path: String,
    /// Target directory created on the way, if any.
    pub created_dir: Option<PathBuf>,
    /// Final outcome.
    pub outcome: LinkOutcome,
    /// `false` when the outcome was only previewed.
    pub applied: bool,
}

impl LinkReport {
    fn new(rel_path: &str, outcome: LinkOutcome, applied: bool) -> Self {
        Self {
            rel_path: rel_path.to_string(),
            created_dir: None,
            outcome,
            applied,
        }
    }

    fn skipped(rel_path: &str, reason: SkipReason) -> Self {
        Self::new(rel_path, LinkOutcome::Skipped(reason), false)
    }
}

impl fmt::Display for LinkReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rel = &self.rel_path;
        match &self.outcome {
            LinkOutcome::Linked => write!(f, "Linked file {rel}"),
            LinkOutcome::Relinked => write!(f, "Relinked file {rel}"),
            LinkOutcome::Overwritten => write!(f, "Overwrote file with link {rel}"),
            LinkOutcome::Failed(reason) => write!(f, "Failed to link file {rel}: {reason}"),
            LinkOutcome::Skipped(reason) => {
                write!(f, "Skipped file {rel}; ")?;
                match reason {
                    SkipReason::NotFound => write!(f, "unable to find source file"),
                    SkipReason::DirectoryMissing(dir) => {
                        write!(f, "target directory {} does not exist", dir.display())
                    }
                    SkipReason::AlreadyLinked => write!(f, "file is already linked correctly"),
                    SkipReason::AlreadyExists => write!(f, "file already exists at target path"),
                    SkipReason::Declined => write!(f, "declined"),
                    SkipReason::TargetIsSource => write!(f, "target path is the source file"),
                }
            }
        }
    }
}

/// Per-outcome totals of a reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkSummary {
    /// New symlinks.
    pub linked: usize,
    /// Replaced correct symlinks.
    pub relinked: usize,
    /// Replaced foreign entries.
    pub overwritten: usize,
    /// Links left alone.
    pub skipped: usize,
    /// Links whose filesystem calls failed.
    pub failed: usize,
    /// Whether the pass was a preview.
    pub preview: bool,
}

impl LinkSummary {
    /// Tally `reports`.
    #[must_use]
    pub fn from_reports(reports: &[LinkReport], preview: bool) -> Self {
        let mut summary = Self {
            preview,
            ..Self::default()
        };
        for report in reports {
            match report.outcome {
                LinkOutcome::Linked => summary.linked += 1,
                LinkOutcome::Relinked => summary.relinked += 1,
                LinkOutcome::Overwritten => summary.overwritten += 1,
                LinkOutcome::Skipped(_) => summary.skipped += 1,
                LinkOutcome::Failed(_) => summary.failed += 1,
            }
        }
        summary
    }
}

impl fmt::Display for LinkSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.preview {
            write!(
                f,
                "would link {}, would relink {}, would overwrite {}, {} skipped, {} failed",
                self.linked, self.relinked, self.overwritten, self.skipped, self.failed
            )
        } else {
            write!(
                f,
                "{} linked, {} relinked, {} overwritten, {} skipped, {} failed",
                self.linked, self.relinked, self.overwritten, self.skipped, self.failed
            )
        }
    }
}

/// Reconcile `files` (relative paths, `\` accepted as separator) against the
/// discovered `links`. With no files, every link that is not already
/// [`LinkStatus::Linked`] is selected.
///
/// Failures of individual links are reported, not returned.
///
/// # Errors
///
/// Returns an error only if the prompt cannot be read, which aborts the pass.
pub fn reconcile(ctx: &Context, links: &[Link], files: &[String]) -> Result<Vec<LinkReport>> {
    let mut reports = Vec::new();
    let mut created = HashSet::new();

    if files.is_empty() {
        let pending: Vec<&Link> = links
            .iter()
            .filter(|link| link.status(&*ctx.fs_ops) != LinkStatus::Linked)
            .collect();
        ctx.log.debug(&format!("{} link(s) not linked", pending.len()));
        for link in pending {
            reports.push(reconcile_link(ctx, link, &mut created)?);
        }
        return Ok(reports);
    }

    for file in files {
        let rel_path = normalize_rel_path(file);
        match links.iter().find(|link| link.rel_path() == rel_path) {
            Some(link) => reports.push(reconcile_link(ctx, link, &mut created)?),
            None => {
                let report = LinkReport::skipped(&rel_path, SkipReason::NotFound);
                ctx.log.info(&report.to_string());
                reports.push(report);
            }
        }
    }
    Ok(reports)
}

/// Accept `\` as a separator and drop leading `./` and trailing `/`.
fn normalize_rel_path(file: &str) -> String {
    let unified = file.replace('\\', "/");
    let mut rel = unified.as_str();
    while let Some(rest) = rel.strip_prefix("./") {
        rel = rest;
    }
    rel.trim_end_matches('/').to_string()
}

/// `created` holds the directories this pass has created, or in preview would
/// have created, so each one is offered and announced once.
fn reconcile_link(
    ctx: &Context,
    link: &Link,
    created: &mut HashSet<PathBuf>,
) -> Result<LinkReport> {
    let fs = &*ctx.fs_ops;
    let opts = ctx.options;
    let rel = link.rel_path();

    if link.targets_source(fs) {
        let report = LinkReport::skipped(rel, SkipReason::TargetIsSource);
        ctx.log.warn(&report.to_string());
        return Ok(report);
    }
    let status = link.status(fs);

    let mut created_dir = None;
    let dir = link.target_parent();
    if !fs.exists(dir) && !created.iter().any(|d| d.starts_with(dir)) {
        let create = opts.force
            || (opts.interactive
                && ctx.prompt.confirm(&format!(
                    "Target directory {} does not exist, create it",
                    dir.display()
                ))?);
        if !create {
            let report = LinkReport::skipped(rel, SkipReason::DirectoryMissing(dir.to_path_buf()));
            ctx.log.info(&report.to_string());
            return Ok(report);
        }
        let made = if opts.preview {
            Ok(())
        } else {
            create_dir(fs, dir)
        };
        if let Err(err) = made {
            let report = LinkReport::new(rel, LinkOutcome::Failed(err.to_string()), false);
            return Ok(finish(ctx, report));
        }
        announce(ctx, &format!("Created directory {}", dir.display()));
        created.insert(dir.to_path_buf());
        created_dir = Some(dir.to_path_buf());
    }

    let (outcome, replace) = match status {
        LinkStatus::NoLink => {
            let go = !opts.interactive
                || ctx
                    .prompt
                    .confirm(&format!("Link {rel} does not exist, create it"))?;
            if go {
                (LinkOutcome::Linked, false)
            } else {
                (LinkOutcome::Skipped(SkipReason::Declined), false)
            }
        }
        LinkStatus::Linked => {
            let go = opts.force
                || (opts.interactive
                    && ctx
                        .prompt
                        .confirm(&format!("File {rel} is already linked, re-link it"))?);
            if go {
                (LinkOutcome::Relinked, true)
            } else {
                (LinkOutcome::Skipped(SkipReason::AlreadyLinked), false)
            }
        }
        LinkStatus::Invalid => {
            let go = opts.force
                || (opts.interactive
                    && ctx.prompt.confirm(&format!(
                        "File {} already exists and is not linked to {}, delete it and create link",
                        link.target_path().display(),
                        link.source_path().display()
                    ))?);
            if go {
                (LinkOutcome::Overwritten, true)
            } else {
                (LinkOutcome::Skipped(SkipReason::AlreadyExists), false)
            }
        }
    };

    let mut report = LinkReport::new(rel, outcome, false);
    report.created_dir = created_dir;
    if matches!(report.outcome, LinkOutcome::Skipped(_)) || opts.preview {
        return Ok(finish(ctx, report));
    }

    let applied = if replace {
        fs.remove(link.target_path())
            .map_err(|e| LinkError::io("removing", link.target_path(), e))
            .and_then(|()| link.link(fs))
    } else {
        link.link(fs)
    };
    match applied {
        Ok(()) => report.applied = true,
        Err(err) => report.outcome = LinkOutcome::Failed(err.to_string()),
    }
    Ok(finish(ctx, report))
}

/// `create_dir_all`, tolerating a directory that appeared concurrently.
fn create_dir(fs: &dyn FileSystemOps, dir: &Path) -> Result<(), LinkError> {
    match fs.create_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && fs.is_dir(dir) => Ok(()),
        Err(e) => Err(LinkError::io("creating directory", dir, e)),
    }
}

fn announce(ctx: &Context, msg: &str) {
    if ctx.options.preview {
        ctx.log.preview(msg);
    } else {
        ctx.log.info(msg);
    }
}

fn finish(ctx: &Context, report: LinkReport) -> LinkReport {
    let msg = report.to_string();
    match report.outcome {
        LinkOutcome::Failed(_) => ctx.log.error(&msg),
        LinkOutcome::Skipped(_) => ctx.log.info(&msg),
        _ => announce(ctx, &msg),
    }
    report
}
