//! Command: create links for configuration files.
use std::sync::Arc;

use anyhow::Result;

use super::CommandSetup;
use crate::cli::{GlobalOpts, LinkOpts};
use crate::logging::Logger;
use crate::platform::Environment;
use crate::prompt::{DeclinePrompt, Prompt, TerminalPrompt};
use crate::tasks::{Context, LinkOptions, LinkSummary, reconcile};

impl LinkOpts {
    /// Mode flags for reconciliation.
    #[must_use]
    pub const fn options(&self) -> LinkOptions {
        LinkOptions {
            force: self.force,
            interactive: self.interactive,
            preview: self.preview,
        }
    }
}

/// Run the link command.
///
/// # Errors
///
/// Returns an error if setup fails, the prompt cannot be read, or any link
/// failed.
pub fn run(
    global: &GlobalOpts,
    opts: &LinkOpts,
    env: Environment,
    log: &Arc<Logger>,
) -> Result<()> {
    let setup = CommandSetup::init(global, env, log.as_ref())?;
    let prompt: Arc<dyn Prompt> = if opts.interactive {
        Arc::new(TerminalPrompt)
    } else {
        Arc::new(DeclinePrompt)
    };
    let ctx = Context::new(log.clone(), prompt, opts.options());
    link_files(&setup, &opts.files, &ctx).map(|_| ())
}

/// Reconcile `files` (or every unlinked file) and log the summary.
///
/// # Errors
///
/// Returns an error if the prompt cannot be read or any link failed.
pub fn link_files(setup: &CommandSetup, files: &[String], ctx: &Context) -> Result<LinkSummary> {
    let preview = ctx.options.preview;
    ctx.log
        .stage(if preview { "Previewing links" } else { "Linking dotfiles" });

    let reports = reconcile(ctx, &setup.links, files)?;
    let summary = LinkSummary::from_reports(&reports, preview);
    ctx.log.stage(&summary.to_string());

    if summary.failed > 0 {
        anyhow::bail!("{} link(s) failed", summary.failed);
    }
    Ok(summary)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::logging::{Level, RecordingLog};
    use crate::operations::{FileSystemOps, MockFileSystemOps};
    use crate::platform::Platform;

    fn setup(fs: &MockFileSystemOps) -> CommandSetup {
        let env = Environment::new(Platform::from_identifier("darwin"), "/")
            .with_var("HOME", "/home/u");
        let global = GlobalOpts {
            directory: Some("/dots".to_string()),
            config: None,
        };
        CommandSetup::init_with(&global, env, fs, &RecordingLog::default()).unwrap()
    }

    fn run_link(
        fs: MockFileSystemOps,
        options: LinkOptions,
        files: &[&str],
    ) -> (Result<LinkSummary>, Arc<RecordingLog>) {
        let setup = setup(&fs);
        let log = Arc::new(RecordingLog::default());
        let fs: Arc<dyn FileSystemOps> = Arc::new(fs);
        let ctx = Context::new(log.clone(), Arc::new(DeclinePrompt), options).with_fs_ops(fs);
        let files: Vec<String> = files.iter().map(ToString::to_string).collect();
        (link_files(&setup, &files, &ctx), log)
    }

    fn dots() -> MockFileSystemOps {
        MockFileSystemOps::new()
            .with_file("/dots/.bashrc", "")
            .with_file("/dots/.vimrc", "")
            .with_dir("/home/u")
    }

    #[test]
    fn links_everything_and_logs_summary() {
        let (summary, log) = run_link(dots(), LinkOptions::default(), &[]);
        assert_eq!(summary.unwrap().linked, 2);
        assert_eq!(
            log.messages(Level::Stage),
            [
                "Linking dotfiles",
                "2 linked, 0 relinked, 0 overwritten, 0 skipped, 0 failed"
            ]
        );
    }

    #[test]
    fn preview_uses_would_wording() {
        let options = LinkOptions {
            preview: true,
            ..LinkOptions::default()
        };
        let (summary, log) = run_link(dots(), options, &[".bashrc"]);
        assert_eq!(summary.unwrap().linked, 1);
        assert_eq!(log.messages(Level::Stage)[0], "Previewing links");
        assert_eq!(log.messages(Level::Preview), ["Linked file .bashrc"]);
    }

    #[test]
    fn failures_fail_the_command_after_the_batch() {
        let fs = dots().with_failure("/home/u/.bashrc");
        let (result, log) = run_link(fs, LinkOptions::default(), &[]);
        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "1 link(s) failed");
        assert_eq!(log.messages(Level::Info), ["Linked file .vimrc"]);
    }

    #[test]
    fn unknown_file_is_a_skip_not_a_failure() {
        let (summary, _log) = run_link(dots(), LinkOptions::default(), &["nope"]);
        assert_eq!(summary.unwrap().skipped, 1);
    }

    #[test]
    fn options_follow_flags() {
        let opts = LinkOpts {
            force: true,
            preview: true,
            ..LinkOpts::default()
        };
        assert_eq!(
            opts.options(),
            LinkOptions {
                force: true,
                interactive: false,
                preview: true
            }
        );
    }
}
