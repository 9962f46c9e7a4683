//! Command: open a file's source in an editor.
use anyhow::Result;

use super::CommandSetup;
use crate::cli::{EditOpts, GlobalOpts};
use crate::exec::{EditorCommand, Executor, SystemExecutor};
use crate::logging::{Log, Logger};
use crate::platform::Environment;
use crate::resources::Link;

/// Run the edit command.
///
/// # Errors
///
/// Returns an error if setup fails, the file is unknown, or no editor is
/// available.
pub fn run(global: &GlobalOpts, opts: &EditOpts, env: Environment, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(global, env, log)?;
    let link = setup.find(&opts.file)?;
    let editor = EditorCommand::resolve(&setup.env)?;
    edit_link(link, &editor, &SystemExecutor, log)
}

/// Open `link`'s source file with `editor` and wait for it.
///
/// A non-zero exit of the editor is logged, not returned.
///
/// # Errors
///
/// Returns an error if the editor is not installed or cannot be started.
pub fn edit_link(
    link: &Link,
    editor: &EditorCommand,
    executor: &dyn Executor,
    log: &dyn Log,
) -> Result<()> {
    log.debug(&format!(
        "opening {} with {}",
        link.source_path().display(),
        editor.program
    ));
    match editor.open(link.source_path(), executor)? {
        Some(0) => {}
        Some(code) => log.warn(&format!("{} exited with status {code}", editor.program)),
        None => log.warn(&format!("{} was terminated by a signal", editor.program)),
    }
    Ok(())
}
