//! Command-line argument definitions.
use clap::{Parser, Subcommand};
use clap_complete::Shell;

use crate::resources::LinkStatus;

/// Top-level CLI entry point for the dotfiles link manager.
#[derive(Parser, Debug)]
#[command(
    name = "dotfiles",
    about = "A management system for configuration files",
    version = crate::version()
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Path to the dotfiles directory
    #[arg(
        short = 'd',
        long,
        env = "DOTFILES_PATH",
        global = true,
        value_name = "DIR"
    )]
    pub directory: Option<String>,

    /// Configuration file to use instead of .dotconfig in the user configuration directory
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<String>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create links for configuration files
    Link(LinkOpts),
    /// List available configuration files
    List(ListOpts),
    /// Display information for a specific configuration file
    Info(InfoOpts),
    /// Edit a configuration file
    Edit(EditOpts),
    /// Generate shell completions
    Completions(CompletionsOpts),
    /// Print version information
    Version,
}

impl Command {
    /// Subcommand name, used for the log file.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Link(_) => "link",
            Self::List(_) => "list",
            Self::Info(_) => "info",
            Self::Edit(_) => "edit",
            Self::Completions(_) => "completions",
            Self::Version => "version",
        }
    }
}

/// Options for the `link` subcommand.
#[derive(Parser, Debug, Clone, Default)]
pub struct LinkOpts {
    /// Overwrite existing files in the target directory
    #[arg(short, long)]
    pub force: bool,

    /// Prompt before changing anything
    #[arg(short, long)]
    pub interactive: bool,

    /// Show output, but do not create links
    #[arg(short, long)]
    pub preview: bool,

    /// Files to create links for; if not specified all unlinked files are linked
    pub files: Vec<String>,
}

/// Options for the `list` subcommand.
#[derive(Parser, Debug, Clone, Default)]
pub struct ListOpts {
    /// Only show links with this status (nolink, invalid, linked)
    #[arg(short = 't', long = "type", value_name = "STATUS")]
    pub status: Option<LinkStatus>,

    /// Print JSON instead of columns
    #[arg(long)]
    pub json: bool,
}

/// Options for the `info` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct InfoOpts {
    /// Display the file contents
    #[arg(short, long)]
    pub contents: bool,

    /// Print JSON instead of columns
    #[arg(long)]
    pub json: bool,

    /// File to display information for
    pub file: String,
}

/// Options for the `edit` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct EditOpts {
    /// File to edit
    pub file: String,
}

/// Options for the `completions` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct CompletionsOpts {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
