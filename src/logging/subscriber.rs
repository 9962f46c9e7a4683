//! Tracing subscriber setup: console formatter, file layer, and initialisation.
use std::fs;
use std::io::Write as _;
use std::path::Path;
use std::sync::Mutex;

use tracing::Level;

use super::utils::{strip_ansi, utc_datetime, utc_time};

/// Target for section headers.
pub(super) const STAGE_TARGET: &str = "dotfiles::stage";
/// Target for actions that were decided but not applied.
pub(super) const PREVIEW_TARGET: &str = "dotfiles::preview";
/// Variable holding an `EnvFilter` directive for console output.
pub const LOG_ENV_VAR: &str = "DOTFILES_LOG";

/// Pulls the `message` field out of an event.
#[derive(Default)]
struct Message(String);

impl tracing::field::Visit for Message {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            value.clone_into(&mut self.0);
        }
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

impl Message {
    fn of(event: &tracing::Event<'_>) -> String {
        let mut message = Self::default();
        event.record(&mut message);
        message.0
    }
}

/// How an event is presented, derived from its level and target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Stage,
    Preview,
    Info,
    Debug,
    Warn,
    Error,
}

impl Kind {
    fn of(event: &tracing::Event<'_>) -> Self {
        let metadata = event.metadata();
        match (*metadata.level(), metadata.target()) {
            (Level::ERROR, _) => Self::Error,
            (Level::WARN, _) => Self::Warn,
            (Level::INFO, STAGE_TARGET) => Self::Stage,
            (Level::INFO, PREVIEW_TARGET) => Self::Preview,
            (Level::INFO, _) => Self::Info,
            _ => Self::Debug,
        }
    }
}

/// Appends every event to the per-command log file, timestamped and with
/// ANSI codes stripped.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<fs::File>,
}

impl FileLayer {
    /// Truncate `path` (creating its directory), write a run header and keep
    /// it open for appending.
    ///
    /// Returns `None` if the file cannot be created.
    pub(super) fn at(path: &Path) -> Option<Self> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).ok()?;
        }
        let rule = "=".repeat(42);
        let header = format!(
            "{rule}\ndotfiles {} {}\n{rule}\n",
            crate::version(),
            utc_datetime()
        );
        fs::write(path, header).ok()?;
        let file = fs::OpenOptions::new().append(true).open(path).ok()?;
        Some(Self {
            file: Mutex::new(file),
        })
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for FileLayer {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let msg = strip_ansi(&Message::of(event));
        let tag = match Kind::of(event) {
            Kind::Stage => "==> ",
            Kind::Preview => "    [preview] ",
            Kind::Info => "    ",
            Kind::Debug => "    [debug] ",
            Kind::Warn => "    [warn] ",
            Kind::Error => "    [error] ",
        };
        if let Ok(mut file) = self.file.lock() {
            writeln!(file, "[{}] {tag}{msg}", utc_time()).ok();
        }
    }
}

/// Console formatter: `==>` headers, indented outcomes, coloured severity.
struct ConsoleFormat;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for ConsoleFormat
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let msg = Message::of(event);
        match Kind::of(event) {
            Kind::Error => writeln!(writer, "\x1b[91mERROR\x1b[0m {msg}"),
            Kind::Warn => writeln!(writer, "\x1b[33mWARN\x1b[0m  {msg}"),
            Kind::Stage => writeln!(writer, "\x1b[1;34m==>\x1b[0m \x1b[1m{msg}\x1b[0m"),
            Kind::Preview => writeln!(writer, "  \x1b[94m[PREVIEW]\x1b[0m {msg}"),
            Kind::Info => writeln!(writer, "  {msg}"),
            Kind::Debug => writeln!(writer, "  \x1b[2m{msg}\x1b[0m"),
        }
    }
}

/// Initialise the global [`tracing`] subscriber.
///
/// Console output goes to stdout, warnings and errors to stderr. The console
/// shows `INFO` and above, `DEBUG` with `verbose`, or whatever
/// [`LOG_ENV_VAR`] selects. When `log_file` is given, every event at `DEBUG`
/// and above is also appended there. Must be called once, before any logging.
pub fn init_subscriber(verbose: bool, log_file: Option<&Path>) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        EnvFilter, Layer as _, filter::LevelFilter, fmt, layer::SubscriberExt as _,
        util::SubscriberInitExt as _,
    };

    let default_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let console_filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .with_env_var(LOG_ENV_VAR)
        .from_env_lossy();

    let make_writer = std::io::stderr
        .with_max_level(Level::WARN)
        .and(std::io::stdout.with_min_level(Level::INFO));

    let console_layer = fmt::layer()
        .event_format(ConsoleFormat)
        .with_writer(make_writer)
        .with_filter(console_filter);

    let file_layer = log_file
        .and_then(FileLayer::at)
        .map(|layer| layer.with_filter(LevelFilter::DEBUG));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}
