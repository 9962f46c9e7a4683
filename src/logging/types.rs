//! The [`Log`] trait shared by the engine and its test double.

/// Abstraction over logging backends.
///
/// [`Logger`](super::logger::Logger) forwards to `tracing`; tests substitute
/// a recorder so that reconciliation can assert on what it reported.
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (may be suppressed on console).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log an action that preview mode decided on but did not apply.
    fn preview(&self, msg: &str);
}

/// Severity of a recorded message.
#[cfg(test)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Stage message.
    Stage,
    /// Info message.
    Info,
    /// Debug message.
    Debug,
    /// Warning message.
    Warn,
    /// Error message.
    Error,
    /// Preview message.
    Preview,
}

/// In-memory [`Log`] for unit tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingLog {
    entries: std::sync::Mutex<Vec<(Level, String)>>,
}

#[cfg(test)]
impl RecordingLog {
    /// Everything logged so far, in order.
    pub fn entries(&self) -> Vec<(Level, String)> {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Messages logged at `level`.
    pub fn messages(&self, level: Level) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m)
            .collect()
    }

    fn push(&self, level: Level, msg: &str) {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push((level, msg.to_string()));
    }
}

#[cfg(test)]
impl Log for RecordingLog {
    fn stage(&self, msg: &str) {
        self.push(Level::Stage, msg);
    }
    fn info(&self, msg: &str) {
        self.push(Level::Info, msg);
    }
    fn debug(&self, msg: &str) {
        self.push(Level::Debug, msg);
    }
    fn warn(&self, msg: &str) {
        self.push(Level::Warn, msg);
    }
    fn error(&self, msg: &str) {
        self.push(Level::Error, msg);
    }
    fn preview(&self, msg: &str) {
        self.push(Level::Preview, msg);
    }
}
