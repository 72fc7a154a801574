//! User-facing output port.
//!
//! Everything a session wants the user to see goes through this trait:
//! warnings and errors, verbose passthrough of child output, and the compact
//! progress block that replaces itself on every update.

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Trait for receiving session output.
pub trait SessionReporter: Send + Sync {
    /// Show a diagnostic message.
    fn notice(&self, level: NoticeLevel, message: &str);

    /// Show one line of child output immediately (verbose mode).
    fn line(&self, line: &str);

    /// Replace the previously shown progress block with `lines`.
    fn progress_block(&self, lines: &[String]);
}

/// A reporter that ignores all output.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl SessionReporter for NoopReporter {
    fn notice(&self, _level: NoticeLevel, _message: &str) {}
    fn line(&self, _line: &str) {}
    fn progress_block(&self, _lines: &[String]) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_reporter_does_not_panic() {
        let reporter = NoopReporter;
        reporter.notice(NoticeLevel::Warning, "warn");
        reporter.line("line");
        reporter.progress_block(&["a".to_string()]);
    }
}
