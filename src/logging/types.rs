//! The [`Log`] trait shared by every logging backend.

/// Abstraction over logging backends.
///
/// [`Logger`](super::logger::Logger) emits `tracing` events for the console
/// and the log file; tests substitute an in-memory recorder so engine code can
/// log without knowing where output goes.
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
    /// Log a dry-run action message.
    fn dry_run(&self, msg: &str);
}
