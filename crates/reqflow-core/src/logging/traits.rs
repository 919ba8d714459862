//! Logger trait definition

/// Logger abstraction injected into every component
///
/// Implementations:
/// - `NoOpLogger`: Silent logger for tests
/// - `TracingLogger`: Forwards to the `tracing` ecosystem (used by the CLI)
pub trait Logger: Send + Sync {
    fn debug(&self, message: &str);

    fn info(&self, message: &str);

    fn warn(&self, message: &str);

    fn error(&self, message: &str);
}
