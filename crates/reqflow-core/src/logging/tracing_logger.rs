//! Bridge from the `Logger` trait to `tracing`

use super::traits::Logger;

/// Logger that emits `tracing` events under a fixed target
///
/// The binary installs a `tracing-subscriber` so these events honour
/// `RUST_LOG` like the rest of the ecosystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl TracingLogger {
    pub fn new() -> Self {
        Self
    }
}

impl Logger for TracingLogger {
    fn debug(&self, message: &str) {
        tracing::debug!(target: "reqflow", "{}", message);
    }

    fn info(&self, message: &str) {
        tracing::info!(target: "reqflow", "{}", message);
    }

    fn warn(&self, message: &str) {
        tracing::warn!(target: "reqflow", "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "reqflow", "{}", message);
    }
}
