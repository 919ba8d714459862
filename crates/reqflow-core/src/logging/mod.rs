//! Logging abstractions for runtime-agnostic logging

mod traits;
mod noop;
mod tracing_logger;

pub use traits::Logger;
pub use noop::NoOpLogger;
pub use tracing_logger::TracingLogger;
