//! Configuration
//!
//! - `ConfigFile`: YAML on disk with defaults for every field
//! - `Settings`: the file plus resolved credentials, built once at startup

mod traits;
mod file;
mod settings;

pub use traits::{ConfigError, ConfigResult};
pub use file::{AgentSection, ConfigFile, ModelSection, PipelineSection, ServerSection, ServiceConfig, TimeoutSection};
pub use settings::{build_registry, AgentSettings, ModelSettings, PipelineSettings, Settings, Timeouts};
