//! YAML configuration file
//!
//! Looked up at `~/.config/reqflow/config.yaml` unless a path is given. A
//! missing file is not an error: the defaults reproduce a single local
//! requirements service on port 8000 backed by Groq models.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::tools::{CollisionPolicy, TransportKind};
use super::traits::{ConfigError, ConfigResult};

/// Root of the configuration file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    /// Remote tool services, discovered in this order
    pub services: Vec<ServiceConfig>,
    pub agent: AgentSection,
    pub pipeline: PipelineSection,
    pub timeouts: TimeoutSection,
    pub server: ServerSection,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            services: vec![ServiceConfig {
                name: "requirements phase".to_string(),
                url: "http://localhost:8000/mcp".to_string(),
                transport: TransportKind::StreamableHttp,
            }],
            agent: AgentSection::default(),
            pipeline: PipelineSection::default(),
            timeouts: TimeoutSection::default(),
            server: ServerSection::default(),
        }
    }
}

/// One registry entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    /// URL for HTTP transports, socket path for Unix sockets
    pub url: String,
    #[serde(default = "default_transport")]
    pub transport: TransportKind,
}

fn default_transport() -> TransportKind {
    TransportKind::StreamableHttp
}

/// Which provider/model answers a given role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSection {
    pub provider: String,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Custom API base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

impl ModelSection {
    pub fn groq(model: impl Into<String>) -> Self {
        Self {
            provider: "groq".to_string(),
            model: model.into(),
            temperature: Some(0.7),
            api_base: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSection {
    pub model: ModelSection,
    /// Upper bound on model round-trips per run
    pub max_steps: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    pub collision_policy: CollisionPolicy,
}

impl Default for AgentSection {
    fn default() -> Self {
        Self {
            model: ModelSection::groq("llama3-70b-8192"),
            max_steps: 10,
            system_prompt: None,
            collision_policy: CollisionPolicy::LastWriterWins,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSection {
    pub requirements_model: ModelSection,
    pub diagram_model: ModelSection,
    pub design_model: ModelSection,
    pub render_base_url: String,
    pub output_file: PathBuf,
}

impl Default for PipelineSection {
    fn default() -> Self {
        Self {
            requirements_model: ModelSection::groq("llama-3.1-8b-instant"),
            diagram_model: ModelSection::groq("llama3-70b-8192"),
            design_model: ModelSection::groq("gemma2-9b-it"),
            render_base_url: "https://mermaid.ink".to_string(),
            output_file: PathBuf::from("requirements_phase.png"),
        }
    }
}

/// Timeouts in seconds for every network suspension point
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutSection {
    pub discovery_secs: u64,
    pub invocation_secs: u64,
    pub generation_secs: u64,
    pub render_secs: u64,
}

impl Default for TimeoutSection {
    fn default() -> Self {
        Self {
            discovery_secs: 10,
            invocation_secs: 180,
            generation_secs: 60,
            render_secs: 30,
        }
    }
}

/// Listener for `reqflow serve`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

impl ConfigFile {
    /// User-level config path (`~/.config/reqflow/config.yaml`)
    pub fn default_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".config"));
        config_dir.join("reqflow").join("config.yaml")
    }

    /// Load from `path`, falling back to defaults when the file does not exist
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> ConfigResult<Self> {
        let config: ConfigFile = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Write the config as YAML, creating parent directories
    pub fn save(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_yaml::to_string(self)?)?;
        Ok(())
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.agent.max_steps == 0 {
            return Err(ConfigError::Invalid("agent.max_steps must be at least 1".to_string()));
        }
        if let Some(service) = self.services.iter().find(|s| s.url.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "service '{}' has an empty url",
                service.name
            )));
        }
        Ok(())
    }
}
