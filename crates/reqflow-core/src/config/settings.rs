//! Startup settings: the config file with credentials resolved
//!
//! Built once in `main` and passed by reference. This is the only place that
//! consults a `SecretStore`.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::logging::Logger;
use crate::providers::{requires_api_key, ChatOptions, ProviderModelConfig};
use crate::secrets::SecretStore;
use crate::tools::{CollisionPolicy, ServiceRegistry};

use super::file::{ConfigFile, ModelSection, ServerSection, ServiceConfig, TimeoutSection};
use super::traits::{ConfigError, ConfigResult};

/// A model role with its credential attached
#[derive(Debug, Clone)]
pub struct ModelSettings {
    /// Provider id passed to `create_provider`
    pub provider: String,
    pub config: ProviderModelConfig,
    pub temperature: Option<f32>,
}

impl ModelSettings {
    fn resolve(role: &str, section: &ModelSection, secrets: &dyn SecretStore) -> ConfigResult<Self> {
        let mut config = ProviderModelConfig::new(&section.model);

        if requires_api_key(&section.provider) {
            let key = secrets.get(&section.provider).ok_or_else(|| {
                ConfigError::missing(
                    format!("{}_API_KEY", section.provider.to_uppercase()),
                    format!("{} uses provider '{}' (checked {})", role, section.provider, secrets.name()),
                )
            })?;
            config = config.with_api_key(key);
        }
        if let Some(base) = &section.api_base {
            config = config.with_api_base(base);
        }

        Ok(Self {
            provider: section.provider.clone(),
            config,
            temperature: section.temperature,
        })
    }

    pub fn options(&self) -> ChatOptions {
        match self.temperature {
            Some(t) => ChatOptions::new().with_temperature(t),
            None => ChatOptions::new(),
        }
    }
}

/// Deadlines for every network suspension point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub discovery: Duration,
    pub invocation: Duration,
    pub generation: Duration,
    pub render: Duration,
}

impl From<&TimeoutSection> for Timeouts {
    fn from(section: &TimeoutSection) -> Self {
        Self {
            discovery: Duration::from_secs(section.discovery_secs),
            invocation: Duration::from_secs(section.invocation_secs),
            generation: Duration::from_secs(section.generation_secs),
            render: Duration::from_secs(section.render_secs),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AgentSettings {
    pub model: ModelSettings,
    pub max_steps: usize,
    pub system_prompt: Option<String>,
    pub collision_policy: CollisionPolicy,
}

#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub requirements_model: ModelSettings,
    pub diagram_model: ModelSettings,
    pub design_model: ModelSettings,
    pub render_base_url: String,
    pub output_file: PathBuf,
}

/// Validated, credential-complete process settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub services: Vec<ServiceConfig>,
    pub agent: AgentSettings,
    pub pipeline: PipelineSettings,
    pub timeouts: Timeouts,
    pub server: ServerSection,
}

impl Settings {
    /// Attach credentials to every model role
    ///
    /// Fails with `ConfigurationMissing` naming the first absent key.
    pub fn resolve(config: ConfigFile, secrets: &dyn SecretStore) -> ConfigResult<Self> {
        let agent = AgentSettings {
            model: ModelSettings::resolve("agent.model", &config.agent.model, secrets)?,
            max_steps: config.agent.max_steps,
            system_prompt: config.agent.system_prompt.clone(),
            collision_policy: config.agent.collision_policy,
        };

        let pipeline = PipelineSettings {
            requirements_model: ModelSettings::resolve(
                "pipeline.requirements_model",
                &config.pipeline.requirements_model,
                secrets,
            )?,
            diagram_model: ModelSettings::resolve("pipeline.diagram_model", &config.pipeline.diagram_model, secrets)?,
            design_model: ModelSettings::resolve("pipeline.design_model", &config.pipeline.design_model, secrets)?,
            render_base_url: config.pipeline.render_base_url.clone(),
            output_file: config.pipeline.output_file.clone(),
        };

        Ok(Self {
            timeouts: Timeouts::from(&config.timeouts),
            services: config.services,
            agent,
            pipeline,
            server: config.server,
        })
    }

    pub fn registry(&self, logger: Arc<dyn Logger>) -> ServiceRegistry {
        build_registry(&self.services, logger)
    }
}

/// Register every configured service in file order
pub fn build_registry(services: &[ServiceConfig], logger: Arc<dyn Logger>) -> ServiceRegistry {
    let mut registry = ServiceRegistry::new(logger);
    for service in services {
        registry.register(&service.name, &service.url, service.transport);
    }
    registry
}
