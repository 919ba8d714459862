//! High-level system design generation

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Settings;
use crate::logging::Logger;

use super::error::{PipelineError, PipelineResult, Stage};
use super::prompts::design_prompt;
use super::stage::StageModel;

#[derive(Debug, Clone, Serialize)]
pub struct DesignReport {
    pub project_description: String,
    /// Architecture, components and data flow as returned by the model
    pub design: String,
    pub status: String,
}

pub struct DesignGenerator {
    model: StageModel,
    generation_timeout: Duration,
    logger: Arc<dyn Logger>,
}

impl DesignGenerator {
    pub fn new(model: StageModel, generation_timeout: Duration, logger: Arc<dyn Logger>) -> Self {
        Self {
            model,
            generation_timeout,
            logger,
        }
    }

    pub fn from_settings(settings: &Settings, logger: Arc<dyn Logger>) -> Self {
        Self::new(
            StageModel::from_settings(&settings.pipeline.design_model, Arc::clone(&logger)),
            settings.timeouts.generation,
            logger,
        )
    }

    pub async fn run(&self, project_description: &str) -> PipelineResult<DesignReport> {
        let project_description = project_description.trim();
        if project_description.is_empty() {
            return Err(PipelineError::InvalidInput(
                "project description must not be empty".to_string(),
            ));
        }

        self.logger.info("[Design] Generating system design");
        let design = self
            .model
            .generate(Stage::Design, design_prompt(project_description), self.generation_timeout)
            .await?;

        Ok(DesignReport {
            project_description: project_description.to_string(),
            design,
            status: "success".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NoOpLogger;
    use crate::providers::{MockProvider, ProviderModelConfig};

    #[tokio::test]
    async fn test_design_report() {
        let provider = Arc::new(MockProvider::fixed(
            r#"{"architecture": "client-server"}"#,
            Arc::new(NoOpLogger),
        ));
        let generator = DesignGenerator::new(
            StageModel::new(provider, ProviderModelConfig::new("gemma2-9b-it")),
            Duration::from_secs(5),
            Arc::new(NoOpLogger),
        );

        let report = generator.run("A chat app").await.unwrap();
        assert_eq!(report.design, r#"{"architecture": "client-server"}"#);
        assert_eq!(report.project_description, "A chat app");
        assert_eq!(report.status, "success");
    }

    #[tokio::test]
    async fn test_design_rejects_blank_input() {
        let generator = DesignGenerator::new(
            StageModel::new(
                Arc::new(MockProvider::echo(Arc::new(NoOpLogger))),
                ProviderModelConfig::new("gemma2-9b-it"),
            ),
            Duration::from_secs(5),
            Arc::new(NoOpLogger),
        );
        assert!(matches!(generator.run("").await, Err(PipelineError::InvalidInput(_))));
    }
}
