//! Requirements pipeline: description -> requirements -> mermaid -> image file

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::config::Settings;
use crate::logging::Logger;

use super::artifact::RequirementsArtifact;
use super::error::{PipelineError, PipelineResult, Stage};
use super::markup::extract_mermaid;
use super::prompts::{diagram_prompt, requirements_prompt};
use super::render::MermaidInkRenderer;
use super::stage::StageModel;

/// Successful pipeline run, serialized as the tool's JSON result
#[derive(Debug, Clone, Serialize)]
pub struct RequirementsReport {
    pub project_description: String,
    /// Extraction reply as received
    pub requirements: String,
    pub mermaid_code: String,
    pub output_file: PathBuf,
    pub status: String,
    #[serde(skip)]
    pub artifact: RequirementsArtifact,
}

pub struct RequirementsPipeline {
    requirements_model: StageModel,
    diagram_model: StageModel,
    renderer: MermaidInkRenderer,
    output_file: PathBuf,
    generation_timeout: Duration,
    logger: Arc<dyn Logger>,
}

impl RequirementsPipeline {
    pub fn new(
        requirements_model: StageModel,
        diagram_model: StageModel,
        renderer: MermaidInkRenderer,
        output_file: impl Into<PathBuf>,
        generation_timeout: Duration,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            requirements_model,
            diagram_model,
            renderer,
            output_file: output_file.into(),
            generation_timeout,
            logger,
        }
    }

    pub fn from_settings(settings: &Settings, logger: Arc<dyn Logger>) -> Self {
        let pipeline = &settings.pipeline;
        Self::new(
            StageModel::from_settings(&pipeline.requirements_model, Arc::clone(&logger)),
            StageModel::from_settings(&pipeline.diagram_model, Arc::clone(&logger)),
            MermaidInkRenderer::new(&pipeline.render_base_url, settings.timeouts.render, Arc::clone(&logger)),
            &pipeline.output_file,
            settings.timeouts.generation,
            logger,
        )
    }

    pub fn output_file(&self) -> &Path {
        &self.output_file
    }

    /// Run all stages, writing the image only when rendering succeeds
    pub async fn run(&self, project_description: &str) -> PipelineResult<RequirementsReport> {
        let project_description = project_description.trim();
        if project_description.is_empty() {
            return Err(PipelineError::InvalidInput(
                "project description must not be empty".to_string(),
            ));
        }

        self.logger.info("[Pipeline] Extracting requirements");
        let requirements = self
            .requirements_model
            .generate(Stage::Extraction, requirements_prompt(project_description), self.generation_timeout)
            .await?;
        let artifact = RequirementsArtifact::parse(&requirements);
        if !artifact.is_structured() {
            self.logger.warn("[Pipeline] Requirements reply was not structured JSON; passing it on as text");
        }

        self.logger.info("[Pipeline] Synthesizing diagram markup");
        let reply = self
            .diagram_model
            .generate(Stage::MarkupSynthesis, diagram_prompt(&requirements), self.generation_timeout)
            .await?;
        let mermaid_code = extract_mermaid(&reply);
        self.logger.debug(&format!("[Pipeline] Mermaid:\n{}", mermaid_code));

        let image = self.renderer.render(&mermaid_code).await?;
        tokio::fs::write(&self.output_file, &image)
            .await
            .map_err(|source| PipelineError::Io {
                path: self.output_file.clone(),
                source,
            })?;
        self.logger.info(&format!(
            "[Pipeline] Wrote {} bytes to {}",
            image.len(),
            self.output_file.display()
        ));

        Ok(RequirementsReport {
            project_description: project_description.to_string(),
            requirements,
            mermaid_code,
            output_file: self.output_file.clone(),
            status: "success".to_string(),
            artifact,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::logging::NoOpLogger;
    use crate::pipeline::render::stub;
    use crate::providers::{MockProvider, ProviderModelConfig};
    use crate::types::ModelReply;
    use axum::http::StatusCode;
    use tempfile::tempdir;

    const REQUIREMENTS: &str =
        r#"{"functional_requirements": ["Create todo item"], "non_functional_requirements": ["Security"]}"#;
    const DIAGRAM: &str = "```mermaid\ngraph LR;\nUser -->|Create todo item|> TodoItem;\n```";

    fn logger() -> Arc<dyn Logger> {
        Arc::new(NoOpLogger)
    }

    fn stage(provider: Arc<MockProvider>) -> StageModel {
        StageModel::new(provider, ProviderModelConfig::new("mock-model"))
    }

    fn pipeline(
        requirements: Arc<MockProvider>,
        diagram: Arc<MockProvider>,
        render_base: &str,
        output: &Path,
    ) -> RequirementsPipeline {
        RequirementsPipeline::new(
            stage(requirements),
            stage(diagram),
            MermaidInkRenderer::new(render_base, Duration::from_secs(5), logger()),
            output,
            Duration::from_secs(5),
            logger(),
        )
    }

    #[tokio::test]
    async fn test_end_to_end_writes_image() {
        let base = stub::spawn(StatusCode::OK).await;
        let dir = tempdir().unwrap();
        let output = dir.path().join("requirements_phase.png");
        let requirements = Arc::new(MockProvider::fixed(REQUIREMENTS, logger()));
        let diagram = Arc::new(MockProvider::fixed(DIAGRAM, logger()));

        let report = pipeline(Arc::clone(&requirements), Arc::clone(&diagram), &base, &output)
            .run("A todo app")
            .await
            .unwrap();

        assert_eq!(report.status, "success");
        assert_eq!(report.mermaid_code, "graph LR;\nUser -->|Create todo item| TodoItem;");
        assert_eq!(report.artifact.functional, vec!["Create todo item"]);
        assert_eq!(std::fs::read(&output).unwrap(), stub::PNG_BYTES);

        let diagram_request = &diagram.requests()[0];
        assert!(diagram_request.messages[0].text().unwrap().contains("Create todo item"));
        assert!(requirements.requests()[0].messages[0].text().unwrap().contains("A todo app"));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "success");
        assert!(json.get("artifact").is_none());
    }

    #[tokio::test]
    async fn test_render_failure_writes_nothing() {
        let base = stub::spawn(StatusCode::SERVICE_UNAVAILABLE).await;
        let dir = tempdir().unwrap();
        let output = dir.path().join("requirements_phase.png");

        let err = pipeline(
            Arc::new(MockProvider::fixed(REQUIREMENTS, logger())),
            Arc::new(MockProvider::fixed(DIAGRAM, logger())),
            &base,
            &output,
        )
        .run("A todo app")
        .await
        .unwrap_err();

        assert!(matches!(err, PipelineError::RenderServiceError { status: Some(503), .. }));
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_render_failure_keeps_previous_image() {
        let base = stub::spawn(StatusCode::BAD_GATEWAY).await;
        let dir = tempdir().unwrap();
        let output = dir.path().join("requirements_phase.png");
        std::fs::write(&output, b"old").unwrap();

        let err = pipeline(
            Arc::new(MockProvider::fixed(REQUIREMENTS, logger())),
            Arc::new(MockProvider::fixed(DIAGRAM, logger())),
            &base,
            &output,
        )
        .run("A todo app")
        .await
        .unwrap_err();

        assert!(matches!(err, PipelineError::RenderServiceError { status: Some(502), .. }));
        assert_eq!(std::fs::read(&output).unwrap(), b"old");
    }

    #[tokio::test]
    async fn test_success_overwrites_previous_image() {
        let base = stub::spawn(StatusCode::OK).await;
        let dir = tempdir().unwrap();
        let output = dir.path().join("requirements_phase.png");
        std::fs::write(&output, b"an older and longer image than the new one").unwrap();

        pipeline(
            Arc::new(MockProvider::fixed(REQUIREMENTS, logger())),
            Arc::new(MockProvider::fixed(DIAGRAM, logger())),
            &base,
            &output,
        )
        .run("A todo app")
        .await
        .unwrap();

        assert_eq!(std::fs::read(&output).unwrap(), stub::PNG_BYTES);
    }

    #[tokio::test]
    async fn test_empty_input_rejected() {
        let dir = tempdir().unwrap();
        let requirements = Arc::new(MockProvider::fixed(REQUIREMENTS, logger()));
        let err = pipeline(
            Arc::clone(&requirements),
            Arc::new(MockProvider::fixed(DIAGRAM, logger())),
            "http://127.0.0.1:9",
            &dir.path().join("out.png"),
        )
        .run("   ")
        .await
        .unwrap_err();

        assert!(matches!(err, PipelineError::InvalidInput(_)));
        assert!(requirements.requests().is_empty());
    }

    #[tokio::test]
    async fn test_empty_extraction_is_generation_failed() {
        let dir = tempdir().unwrap();
        let diagram = Arc::new(MockProvider::fixed(DIAGRAM, logger()));
        let err = pipeline(
            Arc::new(MockProvider::scripted(vec![ModelReply::text("")], logger())),
            Arc::clone(&diagram),
            "http://127.0.0.1:9",
            &dir.path().join("out.png"),
        )
        .run("A todo app")
        .await
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::GenerationFailed);
        assert!(matches!(err, PipelineError::EmptyResponse { stage: Stage::Extraction }));
        assert!(diagram.requests().is_empty());
    }

    #[tokio::test]
    async fn test_diagram_model_failure_names_stage() {
        let dir = tempdir().unwrap();
        let err = pipeline(
            Arc::new(MockProvider::fixed(REQUIREMENTS, logger())),
            Arc::new(MockProvider::error("model overloaded", logger())),
            "http://127.0.0.1:9",
            &dir.path().join("out.png"),
        )
        .run("A todo app")
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            PipelineError::GenerationFailed { stage: Stage::MarkupSynthesis, .. }
        ));
    }
}
