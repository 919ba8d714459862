//! MCP tool server exposing the requirements and design generators

use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::{Json, Parameters};
use rmcp::model::{ServerCapabilities, ServerInfo};
use rmcp::{tool, tool_handler, tool_router, ErrorData, ServerHandler};

use crate::config::Settings;
use crate::logging::Logger;
use crate::pipeline::{DesignGenerator, PipelineError, RequirementsPipeline};

use super::types::{DesignResponse, ProjectParams, RequirementsResponse};

/// MCP tool service wrapping the requirements pipeline and design generator
#[derive(Clone)]
pub struct RequirementsServer {
    requirements: Arc<RequirementsPipeline>,
    design: Arc<DesignGenerator>,
    logger: Arc<dyn Logger>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl RequirementsServer {
    pub fn new(requirements: RequirementsPipeline, design: DesignGenerator, logger: Arc<dyn Logger>) -> Self {
        Self {
            requirements: Arc::new(requirements),
            design: Arc::new(design),
            logger,
            tool_router: Self::tool_router(),
        }
    }

    pub fn from_settings(settings: &Settings, logger: Arc<dyn Logger>) -> Self {
        Self::new(
            RequirementsPipeline::from_settings(settings, Arc::clone(&logger)),
            DesignGenerator::from_settings(settings, Arc::clone(&logger)),
            logger,
        )
    }

    /// Generates functional and non-functional requirements from a software project
    /// description and renders them as a Mermaid diagram image.
    #[tool(name = "generate_software_requirements")]
    async fn generate_software_requirements(
        &self,
        params: Parameters<ProjectParams>,
    ) -> Result<Json<RequirementsResponse>, ErrorData> {
        let ProjectParams { project_description } = params.0;
        self.logger.info("[Server] generate_software_requirements");

        let report = self
            .requirements
            .run(&project_description)
            .await
            .map_err(|e| self.to_error_data(e))?;
        Ok(Json(report.into()))
    }

    /// Generates a high-level system design (architecture, components, data flow)
    /// for a software project description.
    #[tool(name = "generate_software_design")]
    async fn generate_software_design(
        &self,
        params: Parameters<ProjectParams>,
    ) -> Result<Json<DesignResponse>, ErrorData> {
        let ProjectParams { project_description } = params.0;
        self.logger.info("[Server] generate_software_design");

        let report = self
            .design
            .run(&project_description)
            .await
            .map_err(|e| self.to_error_data(e))?;
        Ok(Json(report.into()))
    }

    fn to_error_data(&self, err: PipelineError) -> ErrorData {
        self.logger.error(&format!("[Server] {}", err));
        match err {
            PipelineError::InvalidInput(message) => ErrorData::invalid_params(message, None),
            other => ErrorData::internal_error(other.to_string(), None),
        }
    }
}

#[tool_handler]
impl ServerHandler for RequirementsServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Requirements agent (tools: generate_software_requirements, generate_software_design)".into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advertises_both_generators() {
        let mut names: Vec<String> = RequirementsServer::tool_router()
            .list_all()
            .into_iter()
            .map(|t| t.name.to_string())
            .collect();
        names.sort();
        assert_eq!(names, vec!["generate_software_design", "generate_software_requirements"]);

        for tool in RequirementsServer::tool_router().list_all() {
            assert!(tool.input_schema.contains_key("properties"), "{} has no argument schema", tool.name);
        }
    }
}
