//! Request and response shapes of the tool server operations

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::pipeline::{DesignReport, RequirementsReport};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ProjectParams {
    /// Free-text description of the software project
    pub project_description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RequirementsResponse {
    pub project_description: String,
    pub requirements: String,
    pub mermaid_code: String,
    pub output_file: String,
    pub status: String,
}

impl From<RequirementsReport> for RequirementsResponse {
    fn from(report: RequirementsReport) -> Self {
        Self {
            project_description: report.project_description,
            requirements: report.requirements,
            mermaid_code: report.mermaid_code,
            output_file: report.output_file.display().to_string(),
            status: report.status,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DesignResponse {
    pub project_description: String,
    pub design: String,
    pub status: String,
}

impl From<DesignReport> for DesignResponse {
    fn from(report: DesignReport) -> Self {
        Self {
            project_description: report.project_description,
            design: report.design,
            status: report.status,
        }
    }
}
