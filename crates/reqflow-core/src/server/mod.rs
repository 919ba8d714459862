//! MCP tool server for the requirements and design generators
//!
//! `reqflow serve` runs this; the agent discovers it like any other service.

mod handler;
mod http;
mod types;

pub use handler::RequirementsServer;
pub use http::{router, serve_http};
pub use types::{DesignResponse, ProjectParams, RequirementsResponse};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use axum::http::StatusCode;
    use serde_json::json;

    use crate::logging::{Logger, NoOpLogger};
    use crate::pipeline::{stub, DesignGenerator, MermaidInkRenderer, RequirementsPipeline, StageModel};
    use crate::providers::{MockProvider, ProviderModelConfig};
    use crate::tools::{DiscoveryClient, McpConnector, ServiceRegistry, ToolBridge, TransportKind};

    fn logger() -> Arc<dyn Logger> {
        Arc::new(NoOpLogger)
    }

    fn stage(reply: &str) -> StageModel {
        StageModel::new(
            Arc::new(MockProvider::fixed(reply, logger())),
            ProviderModelConfig::new("mock-model"),
        )
    }

    fn test_server(render_base: &str, output: &std::path::Path) -> RequirementsServer {
        let pipeline = RequirementsPipeline::new(
            stage(r#"{"functional_requirements": ["Login"], "non_functional_requirements": []}"#),
            stage("```mermaid\ngraph LR;\nUser -->|Login| App;\n```"),
            MermaidInkRenderer::new(render_base, Duration::from_secs(5), logger()),
            output,
            Duration::from_secs(5),
            logger(),
        );
        let design = DesignGenerator::new(
            stage(r#"{"architecture": "client-server"}"#),
            Duration::from_secs(5),
            logger(),
        );
        RequirementsServer::new(pipeline, design, logger())
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_discover_and_invoke_over_http() {
        let render_base = stub::spawn(StatusCode::OK).await;
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("requirements_phase.png");

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/mcp", listener.local_addr().unwrap());
        let server = test_server(&render_base, &output);
        tokio::spawn(serve_http(server, listener, std::future::pending(), logger()));

        let mut registry = ServiceRegistry::new(logger());
        registry.register("requirements phase", url, TransportKind::StreamableHttp);
        let connector = Arc::new(McpConnector::new(logger()));
        let report = DiscoveryClient::new(connector.clone(), Duration::from_secs(10), logger())
            .discover(&registry)
            .await
            .unwrap();

        assert_eq!(
            report.catalog.names(),
            vec!["generate_software_design", "generate_software_requirements"]
        );
        assert!(report.failures.is_empty());

        let bridge = ToolBridge::from_report(report, connector, Duration::from_secs(10), logger());
        let output_json = bridge
            .invoke("generate_software_requirements", json!({"project_description": "A login page"}))
            .await
            .unwrap();

        let value: serde_json::Value = serde_json::from_str(&output_json.content).unwrap();
        assert_eq!(value["status"], "success");
        assert_eq!(value["mermaid_code"], "graph LR;\nUser -->|Login| App;");
        assert!(output.exists());
    }
}
