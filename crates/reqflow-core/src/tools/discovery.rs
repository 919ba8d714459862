//! Tool discovery: ask every registered service what it offers
//!
//! Endpoints are contacted concurrently; the results are merged into the
//! catalog in registry order only once every endpoint has answered, failed or
//! timed out. One bad endpoint never sinks the whole pass.

use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::logging::Logger;
use crate::types::Tool;

use super::catalog::{CollisionPolicy, ToolCatalog, ToolDescriptor};
use super::error::{ToolError, ToolOpResult};
use super::registry::{ServiceEndpoint, ServiceRegistry};
use super::service::{ServiceConnector, ToolService};

/// Result of one discovery pass
pub struct DiscoveryReport {
    pub catalog: Arc<ToolCatalog>,
    /// Live sessions keyed by endpoint name, reused by the invocation bridge
    pub connections: HashMap<String, Arc<dyn ToolService>>,
    /// One `EndpointUnreachable` per endpoint that contributed nothing
    pub failures: Vec<ToolError>,
}

impl std::fmt::Debug for DiscoveryReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscoveryReport")
            .field("catalog", &self.catalog.names())
            .field("connections", &self.connections.keys().collect::<Vec<_>>())
            .field("failures", &self.failures)
            .finish()
    }
}

/// Builds a `ToolCatalog` from a `ServiceRegistry`
pub struct DiscoveryClient {
    connector: Arc<dyn ServiceConnector>,
    policy: CollisionPolicy,
    timeout: Duration,
    logger: Arc<dyn Logger>,
}

impl DiscoveryClient {
    pub fn new(connector: Arc<dyn ServiceConnector>, timeout: Duration, logger: Arc<dyn Logger>) -> Self {
        Self {
            connector,
            policy: CollisionPolicy::default(),
            timeout,
            logger,
        }
    }

    pub fn with_policy(mut self, policy: CollisionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Run one discovery pass
    ///
    /// Fails with `CatalogEmpty` when no endpoint answered, and with
    /// `DuplicateOperation` when the policy is `Reject` and two services share
    /// an operation name.
    pub async fn discover(&self, registry: &ServiceRegistry) -> ToolOpResult<DiscoveryReport> {
        self.logger.info(&format!(
            "[Discovery] Contacting {} endpoint(s)",
            registry.len()
        ));

        let outcomes = join_all(registry.endpoints().iter().map(|endpoint| self.probe(endpoint))).await;

        let mut catalog = ToolCatalog::new();
        let mut connections = HashMap::new();
        let mut failures = Vec::new();

        for (endpoint, outcome) in registry.endpoints().iter().zip(outcomes) {
            let (service, tools) = match outcome {
                Ok(found) => found,
                Err(err) => {
                    self.logger.warn(&format!("[Discovery] {}", err));
                    failures.push(err);
                    continue;
                }
            };

            self.logger.info(&format!(
                "[Discovery] '{}' offers {} operation(s)",
                endpoint.name,
                tools.len()
            ));

            for tool in tools {
                let descriptor = ToolDescriptor::from_tool(tool, Arc::clone(endpoint));
                if let Some(displaced) = catalog.insert(descriptor, self.policy)? {
                    self.logger.warn(&format!(
                        "[Discovery] Operation '{}' from '{}' replaced by '{}'",
                        displaced.name, displaced.service.name, endpoint.name
                    ));
                }
            }
            connections.insert(endpoint.name.clone(), service);
        }

        if connections.is_empty() {
            return Err(ToolError::CatalogEmpty { failed: failures });
        }

        self.logger.info(&format!(
            "[Discovery] Catalog holds {} operation(s); {} endpoint(s) failed",
            catalog.len(),
            failures.len()
        ));

        Ok(DiscoveryReport {
            catalog: Arc::new(catalog),
            connections,
            failures,
        })
    }

    async fn probe(&self, endpoint: &ServiceEndpoint) -> ToolOpResult<(Arc<dyn ToolService>, Vec<Tool>)> {
        let attempt = async {
            let service = self.connector.connect(endpoint).await?;
            let tools = service.list_tools().await?;
            Ok::<_, crate::mcp::McpError>((service, tools))
        };

        match tokio::time::timeout(self.timeout, attempt).await {
            Ok(Ok(found)) => Ok(found),
            Ok(Err(e)) => Err(ToolError::unreachable(&endpoint.name, e.to_string())),
            Err(_) => Err(ToolError::unreachable(
                &endpoint.name,
                format!("no answer within {:?}", self.timeout),
            )),
        }
    }
}
