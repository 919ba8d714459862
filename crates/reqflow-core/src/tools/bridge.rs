//! Tool invocation bridge: route a chosen operation to the service that owns it

use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::logging::Logger;

use super::catalog::ToolCatalog;
use super::discovery::DiscoveryReport;
use super::error::{ToolError, ToolOpResult};
use super::registry::ServiceEndpoint;
use super::service::{ServiceConnector, ToolOutput, ToolService};

/// Routes calls through the catalog to live service sessions
///
/// Sessions opened during discovery are reused; an endpoint without one is
/// connected on first use. A session whose transport fails is dropped and
/// reopened by the next call. No retries.
pub struct ToolBridge {
    catalog: Arc<ToolCatalog>,
    connections: RwLock<HashMap<String, Arc<dyn ToolService>>>,
    connector: Arc<dyn ServiceConnector>,
    timeout: Duration,
    logger: Arc<dyn Logger>,
}

impl ToolBridge {
    pub fn new(
        catalog: Arc<ToolCatalog>,
        connector: Arc<dyn ServiceConnector>,
        timeout: Duration,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            catalog,
            connections: RwLock::new(HashMap::new()),
            connector,
            timeout,
            logger,
        }
    }

    /// Bridge over a discovery pass, adopting its open sessions
    pub fn from_report(
        report: DiscoveryReport,
        connector: Arc<dyn ServiceConnector>,
        timeout: Duration,
        logger: Arc<dyn Logger>,
    ) -> Self {
        let bridge = Self::new(report.catalog, connector, timeout, logger);
        *bridge.connections.write() = report.connections;
        bridge
    }

    pub fn catalog(&self) -> &Arc<ToolCatalog> {
        &self.catalog
    }

    /// Invoke an operation by name
    ///
    /// Unknown names fail with `UnknownOperation`; connect or transport
    /// failures, timeouts and remote-reported errors all fail with
    /// `InvocationFailed`.
    pub async fn invoke(&self, operation: &str, arguments: Value) -> ToolOpResult<ToolOutput> {
        let descriptor = self.catalog.get(operation).ok_or_else(|| ToolError::UnknownOperation {
            name: operation.to_string(),
            available: self.catalog.names(),
        })?;

        self.logger.info(&format!(
            "[ToolBridge] Invoking '{}' on '{}'",
            operation, descriptor.service.name
        ));

        let attempt = async {
            let service = self.session_for(operation, &descriptor.service).await?;
            service.call_tool(operation, arguments).await.map_err(|e| {
                self.evict(&descriptor.service.name, &service);
                ToolError::invocation_failed(operation, e.to_string())
            })
        };

        let output = match tokio::time::timeout(self.timeout, attempt).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(ToolError::invocation_failed(
                    operation,
                    format!("no reply from '{}' within {:?}", descriptor.service.name, self.timeout),
                ))
            }
        };

        if output.is_error {
            self.logger.warn(&format!(
                "[ToolBridge] '{}' reported an error: {}",
                operation, output.content
            ));
            return Err(ToolError::invocation_failed(operation, output.content));
        }

        Ok(output)
    }

    async fn session_for(
        &self,
        operation: &str,
        endpoint: &ServiceEndpoint,
    ) -> ToolOpResult<Arc<dyn ToolService>> {
        let existing = self.connections.read().get(&endpoint.name).cloned();
        if let Some(service) = existing {
            return Ok(service);
        }

        self.logger.debug(&format!("[ToolBridge] Opening session to '{}'", endpoint.name));
        let service = self.connector.connect(endpoint).await.map_err(|e| {
            ToolError::invocation_failed(operation, format!("cannot reach '{}': {}", endpoint.name, e))
        })?;
        self.connections
            .write()
            .insert(endpoint.name.clone(), Arc::clone(&service));
        Ok(service)
    }

    /// Forget a session whose transport failed so the next call reconnects
    fn evict(&self, endpoint: &str, stale: &Arc<dyn ToolService>) {
        let mut connections = self.connections.write();
        if connections.get(endpoint).is_some_and(|s| Arc::ptr_eq(s, stale)) {
            connections.remove(endpoint);
            self.logger.debug(&format!("[ToolBridge] Dropped session to '{}'", endpoint));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::logging::NoOpLogger;
    use crate::tools::discovery::testing::{StubConnector, StubEndpoint, StubService};
    use crate::tools::{CollisionPolicy, ToolDescriptor, TransportKind};
    use crate::types::Tool;
    use serde_json::json;

    fn catalog(entries: &[(&str, &str)]) -> Arc<ToolCatalog> {
        let mut catalog = ToolCatalog::new();
        for (tool, service) in entries {
            let endpoint = Arc::new(ServiceEndpoint::new(
                *service,
                format!("http://{}/mcp", service),
                TransportKind::StreamableHttp,
            ));
            catalog
                .insert(
                    ToolDescriptor::from_tool(Tool::new(*tool, "test"), endpoint),
                    CollisionPolicy::default(),
                )
                .unwrap();
        }
        Arc::new(catalog)
    }

    fn bridge(catalog: Arc<ToolCatalog>, connector: Arc<StubConnector>) -> ToolBridge {
        ToolBridge::new(catalog, connector, Duration::from_millis(100), Arc::new(NoOpLogger))
    }

    #[tokio::test]
    async fn test_invoke_routes_to_owner_and_reuses_session() {
        let service = Arc::new(StubService::new(&["echo"]));
        let connector = Arc::new(StubConnector::new(vec![("svc", StubEndpoint::Up(Arc::clone(&service)))]));
        let bridge = bridge(catalog(&[("echo", "svc")]), Arc::clone(&connector));

        let output = bridge.invoke("echo", json!({"text": "hi"})).await.unwrap();
        bridge.invoke("echo", json!({"text": "again"})).await.unwrap();

        assert!(output.content.starts_with("echo:"));
        assert_eq!(service.calls.lock().len(), 2);
        assert_eq!(connector.connects.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_operation() {
        let connector = Arc::new(StubConnector::new(vec![]));
        let bridge = bridge(catalog(&[("echo", "svc")]), connector);

        let err = bridge.invoke("does_not_exist", json!({})).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownOperation);
        assert!(err.to_string().contains("does_not_exist"));
        assert!(err.to_string().contains("echo"));
    }

    #[tokio::test]
    async fn test_remote_error_is_invocation_failed() {
        let mut service = StubService::new(&["echo"]);
        service.remote_error = true;
        let connector = Arc::new(StubConnector::new(vec![("svc", StubEndpoint::Up(Arc::new(service)))]));
        let bridge = bridge(catalog(&[("echo", "svc")]), connector);

        let err = bridge.invoke("echo", json!({})).await.unwrap_err();
        assert_eq!(
            err,
            ToolError::invocation_failed("echo", "echo rejected the input")
        );
    }

    #[tokio::test]
    async fn test_timeout_is_invocation_failed() {
        let mut service = StubService::new(&["echo"]);
        service.hang = true;
        let connector = Arc::new(StubConnector::new(vec![("svc", StubEndpoint::Up(Arc::new(service)))]));
        let bridge = bridge(catalog(&[("echo", "svc")]), connector);

        let err = bridge.invoke("echo", json!({})).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvocationFailed);
        assert!(err.to_string().contains("svc"));
    }

    #[tokio::test]
    async fn test_transport_failure_drops_session() {
        let mut service = StubService::new(&["echo"]);
        service.transport_error = true;
        let connector = Arc::new(StubConnector::new(vec![("svc", StubEndpoint::Up(Arc::new(service)))]));
        let bridge = bridge(catalog(&[("echo", "svc")]), Arc::clone(&connector));

        let first = bridge.invoke("echo", json!({})).await.unwrap_err();
        let second = bridge.invoke("echo", json!({})).await.unwrap_err();

        assert_eq!(first.kind(), ErrorKind::InvocationFailed);
        assert_eq!(second.kind(), ErrorKind::InvocationFailed);
        assert_eq!(connector.connects.lock().len(), 2);
    }

    #[tokio::test]
    async fn test_remote_error_keeps_session() {
        let mut service = StubService::new(&["echo"]);
        service.remote_error = true;
        let connector = Arc::new(StubConnector::new(vec![("svc", StubEndpoint::Up(Arc::new(service)))]));
        let bridge = bridge(catalog(&[("echo", "svc")]), Arc::clone(&connector));

        bridge.invoke("echo", json!({})).await.unwrap_err();
        bridge.invoke("echo", json!({})).await.unwrap_err();

        assert_eq!(connector.connects.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_unreachable_owner_is_invocation_failed() {
        let connector = Arc::new(StubConnector::new(vec![("svc", StubEndpoint::Refuse)]));
        let bridge = bridge(catalog(&[("echo", "svc")]), connector);

        let err = bridge.invoke("echo", json!({})).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvocationFailed);
    }
}
