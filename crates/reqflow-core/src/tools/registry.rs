//! Service registry: which remote tool services exist and how to reach them

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::logging::Logger;

/// How a remote tool service is reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportKind {
    /// MCP streamable HTTP (`address` is a URL)
    #[serde(alias = "streamable-http")]
    StreamableHttp,
    /// MCP over a Unix domain socket (`address` is a socket path)
    #[serde(alias = "unix")]
    UnixSocket,
}

impl std::fmt::Display for TransportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportKind::StreamableHttp => write!(f, "streamable_http"),
            TransportKind::UnixSocket => write!(f, "unix_socket"),
        }
    }
}

/// Connection descriptor for one remote tool service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoint {
    /// Human-readable unique name (e.g., "requirements phase")
    pub name: String,
    pub address: String,
    pub transport: TransportKind,
}

impl ServiceEndpoint {
    pub fn new(name: impl Into<String>, address: impl Into<String>, transport: TransportKind) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            transport,
        }
    }
}

/// Registry of remote tool services
///
/// Filled once at startup and read-only afterwards. Iteration follows first
/// registration order, which fixes the discovery merge order.
pub struct ServiceRegistry {
    endpoints: Vec<Arc<ServiceEndpoint>>,
    logger: Arc<dyn Logger>,
}

impl ServiceRegistry {
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        Self {
            endpoints: Vec::new(),
            logger,
        }
    }

    /// Register an endpoint
    ///
    /// A duplicate name replaces the earlier entry in place; the replaced
    /// endpoint is returned and a warning is logged so configuration mistakes
    /// are visible.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        address: impl Into<String>,
        transport: TransportKind,
    ) -> (Arc<ServiceEndpoint>, Option<Arc<ServiceEndpoint>>) {
        let endpoint = Arc::new(ServiceEndpoint::new(name, address, transport));

        if let Some(slot) = self.endpoints.iter_mut().find(|e| e.name == endpoint.name) {
            self.logger.warn(&format!(
                "[ServiceRegistry] Service '{}' registered twice; {} replaces {}",
                endpoint.name, endpoint.address, slot.address
            ));
            let previous = std::mem::replace(slot, Arc::clone(&endpoint));
            return (endpoint, Some(previous));
        }

        self.logger.debug(&format!(
            "[ServiceRegistry] Registered '{}' at {} ({})",
            endpoint.name, endpoint.address, endpoint.transport
        ));
        self.endpoints.push(Arc::clone(&endpoint));
        (endpoint, None)
    }

    pub fn get(&self, name: &str) -> Option<Arc<ServiceEndpoint>> {
        self.endpoints.iter().find(|e| e.name == name).cloned()
    }

    /// Endpoints in registration order
    pub fn endpoints(&self) -> &[Arc<ServiceEndpoint>] {
        &self.endpoints
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NoOpLogger;

    #[test]
    fn test_register_and_lookup() {
        let mut registry = ServiceRegistry::new(Arc::new(NoOpLogger));
        assert!(registry.is_empty());

        let (endpoint, previous) =
            registry.register("requirements phase", "http://localhost:8000/mcp", TransportKind::StreamableHttp);
        assert!(previous.is_none());
        assert_eq!(endpoint.transport, TransportKind::StreamableHttp);
        assert!(registry.get("requirements phase").is_some());
        assert!(registry.get("unknown").is_none());
    }

    #[test]
    fn test_duplicate_name_replaces_in_place() {
        let mut registry = ServiceRegistry::new(Arc::new(NoOpLogger));
        registry.register("a", "http://one/mcp", TransportKind::StreamableHttp);
        registry.register("b", "http://two/mcp", TransportKind::StreamableHttp);

        let (_, previous) = registry.register("a", "/tmp/a.sock", TransportKind::UnixSocket);

        assert_eq!(previous.unwrap().address, "http://one/mcp");
        assert_eq!(registry.len(), 2);
        let names: Vec<_> = registry.endpoints().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(registry.get("a").unwrap().transport, TransportKind::UnixSocket);
    }

    #[test]
    fn test_transport_kind_serde_aliases() {
        let kind: TransportKind = serde_yaml::from_str("streamable-http").unwrap();
        assert_eq!(kind, TransportKind::StreamableHttp);
        let kind: TransportKind = serde_yaml::from_str("unix_socket").unwrap();
        assert_eq!(kind, TransportKind::UnixSocket);
    }
}
