//! Streamable HTTP transport for the tool server, mounted at `/mcp`

use std::future::Future;
use std::sync::Arc;

use axum::Router;
use rmcp::transport::{
    streamable_http_server::session::local::LocalSessionManager, StreamableHttpServerConfig,
    StreamableHttpService,
};
use tokio::net::TcpListener;

use crate::logging::Logger;

use super::handler::RequirementsServer;

/// Axum router exposing the server at `/mcp`
pub fn router(server: RequirementsServer) -> Router {
    let config = StreamableHttpServerConfig {
        stateful_mode: true,
        ..StreamableHttpServerConfig::default()
    };
    let session_manager = Arc::new(LocalSessionManager::default());
    let service = StreamableHttpService::new(move || Ok(server.clone()), session_manager, config);
    Router::new().nest_service("/mcp", service)
}

/// Serve until `shutdown` resolves
pub async fn serve_http<F>(
    server: RequirementsServer,
    listener: TcpListener,
    shutdown: F,
    logger: Arc<dyn Logger>,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    logger.info(&format!(
        "[Server] Listening on http://{}/mcp",
        listener.local_addr()?
    ));
    axum::serve(listener, router(server))
        .with_graceful_shutdown(shutdown)
        .await
}
