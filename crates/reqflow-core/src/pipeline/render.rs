//! Rendering through a mermaid.ink-compatible service

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, StatusCode};

use crate::logging::Logger;

use super::error::{PipelineError, PipelineResult};
use super::markup::encode_markup;

/// Turns diagram markup into image bytes via `GET {base}/img/{base64}`
pub struct MermaidInkRenderer {
    client: Client,
    base_url: String,
    timeout: Duration,
    logger: Arc<dyn Logger>,
}

impl MermaidInkRenderer {
    pub fn new(base_url: impl Into<String>, timeout: Duration, logger: Arc<dyn Logger>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
            logger,
        }
    }

    pub fn image_url(&self, markup: &str) -> String {
        format!("{}/img/{}", self.base_url, encode_markup(markup))
    }

    /// Fetch the rendered image
    ///
    /// Non-2xx answers carry their status; transport failures and timeouts
    /// carry none.
    pub async fn render(&self, markup: &str) -> PipelineResult<Vec<u8>> {
        let url = self.image_url(markup);
        self.logger.info(&format!(
            "[Renderer] Requesting image from {} ({} bytes of markup)",
            self.base_url,
            markup.len()
        ));

        match tokio::time::timeout(self.timeout, self.fetch(&url)).await {
            Ok(Ok(Ok(bytes))) => Ok(bytes),
            Ok(Ok(Err(status))) => {
                self.logger.error(&format!("[Renderer] Service answered {}", status));
                Err(PipelineError::RenderServiceError {
                    status: Some(status.as_u16()),
                    message: status
                        .canonical_reason()
                        .unwrap_or("unexpected status")
                        .to_string(),
                })
            }
            Ok(Err(e)) => Err(PipelineError::RenderServiceError {
                status: None,
                message: e.to_string(),
            }),
            Err(_) => Err(PipelineError::RenderServiceError {
                status: None,
                message: format!("no response within {:?}", self.timeout),
            }),
        }
    }

    async fn fetch(&self, url: &str) -> Result<Result<Vec<u8>, StatusCode>, reqwest::Error> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Ok(Err(status));
        }
        Ok(Ok(response.bytes().await?.to_vec()))
    }
}

#[cfg(test)]
pub(crate) mod stub {
    //! Local stand-in for the rendering service

    use axum::extract::Path;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::Router;
    use std::net::SocketAddr;

    pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nstub";

    /// Serve `/img/{encoded}` with a fixed status; returns the base URL
    pub async fn spawn(status: StatusCode) -> String {
        let app = Router::new().route(
            "/img/{encoded}",
            get(move |Path(_encoded): Path<String>| async move {
                if status.is_success() {
                    (status, PNG_BYTES.to_vec())
                } else {
                    (status, Vec::new())
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }
}
