//! API server implementation.

use std::net::SocketAddr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use preview_guard_pipeline::{CodeTransformer, Sanitizer};

use crate::api::{router, AppState};

/// Configuration for the API server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    7878
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid address {0}: {1}")]
    InvalidAddress(String, String),

    #[error("Failed to bind to {0}: {1}")]
    BindError(SocketAddr, String),

    #[error("Server error: {0}")]
    Serve(String),
}

/// HTTP server wrapping a sanitizer.
pub struct ApiServer {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl ApiServer {
    /// Create a new server.
    pub fn new(config: ServerConfig, sanitizer: Sanitizer<Arc<dyn CodeTransformer>>) -> Self {
        Self {
            config,
            state: Arc::new(AppState::new(sanitizer)),
        }
    }

    /// Resolve the configured bind address.
    pub fn addr(&self) -> Result<SocketAddr, ServerError> {
        let raw = format!("{}:{}", self.config.host, self.config.port);
        raw.parse()
            .map_err(|e: std::net::AddrParseError| ServerError::InvalidAddress(raw, e.to_string()))
    }

    /// Start serving until the process is stopped.
    pub async fn start(self) -> Result<(), ServerError> {
        let addr = self.addr()?;
        let app = router(Arc::clone(&self.state));

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        tracing::info!("Listening on http://{}", addr);

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Serve(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use preview_guard_pipeline::ScriptedTransformer;

    fn server(config: ServerConfig) -> ApiServer {
        let fake: Arc<dyn CodeTransformer> = Arc::new(ScriptedTransformer::default());
        ApiServer::new(config, Sanitizer::new(fake))
    }

    #[test]
    fn creates_server_with_default_config() {
        let server = server(ServerConfig::default());
        assert_eq!(server.config.port, 7878);
        assert_eq!(server.addr().unwrap().to_string(), "127.0.0.1:7878");
    }

    #[test]
    fn rejects_invalid_host() {
        let server = server(ServerConfig {
            host: "not a host".to_string(),
            port: 80,
        });
        assert!(matches!(server.addr(), Err(ServerError::InvalidAddress(_, _))));
    }
}
