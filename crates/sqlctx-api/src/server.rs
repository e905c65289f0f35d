//! API server.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use sqlctx_config::ServerConfig;

use crate::http::routes::create_router;
use crate::state::AppState;

/// HTTP server over a shared [`AppState`].
pub struct ApiServer {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl ApiServer {
    pub fn new(config: ServerConfig, state: Arc<AppState>) -> Self {
        Self { config, state }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Serve until Ctrl+C.
    pub async fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        let app = create_router(self.state.clone(), &self.config.allowed_origins);

        let addr: SocketAddr = self.addr().parse()?;
        let listener = TcpListener::bind(addr).await?;

        info!("API server listening on {}", addr);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("API server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Received Ctrl+C, shutting down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_state;

    #[tokio::test]
    async fn test_server_addr() {
        let config = ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 9000,
            allowed_origins: Vec::new(),
        };
        let server = ApiServer::new(config, test_state().await);
        assert_eq!(server.addr(), "0.0.0.0:9000");
    }

    #[tokio::test]
    async fn test_server_default_addr() {
        let server = ApiServer::new(ServerConfig::default(), test_state().await);
        assert_eq!(server.addr(), "127.0.0.1:8000");
    }

    #[tokio::test]
    async fn test_run_rejects_unparseable_host() {
        let config = ServerConfig {
            host: "not a host".to_string(),
            port: 9000,
            allowed_origins: Vec::new(),
        };
        let server = ApiServer::new(config, test_state().await);
        assert!(server.run().await.is_err());
    }
}
