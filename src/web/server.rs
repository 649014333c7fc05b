//! Web server for Stayhub.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::auth::AuthService;
use crate::config::ServerConfig;
use crate::{AuthError, Result};

use super::handlers::AppState;
use super::router::{create_health_router, create_router};

/// Web server for the API.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: AppState,
    /// CORS origins.
    cors_origins: Vec<String>,
}

impl WebServer {
    /// Create a new web server.
    pub fn new(config: &ServerConfig, auth: Arc<AuthService>) -> Result<Self> {
        let addr = format!("{}:{}", config.host, config.port)
            .parse()
            .map_err(|_| {
                AuthError::Config(format!(
                    "invalid server address {}:{}",
                    config.host, config.port
                ))
            })?;

        Ok(Self {
            addr,
            app_state: AppState { auth },
            cors_origins: config.cors_origins.clone(),
        })
    }

    /// Get the configured server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    fn build_router(&self) -> axum::Router {
        let issuer = Arc::new(self.app_state.auth.token_issuer().clone());
        create_router(self.app_state.clone(), issuer, &self.cors_origins)
            .merge(create_health_router())
    }

    /// Run the web server until it fails or is shut down.
    pub async fn run(self) -> Result<()> {
        let router = self.build_router();
        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!("Web server listening on http://{}", local_addr);
        axum::serve(listener, router).await?;
        Ok(())
    }

    /// Run the server in the background and return the bound address.
    ///
    /// Useful for tests binding to port 0.
    pub async fn run_with_addr(self) -> Result<SocketAddr> {
        let router = self.build_router();
        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!("Web server listening on http://{}", local_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}
