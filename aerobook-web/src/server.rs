//! Main web server implementation using Axum

use crate::{create_app, AppState, WebConfig, WebError, WebResult};
use axum::serve;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{error, info};

/// Main Aerobook web server
pub struct AerobookServer {
    config: WebConfig,
    state: AppState,
}

impl AerobookServer {
    /// Create a new server
    pub fn new(config: WebConfig) -> WebResult<Self> {
        let state = AppState::new(config.clone())?;
        Ok(Self { config, state })
    }

    /// Start the web server
    pub async fn start(self) -> WebResult<()> {
        let address = self.config.address();

        info!("Starting Aerobook web server");
        info!("Server address: http://{}", address);
        info!("Development mode: {}", self.config.dev_mode);

        let app = create_app(self.state.clone());

        let listener = TcpListener::bind(&address)
            .await
            .map_err(WebError::Server)?;

        info!("Server listening on http://{}", address);

        // Periodic sweep reclaiming stale rate-limit windows,
        // decoupled from request handling
        let admission = self.state.admission.clone();
        let sweep_interval = admission.settings().sweep_interval();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(sweep_interval);
            // The first tick fires immediately; skip it
            interval.tick().await;
            loop {
                interval.tick().await;
                admission.sweep();
            }
        });

        // ConnectInfo supplies the peer address used as the admission
        // fallback when no proxy headers are present
        if let Err(e) = serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        {
            error!("Server error: {}", e);
            return Err(WebError::Server(e));
        }

        Ok(())
    }

    /// Get server configuration
    pub fn config(&self) -> &WebConfig {
        &self.config
    }

    /// Get application state
    pub fn state(&self) -> &AppState {
        &self.state
    }
}

/// Builder for AerobookServer
pub struct AerobookServerBuilder {
    config: WebConfig,
}

impl AerobookServerBuilder {
    /// Create a new server builder
    pub fn new() -> Self {
        Self {
            config: WebConfig::default(),
        }
    }

    /// Set the server host
    pub fn host<S: Into<String>>(mut self, host: S) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the server port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Enable development mode
    pub fn dev_mode(mut self, dev_mode: bool) -> Self {
        self.config.dev_mode = dev_mode;
        self
    }

    /// Build the server
    pub fn build(self) -> WebResult<AerobookServer> {
        AerobookServer::new(self.config)
    }
}

impl Default for AerobookServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_builder_applies_settings() {
        let builder = AerobookServerBuilder::new()
            .host("localhost")
            .port(3000)
            .dev_mode(true);

        assert_eq!(builder.config.host, "localhost");
        assert_eq!(builder.config.port, 3000);
        assert!(builder.config.dev_mode);
    }

    #[test]
    fn config_from_env_has_defaults() {
        let config = WebConfig::from_env();
        assert_eq!(config.port, 8080);
    }
}
