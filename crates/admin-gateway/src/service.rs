//! Admin gateway service - wires configuration, backend and router, and
//! serves until shutdown.

use crate::dispatch::dispatcher::ActionDispatcher;
use crate::domain::config::GatewayConfig;
use crate::domain::error::GatewayError;
use crate::middleware::GatewayMetrics;
use crate::ports::outbound::AdminBackend;
use crate::router::{build_router, AppState};
use axum::Router;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Admin gateway service state
pub struct AdminGatewayService {
    config: GatewayConfig,
    dispatcher: ActionDispatcher,
    metrics: Arc<GatewayMetrics>,
}

impl AdminGatewayService {
    /// Create a new admin gateway service
    pub fn new(config: GatewayConfig, backend: Arc<dyn AdminBackend>) -> Result<Self, GatewayError> {
        config.validate()?;

        let metrics = Arc::new(GatewayMetrics::new());
        let dispatcher = ActionDispatcher::new(
            backend,
            config.backend.call_timeout,
            Arc::clone(&metrics),
        );

        Ok(Self {
            config,
            dispatcher,
            metrics,
        })
    }

    /// Router with every route and layer, ready to serve
    pub fn router(&self) -> Router {
        build_router(
            &self.config,
            AppState {
                dispatcher: self.dispatcher.clone(),
                metrics: Arc::clone(&self.metrics),
            },
        )
    }

    /// Get metrics
    pub fn metrics(&self) -> Arc<GatewayMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Bind the configured address and serve until `shutdown` resolves.
    pub async fn run(self, shutdown: impl Future<Output = ()> + Send + 'static) -> Result<(), GatewayError> {
        let addr = self.config.http_addr();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| GatewayError::Bind(format!("{addr}: {e}")))?;
        self.serve(listener, shutdown).await
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    /// In-flight requests are allowed to finish.
    pub async fn serve(
        self,
        listener: TcpListener,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), GatewayError> {
        let local: Option<SocketAddr> = listener.local_addr().ok();
        info!(
            addr = ?local,
            prefix = %self.config.http.route_prefix,
            backend = %self.config.backend.endpoint,
            call_timeout_ms = self.config.backend.call_timeout.as_millis() as u64,
            auth = self.config.auth.enabled,
            "Admin gateway listening"
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Admin gateway stopped");
        Ok(())
    }
}
