//! HTTP server.
//!
//! Mounts the JSON API under `/api` plus a root `/health` probe, and shuts
//! down gracefully on Ctrl+C.

pub mod request;
pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

pub use request::RequestMeta;
pub use routes::create_router;

use crate::services::AppContext;

/// TrendSage HTTP server.
pub struct TrendSageServer {
    ctx: Arc<AppContext>,
}

impl TrendSageServer {
    /// Create a server over a prepared context.
    #[must_use]
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx: Arc::new(ctx) }
    }

    /// Shared request context.
    #[must_use]
    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    /// Run the server on `0.0.0.0:port` until a shutdown signal arrives.
    ///
    /// # Errors
    ///
    /// Returns error if the port cannot be bound or the server fails.
    pub async fn run_http(self, port: u16) -> anyhow::Result<()> {
        tracing::info!(
            documents = self.ctx.documents.name(),
            insights = self.ctx.insights.name(),
            "Starting TrendSage API on port {}",
            port
        );

        let router = create_router(self.ctx);
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("HTTP server listening on http://{}", addr);

        axum::serve(listener, router.into_make_service_with_connect_info::<SocketAddr>())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server shut down");
        Ok(())
    }
}

impl std::fmt::Debug for TrendSageServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrendSageServer").field("ctx", &self.ctx).finish()
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Received shutdown signal"),
        Err(e) => {
            // Without a signal handler the server runs until killed.
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    }
}
