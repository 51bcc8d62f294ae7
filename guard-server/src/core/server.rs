//! Server Implementation
//!
//! HTTP 服务器启动和后台任务管理

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::tasks::BackgroundTasks;
use crate::core::{Config, GuardState};
use crate::utils::AppError;

/// HTTP Server
pub struct Server {
    config: Config,
    state: Option<GuardState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Create server with existing state
    pub fn with_state(config: Config, state: GuardState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    /// Build the fully layered application for one state
    pub fn build_app(state: GuardState) -> Router {
        crate::api::build_router()
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    pub async fn run(&self) -> Result<(), AppError> {
        let state = match &self.state {
            Some(s) => s.clone(),
            None => GuardState::initialize(&self.config).await?,
        };

        // Periodic bookkeeping: flip TTL-expired pending approvals to denied
        let mut tasks = BackgroundTasks::new();
        let token = tasks.shutdown_token();
        let sweep_state = state.clone();
        let sweep_interval = self.config.sweep_interval();
        tasks.spawn("approval_sweep", async move {
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = tokio::time::sleep(sweep_interval) => {
                        match sweep_state.approvals().sweep_expired().await {
                            Ok(0) => {}
                            Ok(n) => tracing::info!(swept = n, "Expired stale approval requests"),
                            Err(e) => tracing::warn!(error = %e, "Approval sweep failed"),
                        }
                    }
                }
            }
        });

        let app = Self::build_app(state);

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        tracing::info!(%addr, environment = %self.config.environment, "Guard server listening");

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                tracing::info!("Shutting down...");
            })
            .await
            .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

        tasks.shutdown().await;
        Ok(())
    }
}
