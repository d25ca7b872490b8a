//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, request ID, token gate)
//! - Build the production resolver and prober from config
//! - Bind server to listener and shut down gracefully

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;
use std::future::Future;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::{ProbeConfig, ValidationError};
use crate::health::{build_client, HttpProber, ReplicaChecker, SystemResolver};
use crate::http::response::CheckResponse;
use crate::security::{require_token, TokenGate};

/// Errors raised while assembling the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid target: {0}")]
    Target(#[from] ValidationError),

    #[error("failed to build probe client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub checker: Arc<ReplicaChecker>,
}

/// HTTP server for the replica prober.
pub struct HttpServer {
    router: Router,
    config: ProbeConfig,
}

impl HttpServer {
    /// Create a server probing the configured target with the system resolver.
    pub fn new(config: ProbeConfig) -> Result<Self, ServerError> {
        let target = config.target.parse()?;
        let client = build_client(&config.timeouts, &config.probe.user_agent)?;

        let resolver = SystemResolver::new(Duration::from_secs(config.timeouts.resolve_secs));
        let prober = HttpProber::new(client, &target, config.probe.body_limit);
        let checker = ReplicaChecker::new(Arc::new(resolver), Arc::new(prober), target.host);

        Ok(Self::with_checker(config, Arc::new(checker)))
    }

    /// Create a server around an already assembled checker.
    pub fn with_checker(config: ProbeConfig, checker: Arc<ReplicaChecker>) -> Self {
        let gate = Arc::new(TokenGate::new(&config.auth.token));
        let router = build_router(AppState { checker }, gate);
        Self { router, config }
    }

    /// The router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` resolves, then drain in-flight requests.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            target_url = %self.config.target.url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
pub fn build_router(state: AppState, gate: Arc<TokenGate>) -> Router {
    let protected = Router::new()
        .route("/check_replicas", get(check_replicas_handler))
        .route_layer(middleware::from_fn_with_state(gate, require_token));

    Router::new()
        .route("/health", get(health_handler))
        .merge(protected)
        .with_state(state)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

/// Liveness of this process, independent of the replicas.
async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

/// Resolve, probe and aggregate the target's replicas.
async fn check_replicas_handler(State(state): State<AppState>) -> CheckResponse {
    CheckResponse(state.checker.check().await)
}
