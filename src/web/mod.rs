//! # Ingress HTTP Server
//!
//! Router assembly and server lifecycle for the webhook ingress listener.
//!
//! ## Overview
//!
//! The server runs alongside the rest of the assistant process on the shared
//! tokio runtime. It exposes a liveness endpoint and the generic
//! `POST /webhooks/{source}` route, and moves through a small lifecycle:
//! `Stopped → Starting → Listening` on startup, back to `Stopped` on an
//! explicit [`WebhookServer::stop`], which releases the bound socket before
//! returning so restart-heavy test suites never race a dangling listener.
//!
//! An empty configured secret keeps the server permanently `Stopped`: absence
//! of a secret means the feature is disabled, not open-access.

pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod state;

pub use errors::ApiError;
pub use handlers::webhooks::WEBHOOK_SECRET_HEADER;
pub use state::AppState;

use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::config::WebhookConfig;

/// Errors raised while starting the ingress server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// Lifecycle states of the ingress listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    /// No listener bound.
    Stopped,
    /// Binding the socket and wiring routes.
    Starting,
    /// Accepting connections.
    Listening,
}

/// Build the ingress router with middleware applied.
///
/// Exposed for in-process testing with `tower::ServiceExt`.
pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/webhooks/:source", post(handlers::webhooks::ingest_webhook));

    middleware::apply_middleware_stack(router).with_state(state)
}

/// Manages the ingress listener lifecycle.
pub struct WebhookServer {
    bind_address: String,
    port: u16,
    state: ServerState,
    local_addr: Option<SocketAddr>,
    shutdown: Option<oneshot::Sender<()>>,
    serve_task: Option<JoinHandle<()>>,
}

impl WebhookServer {
    /// Create a server from configuration. No socket is bound until
    /// [`WebhookServer::start`].
    pub fn new(config: &WebhookConfig) -> Self {
        Self {
            bind_address: config.bind_address.clone(),
            port: config.port,
            state: ServerState::Stopped,
            local_addr: None,
            shutdown: None,
            serve_task: None,
        }
    }

    /// Start listening for incoming webhooks.
    ///
    /// With an empty configured secret the server stays `Stopped` and returns
    /// `Ok`: the feature is disabled, and no socket is bound. Registration
    /// must have completed before this is called; routing is stable from the
    /// first accepted connection.
    pub async fn start(&mut self, state: AppState) -> Result<(), ServerError> {
        if state.webhook_secret.is_empty() {
            warn!("Webhook secret not configured; ingress server disabled");
            return Ok(());
        }

        self.state = ServerState::Starting;

        let address = format!("{}:{}", self.bind_address, self.port);
        let listener = match TcpListener::bind(&address).await {
            Ok(listener) => listener,
            Err(source) => {
                self.state = ServerState::Stopped;
                return Err(ServerError::Bind { address, source });
            }
        };

        let local_addr = listener.local_addr().map_err(|source| {
            self.state = ServerState::Stopped;
            ServerError::Bind {
                address: address.clone(),
                source,
            }
        })?;

        let sources = state.registry.list_sources().await;
        let router = build_router(state);

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let serve_task = tokio::spawn(async move {
            let shutdown = async {
                let _ = shutdown_rx.await;
            };
            if let Err(err) = axum::serve(listener, router)
                .with_graceful_shutdown(shutdown)
                .await
            {
                error!(error = %err, "Ingress server terminated unexpectedly");
            }
        });

        self.local_addr = Some(local_addr);
        self.shutdown = Some(shutdown_tx);
        self.serve_task = Some(serve_task);
        self.state = ServerState::Listening;

        info!(
            address = %local_addr,
            sources = ?sources,
            "Webhook server listening"
        );

        Ok(())
    }

    /// Shut down gracefully.
    ///
    /// Stops accepting connections and waits for the serve task to finish so
    /// the socket is fully released before returning. In-flight dispatched
    /// handler tasks are not cancelled; they run to completion in the
    /// background.
    pub async fn stop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }

        if let Some(serve_task) = self.serve_task.take() {
            if let Err(err) = serve_task.await {
                error!(error = %err, "Ingress serve task failed during shutdown");
            }
            info!("Webhook server stopped");
        }

        self.local_addr = None;
        self.state = ServerState::Stopped;
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ServerState {
        self.state
    }

    /// Whether the server is accepting connections.
    pub fn is_listening(&self) -> bool {
        self.state == ServerState::Listening
    }

    /// Bound address while listening (useful with a configured port of 0).
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }
}
