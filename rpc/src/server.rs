//! Axum-based HTTP server.

use crate::error::RpcError;
use crate::handlers;
use crate::state::AppState;

use axum::http::{header, Method};
use axum::routing::{delete, get, post};
use axum::Router;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Build the full route table over `state`.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    Router::new()
        .route("/dao-team-vote-results", get(handlers::dao_vote_results))
        .route("/votes", post(handlers::create_vote))
        .route(
            "/votes/:id",
            get(handlers::get_vote).delete(handlers::delete_vote),
        )
        .route("/votes/:id/vote", post(handlers::cast_ballot))
        .route("/votes/:id/votes", get(handlers::list_ballots))
        .route("/votes/:id/results", get(handlers::vote_results))
        .route(
            "/admin/wallets",
            get(handlers::list_wallets).post(handlers::add_wallet),
        )
        .route(
            "/admin/wallets/:wallet_address",
            delete(handlers::delete_wallet),
        )
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// The HTTP server, configured with a port and shared state.
pub struct RpcServer {
    pub port: u16,
    pub state: Arc<AppState>,
}

impl RpcServer {
    pub fn new(port: u16, state: Arc<AppState>) -> Self {
        Self { port, state }
    }

    /// Bind to the configured port on all interfaces.
    pub async fn bind(&self) -> Result<TcpListener, RpcError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        TcpListener::bind(addr)
            .await
            .map_err(|e| RpcError::Server(format!("failed to bind {addr}: {e}")))
    }

    /// Serve on `listener` until `shutdown` resolves, then drain in-flight
    /// requests.
    pub async fn serve(
        &self,
        listener: TcpListener,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), RpcError> {
        if let Ok(addr) = listener.local_addr() {
            info!(%addr, "HTTP API listening");
        }
        axum::serve(listener, router(self.state.clone()))
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| RpcError::Server(e.to_string()))?;
        info!("HTTP API stopped");
        Ok(())
    }

    /// Bind and serve until `shutdown` resolves.
    pub async fn start(
        &self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), RpcError> {
        let listener = self.bind().await?;
        self.serve(listener, shutdown).await
    }
}
