//! REST service over the document store, and the HTTP client the console
//! uses to talk to it.

pub mod client;
pub mod error;
pub mod routes;

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    http::StatusCode,
    routing::{delete, get},
    Router,
};
use tokio::net::TcpListener;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, warn};

use crate::documents::{Award, DocumentStore, Match, PlayerInjury, PlayerTransfer, PlayerValue, Team};

pub use client::ApiClient;
pub use error::{ApiError, ApiResult};

/// Build the router with every collection's routes.
pub fn router(store: DocumentStore, timeout_secs: u64) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(timeout_secs),
        ));

    Router::new()
        .route("/health", get(routes::health))
        // Teams
        .route(
            "/team",
            get(routes::get_team).post(routes::create_document::<Team>),
        )
        .route("/teams", get(routes::list_teams))
        // Injuries
        .route(
            "/player_injuries",
            get(routes::get_player_injury).post(routes::create_document::<PlayerInjury>),
        )
        // Awards
        .route(
            "/awards",
            get(routes::list_awards).post(routes::create_document::<Award>),
        )
        // Matches
        .route(
            "/matches",
            get(routes::finished_matches).post(routes::create_document::<Match>),
        )
        .route("/upcoming_matches", get(routes::upcoming_matches))
        .route("/matches_score", get(routes::scored_matches))
        .route("/matches_team", get(routes::recent_team_matches))
        .route("/matches_team_all", get(routes::all_team_matches))
        // Transfers
        .route(
            "/player_transfers",
            get(routes::list_transfers).post(routes::create_document::<PlayerTransfer>),
        )
        // Values
        .route(
            "/player_values",
            get(routes::player_values).post(routes::create_document::<PlayerValue>),
        )
        .route("/all", delete(routes::delete_all))
        .with_state(store)
        .layer(middleware)
}

/// Bind `addr` and serve until Ctrl+C or SIGTERM.
pub async fn serve(store: DocumentStore, addr: SocketAddr, timeout_secs: u64) -> anyhow::Result<()> {
    store.create_indexes()?;
    info!("document indexes ready");

    let listener = TcpListener::bind(addr).await?;
    info!("Starting football-stats API on http://{}", listener.local_addr()?);

    serve_on(listener, store, timeout_secs, shutdown_signal()).await?;
    info!("Server shutdown complete");
    Ok(())
}

/// Serve on an already-bound listener until `shutdown` resolves.
pub async fn serve_on<F>(
    listener: TcpListener,
    store: DocumentStore,
    timeout_secs: u64,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = router(store, timeout_secs);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}

#[cfg(test)]
mod tests;
