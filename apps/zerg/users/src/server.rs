//! HTTP server assembly and lifecycle

use axum::{Json, Router, routing::get};
use core_config::server::ServerConfig;
use domain_users::{EventPublisher, UserRepository, UserService, handlers};
use std::future::Future;
use std::time::Duration;
use tokio::signal;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info, warn};
use utoipa_scalar::{Scalar, Servable};

use crate::openapi::api_doc;

/// Upper bound for post-shutdown cleanup
pub const CLEANUP_TIMEOUT: Duration = Duration::from_secs(30);

/// User routes plus OpenAPI JSON and the Scalar viewer, with request tracing
pub fn build_router<R, P>(service: UserService<R, P>) -> Router
where
    R: UserRepository + 'static,
    P: EventPublisher + 'static,
{
    handlers::router(service)
        .route("/api-docs/openapi.json", get(|| async { Json(api_doc()) }))
        .merge(Scalar::with_url("/scalar", api_doc()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

/// Completes on Ctrl+C or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C signal, shutting down gracefully"),
        _ = terminate => info!("Received SIGTERM signal, shutting down gracefully"),
    }
}

/// Serve until a shutdown signal, then run `cleanup` bounded by [`CLEANUP_TIMEOUT`]
pub async fn serve<F>(router: Router, config: &ServerConfig, cleanup: F) -> std::io::Result<()>
where
    F: Future<Output = ()>,
{
    let listener = tokio::net::TcpListener::bind(config.address()).await?;
    info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if tokio::time::timeout(CLEANUP_TIMEOUT, cleanup).await.is_err() {
        warn!("Cleanup exceeded {:?}, forcing shutdown", CLEANUP_TIMEOUT);
    }
    Ok(())
}
