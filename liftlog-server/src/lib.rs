//! REST surface for the workout log.

pub mod error;
pub mod handlers;

use anyhow::{Context, Result};
use axum::Router;
use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use liftlog::Service;
use liftlog::config::Config;
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<Service>,
}

impl AppState {
    pub fn new(service: Service) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(handlers::healthz))
        .route(
            "/workouts",
            get(handlers::list_workouts).post(handlers::create_workout),
        )
        .route(
            "/workouts/:id",
            get(handlers::get_workout)
                .put(handlers::replace_workout)
                .patch(handlers::set_completion)
                .delete(handlers::delete_workout),
        )
        .route("/workouts/:id/summary", get(handlers::workout_summary))
        .route("/exercises", get(handlers::list_exercises))
        .route("/muscle-groups", get(handlers::list_muscle_groups))
        .layer(middleware::from_fn(log_requests))
        .with_state(state)
}

async fn log_requests(req: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let response = next.run(req).await;
    let status = response.status();
    if status.is_server_error() {
        warn!("{} {} -> {} in {:?}", method, path, status.as_u16(), started.elapsed());
    } else {
        debug!("{} {} -> {} in {:?}", method, path, status.as_u16(), started.elapsed());
    }
    response
}

/// Connects the store, optionally seeds it, and serves until Ctrl-C.
pub async fn run(config: Config) -> Result<()> {
    let service = Service::connect(&config.database_url, config.max_connections).await?;
    if config.seed_on_start {
        service.seed().await?;
    }

    let app = build_router(AppState::new(service));
    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, draining connections");
}
