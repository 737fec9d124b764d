//! Application state and router.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Extension, Router};
use discovery::{DiscoveryPipeline, LinkSweep, Notifier, PostingStore};
use sqlx::PgPool;
use tower_http::trace::TraceLayer;

use crate::routes;

/// Shared state handed to every handler and scheduled task.
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub pipeline: Arc<DiscoveryPipeline>,
    pub sweep: Arc<LinkSweep>,
    pub store: Arc<dyn PostingStore>,
    pub notifier: Arc<dyn Notifier>,
    pub digest_window_days: i64,
    pub jobs_base_url: String,
}

/// Build the axum application.
///
/// The `POST /runs/*` routes are the on-demand trigger surface: no
/// input payload, same side effects as the scheduled runs, simple
/// success/failure status back.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health_handler))
        .route("/runs/discovery", post(routes::run_discovery_handler))
        .route("/runs/sweep", post(routes::run_sweep_handler))
        .route("/runs/digest", post(routes::run_digest_handler))
        .layer(TraceLayer::new_for_http())
        .layer(Extension(state))
}
