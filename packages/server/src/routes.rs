//! HTTP handlers for health checks and on-demand runs.

use axum::{extract::Extension, http::StatusCode, Json};
use serde::Serialize;
use serde_json::{json, Value};

use crate::app::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    database: DatabaseHealth,
    connection_pool: ConnectionPoolHealth,
}

#[derive(Serialize)]
pub struct DatabaseHealth {
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
pub struct ConnectionPoolHealth {
    size: u32,
    idle_connections: usize,
}

/// Health check endpoint
///
/// Checks database connectivity with a bounded probe query and reports
/// connection pool utilization. Returns 200 OK when the database answers,
/// 503 Service Unavailable otherwise.
pub async fn health_handler(
    Extension(state): Extension<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let db_health = match tokio::time::timeout(
        std::time::Duration::from_secs(5),
        sqlx::query("SELECT 1").execute(&state.db_pool),
    )
    .await
    {
        Ok(Ok(_)) => DatabaseHealth {
            status: "ok".to_string(),
            error: None,
        },
        Ok(Err(e)) => DatabaseHealth {
            status: "error".to_string(),
            error: Some(format!("Query failed: {}", e)),
        },
        Err(_) => DatabaseHealth {
            status: "error".to_string(),
            error: Some("Query timeout (>5s)".to_string()),
        },
    };

    let pool_health = ConnectionPoolHealth {
        size: state.db_pool.size(),
        idle_connections: state.db_pool.num_idle(),
    };

    let is_healthy = db_health.status == "ok";

    let status_code = if is_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(HealthResponse {
            status: if is_healthy { "healthy" } else { "unhealthy" }.to_string(),
            database: db_health,
            connection_pool: pool_health,
        }),
    )
}

/// Trigger a discovery run immediately.
///
/// Same side effects as the scheduled run; returns the run report.
pub async fn run_discovery_handler(
    Extension(state): Extension<AppState>,
) -> (StatusCode, Json<Value>) {
    match state.pipeline.run().await {
        Ok(report) => (StatusCode::OK, Json(json!({ "report": report }))),
        Err(e) => {
            tracing::error!("Discovery run failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "status": "error", "error": e.to_string() })),
            )
        }
    }
}

/// Trigger a dead link sweep immediately.
pub async fn run_sweep_handler(
    Extension(state): Extension<AppState>,
) -> (StatusCode, Json<Value>) {
    match state.sweep.run().await {
        Ok(report) => (
            StatusCode::OK,
            Json(json!({
                "probed": report.probed,
                "deleted": report.deleted,
                "skipped": report.skipped,
            })),
        ),
        Err(e) => {
            tracing::error!("Link sweep failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "status": "error", "error": e.to_string() })),
            )
        }
    }
}

/// Build and send the weekly digest immediately.
pub async fn run_digest_handler(
    Extension(state): Extension<AppState>,
) -> (StatusCode, Json<Value>) {
    match crate::digest::send_weekly_digest(
        state.store.as_ref(),
        state.notifier.as_ref(),
        state.digest_window_days,
        &state.jobs_base_url,
    )
    .await
    {
        Ok(sent) => (StatusCode::OK, Json(json!({ "jobs_in_digest": sent }))),
        Err(e) => {
            tracing::error!("Digest run failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "status": "error", "error": e.to_string() })),
            )
        }
    }
}
