// Main entry point for the discovery server

use std::sync::Arc;

use anyhow::{Context, Result};
use discovery::{
    DiscoveryConfig, DiscoveryPipeline, GoogleSearcher, HttpFetcher, LinkSweep, NoopNotifier,
    Notifier, PostgresStore, TelegramNotifier,
};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod app;
mod config;
mod digest;
mod routes;
mod scheduler;

use app::AppState;
use config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,discovery=debug,server=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Kerja Radar discovery server");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    // Connect to database
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    // PostgresStore::from_pool runs the schema migrations
    let store = Arc::new(
        PostgresStore::from_pool(pool.clone())
            .await
            .context("Failed to prepare posting store")?,
    );

    let searcher = Arc::new(GoogleSearcher::new(
        &config.google_search_key,
        &config.google_search_cx,
    ));
    let fetcher = Arc::new(HttpFetcher::new());

    let notifier: Arc<dyn Notifier> = match config.telegram() {
        Some((token, ops, subscribers)) => {
            tracing::info!("Telegram notifications enabled");
            Arc::new(TelegramNotifier::new(token, ops, subscribers))
        }
        None => {
            tracing::warn!("Telegram not configured, notifications disabled");
            Arc::new(NoopNotifier)
        }
    };

    let mut discovery_config = DiscoveryConfig::default();
    if let Some(site) = &config.search_site {
        discovery_config = discovery_config.with_site(site);
    }
    discovery_config.jobs_base_url = config.jobs_base_url.clone();

    let pipeline = Arc::new(DiscoveryPipeline::new(
        searcher,
        fetcher.clone(),
        store.clone(),
        notifier.clone(),
        discovery_config.clone(),
    ));
    let sweep = Arc::new(LinkSweep::new(
        fetcher,
        store.clone(),
        notifier.clone(),
        discovery_config.fan_out,
    ));

    let state = AppState {
        db_pool: pool,
        pipeline,
        sweep,
        store,
        notifier,
        digest_window_days: discovery_config.digest_window_days,
        jobs_base_url: config.jobs_base_url.clone(),
    };

    // Start scheduled runs
    let _scheduler = scheduler::start_scheduler(state.clone())
        .await
        .context("Failed to start scheduler")?;

    // Build application
    let router = app::build_app(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, router)
        .await
        .context("Server error")?;

    Ok(())
}
