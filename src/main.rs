//! Salary Predictor - Main Entry Point
//!
//! Loads the trained pipeline once, then serves the prediction form and
//! batch CSV scoring over HTTP.

use anyhow::{Context, Result};
use salary_predictor::{
    config::{AppConfig, LoggingConfig},
    metrics::PredictorMetrics,
    predictor::Predictor,
    web::{self, AppState},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = AppConfig::load()?;

    // Initialize logging
    init_logging(&config.logging)?;
    info!("Starting Salary Predictor");
    info!(
        model = %config.model.path,
        bind = %config.server.bind,
        label_column = %config.batch.label_column,
        "Configuration loaded successfully"
    );

    // A missing or unreadable artifact stops the process here
    let predictor = Predictor::load(&config.model)?.with_label_column(config.batch.label_column.clone());
    info!(
        model = %predictor.model_name(),
        features = ?predictor.feature_names(),
        "Predictor initialized"
    );

    let metrics = Arc::new(PredictorMetrics::new());
    let state = AppState::new(Arc::new(predictor), metrics.clone(), config.batch.clone());
    let app = web::router(state);

    let listener = TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind))?;
    info!("Serving prediction form at http://{}", config.server.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Salary Predictor shutting down...");
    metrics.print_summary();

    Ok(())
}

fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(format!(
            "salary_predictor={level},tower_http={level}",
            level = logging.level
        ))?,
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
