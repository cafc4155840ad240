//! Single-page prediction form and its JSON/CSV endpoints

pub mod handlers;
pub mod page;
pub mod schema;

use crate::config::BatchConfig;
use crate::metrics::PredictorMetrics;
use crate::predictor::Predictor;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared request state. The predictor is built once at startup and only read afterwards.
#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<Predictor>,
    pub metrics: Arc<PredictorMetrics>,
    pub batch: Arc<BatchConfig>,
}

impl AppState {
    pub fn new(predictor: Arc<Predictor>, metrics: Arc<PredictorMetrics>, batch: BatchConfig) -> Self {
        Self {
            predictor,
            metrics,
            batch: Arc::new(batch),
        }
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    let upload_limit = state.batch.max_upload_bytes;

    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/api/schema", get(handlers::schema))
        .route("/api/stats", get(handlers::stats))
        .route("/api/predict", post(handlers::predict))
        .route("/api/batch", post(handlers::batch))
        .route("/api/batch/download", post(handlers::batch_download))
        .layer(DefaultBodyLimit::max(upload_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
