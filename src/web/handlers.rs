//! HTTP handlers for the prediction form and batch upload

use crate::predictor::BatchPrediction;
use crate::types::prediction::IncomeBracket;
use crate::types::record::EmployeeRecord;
use crate::types::table::Table;
use crate::web::page::INDEX_HTML;
use crate::web::schema::{form_fields, FieldSpec};
use crate::web::AppState;
use axum::{
    extract::{multipart::MultipartError, rejection::JsonRejection, Multipart, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::time::Instant;
use tracing::{info, warn};

/// Error body returned by every API endpoint
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

fn upload_error(e: MultipartError) -> ApiError {
    api_error(StatusCode::BAD_REQUEST, format!("Failed to read upload: {}", e))
}

/// Run a blocking pipeline call on the blocking pool, keeping async workers free.
async fn run_blocking<T, F>(state: &AppState, work: F) -> Result<T, ApiError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work).await.map_err(|e| {
        state.metrics.record_failure();
        warn!(error = %e, "Prediction task failed");
        api_error(StatusCode::INTERNAL_SERVER_ERROR, format!("Task join error: {}", e))
    })
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model: String,
    pub features: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub label: i64,
    pub bracket: IncomeBracket,
    pub input: EmployeeRecord,
}

#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub batch_id: String,
    pub rows: usize,
    pub label_column: String,
    pub input_preview: Table,
    pub output_preview: Table,
    pub csv: String,
    pub file_name: String,
}

/// GET /
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        model: state.predictor.model_name().to_string(),
        features: state.predictor.feature_names().to_vec(),
    })
}

/// GET /api/schema - widget ranges, vocabularies and defaults
pub async fn schema() -> Json<Vec<FieldSpec>> {
    Json(form_fields())
}

/// GET /api/stats
pub async fn stats(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.metrics.snapshot())
}

/// POST /api/predict - score one record from the form
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<EmployeeRecord>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Json(record) = payload.map_err(|e| {
        state.metrics.record_failure();
        api_error(StatusCode::UNPROCESSABLE_ENTITY, e.body_text())
    })?;

    if let Err(e) = record.validate() {
        state.metrics.record_failure();
        return Err(api_error(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()));
    }

    let start = Instant::now();
    let predictor = state.predictor.clone();
    let (record, result) = run_blocking(&state, move || {
        let result = predictor.predict_one(&record);
        (record, result)
    })
    .await?;
    let label = result.map_err(|e| {
        state.metrics.record_failure();
        warn!(error = %e, "Single prediction failed");
        api_error(StatusCode::UNPROCESSABLE_ENTITY, format!("{:#}", e))
    })?;
    state.metrics.record_single(start.elapsed(), label);

    let bracket = IncomeBracket::from_label(label);
    info!(label, bracket = %bracket, latency_us = start.elapsed().as_micros() as u64, "Predicted salary class");

    Ok(Json(PredictResponse {
        label,
        bracket,
        input: record,
    }))
}

/// POST /api/batch - score an uploaded CSV, return previews and the augmented CSV
pub async fn batch(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<BatchResponse>, ApiError> {
    let batch_id = uuid::Uuid::new_v4().to_string();
    let (input, scored) = score_upload(&state, &batch_id, multipart).await?;

    let csv = scored
        .table
        .to_csv()
        .and_then(|bytes| Ok(String::from_utf8(bytes)?))
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    let preview_rows = state.batch.preview_rows;
    Ok(Json(BatchResponse {
        batch_id,
        rows: scored.table.num_rows(),
        label_column: scored.label_column,
        input_preview: input.head(preview_rows),
        output_preview: scored.table.head(preview_rows),
        csv,
        file_name: state.batch.download_file_name.clone(),
    }))
}

/// POST /api/batch/download - score an uploaded CSV, respond with the augmented CSV file
pub async fn batch_download(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let batch_id = uuid::Uuid::new_v4().to_string();
    let (_, scored) = score_upload(&state, &batch_id, multipart).await?;

    let bytes = scored
        .table
        .to_csv()
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        state.batch.download_file_name
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

/// Parse the uploaded CSV and run it through the predictor in one call.
async fn score_upload(
    state: &AppState,
    batch_id: &str,
    multipart: Multipart,
) -> Result<(Table, BatchPrediction), ApiError> {
    let bytes = read_upload(multipart).await.map_err(|e| {
        state.metrics.record_failure();
        e
    })?;

    let input = Table::from_csv(bytes.as_slice()).map_err(|e| {
        state.metrics.record_failure();
        warn!(batch_id = %batch_id, error = %e, "Rejected batch upload");
        api_error(StatusCode::BAD_REQUEST, format!("{:#}", e))
    })?;

    let start = Instant::now();
    let predictor = state.predictor.clone();
    let (input, result) = run_blocking(state, move || {
        let result = predictor.predict_batch(&input);
        (input, result)
    })
    .await?;
    let scored = result.map_err(|e| {
        state.metrics.record_failure();
        warn!(batch_id = %batch_id, rows = input.num_rows(), error = %e, "Batch prediction failed");
        api_error(StatusCode::UNPROCESSABLE_ENTITY, format!("{:#}", e))
    })?;
    let elapsed = start.elapsed();
    state.metrics.record_batch(elapsed, &scored.labels);

    info!(
        batch_id = %batch_id,
        rows = scored.labels.len(),
        columns = input.num_columns(),
        latency_us = elapsed.as_micros() as u64,
        "Batch scored"
    );

    Ok((input, scored))
}

/// Bytes of the `file` field, or of the first field carrying a file name.
async fn read_upload(mut multipart: Multipart) -> Result<Vec<u8>, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(upload_error)? {
        if field.name() == Some("file") || field.file_name().is_some() {
            let data = field.bytes().await.map_err(upload_error)?;
            return Ok(data.to_vec());
        }
    }
    Err(api_error(StatusCode::BAD_REQUEST, "No CSV file in upload"))
}
